/// Entry point of the sysfs discovery agent.
///
/// Reads the configured sysfs attributes on a fixed interval and serves the resulting
/// labels over HTTP.
///
/// # Errors
///
/// Returns an error if initialization fails (e.g., invalid settings or a missing host
/// root mount).
///
/// # Examples
///
/// ```bash
/// SYSFS_WHITELIST=class/power_supply/BAT0/capacity RUST_LOG=debug cargo run
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    sysfs_discovery::run().await
}
