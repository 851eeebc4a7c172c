//! Sysfs Discovery: surfaces whitelisted kernel attributes from the sysfs tree as
//! node labels.
//!
//! Every configured path is read below the host's sysfs mount, its path is turned into a
//! dotted attribute name bounded in length, and its content into a sanitized label
//! value. Missing or unreadable attributes never abort a discovery run.
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use error::ResultOkLogExt;
use hostpath::HostDir;
use source::{FeatureSource, LabelSource, SysfsSource};

pub mod api;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod hostpath;
pub mod mountinfo;
pub mod source;
pub mod sysfs;

/// Runs the discovery agent.
///
/// Locates the host's sysfs tree, starts the label API and then runs discovery on a
/// fixed interval, publishing each result.
///
/// # Errors
///
/// Possible errors include:
/// - Invalid settings in the environment (see [`config::Settings`]).
/// - Running in a container without the host root mounted.
/// - The API listen address being unavailable.
/// - The discovery worker panicking.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = config::Settings::from_env()?;

    let sysfs_dir = match &settings.sysfs_root {
        Some(root) => HostDir::new(root),
        None => {
            let host_root = hostpath::detect_host_root(&settings.rootfs_mount)?;
            log::debug!("Host root: {}", host_root.display());
            hostpath::detect_sysfs_dir(host_root)
        }
    };
    log::info!("Reading sysfs attributes below `{}`", sysfs_dir.root().display());

    let listener = tokio::net::TcpListener::bind(settings.listen_addr).await?;
    log::info!("Serving labels on {}", listener.local_addr()?);

    let store = api::SnapshotStore::new();
    {
        let store = store.clone();
        tokio::spawn(async move {
            api::APIServer::new(store)
                .listen(listener)
                .await
                .ok_log("label API server stopped");
        });
    }

    let mut source = SysfsSource::new(settings.config, sysfs_dir);
    let mut interval = tokio::time::interval(settings.interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

        let (returned, snapshot) = tokio::task::spawn_blocking(move || {
            let before = Instant::now();
            let summary = source.discover();
            let took = before.elapsed();
            log::trace!(
                "discover() took {} microseconds: discovered={}, skipped={}",
                took.as_micros(),
                summary.discovered,
                summary.skipped
            );

            let snapshot = api::Snapshot {
                timestamp,
                features: source.features().clone(),
                labels: source.labels(),
            };
            (source, snapshot)
        })
        .await?;

        source = returned;
        store.publish(snapshot).await;
    }
}
