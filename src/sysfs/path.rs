/// Mount point of sysfs that absolute entries may spell out.
const SYSFS_PREFIX: &str = "/sys";

/// Turns a configured whitelist entry into an absolute, lexically cleaned logical path.
///
/// Entries are interpreted relative to the root of the attribute tree, so a relative
/// entry is joined under `/` rather than the process working directory. An absolute
/// entry whose first segment is exactly `sys` has that segment dropped, so
/// `/sys/class/net` and `/class/net` name the same attribute while `/sysfoo` is kept.
/// Cleaning collapses repeated separators, `.` and `..` segments without touching the
/// filesystem; `..` never climbs above `/`.
///
/// # Examples
///
/// ```
/// # use sysfs_discovery::sysfs::logical_path;
/// assert_eq!(logical_path("class/power_supply/BAT0/capacity"), "/class/power_supply/BAT0/capacity");
/// assert_eq!(logical_path("/devices//system/./cpu/../node"), "/devices/system/node");
/// assert_eq!(logical_path("/sys/class/net"), "/class/net");
/// assert_eq!(logical_path(""), "/");
/// ```
pub fn logical_path(entry: &str) -> String {
    let entry = strip_sysfs_prefix(entry);
    let mut segments: Vec<&str> = Vec::new();
    for segment in entry.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let mut out = String::with_capacity(entry.len() + 1);
    out.push('/');
    out.push_str(&segments.join("/"));
    out
}

fn strip_sysfs_prefix(entry: &str) -> &str {
    match entry.strip_prefix(SYSFS_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => entry,
    }
}
