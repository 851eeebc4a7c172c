use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::FeatureLabels;

static INVALID_LABEL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-A-Za-z0-9_.]+").expect("valid regex"));

/// Replaces every run of characters a label cannot hold with a single `_`.
///
/// Applied to both keys and values on export, whatever produced them.
///
/// # Examples
///
/// ```
/// # use sysfs_discovery::source::label_safe;
/// assert_eq!(label_safe("devices.pci0000:00.vendor"), "devices.pci0000_00.vendor");
/// assert_eq!(label_safe("class.net.eth0.mtu"), "class.net.eth0.mtu");
/// ```
pub fn label_safe(raw: &str) -> String {
    INVALID_LABEL_CHARS.replace_all(raw, "_").into_owned()
}

/// Converts discovered elements into export-safe labels.
///
/// Names that collide after sanitization keep the value of the last one in key order.
pub(super) fn export_labels(elements: &BTreeMap<String, String>) -> FeatureLabels {
    elements
        .iter()
        .map(|(name, value)| (label_safe(name), label_safe(value)))
        .collect()
}
