use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a label value.
pub const MAX_VALUE_LEN: usize = 62;

static LEADING_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^-A-Za-z0-9]+").expect("valid regex"));
static TRAILING_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-A-Za-z0-9]+$").expect("valid regex"));
static INTERIOR_INVALID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^-A-Za-z0-9_.]+").expect("valid regex"));

/// Converts raw attribute content into a label value.
///
/// Leading characters outside `[-A-Za-z0-9]` are dropped, every remaining run of
/// characters outside `[-A-Za-z0-9_.]` collapses to a single `_`, the result is cut to
/// [`MAX_VALUE_LEN`] characters and finally any trailing run outside `[-A-Za-z0-9]` is
/// dropped. Content that is not valid UTF-8 is decoded lossily first.
///
/// Sanitizing an already sanitized value returns it unchanged.
///
/// # Examples
///
/// ```
/// # use sysfs_discovery::sysfs::sanitize_value;
/// assert_eq!(sanitize_value(b"87\n"), "87");
/// assert_eq!(sanitize_value(b"  Intel(R) Core(TM) i7\n"), "Intel_R_Core_TM_i7");
/// ```
pub fn sanitize_value(raw: &[u8]) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let content = String::from_utf8_lossy(raw);
    let value = LEADING_INVALID.replace(&content, "");
    let mut value = INTERIOR_INVALID.replace_all(&value, "_").into_owned();
    // every character left is ASCII, so byte truncation is safe
    value.truncate(MAX_VALUE_LEN);
    TRAILING_INVALID.replace(&value, "").into_owned()
}
