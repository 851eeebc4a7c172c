/// Maximum byte length of an attribute name.
///
/// Label keys are capped at 63 characters downstream; the remainder is left for the
/// fixed-size prefix the label consumer adds.
pub const MAX_NAME_LEN: usize = 55;

/// Builds the dotted attribute name for a cleaned, absolute logical path.
///
/// Every `/` becomes `.` and leading separators are dropped, so the name never starts
/// with `.` even when the first segment does. Names longer than [`MAX_NAME_LEN`] are
/// truncated from the front so the leaf segments survive, and the cut is moved forward
/// past the next `.` so no segment is split. When that leaves nothing, the last
/// [`MAX_NAME_LEN`] bytes are kept as-is.
///
/// # Examples
///
/// ```
/// # use sysfs_discovery::sysfs::attribute_name;
/// assert_eq!(
///     attribute_name("/class/power_supply/BAT0/capacity"),
///     "class.power_supply.BAT0.capacity"
/// );
/// assert_eq!(attribute_name("/.hidden/x"), "hidden.x");
/// ```
pub fn attribute_name(logical_path: &str) -> String {
    let dotted = logical_path.replace('/', ".");
    truncate_front(&dotted, MAX_NAME_LEN).to_owned()
}

fn truncate_front(name: &str, cap: usize) -> &str {
    let name = name.trim_start_matches('.');
    if name.len() <= cap {
        return name;
    }

    let mut start = name.len() - cap;
    while !name.is_char_boundary(start) {
        start += 1;
    }

    let tail = &name[start..];
    let kept = match tail.find('.') {
        Some(offset) => tail[offset + 1..].trim_start_matches('.'),
        None => tail,
    };
    if kept.is_empty() {
        tail.trim_start_matches('.')
    } else {
        kept
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::sysfs::logical_path;

    #[test]
    fn test_short_path_is_dotted() {
        let name = attribute_name("/class/power_supply/BAT0/capacity");
        assert_eq!(name, "class.power_supply.BAT0.capacity");
        assert_eq!(name.len(), 32);
    }

    #[test]
    fn test_root_path_yields_empty_name() {
        assert_eq!(attribute_name("/"), "");
    }

    #[test]
    fn test_name_at_cap_is_untouched() {
        let path = format!("/{}", "a".repeat(MAX_NAME_LEN));
        assert_eq!(attribute_name(&path).len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_truncation_cuts_at_segment_boundary() {
        // 70 bytes in total, the last separator sits 14 bytes from the end.
        let dotted = format!(
            "{}.{}.{}.{}",
            "a".repeat(10),
            "b".repeat(3),
            "c".repeat(41),
            "d".repeat(13)
        );
        assert_eq!(dotted.len(), 70);
        assert_eq!(dotted.rfind('.'), Some(70 - 14));

        let name = attribute_name(&format!("/{}", dotted.replace('.', "/")));
        assert_eq!(name, "d".repeat(13));
        assert!(name.len() <= MAX_NAME_LEN);
    }

    #[test]
    fn test_truncation_keeps_whole_leaf_segments() {
        let path = "/devices/pci0000:00/0000:00:1f.3/sound/card0/hwC0D0/subsystem_vendor_id";
        let name = attribute_name(path);
        assert!(name.len() <= MAX_NAME_LEN);
        assert!(!name.starts_with('.'));
        assert!(name.ends_with("subsystem_vendor_id"));

        let full = path[1..].replace('/', ".");
        let cut = full.len() - name.len();
        assert!(full.ends_with(&name));
        assert_eq!(&full[cut - 1..cut], ".");
    }

    #[test]
    fn test_separator_exactly_at_cut_point() {
        let dotted = format!("{}.{}", "x".repeat(10), "y".repeat(MAX_NAME_LEN - 1));
        let name = attribute_name(&format!("/{}", dotted.replace('.', "/")));
        assert_eq!(name, "y".repeat(MAX_NAME_LEN - 1));
    }

    #[test]
    fn test_single_overlong_segment_keeps_last_bytes() {
        let leaf = format!("{}{}", "p".repeat(20), "q".repeat(MAX_NAME_LEN));
        let name = attribute_name(&format!("/{leaf}"));
        assert_eq!(name, "q".repeat(MAX_NAME_LEN));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let path = format!("/{}/{}", "é".repeat(40), "leaf");
        let name = attribute_name(&path);
        assert_eq!(name, "leaf");
    }

    #[test]
    fn test_truncated_name_never_starts_with_separator() {
        for extra in 0..20 {
            let path = format!(
                "/{}/{}/{}",
                "a".repeat(30 + extra),
                "b".repeat(15),
                "c".repeat(20)
            );
            let name = attribute_name(&path);
            assert!(!name.starts_with('.'), "{name}");
            assert!(name.len() <= MAX_NAME_LEN, "{name}");
        }
    }

    #[test]
    fn test_dot_prefixed_segment_is_not_a_leading_separator() {
        assert_eq!(attribute_name("/.hidden/x"), "hidden.x");
        assert_eq!(
            attribute_name("/module/kvm/notes/.note.gnu.build-id"),
            "module.kvm.notes..note.gnu.build-id"
        );
    }

    #[test]
    fn test_cut_followed_by_dots_drops_them() {
        let path = format!("/{}/...{}", "a".repeat(20), "b".repeat(40));
        assert_eq!(attribute_name(&path), "b".repeat(40));
    }

    #[test]
    fn test_overlong_segment_ending_in_dot_is_not_emptied() {
        let path = format!("/{}.", "c".repeat(60));
        let name = attribute_name(&path);
        assert_eq!(name, format!("{}.", "c".repeat(MAX_NAME_LEN - 1)));
    }

    proptest! {
        #[test]
        fn test_name_is_bounded_and_never_starts_with_separator(
            segments in proptest::collection::vec("[a-zA-Z0-9._:-]{0,30}", 0..10)
        ) {
            let name = attribute_name(&logical_path(&segments.join("/")));
            prop_assert!(name.len() <= MAX_NAME_LEN, "{}", name);
            prop_assert!(!name.starts_with('.'), "{}", name);
        }

        #[test]
        fn test_name_of_any_text_is_bounded(entry in "\\PC{0,200}") {
            let name = attribute_name(&logical_path(&entry));
            prop_assert!(name.len() <= MAX_NAME_LEN, "{}", name);
            prop_assert!(!name.starts_with('.'), "{}", name);
        }
    }
}
