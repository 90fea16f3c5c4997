use obsdisk_shared::constants::tool::FATAL_MARKER;

/// Reduce the tool's stderr to the part a user needs to act on.
///
/// If the text contains a `<FATAL>:` marker, everything after the first
/// marker is returned, trimmed. Otherwise the text is returned unchanged.
pub fn extract_fatal_detail(stderr: &str) -> String {
    match stderr.find(FATAL_MARKER) {
        Some(pos) => stderr[pos + FATAL_MARKER.len()..].trim().to_string(),
        None => stderr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_after_marker() {
        assert_eq!(
            extract_fatal_detail("noise\n<FATAL>: disk full\nmore"),
            "disk full\nmore"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_fatal_detail(""), "");
    }

    #[test]
    fn test_no_marker_returns_input_unchanged() {
        assert_eq!(
            extract_fatal_detail("plain error, no marker"),
            "plain error, no marker"
        );
        assert_eq!(extract_fatal_detail("  padded\n"), "  padded\n");
    }

    #[test]
    fn test_real_tool_line() {
        let stderr = "2024/05/01 10:00:00.000000 juicefs[4242] <INFO>: Meta address: sqlite3:///tmp/m [interface.go:497]\n\
                      2024/05/01 10:00:01.000000 juicefs[4242] <FATAL>: Storage oss://b is not configured correctly: 403 Forbidden [format.go:471]\n";
        assert_eq!(
            extract_fatal_detail(stderr),
            "Storage oss://b is not configured correctly: 403 Forbidden [format.go:471]"
        );
    }

    #[test]
    fn test_only_first_marker_splits() {
        assert_eq!(
            extract_fatal_detail("<FATAL>: first <FATAL>: second"),
            "first <FATAL>: second"
        );
    }

    #[test]
    fn test_marker_with_nothing_after() {
        assert_eq!(extract_fatal_detail("boom <FATAL>:   \n"), "");
    }
}
