//! Recognition of absolute Windows image paths embedded in free-form text.
//!
//! Grammar of a recognised path:
//!
//! ```text
//! path      := drive ":" sep (segment sep)* name extension
//! drive     := [a-zA-Z]
//! sep       := "\" | "/"
//! segment   := one or more chars other than \ / : * ? " < > | CR LF
//! name      := zero or more chars of the same class as segment
//! extension := one of the configured extensions
//! ```
//!
//! Matching stops at the first configured extension, so two references on the same line are
//! never merged into one match. UNC paths, POSIX absolute paths and relative paths are not
//! recognised.

use regex::Regex;

const DRIVE_PREFIX: &str = r"[a-zA-Z]:[\\/]";
const SEGMENT_CLASS: &str = r#"[^\\/:*?"<>|\r\n]"#;

/// Compiled path pattern for one extension allow-list.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: Option<Regex>,
}

impl PathMatcher {
    /// Compile a matcher for the given extensions (each including its leading dot).
    ///
    /// An empty allow-list produces a matcher that never matches.
    pub fn new<S: AsRef<str>>(extensions: &[S], case_insensitive: bool) -> Self {
        let pattern = build_pattern(extensions, case_insensitive)
            .map(|source| Regex::new(&source).expect("invalid path regex"));
        Self { pattern }
    }

    /// Source of the compiled pattern, if any.
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// Every non-overlapping path in `text`, in order of appearance, duplicates included.
    pub fn extract(&self, text: &str) -> Vec<String> {
        match &self.pattern {
            Some(pattern) => pattern
                .find_iter(text)
                .map(|found| found.as_str().to_string())
                .collect(),
            None => Vec::new(),
        }
    }
}

fn build_pattern<S: AsRef<str>>(extensions: &[S], case_insensitive: bool) -> Option<String> {
    let mut extensions: Vec<&str> = extensions
        .iter()
        .map(AsRef::as_ref)
        .filter(|ext| !ext.is_empty())
        .collect();
    if extensions.is_empty() {
        return None;
    }
    // Alternation is ordered, so `.jpeg` has to be tried before a shorter `.jp`.
    extensions.sort_by(|left, right| right.len().cmp(&left.len()));
    let alternatives: Vec<String> = extensions.into_iter().map(regex::escape).collect();

    let flags = if case_insensitive { "(?i)" } else { "" };
    Some(format!(
        "{DRIVE_PREFIX}(?:{SEGMENT_CLASS}+?[\\\\/])*?{SEGMENT_CLASS}*?(?:{flags}{})",
        alternatives.join("|")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PathMatcher {
        PathMatcher::new(&[".png", ".jpg", ".jpeg"], false)
    }

    #[test]
    fn keeps_repeated_paths_in_order() {
        let text = r"See C:\Users\a\img.png and C:\Users\a\img.png again";
        assert_eq!(matcher().extract(text), vec![
            r"C:\Users\a\img.png".to_string(),
            r"C:\Users\a\img.png".to_string(),
        ]);
    }

    #[test]
    fn accepts_both_separators_and_spaces_in_segments() {
        let text = "![shot](d:/My Pictures/2024/shot one.jpeg)";
        assert_eq!(matcher().extract(text), vec![
            "d:/My Pictures/2024/shot one.jpeg".to_string()
        ]);
    }

    #[test]
    fn stops_at_the_first_extension() {
        let text = r"![a](C:\x\a.png) ![b](img/b.png)";
        assert_eq!(matcher().extract(text), vec![r"C:\x\a.png".to_string()]);
    }

    #[test]
    fn does_not_cross_lines() {
        let text = "C:\\notes\\\nphoto.png";
        assert!(matcher().extract(text).is_empty());
    }

    #[test]
    fn ignores_relative_posix_and_unc_paths() {
        let text = r"assets/img.png /home/me/img.png \\server\share\img.png";
        assert!(matcher().extract(text).is_empty());
    }

    #[test]
    fn ignores_unlisted_extensions() {
        assert!(matcher().extract(r"C:\x\movie.gif").is_empty());
    }

    #[test]
    fn extension_case_is_respected_unless_configured() {
        let text = r"C:\x\IMG.PNG";
        assert!(matcher().extract(text).is_empty());

        let relaxed = PathMatcher::new(&[".png"], true);
        assert_eq!(relaxed.extract(text), vec![r"C:\x\IMG.PNG".to_string()]);
    }

    #[test]
    fn extension_dots_are_literal() {
        let matcher = PathMatcher::new(&[".png"], false);
        assert!(matcher.extract(r"C:\x\imagexpng").is_empty());
    }

    #[test]
    fn prefers_the_longer_extension() {
        let matcher = PathMatcher::new(&[".jp", ".jpeg"], false);
        assert_eq!(matcher.extract(r"C:\x\a.jpeg"), vec![r"C:\x\a.jpeg".to_string()]);
    }

    #[test]
    fn empty_allow_list_matches_nothing() {
        let matcher = PathMatcher::new::<&str>(&[], false);
        assert!(matcher.pattern().is_none());
        assert!(matcher.extract(r"C:\x\a.png").is_empty());
    }

    #[test]
    fn extraction_is_repeatable() {
        let matcher = matcher();
        let text = r"C:\a\one.jpg C:\b\two.png";
        assert_eq!(matcher.extract(text), matcher.extract(text));
    }
}
