use regex::Regex;
use tracing::debug;

/// Pattern used when the pattern field is left blank: the whole name is replaced.
pub const MATCH_ALL: &str = ".+";

/// Compiled form of the user's pattern, recompiled only when the pattern changes.
#[derive(Debug)]
pub struct NameMatcher {
    effective: String,
    compiled: Option<Result<Regex, regex::Error>>,
    compilations: usize,
}

impl NameMatcher {
    pub fn new() -> Self {
        let mut matcher = Self {
            effective: String::new(),
            compiled: None,
            compilations: 0,
        };
        matcher.update("");
        matcher
    }

    pub fn effective_pattern(pattern: &str) -> &str {
        if pattern.is_empty() {
            MATCH_ALL
        } else {
            pattern
        }
    }

    /// Recompiles if `pattern` differs from the last one seen. Returns whether
    /// a compilation happened.
    pub fn update(&mut self, pattern: &str) -> bool {
        let effective = Self::effective_pattern(pattern);
        if self.compiled.is_some() && self.effective == effective {
            return false;
        }

        let compiled = Regex::new(effective);
        match &compiled {
            Ok(_) => debug!("Compiled pattern: '{}'", effective),
            Err(e) => debug!("Pattern '{}' failed to compile: {}", effective, e),
        }

        self.effective = effective.to_string();
        self.compiled = Some(compiled);
        self.compilations += 1;
        true
    }

    pub fn pattern(&self) -> &str {
        &self.effective
    }

    pub fn regex(&self) -> Option<&Regex> {
        self.compiled.as_ref().and_then(|c| c.as_ref().ok())
    }

    pub fn error(&self) -> Option<&regex::Error> {
        self.compiled.as_ref().and_then(|c| c.as_ref().err())
    }

    pub fn is_valid(&self) -> bool {
        self.regex().is_some()
    }

    pub fn compilations(&self) -> usize {
        self.compilations
    }

    /// Replaces every non-overlapping match in `name`. `$1` and `${name}` in
    /// `replacement` refer to capture groups. `None` if the pattern is invalid.
    pub fn replace(&self, name: &str, replacement: &str) -> Option<String> {
        self.regex()
            .map(|regex| regex.replace_all(name, replacement).into_owned())
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_matches_whole_name() {
        let matcher = NameMatcher::new();

        assert_eq!(matcher.pattern(), MATCH_ALL);
        assert_eq!(matcher.replace("foo_1", "X").unwrap(), "X");
        assert_eq!(matcher.replace("a b c", "X").unwrap(), "X");
    }

    #[test]
    fn test_empty_pattern_equals_match_all() {
        let mut empty = NameMatcher::new();
        empty.update("");
        let mut explicit = NameMatcher::new();
        explicit.update(".+");

        for name in ["", "x", "foo_bar", "multi\nline"] {
            assert_eq!(empty.replace(name, "R"), explicit.replace(name, "R"));
        }
    }

    #[test]
    fn test_group_references() {
        let mut matcher = NameMatcher::new();
        matcher.update(r"^foo_(\d+)$");

        assert_eq!(matcher.replace("foo_1", "baz_$1").unwrap(), "baz_1");
        assert_eq!(matcher.replace("bar_1", "baz_$1").unwrap(), "bar_1");

        matcher.update(r"(?P<stem>\w+)\.(?P<ext>\w+)");
        assert_eq!(
            matcher.replace("report.txt", "${ext}_${stem}").unwrap(),
            "txt_report"
        );
    }

    #[test]
    fn test_replaces_all_occurrences() {
        let mut matcher = NameMatcher::new();
        matcher.update("o");

        assert_eq!(matcher.replace("foo_boo", "0").unwrap(), "f00_b00");
    }

    #[test]
    fn test_invalid_pattern() {
        let mut matcher = NameMatcher::new();
        matcher.update("foo(");

        assert!(!matcher.is_valid());
        assert!(matcher.error().is_some());
        assert!(matcher.replace("foo", "bar").is_none());
    }

    #[test]
    fn test_recompiles_only_on_change() {
        let mut matcher = NameMatcher::new();
        assert_eq!(matcher.compilations(), 1);

        assert!(matcher.update("a+"));
        assert!(!matcher.update("a+"));
        assert!(!matcher.update("a+"));
        assert_eq!(matcher.compilations(), 2);

        // Blank and the explicit default are the same effective pattern.
        assert!(matcher.update(""));
        assert!(!matcher.update(".+"));
        assert_eq!(matcher.compilations(), 3);
    }

    #[test]
    fn test_recovers_after_invalid_pattern() {
        let mut matcher = NameMatcher::new();
        matcher.update("[");
        assert!(!matcher.is_valid());

        matcher.update("[a]");
        assert!(matcher.is_valid());
        assert!(matcher.error().is_none());
    }
}
