// The profile's ordered exception list is mirrored into a set when the
// profile is compiled.

use std::collections::HashSet;

/// Opening marks stripped from the front of the word preceding a delimiter
const LEADING_MARKS: &[char] = &[
    '"', '\'', '(', '[', '{', '\u{201C}', '\u{2018}', '\u{00AB}', '\u{300C}', '\u{300E}',
];

/// Case-sensitive abbreviation lookup for one language profile
#[derive(Debug, Clone, Default)]
pub struct AbbreviationChecker {
    /// Exceptions in profile order, kept for reporting
    ordered: Vec<String>,
    lookup: HashSet<String>,
    /// Byte length of the longest entry
    longest: usize,
}

impl AbbreviationChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_exceptions<S: AsRef<str>>(exceptions: &[S]) -> Self {
        let mut checker = Self::new();
        for exception in exceptions {
            checker.insert(exception.as_ref());
        }
        checker
    }

    pub fn insert(&mut self, exception: &str) {
        let exception = exception.trim();
        if !exception.is_empty() && self.lookup.insert(exception.to_string()) {
            self.longest = self.longest.max(exception.len());
            self.ordered.push(exception.to_string());
        }
    }

    /// Check if a literal is in the exception list
    pub fn is_exception(&self, word: &str) -> bool {
        self.lookup.contains(word)
    }

    /// Decide whether `word` followed by `delimiter` is a listed exception.
    /// `Dr.` suppresses the break after `Dr` for the matching delimiter; a
    /// bare `Dr` entry only covers a period.
    pub fn suppresses(&self, word: &str, delimiter: &str) -> bool {
        if word.is_empty() || word.len() > self.longest {
            return false;
        }
        if delimiter == "." && self.is_exception(word) {
            return true;
        }
        let mut with_delimiter = String::with_capacity(word.len() + delimiter.len());
        with_delimiter.push_str(word);
        with_delimiter.push_str(delimiter);
        self.is_exception(&with_delimiter)
    }

    pub fn exceptions(&self) -> &[String] {
        &self.ordered
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Strip opening quotes and brackets so `("Dr` compares as `Dr`
pub fn trim_leading_marks(word: &str) -> &str {
    word.trim_start_matches(LEADING_MARKS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    static SHARED_CHECKER: OnceLock<AbbreviationChecker> = OnceLock::new();

    fn get_checker() -> &'static AbbreviationChecker {
        SHARED_CHECKER.get_or_init(|| {
            AbbreviationChecker::from_exceptions(&["Dr.", "Mr.", "U.S.A.", "p.m.", "Prof", "Dr."])
        })
    }

    #[test]
    fn test_exception_detection() {
        let checker = get_checker();

        for abbr in ["Dr.", "U.S.A.", "p.m.", "Prof"] {
            assert!(checker.is_exception(abbr), "Should detect {abbr} as exception");
        }
        assert!(!checker.is_exception("Hello"));
        // Case-sensitive
        assert!(!checker.is_exception("dr."));
        // Duplicates collapse but keep the first position
        assert_eq!(checker.len(), 5);
        assert_eq!(checker.exceptions()[0], "Dr.");
    }

    #[test]
    fn test_suppresses_with_and_without_delimiter() {
        let checker = get_checker();

        assert!(checker.suppresses("Dr", "."));
        assert!(checker.suppresses("U.S.A", "."));
        assert!(checker.suppresses("Prof", "."));
        assert!(!checker.suppresses("Dr", "!"));
        assert!(!checker.suppresses("world", "."));
        assert!(!checker.suppresses("", "."));
    }

    #[test]
    fn test_bare_entry_only_covers_period() {
        let checker = get_checker();

        assert!(checker.suppresses("Prof", "."));
        assert!(!checker.suppresses("Prof", "!"));
        assert!(!checker.suppresses("Prof", "?"));
    }

    #[test]
    fn test_overlong_word_never_matches() {
        let checker = get_checker();
        let long_word = "1.".repeat(64);
        assert!(!checker.suppresses(&long_word, "."));
    }

    #[test]
    fn test_trim_leading_marks() {
        assert_eq!(trim_leading_marks("(\"Dr"), "Dr");
        assert_eq!(trim_leading_marks("\u{201C}Mr"), "Mr");
        assert_eq!(trim_leading_marks("plain"), "plain");
    }
}
