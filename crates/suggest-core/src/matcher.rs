//! Query-to-entry matching.
//!
//! Only prefixes are matched here. Fuzzy and infix filtering is left to the
//! picker, which receives the full ranked list and filters client-side.

use serde::Serialize;

use crate::entry::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MatchScore {
    Reject = 0,
    /// Empty query: everything matches.
    Substring = 1,
    Prefix = 2,
    Exact = 3,
}

impl MatchScore {
    pub fn is_match(self) -> bool {
        self != Self::Reject
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Score `entry` against `query`, comparing case-sensitively against the
/// stored text and never against an expansion.
pub fn matches(query: &str, entry: &Entry) -> MatchScore {
    if query.is_empty() {
        return MatchScore::Substring;
    }
    if entry.text == query {
        MatchScore::Exact
    } else if entry.text.starts_with(query) {
        MatchScore::Prefix
    } else {
        MatchScore::Reject
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_prefix_reject() {
        let e = Entry::word("apple");
        assert_eq!(matches("apple", &e), MatchScore::Exact);
        assert_eq!(matches("app", &e), MatchScore::Prefix);
        assert_eq!(matches("ple", &e), MatchScore::Reject);
        assert_eq!(matches("apples", &e), MatchScore::Reject);
    }

    #[test]
    fn case_sensitive() {
        assert_eq!(matches("App", &Entry::word("apple")), MatchScore::Reject);
    }

    #[test]
    fn empty_query_lists_everything() {
        for line in ["cat", "brb=be right back", "#date", "%1+1"] {
            let e = Entry::parse(line).unwrap();
            assert_eq!(matches("", &e), MatchScore::Substring);
        }
    }

    #[test]
    fn alias_matches_on_key_not_expansion() {
        let e = Entry::parse("brb=be right back").unwrap();
        assert_eq!(matches("brb", &e), MatchScore::Exact);
        assert_eq!(matches("be", &e), MatchScore::Reject);
    }

    #[test]
    fn score_values() {
        assert_eq!(MatchScore::Reject.value(), 0);
        assert_eq!(MatchScore::Substring.value(), 1);
        assert_eq!(MatchScore::Prefix.value(), 2);
        assert_eq!(MatchScore::Exact.value(), 3);
        assert!(!MatchScore::Reject.is_match());
        assert!(MatchScore::Substring.is_match());
    }

    proptest! {
        #[test]
        fn positive_iff_prefix(query in "[a-cA-C]{1,4}", text in "[a-cA-C]{0,6}") {
            let score = matches(&query, &Entry::word(text.clone()));
            prop_assert_eq!(score.value() > 0, text.starts_with(&query));
            prop_assert_eq!(score == MatchScore::Exact, text == query);
        }

        #[test]
        fn empty_query_always_one(text in "\\PC{1,12}") {
            prop_assert_eq!(matches("", &Entry::word(text)).value(), 1);
        }
    }
}
