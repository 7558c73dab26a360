//! Dictionary line grammar.
//!
//! Every non-blank line of a source file becomes one [`Entry`]:
//!
//! - `WORD` → [`EntryKind::Word`]
//! - `WORD=EXPANSION` → [`EntryKind::Alias`]
//! - `WORD=#COMMAND` and `#COMMAND` → [`EntryKind::Command`]
//! - `%EXPRESSION` → [`EntryKind::MathExpr`]
//!
//! Lines that fit none of the marked forms are plain words; parsing never fails.

use serde::Serialize;

/// Prefix marking a shell command template.
pub const COMMAND_MARKER: char = '#';
/// Prefix marking an arithmetic expression.
pub const MATH_MARKER: char = '%';
/// Separates an alias key from its expansion.
pub const ALIAS_SEPARATOR: char = '=';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Word,
    Alias,
    Command,
    MathExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// What the user types and filters on.
    pub text: String,
    /// Alias expansion, command template or expression, without markers.
    pub expansion: Option<String>,
    pub kind: EntryKind,
}

impl Entry {
    pub fn word(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expansion: None,
            kind: EntryKind::Word,
        }
    }

    /// Parse one source line. Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        if let Some((key, expansion)) = line.split_once(ALIAS_SEPARATOR) {
            let key = key.trim_end();
            if key.is_empty() || expansion.is_empty() {
                return Some(Self::word(line));
            }
            return Some(match expansion.strip_prefix(COMMAND_MARKER) {
                Some(template) if !template.trim().is_empty() => Self {
                    text: key.to_string(),
                    expansion: Some(template.to_string()),
                    kind: EntryKind::Command,
                },
                Some(_) => Self::word(line),
                None => Self {
                    text: key.to_string(),
                    expansion: Some(expansion.to_string()),
                    kind: EntryKind::Alias,
                },
            });
        }

        if let Some(rest) = line.strip_prefix(COMMAND_MARKER) {
            return Some(Self::marked(line, rest, EntryKind::Command));
        }
        if let Some(rest) = line.strip_prefix(MATH_MARKER) {
            return Some(Self::marked(line, rest, EntryKind::MathExpr));
        }
        Some(Self::word(line))
    }

    /// `#cmd` / `%expr`: the whole line stays the visible text.
    fn marked(line: &str, rest: &str, kind: EntryKind) -> Self {
        let rest = rest.trim_start();
        if rest.is_empty() {
            return Self::word(line);
        }
        Self {
            text: line.to_string(),
            expansion: Some(rest.to_string()),
            kind,
        }
    }

    /// Whether producing this entry has side effects or needs evaluation.
    pub fn is_lazy(&self) -> bool {
        matches!(self.kind, EntryKind::Command | EntryKind::MathExpr)
    }
}

/// Parse source text into entries, in line order.
pub fn parse_entries(text: &str) -> impl Iterator<Item = Entry> + '_ {
    text.lines().filter_map(Entry::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_word_is_trimmed() {
        let e = Entry::parse("  apple \t").unwrap();
        assert_eq!(e, Entry::word("apple"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(Entry::parse("").is_none());
        assert!(Entry::parse("   \t").is_none());
        let entries: Vec<Entry> = parse_entries("cat\n\n  \ndog\n").collect();
        assert_eq!(entries, vec![Entry::word("cat"), Entry::word("dog")]);
    }

    #[test]
    fn alias_line() {
        let e = Entry::parse("brb=be right back").unwrap();
        assert_eq!(e.kind, EntryKind::Alias);
        assert_eq!(e.text, "brb");
        assert_eq!(e.expansion.as_deref(), Some("be right back"));
    }

    #[test]
    fn alias_splits_on_first_separator() {
        let e = Entry::parse("eq=a=b").unwrap();
        assert_eq!(e.text, "eq");
        assert_eq!(e.expansion.as_deref(), Some("a=b"));
    }

    #[test]
    fn aliased_command() {
        let e = Entry::parse("today=#date +%F").unwrap();
        assert_eq!(e.kind, EntryKind::Command);
        assert_eq!(e.text, "today");
        assert_eq!(e.expansion.as_deref(), Some("date +%F"));
    }

    #[test]
    fn bare_command() {
        let e = Entry::parse("#uname -r").unwrap();
        assert_eq!(e.kind, EntryKind::Command);
        assert_eq!(e.text, "#uname -r");
        assert_eq!(e.expansion.as_deref(), Some("uname -r"));
        assert!(e.is_lazy());
    }

    #[test]
    fn math_expression() {
        let e = Entry::parse("%2*(3+4)").unwrap();
        assert_eq!(e.kind, EntryKind::MathExpr);
        assert_eq!(e.text, "%2*(3+4)");
        assert_eq!(e.expansion.as_deref(), Some("2*(3+4)"));
    }

    #[test]
    fn malformed_lines_fall_back_to_words() {
        for line in ["=orphan", "key=", "#", "%", "x=#"] {
            let e = Entry::parse(line).unwrap();
            assert_eq!(e.kind, EntryKind::Word, "line {line:?}");
            assert_eq!(e.text, line);
            assert!(e.expansion.is_none());
        }
    }

    #[test]
    fn words_are_not_lazy() {
        assert!(!Entry::word("x").is_lazy());
        assert!(!Entry::parse("a=b").unwrap().is_lazy());
    }
}
