//! File name patterns with `${name}` placeholders
//!
//! A folder pattern is a regular expression that must match a file name in
//! full. It may reference values resolved earlier in the same invocation, e.g.
//! `${user}_\d+\.txt`. Placeholders whose parameter has been resolved are
//! replaced by the value's text, inserted verbatim so the value itself may
//! carry regex syntax. Unresolved placeholders are left as written.
//!
//! Patterns without placeholders are compiled once and can be used to filter a
//! folder listing up front.

use crate::error::InitFailure;
use crate::value::{find_resolved, ArgumentValue};
use regex::Regex;

const PLACEHOLDER_OPEN: &str = "${";
const PLACEHOLDER_CLOSE: char = '}';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Parsed folder pattern
#[derive(Debug, Clone)]
pub struct FilePattern {
    raw: String,
    segments: Vec<Segment>,
    static_regex: Option<Regex>,
}

/// Compile `pattern` so that it must match the whole input
pub fn compile_full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

impl FilePattern {
    /// Parse a pattern, compiling it right away when it has no placeholders
    pub fn parse(raw: &str) -> Result<Self, InitFailure> {
        let segments = split_segments(raw);
        let has_placeholders = segments
            .iter()
            .any(|segment| matches!(segment, Segment::Placeholder(_)));

        let static_regex = if has_placeholders {
            None
        } else {
            let regex = compile_full_match(raw).map_err(|source| InitFailure::InvalidPattern {
                pattern: raw.to_string(),
                source,
            })?;
            Some(regex)
        };

        Ok(Self {
            raw: raw.to_string(),
            segments,
            static_regex,
        })
    }

    /// The pattern as configured
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn has_placeholders(&self) -> bool {
        self.static_regex.is_none()
    }

    /// Names referenced by `${name}` placeholders, in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Compiled regex for a pattern without placeholders
    pub fn static_regex(&self) -> Option<&Regex> {
        self.static_regex.as_ref()
    }

    /// Full-match a file name against a placeholder-free pattern
    ///
    /// Always false for patterns with placeholders.
    pub fn matches_static(&self, name: &str) -> bool {
        self.static_regex
            .as_ref()
            .map(|regex| regex.is_match(name))
            .unwrap_or(false)
    }

    /// Replace every resolved placeholder with its value's text
    pub fn substitute(&self, resolved: &[ArgumentValue]) -> String {
        let mut out = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => match find_resolved(resolved, name) {
                    Some(value) => out.push_str(&value.to_string()),
                    None => {
                        out.push_str(PLACEHOLDER_OPEN);
                        out.push_str(name);
                        out.push(PLACEHOLDER_CLOSE);
                    }
                },
            }
        }
        out
    }
}

fn split_segments(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = raw;

    while let Some(open) = rest.find(PLACEHOLDER_OPEN) {
        let after_open = &rest[open + PLACEHOLDER_OPEN.len()..];
        let Some(close) = after_open.find(PLACEHOLDER_CLOSE) else {
            break;
        };

        let name = &after_open[..close];
        literal.push_str(&rest[..open]);
        if name.is_empty() {
            // `${}` names nothing
            literal.push_str(PLACEHOLDER_OPEN);
            literal.push(PLACEHOLDER_CLOSE);
        } else {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(name.to_string()));
        }
        rest = &after_open[close + PLACEHOLDER_CLOSE.len_utf8()..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pattern() {
        let pattern = FilePattern::parse(r"report_\d+\.csv").unwrap();
        assert!(!pattern.has_placeholders());
        assert!(pattern.matches_static("report_12.csv"));
        assert!(!pattern.matches_static("report_12.csv.bak"));
        assert!(!pattern.matches_static("old_report_12.csv"));
    }

    #[test]
    fn test_invalid_static_pattern() {
        let err = FilePattern::parse("file[").unwrap_err();
        assert!(matches!(err, InitFailure::InvalidPattern { .. }));
    }

    #[test]
    fn test_placeholders() {
        let pattern = FilePattern::parse(r"${user}_${id}\.txt").unwrap();
        assert!(pattern.has_placeholders());
        assert_eq!(pattern.placeholders(), vec!["user", "id"]);
        assert!(pattern.static_regex().is_none());
        assert!(!pattern.matches_static("bob_1.txt"));
    }

    #[test]
    fn test_substitute_resolved_and_unresolved() {
        let pattern = FilePattern::parse(r"${user}_${id}\.txt").unwrap();
        let resolved = vec![ArgumentValue::new("user", "bob")];

        assert_eq!(pattern.substitute(&resolved), r"bob_${id}\.txt");

        let resolved = vec![ArgumentValue::new("user", "bob"), ArgumentValue::new("id", 3)];
        assert_eq!(pattern.substitute(&resolved), r"bob_3\.txt");
    }

    #[test]
    fn test_substitute_inserts_values_verbatim() {
        let pattern = FilePattern::parse(r"${prefix}\.log").unwrap();
        let resolved = vec![ArgumentValue::new("prefix", "a.*")];

        let substituted = pattern.substitute(&resolved);
        assert_eq!(substituted, r"a.*\.log");
        assert!(compile_full_match(&substituted).unwrap().is_match("abc.log"));
    }

    #[test]
    fn test_unclosed_and_empty_placeholders_are_literal() {
        assert_eq!(split_segments("a${b"), vec![Segment::Literal("a${b".to_string())]);
        assert_eq!(split_segments("x${}y"), vec![Segment::Literal("x${}y".to_string())]);
    }
}
