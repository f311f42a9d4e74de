//! Phrase lookup in chapter HTML
//!
//! Literal phrases are escaped and get a `\b` on whichever end is
//! alphanumeric, so `Franklin` never matches inside `Franklinish` while a phrase
//! such as `#1` or `Mr.` still matches next to other text on its
//! punctuation side. Patterns are used exactly as given.

use regex::Regex;

use super::AnnotateError;
use crate::annotations::Phrase;

/// A located occurrence, as byte offsets into the HTML (end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A compiled phrase
#[derive(Debug, Clone)]
pub struct Needle {
    regex: Regex,
}

impl Needle {
    /// Compile a phrase of either kind
    pub fn compile(phrase: &Phrase) -> Result<Self, AnnotateError> {
        match phrase {
            Phrase::Literal(text) => Self::literal(text),
            Phrase::Pattern(pattern) => Self::pattern(pattern),
        }
    }

    /// Escaped literal with boundary anchors on alphanumeric ends
    pub fn literal(text: &str) -> Result<Self, AnnotateError> {
        let mut pattern = String::with_capacity(text.len() + 4);
        if text.chars().next().is_some_and(char::is_alphanumeric) {
            pattern.push_str(r"\b");
        }
        pattern.push_str(&regex::escape(text));
        if text.chars().next_back().is_some_and(char::is_alphanumeric) {
            pattern.push_str(r"\b");
        }
        Self::pattern(&pattern)
    }

    /// Pattern used as-is, case-sensitive and unanchored
    pub fn pattern(pattern: &str) -> Result<Self, AnnotateError> {
        let regex = Regex::new(pattern).map_err(|e| AnnotateError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { regex })
    }

    /// All non-overlapping occurrences, in order of position
    pub fn find_matches(&self, html: &str) -> Vec<Match> {
        self.regex
            .find_iter(html)
            // Empty matches have nothing to wrap
            .filter(|m| !m.is_empty())
            .map(|m| Match::new(m.start(), m.end()))
            .collect()
    }

    /// First occurrence, if any
    pub fn find_first(&self, html: &str) -> Option<Match> {
        self.regex
            .find_iter(html)
            .find(|m| !m.is_empty())
            .map(|m| Match::new(m.start(), m.end()))
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
