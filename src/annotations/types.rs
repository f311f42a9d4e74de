//! Annotation set types
//!
//! These mirror the JSON documents produced by the catalogue tools:
//!
//! ```json
//! {"id": 1, "items": [{"id": 1, "searches": [{"main": "Franklin"}]}]}
//! ```
//!
//! The loose `main` + `regex` wire shape is turned into a tagged [`Phrase`]
//! at the serde boundary so the engine never inspects optional flags.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A named collection of items to locate and highlight in a book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    pub id: u64,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// One semantic annotation with alternate searches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub searches: Vec<Search>,
    /// Payload shown by the viewer; carried through untouched
    #[serde(default)]
    pub annotations: Vec<AnnotationDetail>,
}

/// Detail attached to an item (link, search, summary, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDetail {
    #[serde(rename = "type")]
    pub kind: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// The phrase a search looks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phrase {
    /// Matched literally, with word boundaries on alphanumeric ends
    Literal(String),
    /// A ready-made regular expression, used unanchored
    Pattern(String),
}

impl Phrase {
    pub fn as_str(&self) -> &str {
        match self {
            Phrase::Literal(s) | Phrase::Pattern(s) => s,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Phrase::Pattern(_))
    }
}

/// Context phrases that must surround a match in reading order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchContext {
    /// Must occur somewhere before the match
    pub before: Option<String>,
    /// Must occur somewhere after the match
    pub after: Option<String>,
}

impl SearchContext {
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }
}

/// One phrase-matching rule of an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSearch", into = "RawSearch")]
pub struct Search {
    pub phrase: Phrase,
    pub context: SearchContext,
}

impl Search {
    pub fn literal(main: &str) -> Self {
        Self {
            phrase: Phrase::Literal(main.to_string()),
            context: SearchContext::default(),
        }
    }

    pub fn pattern(main: &str) -> Self {
        Self {
            phrase: Phrase::Pattern(main.to_string()),
            context: SearchContext::default(),
        }
    }

    pub fn with_before(mut self, before: &str) -> Self {
        self.context.before = non_empty(Some(before.to_string()));
        self
    }

    pub fn with_after(mut self, after: &str) -> Self {
        self.context.after = non_empty(Some(after.to_string()));
        self
    }
}

/// Wire shape of a search
#[derive(Serialize, Deserialize)]
struct RawSearch {
    main: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    regex: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    after: Option<String>,
}

impl From<RawSearch> for Search {
    fn from(raw: RawSearch) -> Self {
        let phrase = if raw.regex {
            Phrase::Pattern(raw.main)
        } else {
            Phrase::Literal(raw.main)
        };

        Self {
            phrase,
            context: SearchContext {
                before: non_empty(raw.before),
                after: non_empty(raw.after),
            },
        }
    }
}

impl From<Search> for RawSearch {
    fn from(search: Search) -> Self {
        let regex = search.phrase.is_pattern();
        let main = match search.phrase {
            Phrase::Literal(s) | Phrase::Pattern(s) => s,
        };

        Self {
            main,
            regex,
            before: search.context.before,
            after: search.context.after,
        }
    }
}

// An empty context phrase places no constraint.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Identifier embedded in inserted markup: `"{set_id}-{item_id}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationKey {
    pub set_id: u64,
    pub item_id: u64,
}

impl AnnotationKey {
    pub fn new(set_id: u64, item_id: u64) -> Self {
        Self { set_id, item_id }
    }
}

impl fmt::Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.set_id, self.item_id)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid annotation key: {0}")]
pub struct KeyParseError(pub String);

impl FromStr for AnnotationKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (set, item) = s
            .split_once('-')
            .ok_or_else(|| KeyParseError(s.to_string()))?;
        let set_id = set.parse().map_err(|_| KeyParseError(s.to_string()))?;
        let item_id = item.parse().map_err(|_| KeyParseError(s.to_string()))?;
        Ok(Self { set_id, item_id })
    }
}

/// Errors loading an annotation set
#[derive(Debug, Error)]
pub enum SetLoadError {
    #[error("Failed to read annotation set: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid annotation set JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnnotationSet {
    /// Parse a set from its JSON document
    pub fn from_json(json: &str) -> Result<Self, SetLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a set from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SetLoadError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Key for an item of this set
    pub fn key_for(&self, item: &Item) -> AnnotationKey {
        AnnotationKey::new(self.id, item.id)
    }

    /// Find the item a clicked element refers to
    pub fn resolve(&self, key: &AnnotationKey) -> Option<&Item> {
        if key.set_id != self.id {
            return None;
        }
        self.items.iter().find(|item| item.id == key.item_id)
    }
}
