//! HTML annotation module
//!
//! Locates annotation set searches in rendered chapter HTML and wraps them
//! in highlight markup:
//! - Search ordering
//! - Literal and pattern phrase matching
//! - Cross-chapter context marker discovery
//! - Before/after validation
//! - Markup insertion with offset bookkeeping
//!
//! The HTML is treated as a plain string; a search that matches inside a
//! tag will be wrapped there.

mod insert;
mod markers;
mod matcher;
mod search_order;
mod strip;
mod validator;
mod wrap;

pub use insert::{annotate_current_chapter, insert_annotations, FailedSearch, InsertionResult};
pub use markers::{context_phrases, discover_markers, Marker, MarkerKey, MarkerRole, MarkerTable};
pub use matcher::{Match, Needle};
pub use search_order::{build_search_order, SearchOrderEntry};
pub use strip::strip_annotations;
pub use validator::accepts;
pub use wrap::{shift_offset, wrap_matches, HighlightConfig, WrapMarkup, Wrapped};

/// Errors during annotation
#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("Invalid search pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("HTML rewrite failed: {0}")]
    RewriteError(String),

    #[error("Invalid highlight {field} {name:?}: not an HTML name")]
    InvalidMarkupName { field: &'static str, name: String },
}
