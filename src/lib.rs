//! Los Libros Annotate
//!
//! Finds the phrases of an annotation set in rendered EPUB chapter HTML and
//! wraps them in highlight markup that a viewer can style and react to.
//!
//! # Modules
//!
//! - `annotations`: Annotation set, item and search types
//! - `html`: The insertion engine (matching, context markers, wrapping)
//! - `epub`: Chapter sources (in-memory, EPUB via rbook)
//! - `routes`: HTTP API over the engine

pub mod annotations;
pub mod config;
pub mod epub;
pub mod error;
pub mod html;
pub mod routes;
pub mod state;

pub use annotations::{AnnotationKey, AnnotationSet, Item, Phrase, Search, SearchContext};
pub use html::{annotate_current_chapter, insert_annotations, HighlightConfig, InsertionResult};
