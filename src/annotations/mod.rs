//! Annotation set module
//!
//! An annotation set is a list of items; each item carries one or more
//! searches that locate it in a book's text, and a payload of details the
//! viewer shows when a highlighted passage is clicked.

mod types;

pub use types::{
    AnnotationDetail, AnnotationKey, AnnotationSet, Item, KeyParseError, Phrase, Search,
    SearchContext, SetLoadError,
};
