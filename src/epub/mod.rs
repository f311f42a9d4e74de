//! Book access module
//!
//! Chapter sources feed rendered chapter HTML to the annotation engine:
//! an in-memory source for already-rendered chapters and an EPUB source
//! backed by the rbook crate.

mod parser;
mod source;

pub use parser::{ChapterContent, EpubBook};
pub use source::{ChapterSource, InMemoryBook, SourceError};
