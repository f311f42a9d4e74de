//! Chapter sources
//!
//! The annotation engine never renders a book itself. It asks a chapter
//! source for chapter HTML, one chapter at a time, and for the chapter the
//! reader is currently viewing.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to open book: {0}")]
    Open(String),
    #[error("Chapter not found: index {0}")]
    ChapterNotFound(usize),
    #[error("Failed to read chapter content: {0}")]
    Content(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Provider of rendered chapter HTML
#[async_trait]
pub trait ChapterSource: Send + Sync {
    /// Number of chapters in reading order
    fn chapter_count(&self) -> usize;

    /// HTML body of a chapter; may have to wait for it to be rendered
    async fn chapter_html(&self, index: usize) -> Result<String, SourceError>;

    /// Chapter currently visible to the reader
    fn current_chapter_index(&self) -> usize;
}

/// A book whose chapters are already materialized
#[derive(Debug, Clone, Default)]
pub struct InMemoryBook {
    chapters: Vec<String>,
    current: usize,
}

impl InMemoryBook {
    pub fn new(chapters: Vec<String>) -> Self {
        Self {
            chapters,
            current: 0,
        }
    }

    pub fn set_current_chapter(&mut self, index: usize) {
        self.current = index;
    }

    pub fn with_current_chapter(mut self, index: usize) -> Self {
        self.current = index;
        self
    }
}

#[async_trait]
impl ChapterSource for InMemoryBook {
    fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    async fn chapter_html(&self, index: usize) -> Result<String, SourceError> {
        self.chapters
            .get(index)
            .cloned()
            .ok_or(SourceError::ChapterNotFound(index))
    }

    fn current_chapter_index(&self) -> usize {
        self.current
    }
}
