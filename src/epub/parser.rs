//! EPUB-backed chapter source using rbook

use std::path::Path;

use async_trait::async_trait;
use rbook::prelude::*;
use rbook::Epub;

use super::source::{ChapterSource, SourceError};

/// Chapter HTML read from the EPUB archive
#[derive(Debug, Clone)]
pub struct ChapterContent {
    pub index: usize,
    pub href: String,
    pub html: String,
}

/// An opened EPUB, addressed by spine index
pub struct EpubBook {
    epub: Epub,
    current: usize,
}

impl EpubBook {
    /// Open an EPUB from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();

        // Lenient parsing handles EPUBs with missing metadata
        let epub = Epub::options()
            .strict(false)
            .open(path)
            .map_err(|e| SourceError::Open(e.to_string()))?;

        Ok(Self { epub, current: 0 })
    }

    pub fn set_current_chapter(&mut self, index: usize) {
        self.current = index;
    }

    /// Get chapter content by spine index
    pub fn get_chapter(&self, spine_index: usize) -> Result<ChapterContent, SourceError> {
        let spine = self.epub.spine();
        let spine_item = spine
            .entries()
            .nth(spine_index)
            .ok_or(SourceError::ChapterNotFound(spine_index))?;

        let manifest = self.epub.manifest();
        let idref = spine_item.idref();
        let manifest_item = manifest.by_id(idref).ok_or_else(|| {
            SourceError::Content(format!("Manifest item {} not found", idref))
        })?;

        let href = manifest_item.href();
        let html = self
            .epub
            .read_resource_str(href)
            .map_err(|e| SourceError::Content(e.to_string()))?;

        Ok(ChapterContent {
            index: spine_index,
            href: href.to_string(),
            html,
        })
    }
}

#[async_trait]
impl ChapterSource for EpubBook {
    fn chapter_count(&self) -> usize {
        self.epub.spine().entries().count()
    }

    async fn chapter_html(&self, index: usize) -> Result<String, SourceError> {
        self.get_chapter(index).map(|chapter| chapter.html)
    }

    fn current_chapter_index(&self) -> usize {
        self.current
    }
}
