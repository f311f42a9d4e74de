//! Annotation insertion pass
//!
//! Runs every search of a set, in search order, against one chapter's
//! HTML. Each search sees the HTML as left by the searches before it, and
//! text already wrapped by an earlier search is claimed: later searches do
//! not match inside it.

use serde::Serialize;

use super::markers::{discover_markers, MarkerTable};
use super::matcher::{Match, Needle};
use super::search_order::build_search_order;
use super::validator::accepts;
use super::wrap::{shift_offset, wrap_matches, HighlightConfig, WrapMarkup};
use crate::annotations::AnnotationSet;
use crate::epub::{ChapterSource, SourceError};

/// Result of annotating one chapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionResult {
    /// The chapter HTML with highlight markup
    pub html: String,
    /// Number of wrapper elements inserted
    pub wrapped_count: usize,
    /// Searches skipped because their pattern did not compile
    pub failed_searches: Vec<FailedSearch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedSearch {
    pub item_id: u64,
    pub search_index: usize,
    pub reason: String,
}

/// Wrap every eligible match of `set` in `html`.
///
/// `markers` must have been discovered for the same set and book; it is
/// copied, so the caller's table stays valid for other chapters.
pub fn insert_annotations(
    set: &AnnotationSet,
    html: &str,
    chapter: usize,
    markers: &MarkerTable,
    config: &HighlightConfig,
) -> InsertionResult {
    let mut markers = markers.clone();
    let mut html = html.to_string();
    let mut claimed: Vec<Match> = Vec::new();
    let mut wrapped_count = 0;
    let mut failed_searches = Vec::new();

    for entry in build_search_order(&set.items) {
        let item = &set.items[entry.item];
        let search = &item.searches[entry.search];

        let needle = match Needle::compile(&search.phrase) {
            Ok(needle) => needle,
            Err(e) => {
                tracing::warn!("Skipping search {} of item {}: {}", entry.search, item.id, e);
                failed_searches.push(FailedSearch {
                    item_id: item.id,
                    search_index: entry.search,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let (before, after) = markers.pair(entry);
        let matches: Vec<Match> = needle
            .find_matches(&html)
            .into_iter()
            .filter(|m| !claimed.iter().any(|c| overlaps(m, c)))
            .filter(|m| accepts(m, &search.context, before, after, chapter))
            .collect();

        tracing::debug!(
            "Item {} search {} ({:?}): {} matches in chapter {}",
            item.id,
            entry.search,
            search.phrase.as_str(),
            matches.len(),
            chapter
        );

        if matches.is_empty() {
            continue;
        }

        let markup = WrapMarkup::new(set.key_for(item), config);
        let wrapped = wrap_matches(&matches, &html, &markup);

        markers.shift_after_inserts(chapter, &wrapped.inserts, wrapped.wrap_length);
        for span in claimed.iter_mut() {
            let start = shift_offset(span.start, &wrapped.inserts, wrapped.wrap_length);
            span.end += start - span.start;
            span.start = start;
        }
        claimed.extend_from_slice(&wrapped.elements);

        wrapped_count += wrapped.inserts.len();
        html = wrapped.html;
    }

    InsertionResult {
        html,
        wrapped_count,
        failed_searches,
    }
}

/// Annotate the chapter the viewer is currently showing.
///
/// Discovers context markers across the whole book first, then fetches and
/// annotates the current chapter.
pub async fn annotate_current_chapter<S>(
    source: &S,
    set: &AnnotationSet,
    config: &HighlightConfig,
) -> Result<InsertionResult, SourceError>
where
    S: ChapterSource + ?Sized,
{
    let markers = discover_markers(source, &set.items).await;
    let chapter = source.current_chapter_index();
    let html = source.chapter_html(chapter).await?;

    Ok(insert_annotations(set, &html, chapter, &markers, config))
}

fn overlaps(a: &Match, b: &Match) -> bool {
    a.start < b.end && b.start < a.end
}
