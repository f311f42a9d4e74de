//! Context marker discovery
//!
//! Every `before`/`after` phrase of a set is located once per book: the
//! first occurrence, scanning chapters in ascending order, becomes the
//! marker for that `(item, search, role)` key. Phrases that never occur
//! simply have no marker.

use std::collections::HashMap;

use super::matcher::{Match, Needle};
use super::search_order::{build_search_order, SearchOrderEntry};
use super::wrap::shift_offset;
use crate::annotations::Item;
use crate::epub::ChapterSource;

/// Which side of the main phrase a context phrase belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerRole {
    Before = 1,
    After = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerKey {
    pub item: usize,
    pub search: usize,
    pub role: MarkerRole,
}

impl MarkerKey {
    pub fn new(entry: SearchOrderEntry, role: MarkerRole) -> Self {
        Self {
            item: entry.item,
            search: entry.search,
            role,
        }
    }
}

/// Where a context phrase was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub chapter: usize,
    pub start: usize,
    pub end: usize,
}

/// Discovered markers for one annotation set and book
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerTable {
    markers: HashMap<MarkerKey, Marker>,
}

impl MarkerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: MarkerKey, marker: Marker) {
        self.markers.insert(key, marker);
    }

    pub fn get(&self, key: &MarkerKey) -> Option<&Marker> {
        self.markers.get(key)
    }

    /// Before and after markers of a search
    pub fn pair(&self, entry: SearchOrderEntry) -> (Option<&Marker>, Option<&Marker>) {
        (
            self.get(&MarkerKey::new(entry, MarkerRole::Before)),
            self.get(&MarkerKey::new(entry, MarkerRole::After)),
        )
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Keep markers of `chapter` in step with markup inserted into it.
    ///
    /// `inserts` are the pre-insertion start offsets of the wrapped spans;
    /// a marker moves by `wrap_length` once per insert at or before its start.
    pub fn shift_after_inserts(&mut self, chapter: usize, inserts: &[usize], wrap_length: usize) {
        if inserts.is_empty() || wrap_length == 0 {
            return;
        }

        for marker in self.markers.values_mut().filter(|m| m.chapter == chapter) {
            let start = shift_offset(marker.start, inserts, wrap_length);
            let delta = start - marker.start;
            marker.start = start;
            marker.end += delta;
        }
    }
}

/// Locate every context phrase of `items` across the book.
///
/// Chapters are fetched one at a time, in order, so the first occurrence
/// always wins. A chapter that cannot be fetched contributes nothing.
pub async fn discover_markers<S>(source: &S, items: &[Item]) -> MarkerTable
where
    S: ChapterSource + ?Sized,
{
    let mut table = MarkerTable::new();
    let mut pending = context_needles(items);
    if pending.is_empty() {
        return table;
    }

    let chapter_count = source.chapter_count();
    for chapter in 0..chapter_count {
        let html = match source.chapter_html(chapter).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Skipping chapter {} during marker discovery: {}", chapter, e);
                continue;
            }
        };

        pending.retain(|(key, needle)| match needle.find_first(&html) {
            Some(Match { start, end }) => {
                table.insert(*key, Marker { chapter, start, end });
                false
            }
            None => true,
        });

        if pending.is_empty() {
            break;
        }
    }

    tracing::debug!(
        "Discovered {} context markers in {} chapters ({} not found)",
        table.len(),
        chapter_count,
        pending.len()
    );

    table
}

/// Every context phrase of `items`, paired with the key of its marker.
///
/// A marker table is only valid for the phrases it was discovered from, so
/// this list also identifies a table in caches.
pub fn context_phrases(items: &[Item]) -> Vec<(MarkerKey, String)> {
    let mut phrases = Vec::new();

    for entry in build_search_order(items) {
        let context = &items[entry.item].searches[entry.search].context;
        let roles = [
            (MarkerRole::Before, &context.before),
            (MarkerRole::After, &context.after),
        ];

        for (role, phrase) in roles {
            if let Some(phrase) = phrase {
                phrases.push((MarkerKey::new(entry, role), phrase.clone()));
            }
        }
    }

    phrases
}

// Context phrases are always literal.
fn context_needles(items: &[Item]) -> Vec<(MarkerKey, Needle)> {
    context_phrases(items)
        .into_iter()
        .filter_map(|(key, phrase)| match Needle::literal(&phrase) {
            Ok(needle) => Some((key, needle)),
            Err(e) => {
                tracing::warn!("Ignoring context phrase {:?}: {}", phrase, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::Search;
    use crate::epub::{InMemoryBook, SourceError};
    use async_trait::async_trait;

    fn item(id: u64, searches: Vec<Search>) -> Item {
        Item {
            id,
            title: None,
            searches,
            annotations: vec![],
        }
    }

    fn entry(item: usize, search: usize) -> SearchOrderEntry {
        SearchOrderEntry { item, search }
    }

    #[tokio::test]
    async fn test_first_occurrence_wins() {
        let book = InMemoryBook::new(vec![
            "<p>Nothing here</p>".to_string(),
            "<p>Title: one</p><p>Title: two</p>".to_string(),
            "<p>Title: three</p>".to_string(),
        ]);
        let items = vec![item(1, vec![Search::literal("x").with_before("Title:")])];

        let table = discover_markers(&book, &items).await;

        let marker = table
            .get(&MarkerKey::new(entry(0, 0), MarkerRole::Before))
            .unwrap();
        assert_eq!(*marker, Marker { chapter: 1, start: 3, end: 9 });
        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_phrase_has_no_marker() {
        let book = InMemoryBook::new(vec!["<p>Author: Someone</p>".to_string()]);
        let items = vec![item(
            1,
            vec![Search::literal("x").with_before("Editor:").with_after("Author:")],
        )];

        let table = discover_markers(&book, &items).await;

        let (before, after) = table.pair(entry(0, 0));
        assert!(before.is_none());
        assert_eq!(after.unwrap().chapter, 0);
    }

    #[tokio::test]
    async fn test_no_context_phrases_skips_fetching() {
        struct Unreachable;

        #[async_trait]
        impl ChapterSource for Unreachable {
            fn chapter_count(&self) -> usize {
                3
            }

            async fn chapter_html(&self, _index: usize) -> Result<String, SourceError> {
                panic!("no chapter should be fetched");
            }

            fn current_chapter_index(&self) -> usize {
                0
            }
        }

        let items = vec![item(1, vec![Search::literal("plain")])];
        assert!(discover_markers(&Unreachable, &items).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_chapter_is_skipped() {
        struct Flaky;

        #[async_trait]
        impl ChapterSource for Flaky {
            fn chapter_count(&self) -> usize {
                2
            }

            async fn chapter_html(&self, index: usize) -> Result<String, SourceError> {
                match index {
                    0 => Err(SourceError::ChapterNotFound(0)),
                    _ => Ok("<p>Editor: Pine</p>".to_string()),
                }
            }

            fn current_chapter_index(&self) -> usize {
                0
            }
        }

        let items = vec![item(4, vec![Search::pattern("Pine").with_before("Editor:")])];
        let table = discover_markers(&Flaky, &items).await;

        let (before, _) = table.pair(entry(0, 0));
        assert_eq!(before.unwrap().chapter, 1);
    }

    #[test]
    fn test_context_phrases_follow_search_order() {
        let items = vec![
            item(1, vec![Search::literal("a").with_after("End"), Search::literal("b")]),
            item(2, vec![Search::literal("c").with_before("Title:").with_after("Fin")]),
        ];

        let phrases = context_phrases(&items);

        assert_eq!(
            phrases,
            vec![
                (MarkerKey::new(entry(0, 0), MarkerRole::After), "End".to_string()),
                (MarkerKey::new(entry(1, 0), MarkerRole::Before), "Title:".to_string()),
                (MarkerKey::new(entry(1, 0), MarkerRole::After), "Fin".to_string()),
            ]
        );
    }

    #[test]
    fn test_shift_only_current_chapter() {
        let mut table = MarkerTable::new();
        let a = MarkerKey::new(entry(0, 0), MarkerRole::Before);
        let b = MarkerKey::new(entry(0, 0), MarkerRole::After);
        let c = MarkerKey::new(entry(1, 0), MarkerRole::After);
        table.insert(a, Marker { chapter: 2, start: 5, end: 10 });
        table.insert(b, Marker { chapter: 2, start: 50, end: 57 });
        table.insert(c, Marker { chapter: 3, start: 50, end: 57 });

        table.shift_after_inserts(2, &[20, 30], 40);

        assert_eq!(*table.get(&a).unwrap(), Marker { chapter: 2, start: 5, end: 10 });
        assert_eq!(*table.get(&b).unwrap(), Marker { chapter: 2, start: 130, end: 137 });
        assert_eq!(*table.get(&c).unwrap(), Marker { chapter: 3, start: 50, end: 57 });
    }

    #[test]
    fn test_shift_counts_only_preceding_inserts() {
        let mut table = MarkerTable::new();
        let key = MarkerKey::new(entry(0, 0), MarkerRole::After);
        table.insert(key, Marker { chapter: 0, start: 25, end: 30 });

        table.shift_after_inserts(0, &[10, 25, 40], 7);

        assert_eq!(*table.get(&key).unwrap(), Marker { chapter: 0, start: 39, end: 44 });
    }
}
