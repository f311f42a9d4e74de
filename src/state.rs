//! Application state management

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::html::{MarkerKey, MarkerTable};

/// Cache key: book ID and annotation set ID
type MarkerCacheKey = (String, u64);

/// Context phrases a marker table was discovered from
pub type ContextPhrases = Vec<(MarkerKey, String)>;

/// A discovered marker table and the phrases it belongs to
struct CachedMarkers {
    phrases: ContextPhrases,
    table: MarkerTable,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    /// Context markers, discovered once per book and set
    markers: RwLock<HashMap<MarkerCacheKey, CachedMarkers>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                markers: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Cached markers for a book and set.
    ///
    /// A set posted again under the same ID may carry other context phrases;
    /// the cached table is only returned while `phrases` still match.
    pub async fn cached_markers(
        &self,
        book_id: &str,
        set_id: u64,
        phrases: &[(MarkerKey, String)],
    ) -> Option<MarkerTable> {
        let markers = self.inner.markers.read().await;
        let cached = markers.get(&(book_id.to_string(), set_id))?;

        if cached.phrases != phrases {
            tracing::debug!(
                "Context phrases of set {} changed for book {}, markers are stale",
                set_id,
                book_id
            );
            return None;
        }

        Some(cached.table.clone())
    }

    pub async fn cache_markers(
        &self,
        book_id: &str,
        set_id: u64,
        phrases: ContextPhrases,
        table: MarkerTable,
    ) {
        let mut markers = self.inner.markers.write().await;
        markers.insert((book_id.to_string(), set_id), CachedMarkers { phrases, table });
    }

    /// Drop cached markers for a book, e.g. after its file was replaced
    pub async fn invalidate_book(&self, book_id: &str) {
        let mut markers = self.inner.markers.write().await;
        markers.retain(|(id, _), _| id != book_id);
    }
}
