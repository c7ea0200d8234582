//! Shared server state: the loaded index plus a memo of recent responses.

use crate::config::Config;
use crate::search::{Category, SearchIndex};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Key of a memoized search response: (raw query, category filter, limit).
pub(crate) type MemoKey = (String, Option<Category>, usize);

/// State shared by every tool call.
///
/// The index is immutable and shared without locking; only the response memo
/// is behind a mutex.
pub struct SearchState {
    index: Arc<SearchIndex>,
    max_results: usize,
    memo: Mutex<LruCache<MemoKey, String>>,
}

impl std::fmt::Debug for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchState")
            .field("entries", &self.index.len())
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl SearchState {
    pub fn new(index: Arc<SearchIndex>, config: &Config) -> Self {
        let memo_size = NonZeroUsize::new(config.memo_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            index,
            max_results: config.max_results,
            memo: Mutex::new(LruCache::new(memo_size)),
        }
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Upper bound applied to any requested limit.
    pub const fn max_results(&self) -> usize {
        self.max_results
    }

    pub(crate) async fn memoized(&self, key: &MemoKey) -> Option<String> {
        self.memo.lock().await.get(key).cloned()
    }

    pub(crate) async fn memoize(&self, key: MemoKey, response: String) {
        self.memo.lock().await.put(key, response);
    }
}
