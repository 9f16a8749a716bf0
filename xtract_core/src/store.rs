//! Latest-value response cache, keyed by conversation scope.
//!
//! One entry per scope, holding the extractions of that scope's most recent
//! response only. Entries accumulate for every scope ever seen and are never
//! evicted; the process lifetime bounds the cache.

use crate::ScopeId;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// How much of a newly cached value is echoed to the log.
const LOG_PREVIEW_CHARS: usize = 100;

/// Per-scope cache of the latest response's extractions.
#[derive(Debug, Default)]
pub struct ResponseStore {
    scopes: Mutex<HashMap<ScopeId, HashMap<String, String>>>,
}

impl ResponseStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache entry for `scope` with `entries`.
    ///
    /// The swap is wholesale, not a merge: tags matched by an earlier
    /// response but absent from `entries` read as absent afterwards. Callers
    /// build the fresh map from one response and hand it over in a single
    /// call, so the replace cycle is one atomic unit under the lock.
    pub fn replace_scope(&self, scope: &str, entries: HashMap<String, String>) {
        for (tag, content) in &entries {
            let preview: String = content.chars().take(LOG_PREVIEW_CHARS).collect();
            info!("[{scope}] 提取到 <{tag}> 标签内容: {preview}...");
        }

        let mut scopes = self
            .scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        scopes.insert(scope.to_string(), entries);
    }

    /// Latest extraction for (`scope`, `tag`), if any.
    ///
    /// Unknown scopes and unknown tags both read as absence, never an error.
    #[must_use]
    pub fn get(&self, scope: &str, tag: &str) -> Option<String> {
        let scopes = self
            .scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        scopes.get(scope).and_then(|tags| tags.get(tag)).cloned()
    }

    /// Number of scopes ever cached. Test and diagnostics helper.
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.scopes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(t, c)| ((*t).to_string(), (*c).to_string()))
            .collect()
    }

    #[test]
    fn unknown_scope_and_tag_read_absent() {
        let store = ResponseStore::new();
        assert_eq!(store.get("g1", "think"), None);

        store.replace_scope("g1", entries(&[("think", "a")]));
        assert_eq!(store.get("g1", "mood"), None);
    }

    #[test]
    fn replacement_drops_stale_tags() {
        let store = ResponseStore::new();
        store.replace_scope("g1", entries(&[("think", "old"), ("mood", "calm")]));
        store.replace_scope("g1", entries(&[("think", "new")]));

        assert_eq!(store.get("g1", "think").as_deref(), Some("new"));
        // mood matched the first response only; it must not bleed through.
        assert_eq!(store.get("g1", "mood"), None);
    }

    #[test]
    fn scopes_are_isolated() {
        let store = ResponseStore::new();
        store.replace_scope("g1", entries(&[("think", "a")]));
        store.replace_scope("g2", entries(&[("think", "b")]));

        assert_eq!(store.get("g1", "think").as_deref(), Some("a"));
        assert_eq!(store.get("g2", "think").as_deref(), Some("b"));
        assert_eq!(store.scope_count(), 2);
    }

    #[test]
    fn empty_replacement_clears_the_scope() {
        let store = ResponseStore::new();
        store.replace_scope("g1", entries(&[("think", "a")]));
        store.replace_scope("g1", HashMap::new());
        assert_eq!(store.get("g1", "think"), None);
    }
}
