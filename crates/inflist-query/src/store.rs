#![forbid(unsafe_code)]

//! Injectable query store.
//!
//! [`QueryStore`] holds every live [`InfiniteQuery`] by [`QueryKey`]. It is a
//! plain value owned by the application, passed to whatever needs it, with
//! explicit invalidation:
//!
//! - [`invalidate`](QueryStore::invalidate) marks a query stale. Its pages
//!   stay readable until the next [`activate`](QueryStore::activate), which
//!   discards them and starts over.
//! - [`reset`](QueryStore::reset) discards immediately.
//! - [`remove`](QueryStore::remove) forgets the query; late responses for it
//!   resolve as stale.

use rustc_hash::FxHashMap;

use crate::error::FetchError;
use crate::infinite::{InfiniteQuery, PageRequest, Resolution};
use crate::key::QueryKey;
use crate::paging::PagePolicy;

/// Store of infinite queries keyed by identity.
pub struct QueryStore<T> {
    queries: FxHashMap<QueryKey, InfiniteQuery<T>>,
}

impl<T> Default for QueryStore<T> {
    fn default() -> Self {
        Self {
            queries: FxHashMap::default(),
        }
    }
}

impl<T> QueryStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Whether the store holds no queries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Whether a query exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.queries.contains_key(key)
    }

    /// Keys of every held query, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &QueryKey> + '_ {
        self.queries.keys()
    }

    /// Get the query for `key`, creating it with `policy` if absent.
    ///
    /// A stale query is reset here, so callers always observe either fresh
    /// data or an empty collection that is about to load.
    pub fn activate<P>(&mut self, key: &QueryKey, policy: P) -> &mut InfiniteQuery<T>
    where
        P: PagePolicy<T> + 'static,
    {
        let query = self.queries.entry(key.clone()).or_insert_with(|| {
            tracing::debug!(target: "inflist.store", key = %key, "query created");
            InfiniteQuery::new(key.clone(), policy)
        });
        if query.is_stale() {
            query.reset();
        }
        query
    }

    /// Query for `key`, if held.
    #[must_use]
    pub fn get(&self, key: &QueryKey) -> Option<&InfiniteQuery<T>> {
        self.queries.get(key)
    }

    /// Mutable query for `key`, if held.
    pub fn get_mut(&mut self, key: &QueryKey) -> Option<&mut InfiniteQuery<T>> {
        self.queries.get_mut(key)
    }

    /// Mark `key` stale. Returns whether it was held.
    pub fn invalidate(&mut self, key: &QueryKey) -> bool {
        match self.queries.get_mut(key) {
            Some(query) => {
                query.mark_stale();
                tracing::debug!(target: "inflist.store", key = %key, "query invalidated");
                true
            }
            None => false,
        }
    }

    /// Mark every query whose scope is `scope` stale. Returns how many.
    pub fn invalidate_scope(&mut self, scope: &str) -> usize {
        let mut count = 0;
        for query in self
            .queries
            .iter_mut()
            .filter(|(key, _)| key.scope() == scope)
            .map(|(_, query)| query)
        {
            query.mark_stale();
            count += 1;
        }
        tracing::debug!(target: "inflist.store", scope, count, "scope invalidated");
        count
    }

    /// Discard `key`'s pages now. Returns whether it was held.
    pub fn reset(&mut self, key: &QueryKey) -> bool {
        match self.queries.get_mut(key) {
            Some(query) => {
                query.reset();
                true
            }
            None => false,
        }
    }

    /// Forget `key` entirely.
    pub fn remove(&mut self, key: &QueryKey) -> Option<InfiniteQuery<T>> {
        let removed = self.queries.remove(key);
        if removed.is_some() {
            tracing::debug!(target: "inflist.store", key = %key, "query removed");
        }
        removed
    }

    /// Route a fetch outcome to the query that issued `request`.
    pub fn resolve(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<T>, FetchError>,
    ) -> Resolution {
        match self.queries.get_mut(&request.key) {
            Some(query) => query.resolve(request, result),
            None => {
                tracing::warn!(
                    target: "inflist.store",
                    key = %request.key,
                    "response for unknown query dropped"
                );
                Resolution::Stale
            }
        }
    }
}

impl<T> std::fmt::Debug for QueryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryStore")
            .field("queries", &self.queries.len())
            .finish()
    }
}
