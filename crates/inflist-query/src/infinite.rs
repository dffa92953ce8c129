#![forbid(unsafe_code)]

//! Infinite query state machine.
//!
//! [`InfiniteQuery`] owns one [`PaginatedCollection`] and the bookkeeping
//! around fetching it page by page:
//!
//! | State                   | `is_loading` | `is_fetching_next_page` | `has_next_page` |
//! |-------------------------|--------------|-------------------------|-----------------|
//! | Idle, never fetched     | false        | false                   | true            |
//! | First page in flight    | true         | false                   | true            |
//! | Pages loaded            | false        | false                   | per policy      |
//! | Next page in flight     | false        | true                    | true            |
//! | Last fetch failed       | false        | false                   | unchanged       |
//!
//! # Ordering
//!
//! At most one [`PageRequest`] is outstanding. A second
//! [`fetch_next_page`](InfiniteQuery::fetch_next_page) while one is in flight
//! returns `None`, so page N+1 is never requested before page N resolved.
//!
//! # Staleness
//!
//! [`reset`](InfiniteQuery::reset) discards the collection and bumps the
//! generation. A response for a request issued before the reset resolves as
//! [`Resolution::Stale`] and leaves the new collection untouched.

use crate::error::FetchError;
use crate::key::QueryKey;
use crate::page::{Page, PageParam, PaginatedCollection};
use crate::paging::PagePolicy;
use crate::source::InfiniteSource;

/// Ticket for one outstanding page fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// Query the page belongs to.
    pub key: QueryKey,
    /// Parameter to send to the backend.
    pub param: PageParam,
    /// Position the page will take in the collection.
    pub page_index: usize,
    /// Collection generation the request was issued for.
    pub generation: u64,
}

/// Coarse status for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing fetched and nothing in flight.
    Idle,
    /// First page in flight.
    Loading,
    /// At least one page loaded and the last fetch succeeded.
    Success,
    /// The last fetch failed.
    Error,
}

/// Outcome of [`InfiniteQuery::resolve`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A page was appended.
    Appended {
        page_index: usize,
        items: usize,
        has_next_page: bool,
    },
    /// The fetch failed; state is ready for another attempt.
    Failed(FetchError),
    /// The response belongs to a request this query no longer waits for.
    Stale,
}

/// Paginated query over items of type `T`.
pub struct InfiniteQuery<T> {
    key: QueryKey,
    policy: Box<dyn PagePolicy<T>>,
    collection: PaginatedCollection<T>,
    next_param: Option<PageParam>,
    in_flight: Option<PageRequest>,
    generation: u64,
    last_error: Option<FetchError>,
    failure_count: u32,
    stale: bool,
}

impl<T> InfiniteQuery<T> {
    /// Create an idle query for `key` paged by `policy`.
    pub fn new(key: QueryKey, policy: impl PagePolicy<T> + 'static) -> Self {
        let next_param = Some(policy.initial_param());
        Self {
            key,
            policy: Box::new(policy),
            collection: PaginatedCollection::new(),
            next_param,
            in_flight: None,
            generation: 0,
            last_error: None,
            failure_count: 0,
            stale: false,
        }
    }

    /// The loaded collection.
    #[must_use]
    pub fn collection(&self) -> &PaginatedCollection<T> {
        &self.collection
    }

    /// Loaded items in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.collection.iter()
    }

    /// The outstanding request, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<&PageRequest> {
        self.in_flight.as_ref()
    }

    /// Whether any fetch is outstanding.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Error from the most recent failed fetch, cleared on success or reset.
    #[must_use]
    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Consecutive failed fetches since the last success.
    #[must_use]
    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    /// Whether the query was invalidated and awaits a reset.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Flag the query as stale; its owner resets it on next activation.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Coarse status.
    #[must_use]
    pub fn status(&self) -> QueryStatus {
        if self.in_flight.is_some() && self.collection.page_count() == 0 {
            QueryStatus::Loading
        } else if self.last_error.is_some() {
            QueryStatus::Error
        } else if self.collection.page_count() > 0 {
            QueryStatus::Success
        } else {
            QueryStatus::Idle
        }
    }

    /// Discard every page and start over from the first page parameter.
    ///
    /// Requests issued before the reset become stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.collection = PaginatedCollection::new();
        self.next_param = Some(self.policy.initial_param());
        if let Some(dropped) = self.in_flight.take() {
            tracing::debug!(
                target: "inflist.query",
                key = %self.key,
                page_index = dropped.page_index,
                "in-flight fetch abandoned by reset"
            );
        }
        self.last_error = None;
        self.failure_count = 0;
        self.stale = false;
        tracing::debug!(
            target: "inflist.query",
            key = %self.key,
            generation = self.generation,
            "query reset"
        );
    }

    /// Reset and immediately request the first page.
    pub fn refetch(&mut self) -> Option<PageRequest> {
        self.reset();
        self.fetch_next_page()
    }

    /// Deliver the outcome of `request`.
    pub fn resolve(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<T>, FetchError>,
    ) -> Resolution {
        if self.in_flight.as_ref() != Some(request) {
            tracing::warn!(
                target: "inflist.query",
                key = %request.key,
                request_generation = request.generation,
                generation = self.generation,
                page_index = request.page_index,
                "dropping stale page response"
            );
            return Resolution::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(items) => {
                let count = items.len();
                self.collection
                    .push(Page::new(request.param.clone(), items));
                self.next_param = self
                    .collection
                    .last_page()
                    .and_then(|last| self.policy.next_param(last, &self.collection));
                self.last_error = None;
                self.failure_count = 0;
                let has_next_page = self.next_param.is_some();
                tracing::debug!(
                    target: "inflist.query",
                    key = %self.key,
                    page_index = request.page_index,
                    items = count,
                    total = self.collection.len(),
                    has_next_page,
                    "page appended"
                );
                Resolution::Appended {
                    page_index: request.page_index,
                    items: count,
                    has_next_page,
                }
            }
            Err(error) => {
                self.failure_count += 1;
                tracing::warn!(
                    target: "inflist.query",
                    key = %self.key,
                    page_index = request.page_index,
                    error_kind = error.kind(),
                    failures = self.failure_count,
                    "page fetch failed: {error}"
                );
                self.last_error = Some(error.clone());
                Resolution::Failed(error)
            }
        }
    }
}

impl<T> InfiniteSource<T> for InfiniteQuery<T> {
    fn key(&self) -> &QueryKey {
        &self.key
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn pages(&self) -> &[Page<T>] {
        self.collection.pages()
    }

    fn item_count(&self) -> usize {
        self.collection.len()
    }

    fn item(&self, index: usize) -> Option<&T> {
        self.collection.get(index)
    }

    fn has_next_page(&self) -> bool {
        self.next_param.is_some()
    }

    fn is_fetching_next_page(&self) -> bool {
        self.in_flight.is_some() && self.collection.page_count() > 0
    }

    fn is_loading(&self) -> bool {
        self.in_flight.is_some() && self.collection.page_count() == 0
    }

    fn fetch_next_page(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        let param = self.next_param.clone()?;
        let request = PageRequest {
            key: self.key.clone(),
            param,
            page_index: self.collection.page_count(),
            generation: self.generation,
        };
        tracing::debug!(
            target: "inflist.query",
            key = %self.key,
            page_index = request.page_index,
            param = %request.param,
            "fetching page"
        );
        self.in_flight = Some(request.clone());
        Some(request)
    }
}

impl<T> std::fmt::Debug for InfiniteQuery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfiniteQuery")
            .field("key", &self.key)
            .field("pages", &self.collection.page_count())
            .field("items", &self.collection.len())
            .field("next_param", &self.next_param)
            .field("in_flight", &self.in_flight)
            .field("generation", &self.generation)
            .field("stale", &self.stale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::OffsetPaging;

    fn query() -> InfiniteQuery<u32> {
        InfiniteQuery::new(QueryKey::new("test"), OffsetPaging::new(20))
    }

    fn batch(start: u32, n: u32) -> Vec<u32> {
        (start..start + n).collect()
    }

    #[test]
    fn idle_query_has_next_page() {
        let q = query();
        assert!(q.has_next_page());
        assert!(!q.is_loading());
        assert!(!q.is_fetching_next_page());
        assert_eq!(q.status(), QueryStatus::Idle);
    }

    #[test]
    fn first_fetch_is_loading_not_fetching_next() {
        let mut q = query();
        let req = q.fetch_next_page().unwrap();
        assert_eq!(req.param, PageParam::Offset(0));
        assert!(q.is_loading());
        assert!(!q.is_fetching_next_page());
        assert_eq!(q.status(), QueryStatus::Loading);
    }

    #[test]
    fn only_one_request_in_flight() {
        let mut q = query();
        let first = q.fetch_next_page();
        assert!(first.is_some());
        assert!(q.fetch_next_page().is_none());
        assert!(q.fetch_next_page().is_none());
    }

    #[test]
    fn full_pages_continue_short_page_ends() {
        let mut q = query();
        let r0 = q.fetch_next_page().unwrap();
        q.resolve(&r0, Ok(batch(0, 20)));
        let r1 = q.fetch_next_page().unwrap();
        assert_eq!(r1.param, PageParam::Offset(20));
        assert!(q.is_fetching_next_page());
        let outcome = q.resolve(&r1, Ok(batch(20, 5)));
        assert_eq!(
            outcome,
            Resolution::Appended {
                page_index: 1,
                items: 5,
                has_next_page: false
            }
        );
        assert_eq!(q.item_count(), 25);
        assert!(!q.has_next_page());
        assert!(q.fetch_next_page().is_none());
    }

    #[test]
    fn failure_keeps_has_next_and_allows_retry() {
        let mut q = query();
        let r0 = q.fetch_next_page().unwrap();
        let outcome = q.resolve(&r0, Err(FetchError::Transport("reset".into())));
        assert!(matches!(outcome, Resolution::Failed(_)));
        assert!(q.has_next_page());
        assert!(!q.is_fetching());
        assert_eq!(q.status(), QueryStatus::Error);
        assert_eq!(q.failure_count(), 1);

        let retry = q.fetch_next_page().unwrap();
        assert_eq!(retry.param, PageParam::Offset(0));
        q.resolve(&retry, Ok(batch(0, 3)));
        assert!(q.last_error().is_none());
        assert_eq!(q.status(), QueryStatus::Success);
    }

    #[test]
    fn reset_makes_old_requests_stale() {
        let mut q = query();
        let r0 = q.fetch_next_page().unwrap();
        q.reset();
        assert_eq!(q.resolve(&r0, Ok(batch(0, 20))), Resolution::Stale);
        assert_eq!(q.item_count(), 0);
        assert_eq!(q.generation(), 1);

        let fresh = q.fetch_next_page().unwrap();
        assert_eq!(fresh.generation, 1);
        assert!(matches!(
            q.resolve(&fresh, Ok(batch(0, 2))),
            Resolution::Appended { .. }
        ));
    }

    #[test]
    fn duplicate_resolution_is_stale() {
        let mut q = query();
        let r0 = q.fetch_next_page().unwrap();
        q.resolve(&r0, Ok(batch(0, 20)));
        assert_eq!(q.resolve(&r0, Ok(batch(0, 20))), Resolution::Stale);
        assert_eq!(q.item_count(), 20);
    }

    #[test]
    fn refetch_restarts_from_first_page() {
        let mut q = query();
        let r0 = q.fetch_next_page().unwrap();
        q.resolve(&r0, Ok(batch(0, 20)));
        let again = q.refetch().unwrap();
        assert_eq!(again.param, PageParam::Offset(0));
        assert_eq!(again.page_index, 0);
        assert!(q.is_loading());
    }
}
