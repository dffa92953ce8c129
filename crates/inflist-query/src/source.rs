#![forbid(unsafe_code)]

//! The data-source contract consumed by list renderers.

use crate::infinite::PageRequest;
use crate::key::QueryKey;
use crate::page::Page;

/// A paginated data source a windowed list can render from.
///
/// `fetch_next_page` is the asynchronous edge: it hands back a
/// [`PageRequest`] ticket for the I/O layer and flips the source into its
/// fetching state. The source itself must refuse a second ticket while one is
/// outstanding, so callers may invoke it freely.
pub trait InfiniteSource<T> {
    /// Identity of the collection being served.
    fn key(&self) -> &QueryKey;

    /// Bumped whenever the collection is discarded and restarted.
    fn generation(&self) -> u64;

    /// Pages in fetch order.
    fn pages(&self) -> &[Page<T>];

    /// Number of loaded items across all pages.
    fn item_count(&self) -> usize;

    /// Loaded item at flat `index`.
    fn item(&self, index: usize) -> Option<&T>;

    /// Whether another page may exist.
    fn has_next_page(&self) -> bool;

    /// Whether a page after the first is in flight.
    fn is_fetching_next_page(&self) -> bool;

    /// Whether the first page is in flight.
    fn is_loading(&self) -> bool;

    /// Begin fetching the next page. `None` when exhausted or already fetching.
    fn fetch_next_page(&mut self) -> Option<PageRequest>;
}
