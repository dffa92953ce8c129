#![forbid(unsafe_code)]

//! Pages and the append-only paginated collection.
//!
//! # Invariants
//!
//! - Flattening order equals fetch order; pages are never reordered.
//! - [`PaginatedCollection::push`] never touches earlier pages, so the flat
//!   index of every existing item is stable across appends.
//! - A collection is only ever discarded as a whole (see
//!   [`InfiniteQuery::reset`](crate::InfiniteQuery::reset)).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Request parameter that selects one page.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageParam {
    /// Item offset into the full result set.
    Offset(usize),
    /// Opaque continuation cursor. The empty cursor means "from the start".
    Cursor(String),
}

impl fmt::Display for PageParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offset(offset) => write!(f, "offset={offset}"),
            Self::Cursor(cursor) => write!(f, "cursor={cursor}"),
        }
    }
}

/// One batch of items returned by a single fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    param: PageParam,
    items: Vec<T>,
}

impl<T> Page<T> {
    /// Create a page fetched with `param`.
    #[must_use]
    pub fn new(param: PageParam, items: Vec<T>) -> Self {
        Self { param, items }
    }

    /// The parameter this page was requested with.
    #[must_use]
    pub fn param(&self) -> &PageParam {
        &self.param
    }

    /// Items in server order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the page came back empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ordered, append-only sequence of pages with flat item indexing.
#[derive(Clone, Debug)]
pub struct PaginatedCollection<T> {
    pages: Vec<Page<T>>,
    /// Flat index of each page's first item.
    starts: Vec<usize>,
    len: usize,
}

impl<T> Default for PaginatedCollection<T> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            starts: Vec::new(),
            len: 0,
        }
    }
}

impl<T> PaginatedCollection<T> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a page after every existing page.
    pub fn push(&mut self, page: Page<T>) {
        self.starts.push(self.len);
        self.len += page.len();
        self.pages.push(page);
    }

    /// Pages in fetch order.
    #[must_use]
    pub fn pages(&self) -> &[Page<T>] {
        &self.pages
    }

    /// Number of pages fetched.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// The most recently appended page.
    #[must_use]
    pub fn last_page(&self) -> Option<&Page<T>> {
        self.pages.last()
    }

    /// Total item count across pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no items are loaded (there may still be empty pages).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Item at flat `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        // Last page starting at or before index. An empty page shares its
        // start with the next page, so the last match is the non-empty one.
        let page = self.starts.partition_point(|&start| start <= index) - 1;
        self.pages[page].items.get(index - self.starts[page])
    }

    /// Items flattened in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.pages.iter().flat_map(|page| page.items.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(offset: usize, items: &[u32]) -> Page<u32> {
        Page::new(PageParam::Offset(offset), items.to_vec())
    }

    #[test]
    fn flat_indexing_spans_pages() {
        let mut c = PaginatedCollection::new();
        c.push(page(0, &[1, 2, 3]));
        c.push(page(3, &[4, 5]));
        assert_eq!(c.len(), 5);
        assert_eq!(c.get(0), Some(&1));
        assert_eq!(c.get(3), Some(&4));
        assert_eq!(c.get(4), Some(&5));
        assert_eq!(c.get(5), None);
        assert_eq!(c.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_pages_are_skipped_by_lookup() {
        let mut c = PaginatedCollection::new();
        c.push(page(0, &[1, 2]));
        c.push(page(2, &[]));
        c.push(page(2, &[3]));
        assert_eq!(c.page_count(), 3);
        assert_eq!(c.get(2), Some(&3));
    }

    #[test]
    fn push_keeps_earlier_pages() {
        let mut c = PaginatedCollection::new();
        c.push(page(0, &[7, 8]));
        let first = c.pages()[0].clone();
        c.push(page(2, &[9]));
        assert_eq!(c.pages()[0], first);
        assert_eq!(c.last_page().map(Page::len), Some(1));
    }

    #[test]
    fn param_display() {
        assert_eq!(PageParam::Offset(40).to_string(), "offset=40");
        assert_eq!(PageParam::Cursor("abc".into()).to_string(), "cursor=abc");
    }
}
