#![forbid(unsafe_code)]

//! Next-page parameter policies.
//!
//! A [`PagePolicy`] decides the first request parameter and, after every
//! successful page, whether another page exists and how to ask for it.
//! Returning `None` from [`PagePolicy::next_param`] ends pagination: the
//! query reports `has_next_page() == false` and stops issuing fetches.

use std::fmt;
use std::sync::Arc;

use crate::page::{Page, PageParam, PaginatedCollection};

/// Default page size used by the console list hooks.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Computes request parameters for consecutive pages.
pub trait PagePolicy<T> {
    /// Parameter of the first page.
    fn initial_param(&self) -> PageParam;

    /// Parameter of the page after `last_page`, or `None` when exhausted.
    ///
    /// `collection` already contains `last_page`.
    fn next_param(&self, last_page: &Page<T>, collection: &PaginatedCollection<T>)
    -> Option<PageParam>;
}

/// Offset/limit pagination.
///
/// A page exactly `batch_size` long implies more may follow, requested at
/// `pages * batch_size`; any shorter page ends the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetPaging {
    batch_size: usize,
}

impl OffsetPaging {
    /// Offset paging with `batch_size` items per page (at least 1).
    #[must_use]
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    /// Items requested per page.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl Default for OffsetPaging {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl<T> PagePolicy<T> for OffsetPaging {
    fn initial_param(&self) -> PageParam {
        PageParam::Offset(0)
    }

    fn next_param(
        &self,
        last_page: &Page<T>,
        collection: &PaginatedCollection<T>,
    ) -> Option<PageParam> {
        (last_page.len() == self.batch_size)
            .then(|| PageParam::Offset(collection.page_count() * self.batch_size))
    }
}

/// Cursor pagination keyed off the last item of each full page.
pub struct CursorPaging<T> {
    batch_size: usize,
    cursor_of: Arc<dyn Fn(&T) -> String + Send + Sync>,
}

impl<T> CursorPaging<T> {
    /// Cursor paging where `cursor_of(last_item)` names the next page.
    #[must_use]
    pub fn new(batch_size: usize, cursor_of: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            batch_size: batch_size.max(1),
            cursor_of: Arc::new(cursor_of),
        }
    }
}

impl<T> Clone for CursorPaging<T> {
    fn clone(&self) -> Self {
        Self {
            batch_size: self.batch_size,
            cursor_of: Arc::clone(&self.cursor_of),
        }
    }
}

impl<T> fmt::Debug for CursorPaging<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorPaging")
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl<T> PagePolicy<T> for CursorPaging<T> {
    fn initial_param(&self) -> PageParam {
        PageParam::Cursor(String::new())
    }

    fn next_param(
        &self,
        last_page: &Page<T>,
        _collection: &PaginatedCollection<T>,
    ) -> Option<PageParam> {
        if last_page.len() < self.batch_size {
            return None;
        }
        last_page
            .items()
            .last()
            .map(|item| PageParam::Cursor((self.cursor_of)(item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(pages: &[Vec<u32>]) -> PaginatedCollection<u32> {
        let mut c = PaginatedCollection::new();
        for (i, items) in pages.iter().enumerate() {
            c.push(Page::new(PageParam::Offset(i * 20), items.clone()));
        }
        c
    }

    #[test]
    fn offset_full_page_continues() {
        let policy = OffsetPaging::new(20);
        let c = collect(&[vec![0; 20], vec![0; 20]]);
        let last = c.last_page().unwrap();
        assert_eq!(policy.next_param(last, &c), Some(PageParam::Offset(40)));
    }

    #[test]
    fn offset_short_page_ends() {
        let policy = OffsetPaging::new(20);
        let c = collect(&[vec![0; 20], vec![0; 5]]);
        let last = c.last_page().unwrap();
        assert_eq!(PagePolicy::<u32>::next_param(&policy, last, &c), None);
    }

    #[test]
    fn offset_oversized_page_ends() {
        // A server returning more than asked is not a full batch.
        let policy = OffsetPaging::new(20);
        let c = collect(&[vec![0; 25]]);
        assert_eq!(policy.next_param(c.last_page().unwrap(), &c), None);
    }

    #[test]
    fn zero_batch_is_clamped() {
        assert_eq!(OffsetPaging::new(0).batch_size(), 1);
    }

    #[test]
    fn cursor_uses_last_item() {
        let policy = CursorPaging::new(2, |v: &u32| format!("after-{v}"));
        let c = collect(&[vec![4, 9]]);
        assert_eq!(
            policy.next_param(c.last_page().unwrap(), &c),
            Some(PageParam::Cursor("after-9".into()))
        );
        let short = collect(&[vec![4]]);
        assert_eq!(policy.next_param(short.last_page().unwrap(), &short), None);
        assert_eq!(policy.initial_param(), PageParam::Cursor(String::new()));
    }
}
