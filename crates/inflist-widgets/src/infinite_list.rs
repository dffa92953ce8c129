#![forbid(unsafe_code)]

//! Windowed rendering over a paginated source, with auto-fetch.
//!
//! [`VirtualizedInfiniteList`] turns an [`InfiniteSource`] plus a scroll
//! position into a [`Window`]: the rows inside the viewport, padded by the
//! overscan, each with an absolute start offset. While the source reports
//! more pages, one extra trailing row (the loading row) is appended; when
//! the window reaches it, [`maybe_fetch_next`](VirtualizedInfiniteList::maybe_fetch_next)
//! asks the source for the next page.
//!
//! # Pass
//!
//! The renderer is pull-based. After a scroll, resize, data change, or
//! measurement the host calls [`pass`](VirtualizedInfiniteList::pass), which
//! recomputes the window and then runs the fetch check. Row output is
//! produced by [`render`](VirtualizedInfiniteList::render), which never
//! fetches.
//!
//! # Identity
//!
//! The window is tied to the source's key and generation. When either
//! changes, every size and offset is discarded and scrolling returns to the
//! top.
//!
//! # Unmount
//!
//! After [`unmount`](VirtualizedInfiniteList::unmount) every operation is a
//! no-op. I/O layers holding [`mount_token`](VirtualizedInfiniteList::mount_token)
//! can observe the cancellation and skip delivering responses.

use std::ops::Range;

use inflist_core::{CancellationSource, CancellationToken, SizeEstimate};
use inflist_query::{InfiniteSource, PageRequest, QueryKey};

use crate::config::ListConfig;
use crate::virtualized::SizeCache;

/// What a virtual row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// A loaded item.
    Item,
    /// The trailing loading row shown while more pages exist.
    Loading,
    /// Nothing to show: no loaded item and not the loading row.
    Empty,
}

/// One row of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualRow {
    /// Index in the renderable sequence.
    pub index: usize,
    /// Offset of the row's top edge from the top of the list.
    pub start: u32,
    /// Measured size, or the estimate before measurement.
    pub size: u32,
    /// Whether `size` is a real measurement.
    pub measured: bool,
    pub kind: RowKind,
}

impl VirtualRow {
    /// Offset just past the row's bottom edge.
    #[must_use]
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.size)
    }
}

/// Rows to render for the current scroll position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Window {
    /// Renderable indices covered, overscan included.
    pub range: Range<usize>,
    /// One entry per index in `range`.
    pub rows: Vec<VirtualRow>,
    /// Size of the whole scrollable content.
    pub total_size: u32,
}

impl Window {
    /// Whether the window has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last row of the window.
    #[must_use]
    pub fn last(&self) -> Option<&VirtualRow> {
        self.rows.last()
    }
}

/// A row paired with the caller's rendered output.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRow<R> {
    pub row: VirtualRow,
    pub output: R,
}

/// Windowed renderer for an infinite, paginated list.
#[derive(Debug)]
pub struct VirtualizedInfiniteList {
    config: ListConfig,
    sizes: SizeCache,
    scroll_offset: u32,
    viewport_height: u32,
    identity: Option<(QueryKey, u64)>,
    sentinel: Option<usize>,
    window: Window,
    mount: CancellationSource,
    fetches_issued: u64,
}

impl Default for VirtualizedInfiniteList {
    fn default() -> Self {
        Self::new(ListConfig::default())
    }
}

impl VirtualizedInfiniteList {
    /// Create a mounted list with `config`.
    #[must_use]
    pub fn new(config: ListConfig) -> Self {
        Self {
            sizes: SizeCache::new(config.size_estimate()),
            viewport_height: config.viewport_height,
            config,
            scroll_offset: 0,
            identity: None,
            sentinel: None,
            window: Window::default(),
            mount: CancellationSource::new(),
            fetches_issued: 0,
        }
    }

    /// Use a per-index estimator instead of the fixed `estimate_size`.
    #[must_use]
    pub fn with_size_estimate(mut self, estimate: SizeEstimate) -> Self {
        self.sizes.set_estimate(estimate);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// The size cache backing row offsets.
    #[must_use]
    pub fn sizes(&self) -> &SizeCache {
        &self.sizes
    }

    #[must_use]
    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    #[must_use]
    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Window from the most recent recompute.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Size of the whole scrollable content as of the last recompute.
    #[must_use]
    pub fn total_size(&self) -> u32 {
        self.sizes.total_size()
    }

    /// Number of `fetch_next_page` calls this list has issued.
    #[must_use]
    pub fn fetches_issued(&self) -> u64 {
        self.fetches_issued
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.mount.is_cancelled()
    }

    /// Token cancelled by [`unmount`](Self::unmount).
    #[must_use]
    pub fn mount_token(&self) -> CancellationToken {
        self.mount.token()
    }

    /// Loaded items plus the loading row when more pages may exist.
    #[must_use]
    pub fn renderable_count<T, S>(&self, source: &S) -> usize
    where
        S: InfiniteSource<T> + ?Sized,
    {
        source.item_count() + usize::from(self.has_loading_row(source))
    }

    fn has_loading_row<T, S>(&self, source: &S) -> bool
    where
        S: InfiniteSource<T> + ?Sized,
    {
        self.config.auto_fetch && source.has_next_page()
    }

    /// Rebuild the window from `source` and the current scroll position.
    pub fn recompute<T, S>(&mut self, source: &S) -> &Window
    where
        S: InfiniteSource<T> + ?Sized,
    {
        if !self.is_mounted() {
            return &self.window;
        }

        let key = source.key();
        let generation = source.generation();
        let same_identity = self
            .identity
            .as_ref()
            .is_some_and(|(k, g)| k == key && *g == generation);
        if !same_identity {
            if self.identity.is_some() {
                tracing::debug!(
                    target: "inflist.list",
                    key = %key,
                    generation,
                    "collection changed; offsets reset"
                );
            }
            self.sizes.clear();
            self.scroll_offset = 0;
            self.sentinel = None;
            self.identity = Some((key.clone(), generation));
        }

        let item_count = source.item_count();
        let loading_row = self.has_loading_row(source);
        // The former loading row's measurement does not describe the item
        // that replaces it.
        if let Some(former) = self.sentinel
            && (former != item_count || !loading_row)
        {
            self.sizes.forget(former);
        }
        self.sentinel = loading_row.then_some(item_count);
        self.sizes.sync_len(item_count + usize::from(loading_row));
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());

        let range = self.sizes.visible_range(
            self.scroll_offset,
            self.viewport_height,
            self.config.overscan,
        );
        let mut start = self.sizes.start(range.start);
        let mut rows = Vec::with_capacity(range.len());
        for index in range.clone() {
            let size = self.sizes.size(index);
            let kind = if index < item_count {
                if source.item(index).is_some() {
                    RowKind::Item
                } else {
                    RowKind::Empty
                }
            } else if loading_row && index == item_count {
                RowKind::Loading
            } else {
                RowKind::Empty
            };
            rows.push(VirtualRow {
                index,
                start,
                size,
                measured: self.sizes.is_measured(index),
                kind,
            });
            start = start.saturating_add(size);
        }

        tracing::trace!(
            target: "inflist.list",
            start = range.start,
            end = range.end,
            item_count,
            scroll_offset = self.scroll_offset,
            "window recomputed"
        );
        self.window = Window {
            range,
            rows,
            total_size: self.sizes.total_size(),
        };
        &self.window
    }

    /// Recompute and map each visible row through the caller's renderers.
    ///
    /// `render_item(item, index)` runs once per loaded row, `render_loading`
    /// once for the loading row; empty rows produce nothing. Never fetches.
    pub fn render<T, S, R>(
        &mut self,
        source: &S,
        mut render_item: impl FnMut(&T, usize) -> R,
        mut render_loading: impl FnMut() -> R,
    ) -> Vec<RenderedRow<R>>
    where
        S: InfiniteSource<T> + ?Sized,
    {
        self.recompute(source);
        let mut out = Vec::with_capacity(self.window.rows.len());
        for row in &self.window.rows {
            let output = match row.kind {
                RowKind::Item => match source.item(row.index) {
                    Some(item) => render_item(item, row.index),
                    None => continue,
                },
                RowKind::Loading => render_loading(),
                RowKind::Empty => continue,
            };
            out.push(RenderedRow { row: *row, output });
        }
        out
    }

    /// Record the real size of row `index`.
    ///
    /// Returns the shift applied to every later row, or `None` when the row
    /// is unknown or the list is unmounted. A row that starts above the
    /// scroll offset moves the scroll offset by the same amount, so visible
    /// content stays put.
    pub fn remeasure(&mut self, index: usize, size: u32) -> Option<i64> {
        if !self.is_mounted() {
            return None;
        }
        let delta = self.sizes.remeasure(index, size)?;
        tracing::trace!(target: "inflist.list", index, size, delta, "row remeasured");
        if delta != 0 && self.sizes.start(index) < self.scroll_offset {
            let adjusted = i64::from(self.scroll_offset) + delta;
            self.scroll_offset = u32::try_from(adjusted.max(0)).unwrap_or(u32::MAX);
        }
        for row in &mut self.window.rows {
            row.start = self.sizes.start(row.index);
            row.size = self.sizes.size(row.index);
            row.measured = self.sizes.is_measured(row.index);
        }
        self.window.total_size = self.sizes.total_size();
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        Some(delta)
    }

    /// Issue one `fetch_next_page` when the window has reached the end of the
    /// loaded items and the source can take another request.
    ///
    /// Safe to call after every pass: while a fetch is in flight it does
    /// nothing.
    pub fn maybe_fetch_next<T, S>(&mut self, source: &mut S) -> Option<PageRequest>
    where
        S: InfiniteSource<T> + ?Sized,
    {
        if !self.is_mounted() || !self.config.auto_fetch {
            return None;
        }
        let last = self.window.last()?.index;
        if last + 1 < source.item_count()
            || !source.has_next_page()
            || source.is_fetching_next_page()
            || source.is_loading()
        {
            return None;
        }
        let request = source.fetch_next_page()?;
        self.fetches_issued += 1;
        tracing::debug!(
            target: "inflist.list",
            key = %request.key,
            page_index = request.page_index,
            last_row = last,
            "auto-fetching next page"
        );
        Some(request)
    }

    /// [`recompute`](Self::recompute) followed by
    /// [`maybe_fetch_next`](Self::maybe_fetch_next).
    pub fn pass<T, S>(&mut self, source: &mut S) -> Option<PageRequest>
    where
        S: InfiniteSource<T> + ?Sized,
    {
        if !self.is_mounted() {
            return None;
        }
        let _span = tracing::debug_span!(
            target: "inflist.list",
            "inflist.list.pass",
            key = %source.key(),
            scroll_offset = self.scroll_offset
        )
        .entered();
        self.recompute(&*source);
        self.maybe_fetch_next(source)
    }

    /// Scroll to `offset`, clamped to the scrollable extent.
    pub fn set_scroll_offset(&mut self, offset: u32) {
        if self.is_mounted() {
            self.scroll_offset = offset.min(self.max_scroll());
        }
    }

    /// Resize the viewport.
    pub fn set_viewport_height(&mut self, height: u32) {
        if self.is_mounted() {
            self.viewport_height = height;
            self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        }
    }

    /// Scroll so row `index` is at the top, as far as the extent allows.
    pub fn scroll_to_index(&mut self, index: usize) {
        if self.sizes.is_empty() {
            return;
        }
        let index = index.min(self.sizes.len() - 1);
        self.set_scroll_offset(self.sizes.start(index));
    }

    /// Detach from the host. Every later call is a no-op.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.mount.cancel();
        self.window = Window::default();
        tracing::debug!(
            target: "inflist.list",
            fetches_issued = self.fetches_issued,
            "list unmounted"
        );
    }

    fn max_scroll(&self) -> u32 {
        self.sizes.total_size().saturating_sub(self.viewport_height)
    }
}
