#![forbid(unsafe_code)]

//! inflist public facade crate.
//!
//! Re-exports the types most hosts need from the internal crates, a unified
//! [`Error`] with recovery hints, and a prelude. A typical host owns a
//! [`QueryStore`] and a [`VirtualizedInfiniteList`], calls
//! [`VirtualizedInfiniteList::pass`] once per render, performs any returned
//! [`PageRequest`] on its own I/O layer, and feeds the result back through
//! [`QueryStore::resolve`].

pub mod error;
#[cfg(feature = "logging")]
pub mod logging;

// --- Core re-exports -------------------------------------------------------

pub use inflist_core::{
    CancellationSource, CancellationToken, DEFAULT_ESTIMATE, FenwickTree, SizeEstimate,
};

// --- Query re-exports ------------------------------------------------------

pub use inflist_query::{
    CursorPaging, DEFAULT_BATCH_SIZE, DEFAULT_DEBOUNCE, Debounced, FetchError, InfiniteQuery,
    InfiniteSource, MutationError, MutationId, MutationPhase, OffsetPaging, Optimistic, Page,
    PageParam, PageRequest, PagePolicy, PaginatedCollection, QueryConfig, QueryKey, QueryStatus,
    QueryStore, Resolution,
};

// --- Widget re-exports -----------------------------------------------------

pub use inflist_widgets::{
    DEFAULT_OVERSCAN, DEFAULT_VIEWPORT_HEIGHT, ListConfig, RenderedRow, RowKind, SizeCache,
    VirtualRow, VirtualizedInfiniteList, Window, compute_visible_range,
};

// --- Errors ---------------------------------------------------------------

pub use error::{Error, Recovery, Result};
pub use inflist_query::ConfigError;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, FetchError, InfiniteQuery, InfiniteSource, ListConfig, OffsetPaging, PageParam,
        PageRequest, QueryKey, QueryStore, Recovery, Result, RowKind, VirtualizedInfiniteList,
    };

    pub use crate::{base, console, query, widgets};
}

pub use inflist_console as console;
pub use inflist_core as base;
pub use inflist_query as query;
pub use inflist_widgets as widgets;
