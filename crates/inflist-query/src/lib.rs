#![forbid(unsafe_code)]

//! Paginated query state for inflist.
//!
//! # Role in inflist
//! `inflist-query` is the data side of an infinite list. It does no I/O:
//! fetching a page produces a [`PageRequest`] ticket, the application's I/O
//! layer performs the request, and the outcome is fed back through
//! [`InfiniteQuery::resolve`] (or [`QueryStore::resolve`]). Everything runs on
//! the caller's event loop.
//!
//! # Key components
//! - [`InfiniteQuery`]: one paginated collection plus its fetch state; the
//!   reference implementation of [`InfiniteSource`].
//! - [`PagePolicy`]: how the next page is addressed ([`OffsetPaging`],
//!   [`CursorPaging`]).
//! - [`QueryStore`]: queries by [`QueryKey`], with explicit invalidation.
//! - [`Optimistic`]: two-phase local edits with commit and rollback.
//! - [`Debounced`]: latest-wins settling of search input.
//! - [`QueryConfig`]: tunables loadable from TOML or JSON.

pub mod config;
pub mod debounce;
pub mod error;
pub mod infinite;
pub mod key;
pub mod optimistic;
pub mod page;
pub mod paging;
pub mod source;
pub mod store;

pub use config::QueryConfig;
pub use debounce::{DEFAULT_DEBOUNCE, Debounced};
pub use error::{ConfigError, FetchError, MutationError};
pub use infinite::{InfiniteQuery, PageRequest, QueryStatus, Resolution};
pub use key::QueryKey;
pub use optimistic::{MutationId, MutationPhase, Optimistic, SETTLED_HISTORY};
pub use page::{Page, PageParam, PaginatedCollection};
pub use paging::{CursorPaging, DEFAULT_BATCH_SIZE, OffsetPaging, PagePolicy};
pub use source::InfiniteSource;
pub use store::QueryStore;
