#![forbid(unsafe_code)]

//! Windowed infinite list rendering for inflist.
//!
//! # Role in inflist
//! `inflist-widgets` sits between a paginated source from `inflist-query`
//! and whatever draws rows on screen. It decides which rows exist right now
//! (loaded items, plus a loading row while more pages may follow), where each
//! one starts, which of them fall inside the viewport, and when the next page
//! should be requested.
//!
//! # Key components
//! - [`VirtualizedInfiniteList`]: the renderer; recompute, render, remeasure,
//!   and auto-fetch.
//! - [`SizeCache`]: measured and estimated row sizes over a Fenwick tree.
//! - [`compute_visible_range`]: the same window computation over a plain
//!   slice of sizes.
//! - [`ListConfig`]: estimate, overscan, auto-fetch, and viewport defaults.

pub mod config;
pub mod infinite_list;
pub mod virtualized;

pub use config::{DEFAULT_OVERSCAN, DEFAULT_VIEWPORT_HEIGHT, ListConfig};
pub use infinite_list::{RenderedRow, RowKind, VirtualRow, VirtualizedInfiniteList, Window};
pub use virtualized::{SizeCache, compute_visible_range};
