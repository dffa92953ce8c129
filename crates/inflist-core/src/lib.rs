#![forbid(unsafe_code)]

//! Core primitives for inflist.
//!
//! # Role in inflist
//! `inflist-core` holds the pieces every other crate leans on and that carry
//! no opinion about data fetching or rendering:
//!
//! - [`FenwickTree`]: prefix sums over row sizes, so offsets and
//!   "row at pixel" lookups stay logarithmic while rows are remeasured.
//! - [`SizeEstimate`]: the fallback size of rows that were never measured.
//! - [`CancellationSource`] / [`CancellationToken`]: teardown signal shared
//!   between a mounted list and the I/O layer feeding it.

pub mod cancellation;
pub mod fenwick;
pub mod size;

pub use cancellation::{CancellationSource, CancellationToken};
pub use fenwick::FenwickTree;
pub use size::{DEFAULT_ESTIMATE, SizeEstimate};
