//! Derived-view pipeline for the directory.
//!
//! - `filter`: narrow a collection by the active criteria
//! - `sort`: stable ordering by a chosen field
//! - `paginate`: fixed-size page windows over the result
//!
//! Filtering always runs before sorting.

pub mod filter;
pub mod paginate;
pub mod sort;

pub use filter::{filter, matches};
pub use paginate::{page_slice, total_pages};
pub use sort::{sort, sort_in_place};
