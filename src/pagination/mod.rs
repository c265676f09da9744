//! Pagination module
//!
//! Offset-window pagination with lazy iteration over the whole result set.
//!
//! # Overview
//!
//! - `Page` - one bounds-checked `{from, size}` window
//! - `PagedResult` - the items of one window plus the declared total
//! - `PagedIterator` - blocking cursor driving a `PageFetcher` window by window
//! - `paged_stream` - the same walk as an async `Stream` over an `AsyncPageFetcher`

mod iterator;
mod stream;
mod types;

pub use iterator::{PageFetcher, PagedIterator};
pub use stream::{collect_all, paged_stream, AsyncPageFetcher};
pub use types::{Page, PagedResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
