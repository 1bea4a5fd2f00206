//! Pagination module
//!
//! Follows continuation tokens across pages and materializes each page.
//!
//! # Overview
//!
//! A `PageFetcher` wraps one remote list operation. The driver calls it with
//! `PageCursor::Start` (carrying filter, order-by and page size) for the first
//! page and `PageCursor::Next(token)` afterwards, streaming materialized
//! objects until the service runs out of pages or the requested maximum has
//! been reached. Point lookups go through `RecordLookup` and skip pagination.

mod driver;
mod types;

pub use driver::{collect_all, get, get_with, list, list_with};
pub use types::{
    ListOptions, ListQuery, Page, PageCursor, PageFetcher, PaginationState, RecordLookup,
    StopReason, DEFAULT_MAX_RECORDS,
};

#[cfg(test)]
mod tests;
