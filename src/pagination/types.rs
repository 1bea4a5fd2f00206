//! Pagination types and traits
//!
//! Defines the page, cursor and fetcher abstractions used by the driver.

use crate::error::Result;
use crate::types::{OptionStringExt, Record};
use async_trait::async_trait;

/// Default number of records a listing stops after when no maximum is given
pub const DEFAULT_MAX_RECORDS: usize = 1000;

/// Query parameters sent with the first page request only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Service-defined filter expression, passed through verbatim
    pub filter: Option<String>,
    /// Service-defined ordering expression, passed through verbatim
    pub order_by: Option<String>,
    /// Page size hint
    pub top: Option<u32>,
}

impl ListQuery {
    /// Create an empty query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter expression
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into().none_if_empty();
        self
    }

    /// Set the order-by expression
    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into().none_if_empty();
        self
    }

    /// Set the page size hint
    #[must_use]
    pub fn with_top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }
}

/// Which page to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// First page, carrying the fixed query parameters
    Start(ListQuery),
    /// A later page, identified by a token returned by the previous fetch
    Next(String),
}

impl PageCursor {
    /// Check if this is the first page
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start(_))
    }

    /// Continuation token, if this is not the first page
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Start(_) => None,
            Self::Next(token) => Some(token),
        }
    }
}

/// One page of raw records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Records in service order
    pub records: Vec<Record>,
    /// Continuation token; `None` once the listing is exhausted
    pub next_link: Option<String>,
}

impl Page {
    /// Create a page, normalising a blank token to `None`
    pub fn new(records: Vec<Record>, next_link: Option<String>) -> Self {
        Self {
            records,
            next_link: next_link.none_if_blank(),
        }
    }

    /// Create a final page
    pub fn last(records: Vec<Record>) -> Self {
        Self::new(records, None)
    }

    /// Number of records in the page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the page has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if another page follows
    pub fn has_next(&self) -> bool {
        self.next_link.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Options for a list-until-max call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Stop after at least this many records (whole pages are always emitted)
    pub max: usize,
    /// Fixed parameters of the first request
    pub query: ListQuery,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            max: DEFAULT_MAX_RECORDS,
            query: ListQuery::default(),
        }
    }
}

impl ListOptions {
    /// Create options with the default maximum
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum; `None` keeps the default
    #[must_use]
    pub fn with_max(mut self, max: Option<usize>) -> Self {
        self.max = max.unwrap_or(DEFAULT_MAX_RECORDS);
        self
    }

    /// Set the first-request query
    #[must_use]
    pub fn with_query(mut self, query: ListQuery) -> Self {
        self.query = query;
        self
    }
}

/// Why a listing stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The service returned no continuation token
    Exhausted,
    /// The requested maximum was reached
    MaxReached,
}

/// Tracks pagination progress during one listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Records emitted so far
    pub emitted: usize,
    /// Pages fetched so far
    pub pages: usize,
    /// Token for the next page
    pub next_link: Option<String>,
    /// Set once the listing has stopped
    pub stopped: Option<StopReason>,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page and decide whether to continue
    pub fn advance(&mut self, page_len: usize, next_link: Option<String>, max: usize) {
        self.pages += 1;
        self.emitted += page_len;
        self.next_link = next_link.none_if_blank();
        self.stopped = if self.next_link.is_none() {
            Some(StopReason::Exhausted)
        } else if self.emitted >= max {
            Some(StopReason::MaxReached)
        } else {
            None
        };
    }

    /// Check if the listing has stopped
    pub fn is_done(&self) -> bool {
        self.stopped.is_some()
    }
}

/// Source of pages for a remote list operation
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page
    async fn fetch(&self, cursor: &PageCursor) -> Result<Page>;
}

/// Source of single records addressed by identifier
#[async_trait]
pub trait RecordLookup: Send + Sync {
    /// Fetch one record; `Ok(None)` when nothing matches
    async fn lookup(&self, id: &str) -> Result<Option<Record>>;
}
