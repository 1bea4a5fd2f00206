//! List-until-max driver and point lookups
//!
//! The driver turns a `PageFetcher` into a lazy stream of domain objects.
//! Pages are fetched only when the consumer polls past the previous page,
//! each page is materialized as a whole before any of its objects are
//! emitted, and the stop check runs after a full page has been emitted.

use super::types::{
    ListOptions, Page, PageCursor, PageFetcher, PaginationState, RecordLookup, StopReason,
};
use crate::error::{Error, Result};
use crate::materialize::{Materialize, Materializer};
use crate::resource_id::resource_name;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::collections::HashSet;
use tracing::debug;

struct ListState<T> {
    cursor: Option<PageCursor>,
    pagination: PaginationState,
    seen_tokens: HashSet<String>,
    materializer: Materializer<T>,
    max: usize,
}

/// Stream every record of a listing as `T`, stopping after at least
/// `options.max` records or when the service runs out of pages
pub fn list<'a, T, F>(fetcher: &'a F, options: ListOptions) -> BoxStream<'a, Result<T>>
where
    T: Materialize + Send,
    F: PageFetcher + ?Sized,
{
    list_with(fetcher, options, Materializer::new())
}

/// Same as [`list`], with a materializer carrying hooks
pub fn list_with<'a, T, F>(
    fetcher: &'a F,
    options: ListOptions,
    materializer: Materializer<T>,
) -> BoxStream<'a, Result<T>>
where
    T: Materialize + Send,
    F: PageFetcher + ?Sized,
{
    let ListOptions { max, query } = options;
    let initial = ListState {
        cursor: Some(PageCursor::Start(query)),
        pagination: PaginationState::new(),
        seen_tokens: HashSet::new(),
        materializer,
        max,
    };

    let pages = stream::try_unfold(initial, move |mut state| async move {
        let Some(cursor) = state.cursor.take() else {
            return Ok(None);
        };

        let Page { records, next_link } = fetcher.fetch(&cursor).await?;
        let page_len = records.len();
        let objects = state.materializer.materialize_page(records)?;

        state.pagination.advance(page_len, next_link, state.max);
        debug!(
            "Page {}: {page_len} {} records ({} total)",
            state.pagination.pages,
            T::TYPE_NAME,
            state.pagination.emitted
        );

        match state.pagination.stopped {
            Some(reason) => log_stop(reason, &state.pagination),
            None => {
                if let Some(token) = state.pagination.next_link.clone() {
                    if !state.seen_tokens.insert(token.clone()) {
                        return Err(Error::RepeatedToken { token });
                    }
                    state.cursor = Some(PageCursor::Next(token));
                }
            }
        }

        Ok::<_, Error>(Some((objects, state)))
    });

    pages
        .map_ok(|objects| stream::iter(objects.into_iter().map(Ok::<T, Error>)))
        .try_flatten()
        .boxed()
}

fn log_stop(reason: StopReason, state: &PaginationState) {
    match reason {
        StopReason::Exhausted => debug!(
            "Listing exhausted after {} pages, {} records",
            state.pages, state.emitted
        ),
        StopReason::MaxReached => debug!(
            "Listing reached maximum after {} pages, {} records",
            state.pages, state.emitted
        ),
    }
}

/// Drain a listing into a vector
pub async fn collect_all<T, F>(fetcher: &F, options: ListOptions) -> Result<Vec<T>>
where
    T: Materialize + Send,
    F: PageFetcher + ?Sized,
{
    list(fetcher, options).try_collect().await
}

/// Fetch one record by name or full resource ID
///
/// Zero matches is a `NotFound` error, never an empty result.
pub async fn get<T, L>(lookup: &L, id: &str) -> Result<T>
where
    T: Materialize,
    L: RecordLookup + ?Sized,
{
    get_with(lookup, id, &Materializer::new()).await
}

/// Same as [`get`], with a materializer carrying hooks
pub async fn get_with<T, L>(lookup: &L, id: &str, materializer: &Materializer<T>) -> Result<T>
where
    T: Materialize,
    L: RecordLookup + ?Sized,
{
    let name = resource_name(id)?;
    debug!("Looking up {} '{name}'", T::TYPE_NAME);
    match lookup.lookup(&name).await? {
        Some(record) => materializer.materialize(record),
        None => Err(Error::not_found(name)),
    }
}
