//! Tests for pagination module

use super::*;
use crate::error::{Error, Result};
use crate::materialize::{Hooks, Materialize, Materializer, Schema};
use crate::types::{JsonValue, Record};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{LazyLock, Mutex};

// ============================================================================
// Test Doubles
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
struct Item {
    id: Option<String>,
    size: Option<i64>,
}

impl Materialize for Item {
    const TYPE_NAME: &'static str = "Item";

    fn schema() -> &'static Schema<Self> {
        static SCHEMA: LazyLock<Schema<Item>> = LazyLock::new(|| {
            Schema::<Item>::builder(Item::TYPE_NAME)
                .string("id", |i| &mut i.id)
                .integer("size", |i| &mut i.size)
                .build()
        });
        &SCHEMA
    }
}

fn record(value: JsonValue) -> Record {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("Expected object, got {other}"),
    }
}

fn items(ids: &[&str]) -> Vec<Record> {
    ids.iter().map(|id| record(json!({ "id": id }))).collect()
}

fn page(ids: &[&str], next: Option<&str>) -> Page {
    Page::new(items(ids), next.map(String::from))
}

fn ids(found: &[Item]) -> Vec<&str> {
    found.iter().filter_map(|i| i.id.as_deref()).collect()
}

/// Serves pre-built pages keyed by the token that requests them
struct ScriptedFetcher {
    first: Result<Page>,
    by_token: Vec<(String, Page)>,
    calls: AtomicUsize,
    cursors: Mutex<Vec<PageCursor>>,
}

impl ScriptedFetcher {
    fn new(first: Page) -> Self {
        Self {
            first: Ok(first),
            by_token: Vec::new(),
            calls: AtomicUsize::new(0),
            cursors: Mutex::new(Vec::new()),
        }
    }

    fn failing(err: Error) -> Self {
        Self {
            first: Err(err),
            ..Self::new(Page::default())
        }
    }

    fn then(mut self, token: &str, page: Page) -> Self {
        self.by_token.push((token.to_string(), page));
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn cursors(&self) -> Vec<PageCursor> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, cursor: &PageCursor) -> Result<Page> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.cursors.lock().unwrap().push(cursor.clone());
        match cursor {
            PageCursor::Start(_) => match &self.first {
                Ok(page) => Ok(page.clone()),
                Err(err) => Err(Error::unavailable(err.to_string())),
            },
            PageCursor::Next(token) => self
                .by_token
                .iter()
                .find(|(t, _)| t == token)
                .map(|(_, p)| p.clone())
                .ok_or_else(|| Error::rejected(400, "InvalidToken", token.clone())),
        }
    }
}

struct MapLookup {
    records: Vec<Record>,
    requested: Mutex<Vec<String>>,
}

impl MapLookup {
    fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RecordLookup for MapLookup {
    async fn lookup(&self, id: &str) -> Result<Option<Record>> {
        self.requested.lock().unwrap().push(id.to_string());
        Ok(self
            .records
            .iter()
            .find(|r| r.get("id").and_then(JsonValue::as_str) == Some(id))
            .cloned())
    }
}

fn options(max: usize) -> ListOptions {
    ListOptions::new().with_max(Some(max))
}

// ============================================================================
// Type Tests
// ============================================================================

#[test]
fn test_list_options_default_max() {
    assert_eq!(ListOptions::default().max, 1000);
    assert_eq!(ListOptions::new().with_max(None).max, DEFAULT_MAX_RECORDS);
    assert_eq!(ListOptions::new().with_max(Some(5)).max, 5);
}

#[test]
fn test_list_query_builder() {
    let query = ListQuery::new()
        .with_filter("properties/severity eq 'High'")
        .with_order_by("properties/createdTimeUtc desc")
        .with_top(50);
    assert_eq!(query.filter.as_deref(), Some("properties/severity eq 'High'"));
    assert_eq!(
        query.order_by.as_deref(),
        Some("properties/createdTimeUtc desc")
    );
    assert_eq!(query.top, Some(50));

    let query = ListQuery::new().with_filter("").with_order_by("");
    assert!(query.filter.is_none());
    assert!(query.order_by.is_none());
}

#[test]
fn test_page_cursor() {
    let start = PageCursor::Start(ListQuery::new());
    assert!(start.is_start());
    assert!(start.token().is_none());

    let next = PageCursor::Next("A".to_string());
    assert!(!next.is_start());
    assert_eq!(next.token(), Some("A"));
}

#[test]
fn test_page_blank_token_is_last() {
    let p = Page::new(items(&["a"]), Some("   ".to_string()));
    assert!(p.next_link.is_none());
    assert!(!p.has_next());
    assert_eq!(p.len(), 1);

    assert!(Page::last(vec![]).is_empty());
    assert!(page(&["a"], Some("A")).has_next());
}

#[test]
fn test_pagination_state_advance() {
    let mut state = PaginationState::new();
    state.advance(2, Some("A".to_string()), 5);
    assert_eq!(state.pages, 1);
    assert_eq!(state.emitted, 2);
    assert!(!state.is_done());

    state.advance(3, Some("B".to_string()), 5);
    assert_eq!(state.stopped, Some(StopReason::MaxReached));

    let mut state = PaginationState::new();
    state.advance(1, Some(String::new()), 5);
    assert_eq!(state.stopped, Some(StopReason::Exhausted));
    assert!(state.next_link.is_none());
}

// ============================================================================
// Driver Tests
// ============================================================================

#[tokio::test]
async fn test_list_stops_after_page_meeting_max() {
    let fetcher = ScriptedFetcher::new(page(&["r1", "r2"], Some("A"))).then("A", page(&["r3"], None));

    let found: Vec<Item> = collect_all(&fetcher, options(2)).await.unwrap();

    assert_eq!(ids(&found), vec!["r1", "r2"]);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_list_follows_tokens_until_exhausted() {
    let fetcher = ScriptedFetcher::new(page(&["r1", "r2"], Some("A")))
        .then("A", page(&["r3"], Some("B")))
        .then("B", page(&["r4", "r5"], None));

    let found: Vec<Item> = collect_all(&fetcher, options(100)).await.unwrap();

    assert_eq!(ids(&found), vec!["r1", "r2", "r3", "r4", "r5"]);
    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn test_list_never_truncates_a_page() {
    let fetcher = ScriptedFetcher::new(page(&["r1", "r2"], Some("A")))
        .then("A", page(&["r3", "r4", "r5"], Some("B")))
        .then("B", page(&["r6"], None));

    let found: Vec<Item> = collect_all(&fetcher, options(3)).await.unwrap();

    assert_eq!(ids(&found), vec!["r1", "r2", "r3", "r4", "r5"]);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_list_zero_max_emits_first_page_only() {
    let fetcher = ScriptedFetcher::new(page(&["r1"], Some("A"))).then("A", page(&["r2"], None));

    let found: Vec<Item> = collect_all(&fetcher, options(0)).await.unwrap();

    assert_eq!(ids(&found), vec!["r1"]);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_list_default_max_is_1000() {
    let big: Vec<String> = (0..400).map(|i| format!("r{i}")).collect();
    let refs: Vec<&str> = big.iter().map(String::as_str).collect();
    let fetcher = ScriptedFetcher::new(page(&refs, Some("A")))
        .then("A", page(&refs, Some("B")))
        .then("B", page(&refs, Some("C")))
        .then("C", page(&refs, None));

    let found: Vec<Item> = collect_all(&fetcher, ListOptions::default()).await.unwrap();

    assert_eq!(found.len(), 1200);
    assert_eq!(fetcher.calls(), 3);
}

#[tokio::test]
async fn test_list_sends_query_on_first_request_only() {
    let fetcher = ScriptedFetcher::new(page(&["r1"], Some("A"))).then("A", page(&["r2"], None));
    let query = ListQuery::new()
        .with_filter("properties/status eq 'New'")
        .with_order_by("name");

    let _: Vec<Item> = collect_all(&fetcher, ListOptions::new().with_query(query.clone()))
        .await
        .unwrap();

    assert_eq!(
        fetcher.cursors(),
        vec![PageCursor::Start(query), PageCursor::Next("A".to_string())]
    );
}

#[tokio::test]
async fn test_list_empty_result_is_not_an_error() {
    let fetcher = ScriptedFetcher::new(Page::last(vec![]));

    let found: Vec<Item> = collect_all(&fetcher, options(10)).await.unwrap();

    assert!(found.is_empty());
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_list_continues_past_empty_page_with_token() {
    let fetcher = ScriptedFetcher::new(page(&[], Some("A"))).then("A", page(&["r1"], None));

    let found: Vec<Item> = collect_all(&fetcher, options(10)).await.unwrap();

    assert_eq!(ids(&found), vec!["r1"]);
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_list_is_lazy() {
    let fetcher = ScriptedFetcher::new(page(&["r1", "r2"], Some("A")))
        .then("A", page(&["r3"], None));

    {
        let mut stream = list::<Item, _>(&fetcher, options(100));
        assert_eq!(fetcher.calls(), 0);

        let first = stream.next().await.unwrap().unwrap();
        assert_eq!(first.id.as_deref(), Some("r1"));
        assert_eq!(fetcher.calls(), 1);

        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(second.id.as_deref(), Some("r2"));
        assert_eq!(fetcher.calls(), 1);
    }

    // The stream was dropped before page two was needed
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn test_list_page_failure_is_atomic() {
    let bad_page = Page::new(
        vec![
            record(json!({"id": "r3"})),
            record(json!({"id": "r4", "size": "huge"})),
        ],
        None,
    );
    let fetcher = ScriptedFetcher::new(page(&["r1", "r2"], Some("A"))).then("A", bad_page);

    let results: Vec<Result<Item>> = list(&fetcher, options(100)).collect().await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().id.as_deref(), Some("r1"));
    assert_eq!(results[1].as_ref().unwrap().id.as_deref(), Some("r2"));
    match &results[2] {
        Err(Error::SchemaMismatch { path, .. }) => assert_eq!(path, "size"),
        other => panic!("Expected SchemaMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_propagates_fetch_errors() {
    let fetcher = ScriptedFetcher::failing(Error::unavailable("connection reset"));

    let err = collect_all::<Item, _>(&fetcher, options(10)).await.unwrap_err();

    assert!(matches!(err, Error::RemoteUnavailable { .. }));
    assert!(err.is_remote());
}

#[tokio::test]
async fn test_list_rejects_repeated_token() {
    let fetcher = ScriptedFetcher::new(page(&["r1"], Some("A"))).then("A", page(&["r2"], Some("A")));

    let err = collect_all::<Item, _>(&fetcher, options(100)).await.unwrap_err();

    assert!(matches!(err, Error::RepeatedToken { ref token } if token == "A"));
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn test_list_with_hooks() {
    let fetcher = ScriptedFetcher::new(page(&["r1", "r2"], None));
    let materializer = Materializer::with_hooks(Hooks::<Item>::none().after(|item, _| {
        item.size = Some(item.id.as_deref().map_or(0, str::len) as i64);
        Ok(())
    }));

    let found: Vec<Item> = list_with(&fetcher, options(10), materializer)
        .try_collect()
        .await
        .unwrap();

    assert_eq!(found[0].size, Some(2));
    assert_eq!(found[1].size, Some(2));
}

#[test]
fn test_list_blocking_consumer() {
    let fetcher = ScriptedFetcher::new(page(&["r1"], Some("A"))).then("A", page(&["r2"], None));

    let found: Vec<Item> = tokio_test::block_on(collect_all(&fetcher, options(10))).unwrap();

    assert_eq!(ids(&found), vec!["r1", "r2"]);
}

// ============================================================================
// Point Lookup Tests
// ============================================================================

#[tokio::test]
async fn test_get_found() {
    let lookup = MapLookup::new(vec![record(json!({"id": "inc-1", "size": 4}))]);

    let item: Item = get(&lookup, "inc-1").await.unwrap();

    assert_eq!(
        item,
        Item {
            id: Some("inc-1".to_string()),
            size: Some(4),
        }
    );
}

#[tokio::test]
async fn test_get_not_found() {
    let lookup = MapLookup::new(vec![]);

    let err = get::<Item, _>(&lookup, "inc-404").await.unwrap_err();

    assert!(matches!(err, Error::NotFound { ref resource } if resource == "inc-404"));
}

#[tokio::test]
async fn test_get_accepts_resource_id() {
    let lookup = MapLookup::new(vec![record(json!({"id": "inc-7"}))]);
    let id = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.OperationalInsights/workspaces/ws/providers/Microsoft.SecurityInsights/incidents/inc-7";

    let item: Item = get(&lookup, id).await.unwrap();

    assert_eq!(item.id.as_deref(), Some("inc-7"));
    assert_eq!(*lookup.requested.lock().unwrap(), vec!["inc-7".to_string()]);
}

#[tokio::test]
async fn test_get_schema_mismatch() {
    let lookup = MapLookup::new(vec![record(json!({"id": "inc-1", "size": true}))]);

    let err = get::<Item, _>(&lookup, "inc-1").await.unwrap_err();

    assert!(matches!(err, Error::SchemaMismatch { .. }));
}
