//! ARM collection endpoints as page and record sources

use super::client::ArmClient;
use crate::error::{Error, Result};
use crate::pagination::{ListQuery, Page, PageCursor, PageFetcher, RecordLookup};
use crate::types::{describe_value, JsonValue, Record};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// ARM list envelope: `{ "value": [...], "nextLink": "..." }`
#[derive(Debug, Deserialize)]
struct ListEnvelope {
    #[serde(default)]
    value: Option<JsonValue>,
    #[serde(rename = "nextLink", default)]
    next_link: Option<String>,
}

/// One ARM collection, e.g. the incidents of a Sentinel workspace
///
/// The first page request carries `api-version`, `$filter`, `$orderby` and
/// `$top`; later pages follow `nextLink` verbatim.
#[derive(Debug, Clone)]
pub struct ArmCollection {
    client: ArmClient,
    path: String,
    api_version: String,
}

impl ArmCollection {
    /// Create a collection handle for a path under the client's endpoint
    pub fn new(client: ArmClient, path: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            api_version: api_version.into(),
        }
    }

    /// Collection path, e.g. `/subscriptions/{sub}/providers/Microsoft.Attestation/attestationProviders`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// API version sent with first-page and lookup requests
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// URL of the first page
    pub fn list_url(&self, query: &ListQuery) -> Result<Url> {
        let mut url = self.client.url_for(&self.path)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api-version", &self.api_version);
            if let Some(filter) = &query.filter {
                pairs.append_pair("$filter", filter);
            }
            if let Some(order_by) = &query.order_by {
                pairs.append_pair("$orderby", order_by);
            }
            if let Some(top) = query.top {
                pairs.append_pair("$top", &top.to_string());
            }
        }
        Ok(url)
    }

    /// URL of a single member of the collection
    pub fn item_url(&self, name: &str) -> Result<Url> {
        let mut url = self.client.url_for(&self.path)?;
        url.path_segments_mut()
            .map_err(|()| Error::config(format!("endpoint '{}' cannot hold a path", self.path)))?
            .pop_if_empty()
            .push(name);
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

#[async_trait]
impl PageFetcher for ArmCollection {
    async fn fetch(&self, cursor: &PageCursor) -> Result<Page> {
        let url = match cursor {
            PageCursor::Start(query) => self.list_url(query)?,
            PageCursor::Next(link) => self.client.resolve_link(link)?,
        };

        let Some(body) = self.client.get_json(url, false).await? else {
            return Ok(Page::default());
        };
        let ListEnvelope { value, next_link } = serde_json::from_value(body)?;
        let records = envelope_records(value)?;

        debug!(
            "{}: {} records, next link {}",
            self.path,
            records.len(),
            if next_link.is_some() { "present" } else { "absent" }
        );
        Ok(Page::new(records, next_link))
    }
}

/// Records of a list envelope's `value`; absent or null is an empty page
fn envelope_records(value: Option<JsonValue>) -> Result<Vec<Record>> {
    let items = match value {
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items,
        Some(other) => return Err(Error::mismatch("value", "array", describe_value(&other))),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::Object(record) => Ok(record),
            other => Err(Error::mismatch(
                format!("value[{i}]"),
                "object",
                describe_value(&other),
            )),
        })
        .collect()
}

#[async_trait]
impl RecordLookup for ArmCollection {
    async fn lookup(&self, id: &str) -> Result<Option<Record>> {
        let url = self.item_url(id)?;
        match self.client.get_json(url, true).await? {
            None => Ok(None),
            Some(JsonValue::Object(record)) => Ok(Some(record)),
            Some(other) => Err(Error::mismatch(
                "$",
                "object",
                describe_value(&other),
            )),
        }
    }
}
