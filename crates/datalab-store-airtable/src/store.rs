//! The `AirtableStore` implementation.

use std::time::Duration;

use datalab_core::{
  filter::{FilterExpr, SortDirection, SortSpec},
  record::{FieldMap, Record},
  store::RecordStore,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::{Error, Result};

const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Connection settings for the Airtable base.
#[derive(Debug, Clone, Deserialize)]
pub struct AirtableConfig {
  /// Personal access token, sent as a bearer token.
  pub token:   String,
  /// The base identifier (`app…`).
  pub base_id: String,
  /// API root override, for proxies and test servers.
  #[serde(default)]
  pub api_url: Option<String>,
}

/// Airtable-backed record store.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. Every call
/// carries an explicit timeout; the external service offers no cancellation
/// beyond dropping the in-flight future.
#[derive(Clone)]
pub struct AirtableStore {
  client:  Client,
  api_url: String,
  base_id: String,
  token:   String,
}

#[derive(Deserialize)]
struct RecordPage {
  records: Vec<Record>,
  offset:  Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
  error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ApiErrorDetail {
  Message { message: String },
  Code(String),
}

impl AirtableStore {
  pub fn new(config: AirtableConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self {
      client,
      api_url: config
        .api_url
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string(),
      base_id: config.base_id,
      token: config.token,
    })
  }

  fn record_url(&self, table: &str, id: &str) -> String {
    format!("{}/{}/{}/{}", self.api_url, self.base_id, encode(table), id)
  }

  fn table_url(&self, table: &str) -> String {
    format!("{}/{}/{}", self.api_url, self.base_id, encode(table))
  }

  /// Map a non-success response to [`Error::Api`], pulling the message out
  /// of Airtable's error body when there is one.
  async fn api_error(response: reqwest::Response) -> Error {
    let status = response.status().as_u16();
    let message = match response.json::<ApiErrorBody>().await {
      Ok(body) => match body.error {
        Some(ApiErrorDetail::Message { message }) => message,
        Some(ApiErrorDetail::Code(code)) => code,
        None => "unknown error".to_string(),
      },
      Err(_) => "unknown error".to_string(),
    };
    Error::Api { status, message }
  }
}

impl RecordStore for AirtableStore {
  type Error = Error;

  async fn find_by_id(&self, table: &str, id: &str) -> Result<Option<Record>> {
    let response = self
      .client
      .get(self.record_url(table, id))
      .bearer_auth(&self.token)
      .send()
      .await?;

    match response.status() {
      StatusCode::NOT_FOUND => Ok(None),
      status if status.is_success() => Ok(Some(response.json().await?)),
      _ => Err(Self::api_error(response).await),
    }
  }

  async fn find(
    &self,
    table: &str,
    filter: &FilterExpr,
    sort: Option<&SortSpec>,
  ) -> Result<Vec<Record>> {
    let formula = filter.to_formula();
    let mut records = Vec::new();
    let mut offset: Option<String> = None;

    // The list endpoint pages; follow `offset` until exhausted so the
    // snapshot covers the whole result set.
    loop {
      let mut query: Vec<(String, String)> =
        vec![("filterByFormula".to_string(), formula.clone())];
      if let Some(sort) = sort {
        query.push(("sort[0][field]".to_string(), sort.field.clone()));
        query.push((
          "sort[0][direction]".to_string(),
          match sort.direction {
            SortDirection::Asc => "asc".to_string(),
            SortDirection::Desc => "desc".to_string(),
          },
        ));
      }
      if let Some(offset) = &offset {
        query.push(("offset".to_string(), offset.clone()));
      }

      let response = self
        .client
        .get(self.table_url(table))
        .bearer_auth(&self.token)
        .query(&query)
        .send()
        .await?;
      if !response.status().is_success() {
        return Err(Self::api_error(response).await);
      }

      let page: RecordPage = response.json().await?;
      records.extend(page.records);
      match page.offset {
        Some(next) => offset = Some(next),
        None => break,
      }
    }

    tracing::debug!(table, total = records.len(), %formula, "query complete");
    Ok(records)
  }

  async fn update(
    &self,
    table: &str,
    id: &str,
    fields: FieldMap,
  ) -> Result<Record> {
    // PATCH merges fields; PUT would clear the ones we leave out.
    let response = self
      .client
      .patch(self.record_url(table, id))
      .bearer_auth(&self.token)
      .json(&json!({ "fields": fields }))
      .send()
      .await?;

    match response.status() {
      StatusCode::NOT_FOUND => Err(Error::RecordNotFound(id.to_string())),
      status if status.is_success() => Ok(response.json().await?),
      _ => Err(Self::api_error(response).await),
    }
  }
}

/// Percent-encode a table name for use as a path segment. Table names in
/// the base are display names and routinely contain spaces.
fn encode(table: &str) -> String {
  let mut out = String::with_capacity(table.len());
  for byte in table.bytes() {
    match byte {
      b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
        out.push(byte as char)
      }
      _ => out.push_str(&format!("%{byte:02X}")),
    }
  }
  out
}
