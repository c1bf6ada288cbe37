//! Google Sheets v4 REST client
//!
//! Implements `SpreadsheetService` with plain reqwest calls and a bearer token
//! from a `TokenSource`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::core::config::SheetConfig;
use crate::core::{GridSize, Result, SnipsheetError};
use crate::sheets::a1;
use crate::sheets::auth::{ServiceAccountKey, ServiceAccountTokenSource, TokenSource};
use crate::sheets::service::SpreadsheetService;

/// Sheets API client
#[derive(Clone)]
pub struct SheetsClient {
    client: Client,
    base: Url,
    tokens: Arc<dyn TokenSource>,
}

/// Spreadsheet metadata, trimmed to tab properties
#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    title: String,
}

/// Body of `values.update`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<[&'a str; 1]>,
}

/// Google API error document
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

impl SheetsClient {
    /// Create a client against `api_base` (normally the public Sheets endpoint)
    pub fn new(api_base: &str, tokens: Arc<dyn TokenSource>, client: Client) -> Result<Self> {
        let base = Url::parse(api_base)?;
        if base.cannot_be_a_base() {
            return Err(SnipsheetError::config(format!(
                "Sheets API base '{}' cannot take path segments",
                api_base
            )));
        }

        Ok(Self {
            client,
            base,
            tokens,
        })
    }

    /// Create a client that authenticates with a service account key
    pub fn from_config(config: &SheetConfig, key: ServiceAccountKey) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let tokens = Arc::new(ServiceAccountTokenSource::new(key, client.clone()));
        Self::new(&config.api_base, tokens, client)
    }

    /// `{base}/{segments...}` with each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn values_url(&self, spreadsheet_id: &str, range_and_action: &str) -> Url {
        self.url(&[spreadsheet_id, "values", range_and_action])
    }

    /// Attach the bearer token, send, and map non-success statuses
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let token = self.tokens.access_token().await?;
        let resp = request.bearer_auth(token).send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or(body);
        Err(SnipsheetError::from_sheets_status(status.as_u16(), message))
    }
}

#[async_trait]
impl SpreadsheetService for SheetsClient {
    async fn tab_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        let mut url = self.url(&[spreadsheet_id]);
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");

        let meta: SpreadsheetMeta = self.send(self.client.get(url)).await?.json().await?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }

    async fn add_tab(&self, spreadsheet_id: &str, title: &str, size: GridSize) -> Result<()> {
        let segment = format!("{}:batchUpdate", spreadsheet_id);
        let url = self.url(&[segment.as_str()]);
        let body = serde_json::json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": title,
                        "gridProperties": {
                            "rowCount": size.rows,
                            "columnCount": size.cols,
                        }
                    }
                }
            }]
        });

        self.send(self.client.post(url).json(&body)).await?;
        debug!(title, rows = size.rows, cols = size.cols, "Added tab");
        Ok(())
    }

    async fn clear_tab(&self, spreadsheet_id: &str, title: &str) -> Result<()> {
        let url = self.values_url(spreadsheet_id, &format!("{}:clear", a1::whole_tab(title)));
        self.send(self.client.post(url).json(&serde_json::json!({})))
            .await?;
        Ok(())
    }

    async fn write_column(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: &[String],
    ) -> Result<()> {
        let range = a1::first_cell(title);
        let mut url = self.values_url(spreadsheet_id, &range);
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = ValueRange {
            range: &range,
            major_dimension: "ROWS",
            values: rows.iter().map(|r| [r.as_str()]).collect(),
        };

        self.send(self.client.put(url).json(&body)).await?;
        Ok(())
    }
}
