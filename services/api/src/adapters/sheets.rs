//! services/api/src/adapters/sheets.rs
//!
//! This module contains the adapter for the Google Sheets values API.
//! It implements the `TabularStore` port from the `core` crate.

use async_trait::async_trait;
use recruitment_core::ports::{AccessTokenProvider, PortError, PortResult, TabularStore};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `TabularStore` port using the Sheets v4 API.
/// Reads use the API key; writes need a bearer token from the token gate.
#[derive(Clone)]
pub struct SheetsAdapter {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    api_key: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl SheetsAdapter {
    /// Creates a new `SheetsAdapter`.
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        api_key: impl Into<String>,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            api_key: api_key.into(),
            tokens,
        }
    }

    /// `{base}/{spreadsheetId}/values/{range}` with the range percent-encoded
    /// as a single path segment.
    fn values_url(&self, range: &str) -> PortResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PortError::Unexpected(format!("Invalid Sheets base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PortError::Unexpected("Sheets base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend([self.spreadsheet_id.as_str(), "values", range]);
        Ok(url)
    }
}

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeUpdate<'a> {
    range: &'a str,
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

fn status_error(status: StatusCode, action: &str) -> PortError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PortError::Unauthorized(format!("Sheets {} rejected with {}", action, status))
        }
        StatusCode::NOT_FOUND => PortError::NotFound(format!("Sheets {} returned 404", action)),
        _ => PortError::Unexpected(format!("Sheets {} failed with {}", action, status)),
    }
}

//=========================================================================================
// `TabularStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl TabularStore for SheetsAdapter {
    async fn read_range(&self, range: &str) -> PortResult<Vec<Vec<String>>> {
        let url = self.values_url(range)?;
        let response = self
            .client
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), "read"));
        }

        let body: ValueRange = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        debug!(range, rows = body.values.len(), "Sheets range read");
        Ok(body.values)
    }

    async fn write_range(&self, range: &str, values: Vec<Vec<String>>) -> PortResult<()> {
        let token = self.tokens.access_token().await?;
        let url = self.values_url(range)?;
        let response = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(token)
            .json(&ValueRangeUpdate {
                range,
                major_dimension: "ROWS",
                values,
            })
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), "write"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::token::TokenGate;
    use std::time::Duration;

    fn adapter() -> SheetsAdapter {
        SheetsAdapter::new(
            Client::new(),
            "https://sheets.googleapis.com/v4/spreadsheets",
            "sheet-123",
            "key",
            Arc::new(TokenGate::new(Duration::from_millis(1))),
        )
    }

    #[test]
    fn range_is_a_single_encoded_segment() {
        let url = adapter().values_url("Data Reviewed!W2:AC2").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/Data%20Reviewed!W2:AC2"
        );
    }

    #[test]
    fn missing_values_field_reads_as_empty_table() {
        let body: ValueRange = serde_json::from_str(r#"{"range":"Reviewed!A1:AC1"}"#).unwrap();
        assert!(body.values.is_empty());
    }

    #[test]
    fn update_body_uses_api_field_names() {
        let body = serde_json::to_value(ValueRangeUpdate {
            range: "Reviewed!W2:AC2",
            major_dimension: "ROWS",
            values: vec![vec!["a".to_string()]],
        })
        .unwrap();
        assert_eq!(body["majorDimension"], "ROWS");
        assert_eq!(body["values"][0][0], "a");
    }

    #[tokio::test]
    async fn write_without_token_fails_before_any_request() {
        let result = adapter()
            .write_range("Reviewed!W2:AC2", vec![vec![String::new()]])
            .await;
        assert!(matches!(result, Err(PortError::Unauthorized(_))));
    }
}
