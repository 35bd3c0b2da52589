//! Google Sheets access for the product table.
//!
//! Public sheets only: the sheet id is lifted from the URL and the data is
//! pulled through the CSV export endpoint, then parsed into one JSON object
//! per row keyed by the header row.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static SHEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/d/([a-zA-Z0-9-_]+)").expect("Invalid regex"));

/// Errors from fetching or parsing a sheet.
#[derive(Debug, Error)]
pub enum SheetError {
    /// The URL does not look like a Google Sheets link.
    #[error("Invalid Google Sheets URL")]
    InvalidUrl,

    /// Google's server did not answer within the timeout.
    #[error("Google Sheets server timed out (10s)")]
    Timeout,

    /// Network failure reaching Google.
    #[error("Network error connecting to Google Sheets: {0}")]
    Transport(reqwest::Error),

    /// Google answered with an error status.
    #[error("Google Sheets returned HTTP {0}. The sheet may not be public or the URL may be invalid.")]
    Status(reqwest::StatusCode),

    /// The exported CSV could not be parsed.
    #[error("Failed to parse CSV from Google Sheets: {0}")]
    Parse(#[from] csv::Error),
}

/// A parsed sheet row: header name to cell value.
pub type SheetRow = Map<String, Value>;

/// Extract the sheet id from a Google Sheets URL.
///
/// # Errors
///
/// Returns `InvalidUrl` when the URL carries no `/d/<id>` segment.
pub fn extract_sheet_id(url: &str) -> Result<&str, SheetError> {
    SHEET_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(SheetError::InvalidUrl)
}

/// Fetch a public sheet as CSV and return its rows as JSON objects.
///
/// # Errors
///
/// `InvalidUrl` for a malformed link, `Timeout`/`Transport`/`Status` for
/// fetch failures, `Parse` for malformed CSV.
pub async fn fetch_sheet(client: &reqwest::Client, sheet_url: &str) -> Result<Vec<SheetRow>, SheetError> {
    let sheet_id = extract_sheet_id(sheet_url)?;
    let export_url =
        format!("https://docs.google.com/spreadsheets/d/{sheet_id}/export?format=csv");

    let response = client
        .get(&export_url)
        .timeout(REQUEST_TIMEOUT)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                SheetError::Timeout
            } else {
                SheetError::Transport(e)
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SheetError::Status(status));
    }

    let body = response.text().await.map_err(SheetError::Transport)?;
    parse_csv(&body)
}

/// Parse CSV text into one object per row, keyed by the header row.
fn parse_csv(body: &str) -> Result<Vec<SheetRow>, SheetError> {
    let mut reader = csv::Reader::from_reader(body.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = SheetRow::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), Value::String(field.to_string()));
        }
        rows.push(row);
    }
    Ok(rows)
}
