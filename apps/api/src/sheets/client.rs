//! Google Sheets collaborator.
//!
//! Reads the reference tabs with `values:batchGet` and appends analysis rows with
//! `values:append`. `SheetsGateway` keeps handlers independent of the HTTP client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::call::models::DataContext;
use crate::sheets::parse::{build_data_context, Grid};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub const PRODUCT_RANGE: &str = "Product!A:B";
pub const SALESPERSONS_RANGE: &str = "Salespersons!A:B";
pub const CUSTOMER_HISTORY_RANGE: &str = "CustomerHistory!A:O";
pub const RESULTS_RANGE: &str = "AnalysisResults!A:M";

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("No Google credentials available to read the spreadsheet")]
    MissingCredentials,

    #[error("Unexpected response: expected {expected} value ranges, got {got}")]
    UnexpectedShape { expected: usize, got: usize },
}

#[async_trait]
pub trait SheetsGateway: Send + Sync {
    /// Loads the reference data. Uses `access_token` when signed in, otherwise the
    /// configured API key.
    async fn load_data_context(
        &self,
        spreadsheet_id: &str,
        access_token: Option<&str>,
    ) -> Result<DataContext, SheetsError>;

    /// Appends one row to the results tab. Writing always needs a user token.
    async fn append_result(
        &self,
        spreadsheet_id: &str,
        access_token: &str,
        row: Vec<String>,
    ) -> Result<(), SheetsError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchGetResponse {
    #[serde(default)]
    value_ranges: Vec<ValueRange>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Grid,
}

#[derive(Debug, Serialize)]
struct AppendBody {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct GoogleSheetsClient {
    client: Client,
    api_key: Option<String>,
}

impl GoogleSheetsClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            api_key,
        }
    }

    fn authorize(
        &self,
        request: RequestBuilder,
        access_token: Option<&str>,
    ) -> Result<RequestBuilder, SheetsError> {
        match (access_token, &self.api_key) {
            (Some(token), _) => Ok(request.bearer_auth(token)),
            (None, Some(key)) => Ok(request.query(&[("key", key.as_str())])),
            (None, None) => Err(SheetsError::MissingCredentials),
        }
    }
}

#[async_trait]
impl SheetsGateway for GoogleSheetsClient {
    async fn load_data_context(
        &self,
        spreadsheet_id: &str,
        access_token: Option<&str>,
    ) -> Result<DataContext, SheetsError> {
        let ranges = [PRODUCT_RANGE, SALESPERSONS_RANGE, CUSTOMER_HISTORY_RANGE];
        let query: Vec<(&str, &str)> = ranges.iter().map(|r| ("ranges", *r)).collect();

        let request = self
            .client
            .get(format!("{SHEETS_API_BASE}/{spreadsheet_id}/values:batchGet"))
            .query(&query)
            .query(&[("majorDimension", "ROWS")]);
        let response = self.authorize(request, access_token)?.send().await?;
        let body: BatchGetResponse = check_status(response).await?.json().await?;

        let [product, salespersons, history] = <[ValueRange; 3]>::try_from(body.value_ranges)
            .map_err(|got| SheetsError::UnexpectedShape {
                expected: ranges.len(),
                got: got.len(),
            })?;

        let context = build_data_context(&product.values, &salespersons.values, &history.values);
        info!(
            "Loaded spreadsheet {spreadsheet_id}: {} salespersons, {} history rows, product context {}",
            context.salespersons.len(),
            context.customer_history.len(),
            if context.product_context.is_some() { "present" } else { "absent" }
        );
        Ok(context)
    }

    async fn append_result(
        &self,
        spreadsheet_id: &str,
        access_token: &str,
        row: Vec<String>,
    ) -> Result<(), SheetsError> {
        let response = self
            .client
            .post(format!(
                "{SHEETS_API_BASE}/{spreadsheet_id}/values/{RESULTS_RANGE}:append"
            ))
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(access_token)
            .json(&AppendBody { values: vec![row] })
            .send()
            .await?;
        check_status(response).await?;
        debug!("Appended analysis row to {spreadsheet_id}");
        Ok(())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GoogleError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    Err(SheetsError::Api {
        status: status.as_u16(),
        message,
    })
}
