// Spreadsheet integration: reference-data loading and result write-back.

pub mod client;
pub mod handlers;
pub mod parse;

use chrono::{DateTime, Utc};

use crate::call::models::DataContext;

/// The data context currently in use, with the sheet it came from.
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub spreadsheet_id: String,
    pub context: DataContext,
    pub loaded_at: DateTime<Utc>,
}
