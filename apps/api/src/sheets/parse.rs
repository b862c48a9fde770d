//! Conversions between Sheets value grids and the call data model.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::analysis::models::{AnalysisMode, AnalysisReport};
use crate::call::models::{CustomerHistoryRecord, DataContext, SalespersonRecord};
use crate::call::phone::side_for;

/// A tab's cells as returned by `values:batchGet`, rows first.
pub type Grid = Vec<Vec<Value>>;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"/spreadsheets/d/([A-Za-z0-9_-]+)").expect("spreadsheet url pattern is valid")
    })
}

/// Accepts a bare spreadsheet id or a full sheet URL. Returns `None` for anything
/// that cannot be an id.
pub fn extract_spreadsheet_id(input: &str) -> Option<String> {
    let input = input.trim();
    if let Some(caps) = url_pattern().captures(input) {
        return Some(caps[1].to_string());
    }
    let valid = !input.is_empty()
        && input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| input.to_string())
}

fn cell_text(cell: &Value) -> Option<String> {
    let text = match cell {
        Value::String(s) => s.trim().to_string(),
        Value::Null => return None,
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn cell(row: &[Value], index: usize) -> Option<String> {
    row.get(index).and_then(cell_text)
}

/// Data rows of a tab; the first row is the header.
fn data_rows(grid: &Grid) -> impl Iterator<Item = &Vec<Value>> {
    grid.iter().skip(1)
}

/// Joins every non-empty product cell, row by row. `None` when the tab is empty.
pub fn parse_product_context(grid: &Grid) -> Option<String> {
    let lines: Vec<String> = data_rows(grid)
        .map(|row| {
            row.iter()
                .filter_map(cell_text)
                .collect::<Vec<_>>()
                .join(": ")
        })
        .filter(|line| !line.is_empty())
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Columns: A name, B phone. Rows missing either are skipped.
pub fn parse_salespersons(grid: &Grid) -> Vec<SalespersonRecord> {
    data_rows(grid)
        .filter_map(|row| {
            Some(SalespersonRecord {
                name: cell(row, 0)?,
                phone: cell(row, 1)?,
            })
        })
        .collect()
}

/// Columns: A phone, then B..O in `CustomerHistoryRecord` field order.
/// Rows without a phone are skipped.
pub fn parse_customer_history(grid: &Grid) -> Vec<CustomerHistoryRecord> {
    data_rows(grid)
        .filter_map(|row| {
            Some(CustomerHistoryRecord {
                phone: cell(row, 0)?,
                customer_name: cell(row, 1),
                company: cell(row, 2),
                last_contact_date: cell(row, 3),
                last_call_summary: cell(row, 4),
                interest_level: cell(row, 5),
                products_of_interest: cell(row, 6),
                budget: cell(row, 7),
                decision_maker: cell(row, 8),
                pain_points: cell(row, 9),
                objections: cell(row, 10),
                next_steps: cell(row, 11),
                deal_stage: cell(row, 12),
                assigned_salesperson: cell(row, 13),
                notes: cell(row, 14),
            })
        })
        .collect()
}

pub fn build_data_context(product: &Grid, salespersons: &Grid, history: &Grid) -> DataContext {
    DataContext {
        product_context: parse_product_context(product),
        salespersons: parse_salespersons(salespersons),
        customer_history: parse_customer_history(history),
    }
}

/// One `AnalysisResults` row (columns A..M) for a finished report.
pub fn result_row(report: &AnalysisReport) -> Vec<String> {
    let result = &report.result;
    let meta = report.metadata.as_ref();
    let mode = match report.mode {
        AnalysisMode::Text => "text",
        AnalysisMode::Audio => "audio",
    };

    vec![
        report
            .analyzed_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        mode.to_string(),
        meta.map(|m| m.original_filename.clone()).unwrap_or_default(),
        meta.map(|m| m.date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        meta.map(|m| m.time.format("%H:%M").to_string())
            .unwrap_or_default(),
        meta.map(|m| m.call_type.clone()).unwrap_or_default(),
        report
            .matched_salesperson
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default(),
        meta.map(|m| side_for(m.direction, m).customer_phone.to_string())
            .unwrap_or_default(),
        result.salesperson_evaluation.overall_score.to_string(),
        result.salesperson_evaluation.summary.clone(),
        result.customer_evaluation.summary.clone(),
        result.situational_evaluation.summary.clone(),
        result.strategic_recommendations.next_steps.join("; "),
    ]
}
