//! Order summary: startup aggregation of the `orders` table.
//!
//! The summary is computed once when the process starts and is never
//! refreshed. Any failure along the way (database unreachable, missing
//! columns, malformed values) degrades to [`OrderSummary::unavailable`]
//! instead of stopping the server.
//!
//! # Public API
//!
//! - [`load_summary`]: load, aggregate and render, degrading on failure
//! - [`summary_from_dataset`]: aggregate and render an already loaded table
//! - [`columns::OrderColumns::resolve`]: map logical roles to table columns
//! - [`aggregate::summarize`]: daily/weekly totals and busiest day
//! - [`OrderSummary::from_result`]: render an aggregation for prompts

pub mod aggregate;
pub mod columns;
pub mod source;

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use aggregate::AggregationResult;
use columns::OrderColumns;

use crate::tabular::TabularDataset;

/// Summary text used whenever no order data is available.
pub const NO_DATA_SUMMARY: &str = "No order data available in the database.";

/// Errors that can occur while building the order summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Required column not found for role(s): {}", .0.join(", "))]
    MissingRequiredColumn(Vec<&'static str>),

    #[error("Order source unavailable: {0}")]
    SourceUnavailable(#[from] sqlx::Error),

    #[error("Invalid quantity {value:?} in row {row}")]
    InvalidQuantity { row: usize, value: String },

    #[error("Invalid date {value:?} in row {row}")]
    InvalidDate { row: usize, value: String },
}

/// Rendered order statistics, ready to be interpolated into prompts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    /// Human-readable summary (order count and busiest day).
    pub summary: String,
    /// Daily totals as a JSON array of `[label, value]` pairs.
    pub daily_orders: String,
    /// Weekly totals as a JSON array of `[label, value]` pairs.
    pub weekly_orders: String,
    /// Whether the summary reflects real order data.
    pub loaded: bool,
}

impl OrderSummary {
    /// The summary served when the order data could not be loaded.
    pub fn unavailable() -> Self {
        Self {
            summary: NO_DATA_SUMMARY.to_string(),
            daily_orders: "[]".to_string(),
            weekly_orders: "[]".to_string(),
            loaded: false,
        }
    }

    /// Renders an aggregation result.
    pub fn from_result(result: &AggregationResult) -> Self {
        let summary = if result.total_count == 0 {
            NO_DATA_SUMMARY.to_string()
        } else {
            let busiest = match &result.max_day {
                Some((day, total)) => {
                    format!("Busiest day: {} with {total} units", day.format("%Y-%m-%d"))
                }
                None => "Busiest day: no data".to_string(),
            };
            format!("Total orders: {}\n{busiest}", result.total_count)
        };

        Self {
            summary,
            daily_orders: render_series(&result.daily_series()),
            weekly_orders: render_series(&result.weekly_series()),
            loaded: true,
        }
    }
}

fn render_series(series: &[(String, f64)]) -> String {
    serde_json::to_string(series).unwrap_or_else(|_| "[]".to_string())
}

/// Loads the `orders` table and renders its summary.
///
/// Never fails: errors are logged and replaced by [`OrderSummary::unavailable`].
pub async fn load_summary(pool: &PgPool) -> OrderSummary {
    match source::load_orders(pool).await {
        Ok(dataset) => summary_from_dataset(&dataset),
        Err(e) => degrade(&e),
    }
}

/// Resolves columns, aggregates and renders `dataset`.
///
/// Never fails: errors are logged and replaced by [`OrderSummary::unavailable`].
pub fn summary_from_dataset(dataset: &TabularDataset) -> OrderSummary {
    match try_summarize(dataset) {
        Ok(summary) => summary,
        Err(e) => degrade(&e),
    }
}

fn degrade(e: &SummaryError) -> OrderSummary {
    warn!(error = %e, "order data unavailable, serving without summary");
    OrderSummary::unavailable()
}

fn try_summarize(dataset: &TabularDataset) -> Result<OrderSummary, SummaryError> {
    let columns = OrderColumns::resolve(dataset.columns())?;
    info!(
        order_date = %columns.date.name,
        order_week = columns.week.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
        order_quantity = %columns.quantity.name,
        "resolved order columns"
    );

    let result = aggregate::summarize(dataset, &columns)?;
    info!(
        total = result.total_count,
        days = result.daily_totals.len(),
        weeks = result.weekly_totals.len(),
        "order summary computed"
    );
    Ok(OrderSummary::from_result(&result))
}
