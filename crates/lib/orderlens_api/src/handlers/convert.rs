//! CSV to JSON conversion handler.

use std::path::PathBuf;

use axum::Json;
use axum::extract::Query;
use orderlens_core::json::{self, Value};
use orderlens_core::tabular::TabularDataset;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::CsvQuery;

/// `GET /csv-to-json/?file_path=<path>`: loads a CSV file and returns its
/// rows as JSON objects with non-finite numbers replaced by `null`.
pub async fn csv_to_json_handler(Query(params): Query<CsvQuery>) -> AppResult<Json<Value>> {
    if !params.file_path.ends_with(".csv") {
        return Err(AppError::InvalidFileFormat("File is not a CSV".into()));
    }

    let path = PathBuf::from(&params.file_path);
    let dataset = tokio::task::spawn_blocking(move || TabularDataset::from_csv_path(&path))
        .await
        .map_err(|e| AppError::Internal(format!("CSV task failed: {e}")))??;

    let records = dataset.to_records();
    debug!(clean = records.is_clean(), "converted CSV records");
    let sanitized = json::sanitize(&records);

    info!(
        file_path = %params.file_path,
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "CSV converted"
    );
    Ok(Json(sanitized))
}
