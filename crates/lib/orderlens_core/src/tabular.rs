//! Rectangular tabular datasets loaded from CSV files or SQL result sets.
//!
//! CSV columns are typed as a whole, the way dataframe loaders do it: a
//! column whose non-missing cells all parse as integers is an integer column
//! (unless it has missing cells, in which case it widens to float), a column
//! that parses as floats is a float column, a column of `true`/`false` is a
//! boolean column, anything else is text. Missing-value markers become
//! [`Cell::Null`].

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;

use crate::json::Value;

/// Strings treated as missing values when reading CSV.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum TabularError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("No columns to parse from file")]
    Empty,

    #[error("Expected {expected} fields in line {line}, saw {actual}")]
    Ragged {
        line: u64,
        expected: usize,
        actual: usize,
    },
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Wraps an optional text value, mapping `None` to [`Cell::Null`].
    pub fn from_text(text: Option<String>) -> Self {
        text.map_or(Cell::Null, Cell::Text)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Converts the cell into a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Null => Value::Null,
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Integer(i) => Value::Integer(*i),
            Cell::Float(f) => Value::Float(*f),
            Cell::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("null"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

/// An immutable, rectangular table: every row has one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularDataset {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl TabularDataset {
    /// Builds a dataset, padding short rows with nulls and dropping cells
    /// beyond the last column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Reads a CSV file with a header row.
    pub fn from_csv_path(path: &Path) -> Result<Self, TabularError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => TabularError::NotFound(path.display().to_string()),
            _ => TabularError::Io(e),
        })?;
        Self::from_csv_reader(file)
    }

    /// Reads CSV data with a header row from any reader.
    ///
    /// Header names are trimmed; duplicate names get a `.N` suffix.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TabularError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(TabularError::Empty);
        }
        let columns = dedupe_columns(headers.iter().map(str::trim));
        let width = columns.len();

        let mut raw: Vec<Vec<Option<String>>> = Vec::new();
        for result in rdr.records() {
            let record = result?;
            if record.len() > width {
                return Err(TabularError::Ragged {
                    line: record.position().map_or(0, |p| p.line()),
                    expected: width,
                    actual: record.len(),
                });
            }
            let mut row: Vec<Option<String>> = record
                .iter()
                .map(|field| (!NA_MARKERS.contains(&field)).then(|| field.to_string()))
                .collect();
            row.resize(width, None);
            raw.push(row);
        }

        let kinds: Vec<ColumnKind> = (0..width)
            .map(|col| ColumnKind::infer(raw.iter().map(|row| row[col].as_deref())))
            .collect();

        let rows = raw
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&kinds)
                    .map(|(field, kind)| kind.cell(field))
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Converts the dataset to a JSON array of row objects keyed by column name.
    pub fn to_records(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    Value::Object(
                        self.columns
                            .iter()
                            .zip(row)
                            .map(|(name, cell)| (name.clone(), cell.to_json()))
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Inferred type of a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    fn infer<'a>(fields: impl Iterator<Item = Option<&'a str>>) -> Self {
        let mut ints = true;
        let mut floats = true;
        let mut bools = true;
        let mut missing = false;
        let mut seen = false;

        for field in fields {
            let Some(field) = field else {
                missing = true;
                continue;
            };
            seen = true;
            ints &= field.trim().parse::<i64>().is_ok();
            floats &= field.trim().parse::<f64>().is_ok();
            bools &= parse_bool(field).is_some();
        }

        match (seen, ints, floats, bools) {
            (false, ..) => ColumnKind::Float,
            (true, true, _, _) if !missing => ColumnKind::Integer,
            (true, _, true, _) => ColumnKind::Float,
            (true, _, _, true) => ColumnKind::Bool,
            _ => ColumnKind::Text,
        }
    }

    fn cell(self, field: Option<String>) -> Cell {
        let Some(field) = field else {
            return Cell::Null;
        };
        match self {
            ColumnKind::Integer => field
                .trim()
                .parse()
                .map_or(Cell::Text(field.clone()), Cell::Integer),
            ColumnKind::Float => field
                .trim()
                .parse()
                .map_or(Cell::Text(field.clone()), Cell::Float),
            ColumnKind::Bool => parse_bool(&field).map_or(Cell::Text(field.clone()), Cell::Bool),
            ColumnKind::Text => Cell::Text(field),
        }
    }
}

fn parse_bool(field: &str) -> Option<bool> {
    match field.trim() {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

fn dedupe_columns<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for name in names {
        let mut candidate = name.to_string();
        let mut n = 1;
        while columns.contains(&candidate) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        columns.push(candidate);
    }
    columns
}
