//! Dataset loading
//!
//! Reads the source file into a polars `DataFrame`, conforms the inventory
//! schema and memoizes the result per source path for the lifetime of the
//! process.

use crate::error::{DashboardError, Result};
use crate::schema::{required_columns, METRIC_COLUMNS, TEXT_COLUMNS};
use calamine::{open_workbook, Data, Reader, Xlsx};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supported source formats, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Xlsx,
    Csv,
    Parquet,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(SourceFormat::Xlsx),
            "csv" => Ok(SourceFormat::Csv),
            "parquet" => Ok(SourceFormat::Parquet),
            _ => Err(DashboardError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load and conform a dataset, bypassing the cache
pub fn load_table(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(DashboardError::MissingFile(path.display().to_string()));
    }

    let format = SourceFormat::from_path(path)?;
    info!("Loading dataset {} ({:?})", path.display(), format);

    let df = match format {
        SourceFormat::Xlsx => read_xlsx(path)?,
        SourceFormat::Csv => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .finish()?
            .collect()?,
        SourceFormat::Parquet => {
            LazyFrame::scan_parquet(path, ScanArgsParquet::default())?.collect()?
        }
    };

    let df = conform_schema(df)?;
    info!("Loaded {} rows x {} columns", df.height(), df.width());
    Ok(df)
}

/// Read the first worksheet of an `.xlsx` workbook; the first row is the header
pub fn read_xlsx(path: &Path) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DashboardError::EmptyWorkbook(path.display().to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;
    debug!("Reading sheet '{}' ({:?})", sheet_name, range.get_size());

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_name(idx, cell))
            .collect(),
        None => return Ok(DataFrame::empty()),
    };

    let mut columns: Vec<Vec<&Data>> = vec![Vec::new(); header.len()];
    for row in rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(row.get(idx).unwrap_or(&Data::Empty));
        }
    }

    let series: Vec<Series> = header
        .iter()
        .zip(columns.iter())
        .map(|(name, cells)| cells_to_series(name, cells))
        .collect();

    Ok(DataFrame::new(series)?)
}

fn header_name(idx: usize, cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => format!("Unnamed: {}", idx),
        other => other.to_string(),
    }
}

fn cell_to_f64(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::DateTime(dt) => Some(dt.as_f64()),
        _ => None,
    }
}

fn cell_to_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(dt.as_f64().to_string()),
    }
}

/// A column is numeric when every non-empty cell is a number
fn cells_to_series(name: &str, cells: &[&Data]) -> Series {
    let numeric = cells
        .iter()
        .all(|cell| matches!(cell, Data::Empty | Data::Error(_)) || cell_to_f64(cell).is_some());

    if numeric {
        let values: Vec<Option<f64>> = cells.iter().map(|cell| cell_to_f64(cell)).collect();
        Series::new(name, values)
    } else {
        let values: Vec<Option<String>> = cells.iter().map(|cell| cell_to_text(cell)).collect();
        Series::new(name, values)
    }
}

/// Check required columns and cast them to the types the pipeline expects
///
/// Text columns become `String`, metric columns `Float64`. A metric column
/// holding non-numeric text fails the load.
pub fn conform_schema(mut df: DataFrame) -> Result<DataFrame> {
    let present: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
    let missing: Vec<String> = required_columns()
        .filter(|name| !present.iter().any(|p| p == name))
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(DashboardError::MissingColumns(missing));
    }

    for name in TEXT_COLUMNS {
        let series = df.column(name)?.cast(&DataType::String)?;
        df.with_column(series)?;
    }

    for name in METRIC_COLUMNS {
        let series = df
            .column(name)?
            .strict_cast(&DataType::Float64)
            .map_err(|e| DashboardError::InvalidColumn {
                column: name.to_string(),
                reason: e.to_string(),
            })?;
        df.with_column(series)?;
    }

    Ok(df)
}

/// Memoized loader keyed by the source path as given
///
/// Entries live as long as the cache; there is no eviction, and a changed
/// file on disk is not re-read.
#[derive(Debug, Default)]
pub struct DatasetCache {
    tables: HashMap<PathBuf, DataFrame>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, loading it on first access
    pub fn load_or_fetch(&mut self, path: &Path) -> Result<DataFrame> {
        if let Some(df) = self.tables.get(path) {
            debug!("Dataset cache hit: {}", path.display());
            return Ok(df.clone());
        }

        let df = load_table(path)?;
        self.tables.insert(path.to_path_buf(), df.clone());
        Ok(df)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.tables.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
