use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("Polars error: {0}")]
    Polars(String),

    #[error("Data file not found: {0}")]
    MissingFile(String),

    #[error("Unsupported data file format: {0}")]
    UnsupportedFormat(String),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid column {column}: {reason}")]
    InvalidColumn { column: String, reason: String },

    #[error("Workbook contains no sheets: {0}")]
    EmptyWorkbook(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<polars::error::PolarsError> for DashboardError {
    fn from(err: polars::error::PolarsError) -> Self {
        DashboardError::Polars(err.to_string())
    }
}

impl DashboardError {
    /// Whether the error originates from reading the source dataset
    /// rather than from caller input.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::Io(_)
                | DashboardError::Spreadsheet(_)
                | DashboardError::Polars(_)
                | DashboardError::MissingFile(_)
                | DashboardError::UnsupportedFormat(_)
                | DashboardError::MissingColumns(_)
                | DashboardError::InvalidColumn { .. }
                | DashboardError::EmptyWorkbook(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
