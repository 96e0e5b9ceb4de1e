use thiserror::Error;

/// Main error type for the well comparison crate.
/// Aggregates errors from the standard library, dependencies, and internal modules.
#[derive(Error, Debug)]
pub enum ThermoWellsError {
    #[error("{0}")]
    WithContextError(String),

    #[error("{0}")]
    AnyhowError(#[from] anyhow::Error),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Workbook module errors
    #[error("{0}")]
    WorkbookError(#[from] crate::workbook::WorkbookError),

    #[error("{0}")]
    TableError(#[from] crate::workbook::TableError),

    // Dataset module errors
    #[error("{0}")]
    DatasetError(#[from] crate::dataset::DatasetError),
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, ThermoWellsError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| ThermoWellsError::WithContextError(format!("{}: {}", message, e)))
    }
}
