//! # Well Thermometry Comparison
//!
//! A library for comparing field-measured and model-computed well
//! temperature profiles. An operator uploads two spreadsheet workbooks —
//! one sheet per well in each — and a host UI renders per-well
//! comparisons built here.
//!
//! ## Features
//!
//! - **Multi-format intake**: read Excel (`.xlsx`, `.xlsm`, `.xlam`,
//!   `.xlsb`, `.xls`, `.xla`) and OpenDocument (`.ods`) workbooks from
//!   files or uploaded byte buffers
//! - **Well reconciliation**: the valid well set is the sorted
//!   intersection of sheet names across the two workbooks; an empty
//!   intersection is a reported state, not a crash
//! - **Depth alignment**: computation rows are truncated to the
//!   elevation range actually covered by measurements
//! - **Schema checking**: mismatched date columns between the two
//!   workbooks fail loudly instead of pairing unrelated dates
//! - **Chart assembly**: a dual depth-vs-time contour heatmap and a
//!   single-date profile overlay, built as plotly figure objects with
//!   fixed, comparable scales
//! - **Content-addressed load cache**: repeated renders of the same
//!   uploads never re-read the files
//!
//! ## Boundaries
//!
//! File pickers, the well selector, tabs, and the date slider belong to
//! the host UI. This crate accepts their state ([`Selection`]) and hands
//! back figure objects and diagnostics; it keeps no interaction state of
//! its own.
mod chart;
mod dataset;
mod error;
mod session;
mod workbook;

#[cfg(test)]
pub(crate) mod test_support;

pub use chart::{
    dynamics_figure, profile_figure, ChartStyle, COMPUTED_PANEL_TITLE, COMPUTED_SERIES,
    DATES_AXIS_TITLE, ELEVATION_AXIS_TITLE, MEASURED_PANEL_TITLE, MEASURED_SERIES,
    TEMPERATURE_AXIS_TITLE,
};
pub use dataset::{DatasetError, WellDataset};
pub use error::ThermoWellsError;
pub use session::{render, Selection, SessionCache, WellView, NO_OVERLAP_NOTICE};
pub use workbook::{
    well_intersection, FormatError, LoadedWorkbooks, TableError, WellTable, Workbook,
    WorkbookError, WorkbookSource, ELEVATION_COLUMN,
};

use anyhow::Context;
use error::ResultMessage;
use std::path::Path;

/// Opens the measurement and computation workbooks from local paths and
/// loads every common well.
///
/// A convenience wrapper for hosts that hold files on disk; Shells with
/// in-memory uploads build [`WorkbookSource`]s themselves and call
/// [`LoadedWorkbooks::load`] or [`SessionCache::load`].
///
/// # Arguments
///
/// * `measurements` - Path to the field measurement workbook
/// * `computations` - Path to the model computation workbook
///
/// # Returns
///
/// * `Result<LoadedWorkbooks, ThermoWellsError>` - Loaded tables or the
///   first I/O or workbook error
pub fn load_workbook_pair<P, Q>(
    measurements: P,
    computations: Q,
) -> Result<LoadedWorkbooks, ThermoWellsError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let measurements = WorkbookSource::from_path(&measurements)
        .with_context(|| format!("Failed to read '{}'", measurements.as_ref().display()))?;
    let computations = WorkbookSource::from_path(&computations)
        .with_context(|| format!("Failed to read '{}'", computations.as_ref().display()))?;
    LoadedWorkbooks::load(&measurements, &computations)
        .map_err(ThermoWellsError::from)
        .with_prefix("Failed to load workbook pair")
}
