//! # Workbook Loading Module
//!
//! Opens the two operator-supplied spreadsheet workbooks, lists their
//! sheets, computes the set of wells present in both, and extracts one
//! [`WellTable`] per well and workbook. Format support matches what the
//! comparison tooling encounters in the field: Excel (`.xlsx`, `.xlsm`,
//! `.xlam`, `.xlsb`, `.xls`, `.xla`) and OpenDocument (`.ods`) files,
//! all read through the calamine library.
use calamine::{Data, Ods, OdsError, Range, Reader, Xls, XlsError, Xlsb, XlsbError, Xlsx, XlsxError};
use std::collections::{HashMap, HashSet};
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

pub mod source;
pub mod table;

pub use source::WorkbookSource;
pub use table::{TableError, WellTable, ELEVATION_COLUMN};

/// Seekable reader over a buffered workbook source
pub type SourceReader = Cursor<Arc<[u8]>>;

/// Errors raised while opening workbooks and extracting well tables.
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// Malformed or unsupported spreadsheet container; the upload must be replaced
    #[error("Unreadable workbook '{name}': {source}")]
    UnreadableWorkbook {
        name: String,
        #[source]
        source: FormatError,
    },

    /// Unsupported or unrecognized file extension
    #[error("Cannot detect workbook format for '{name}'")]
    UnknownFormat { name: String },

    /// Sheet-to-table shaping failed
    #[error("{0}")]
    Table(#[from] TableError),
}

/// Per-format read errors, aggregated under [`WorkbookError::UnreadableWorkbook`].
#[derive(Error, Debug)]
pub enum FormatError {
    /// Error in Excel 2007+ format (.xlsx, .xlsm, .xlam)
    #[error("Invalid xlsx file format: {0}")]
    Xlsx(#[from] XlsxError),

    /// Error in Excel Binary format (.xlsb)
    #[error("Invalid xlsb file format: {0}")]
    Xlsb(#[from] XlsbError),

    /// Error in legacy Excel format (.xls, .xla)
    #[error("Invalid xls file format: {0}")]
    Xls(#[from] XlsError),

    /// Error in OpenDocument format (.ods)
    #[error("Invalid ods file format: {0}")]
    Ods(#[from] OdsError),
}

/// Wrapper enum over the calamine readers for the supported formats.
pub enum Workbook {
    /// Excel 2007+ format reader (.xlsx, .xlsm, .xlam)
    Xlsx(Xlsx<SourceReader>),
    /// Excel Binary format reader (.xlsb)
    Xlsb(Xlsb<SourceReader>),
    /// Legacy Excel format reader (.xls, .xla)
    Xls(Xls<SourceReader>),
    /// OpenDocument format reader (.ods)
    Ods(Ods<SourceReader>),
}

impl Workbook {
    /// Opens a workbook source with the reader its extension calls for.
    ///
    /// # Arguments
    ///
    /// * `source` - Buffered workbook source
    ///
    /// # Returns
    ///
    /// * `Result<Workbook, WorkbookError>` - The appropriate reader or error
    ///
    /// # Errors
    ///
    /// Returns [`WorkbookError::UnknownFormat`] for unrecognized extensions
    /// and [`WorkbookError::UnreadableWorkbook`] when the container cannot
    /// be parsed.
    pub fn open(source: &WorkbookSource) -> Result<Workbook, WorkbookError> {
        match source.extension().as_deref() {
            Some("xlsx") | Some("xlsm") | Some("xlam") => Xlsx::new(source.reader())
                .map(Self::Xlsx)
                .map_err(|error| unreadable(source.name(), error)),
            Some("xlsb") => Xlsb::new(source.reader())
                .map(Self::Xlsb)
                .map_err(|error| unreadable(source.name(), error)),
            Some("xls") | Some("xla") => Xls::new(source.reader())
                .map(Self::Xls)
                .map_err(|error| unreadable(source.name(), error)),
            Some("ods") => Ods::new(source.reader())
                .map(Self::Ods)
                .map_err(|error| unreadable(source.name(), error)),
            _ => Err(WorkbookError::UnknownFormat {
                name: source.name().to_owned(),
            }),
        }
    }

    /// Returns the names of all sheets in the workbook, in file order.
    pub fn sheet_names(&self) -> Vec<String> {
        match self {
            Self::Xlsx(xlsx) => xlsx.sheet_names(),
            Self::Xlsb(xlsb) => xlsb.sheet_names(),
            Self::Xls(xls) => xls.sheet_names(),
            Self::Ods(ods) => ods.sheet_names(),
        }
    }

    /// Reads the used-cell range of one sheet.
    fn worksheet_range(&mut self, name: &str, sheet: &str) -> Result<Range<Data>, WorkbookError> {
        match self {
            Self::Xlsx(xlsx) => xlsx
                .worksheet_range(sheet)
                .map_err(|error| unreadable(name, error)),
            Self::Xlsb(xlsb) => xlsb
                .worksheet_range(sheet)
                .map_err(|error| unreadable(name, error)),
            Self::Xls(xls) => xls
                .worksheet_range(sheet)
                .map_err(|error| unreadable(name, error)),
            Self::Ods(ods) => ods
                .worksheet_range(sheet)
                .map_err(|error| unreadable(name, error)),
        }
    }

    /// Extracts one sheet as a [`WellTable`].
    ///
    /// # Arguments
    ///
    /// * `name` - Workbook display name, used in messages
    /// * `sheet` - Sheet (well) name to extract
    pub fn open_table(&mut self, name: &str, sheet: &str) -> Result<WellTable, WorkbookError> {
        let range = self.worksheet_range(name, sheet)?;
        Ok(WellTable::parse(sheet, &range)?)
    }
}

fn unreadable(name: &str, error: impl Into<FormatError>) -> WorkbookError {
    WorkbookError::UnreadableWorkbook {
        name: name.to_owned(),
        source: error.into(),
    }
}

/// Set intersection of two sheet-name lists, sorted ascending.
///
/// The sort replaces the iteration order of the underlying set, which is
/// not otherwise stable across runs, so selectors built from this list
/// always present wells in the same order.
pub fn well_intersection(first: &[String], second: &[String]) -> Vec<String> {
    let second: HashSet<&String> = second.iter().collect();
    let mut wells: Vec<String> = first
        .iter()
        .filter(|name| second.contains(name))
        .cloned()
        .collect();
    wells.sort();
    wells.dedup();
    wells
}

/// The fully loaded session input: the sorted valid well set and one
/// measurement and computation table per well.
///
/// An empty well set is a distinct state, not an error; callers surface
/// it through [`LoadedWorkbooks::has_overlap`].
#[derive(Debug)]
pub struct LoadedWorkbooks {
    /// Content digests of the (measurement, computation) sources
    digests: (String, String),
    /// Valid well set, sorted ascending
    wells: Vec<String>,
    /// Measurement table per well
    measurements: HashMap<String, WellTable>,
    /// Computation table per well
    computations: HashMap<String, WellTable>,
}

impl LoadedWorkbooks {
    /// Opens both workbooks and extracts the tables of every common well.
    ///
    /// # Arguments
    ///
    /// * `measurements` - Source of the field measurement workbook
    /// * `computations` - Source of the model computation workbook
    ///
    /// # Returns
    ///
    /// * `Result<LoadedWorkbooks, WorkbookError>` - Loaded tables or the
    ///   first error hit while reading either workbook
    pub fn load(
        measurements: &WorkbookSource,
        computations: &WorkbookSource,
    ) -> Result<LoadedWorkbooks, WorkbookError> {
        let mut measurement_workbook = Workbook::open(measurements)?;
        let mut computation_workbook = Workbook::open(computations)?;

        let wells = well_intersection(
            &measurement_workbook.sheet_names(),
            &computation_workbook.sheet_names(),
        );
        if wells.is_empty() {
            warn!(
                measurements = measurements.name(),
                computations = computations.name(),
                "workbooks share no wells"
            );
        }

        let mut measurement_tables = HashMap::new();
        let mut computation_tables = HashMap::new();
        for well in &wells {
            measurement_tables.insert(
                well.clone(),
                measurement_workbook.open_table(measurements.name(), well)?,
            );
            computation_tables.insert(
                well.clone(),
                computation_workbook.open_table(computations.name(), well)?,
            );
        }
        info!(wells = wells.len(), "workbooks loaded");

        Ok(LoadedWorkbooks {
            digests: (
                measurements.digest().to_owned(),
                computations.digest().to_owned(),
            ),
            wells,
            measurements: measurement_tables,
            computations: computation_tables,
        })
    }

    /// Content digests of the (measurement, computation) sources this
    /// load was built from.
    pub fn digests(&self) -> (&str, &str) {
        (&self.digests.0, &self.digests.1)
    }

    /// The valid well set, sorted ascending.
    pub fn wells(&self) -> &[String] {
        &self.wells
    }

    /// True when at least one well is present in both workbooks.
    pub fn has_overlap(&self) -> bool {
        !self.wells.is_empty()
    }

    /// Measurement table of a well, if the well is in the valid set.
    pub fn measurement(&self, well: &str) -> Option<&WellTable> {
        self.measurements.get(well)
    }

    /// Computation table of a well, if the well is in the valid set.
    pub fn computation(&self, well: &str) -> Option<&WellTable> {
        self.computations.get(well)
    }
}
