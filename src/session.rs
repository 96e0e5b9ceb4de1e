//! # Session Module
//!
//! The boundary between the comparison core and the host Shell. The
//! Shell owns the interaction state (which files were uploaded, which
//! well and date are selected); this module owns loading those uploads
//! once per distinct content pair and turning a selection into the chart
//! artifacts the Shell renders. Rendering is a pure function of the
//! selection and the loaded tables — there is no mutable state inside a
//! render pass.
use crate::chart::{dynamics_figure, profile_figure, ChartStyle};
use crate::dataset::{DatasetError, WellDataset};
use crate::workbook::{LoadedWorkbooks, WorkbookError, WorkbookSource};
use plotly::Plot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Diagnostic the Shell shows instead of the well selector when the two
/// workbooks share no sheet names.
pub const NO_OVERLAP_NOTICE: &str =
    "The measurement and computation workbooks have no wells in common. Upload a matching pair of files.";

/// The Shell's current selection: a well and, once the operator touches
/// the date slider, a date label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected well identifier
    pub well: String,
    /// Selected date label; None until the slider is touched
    pub date: Option<String>,
}

impl Selection {
    /// Selection of a well with the date slider untouched.
    pub fn new(well: impl Into<String>) -> Selection {
        Selection {
            well: well.into(),
            date: None,
        }
    }

    /// Selection of a well and a specific date label.
    pub fn with_date(well: impl Into<String>, date: impl Into<String>) -> Selection {
        Selection {
            well: well.into(),
            date: Some(date.into()),
        }
    }
}

/// Everything the Shell renders for one selection.
#[derive(Serialize)]
pub struct WellView {
    /// Page heading for the selected well
    pub heading: String,
    /// Date labels for the Shell's slider, in sheet column order
    pub dates: Vec<String>,
    /// The date the profile was built for; None when the well has no
    /// date columns at all
    pub date: Option<String>,
    /// Dual heatmap figure
    pub dynamics: Plot,
    /// Profile overlay figure; None when there is no date to plot
    pub profile: Option<Plot>,
}

/// Builds the view for one selection from loaded tables.
///
/// Pure: same selection and tables, same artifacts. The profile date
/// defaults to the first date label when the Shell has not picked one
/// yet, matching a slider resting at its leftmost position.
///
/// # Arguments
///
/// * `selection` - The Shell's current well/date selection
/// * `loaded` - The session's loaded workbook pair
/// * `style` - Fixed presentation parameters
///
/// # Returns
///
/// * `Result<WellView, DatasetError>` - The artifacts, or the resolver
///   error for stale selections and degenerate wells
pub fn render(
    selection: &Selection,
    loaded: &LoadedWorkbooks,
    style: &ChartStyle,
) -> Result<WellView, DatasetError> {
    let dataset = WellDataset::resolve(loaded, &selection.well)?;
    let dynamics = dynamics_figure(&dataset, style);

    let date = selection
        .date
        .clone()
        .or_else(|| dataset.dates().first().cloned());
    let profile = match &date {
        Some(date) => Some(profile_figure(&dataset, date, style)?),
        None => None,
    };

    Ok(WellView {
        heading: format!("Well {}", dataset.well),
        dates: dataset.dates().to_vec(),
        date,
        dynamics,
        profile,
    })
}

/// Content-addressed memo of the load step.
///
/// Keys are the SHA-256 digests of the two uploads, so re-rendering with
/// the same files never re-reads them, while distinct uploads can never
/// collide on a key. Entries are shared out as `Arc`s; the tables behind
/// them are read-only for the rest of the session.
#[derive(Default)]
pub struct SessionCache {
    entries: HashMap<(String, String), Arc<LoadedWorkbooks>>,
}

impl SessionCache {
    /// Creates an empty cache.
    pub fn new() -> SessionCache {
        SessionCache::default()
    }

    /// Loads a workbook pair, reusing a previous load of identical content.
    ///
    /// # Arguments
    ///
    /// * `measurements` - Source of the field measurement workbook
    /// * `computations` - Source of the model computation workbook
    ///
    /// # Returns
    ///
    /// * `Result<Arc<LoadedWorkbooks>, WorkbookError>` - The shared load
    ///   or the error from reading either workbook
    pub fn load(
        &mut self,
        measurements: &WorkbookSource,
        computations: &WorkbookSource,
    ) -> Result<Arc<LoadedWorkbooks>, WorkbookError> {
        let key = (
            measurements.digest().to_owned(),
            computations.digest().to_owned(),
        );
        if let Some(loaded) = self.entries.get(&key) {
            debug!(
                measurements = measurements.name(),
                computations = computations.name(),
                "workbook pair served from cache"
            );
            return Ok(Arc::clone(loaded));
        }

        let loaded = Arc::new(LoadedWorkbooks::load(measurements, computations)?);
        self.entries.insert(key, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Number of distinct content pairs loaded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
