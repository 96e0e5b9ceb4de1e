//! # Well Dataset Resolver
//!
//! For one selected well, pairs the measurement table with the computation
//! table and aligns them on the shared depth domain: `min_depth` is the
//! minimum of the measurement `Abs` column, and the truncation mask keeps
//! exactly the computation rows whose `Abs` is at or above it. Both views
//! (the dynamics heatmap and the profile overlay) consume the same mask,
//! which keeps the two displays depth-consistent.
use crate::workbook::{LoadedWorkbooks, WellTable};
use thiserror::Error;
use tracing::debug;

/// Errors raised while resolving a well's dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Selected identifier is not in the valid well set; only reachable
    /// through a stale selection, but checked rather than assumed
    #[error("Unknown well '{well}'")]
    UnknownWell { well: String },

    /// The well's measurement table has no rows, so the depth alignment
    /// is undefined
    #[error("Well '{well}' has no measurement rows")]
    EmptyMeasurementSet { well: String },

    /// The two tables disagree on the date column set; positional pairing
    /// would silently compare unrelated dates
    #[error("Well '{well}' date columns differ between measurements {measured:?} and computations {computed:?}")]
    SchemaMismatch {
        well: String,
        measured: Vec<String>,
        computed: Vec<String>,
    },

    /// Selected date label is not a column of the well's tables
    #[error("Unknown date column '{date}' for well '{well}'")]
    UnknownDateColumn { well: String, date: String },
}

/// A well's aligned pair of tables plus the derived depth domain.
#[derive(Debug)]
pub struct WellDataset {
    /// Well identifier (sheet name)
    pub well: String,
    /// Field measurement table, row key semantic
    pub measurements: WellTable,
    /// Model computation table, ordinal rows
    pub computations: WellTable,
    /// Minimum of the measurement `Abs` column
    pub min_depth: f64,
    /// Positions of computation rows with `Abs >= min_depth`
    pub mask: Vec<usize>,
}

impl WellDataset {
    /// Resolves one well against the loaded workbooks.
    ///
    /// # Arguments
    ///
    /// * `loaded` - The session's loaded workbook pair
    /// * `well` - Well identifier; must be in the valid well set
    ///
    /// # Returns
    ///
    /// * `Result<WellDataset, DatasetError>` - Aligned dataset or error
    ///
    /// # Errors
    ///
    /// [`DatasetError::UnknownWell`] for identifiers outside the valid
    /// set, [`DatasetError::EmptyMeasurementSet`] when no measurement
    /// rows exist, and [`DatasetError::SchemaMismatch`] when the date
    /// column sets differ between the two tables.
    pub fn resolve(loaded: &LoadedWorkbooks, well: &str) -> Result<WellDataset, DatasetError> {
        let measurements = loaded
            .measurement(well)
            .ok_or_else(|| DatasetError::UnknownWell {
                well: well.to_owned(),
            })?;
        let computations = loaded
            .computation(well)
            .ok_or_else(|| DatasetError::UnknownWell {
                well: well.to_owned(),
            })?;

        if measurements.dates != computations.dates {
            return Err(DatasetError::SchemaMismatch {
                well: well.to_owned(),
                measured: measurements.dates.clone(),
                computed: computations.dates.clone(),
            });
        }

        let min_depth = measurements
            .min_abs()
            .ok_or_else(|| DatasetError::EmptyMeasurementSet {
                well: well.to_owned(),
            })?;

        // Boundary rows with Abs exactly at min_depth stay in.
        let mask: Vec<usize> = computations
            .abs
            .iter()
            .enumerate()
            .filter(|(_, abs)| **abs >= min_depth)
            .map(|(position, _)| position)
            .collect();
        debug!(
            well,
            min_depth,
            masked_rows = mask.len(),
            total_rows = computations.len(),
            "well dataset resolved"
        );

        Ok(WellDataset {
            well: well.to_owned(),
            measurements: measurements.clone(),
            computations: computations.clone(),
            min_depth,
            mask,
        })
    }

    /// Date labels shared by both tables, in sheet column order.
    pub fn dates(&self) -> &[String] {
        &self.measurements.dates
    }

    /// Position of a date label in the shared column domain.
    ///
    /// # Errors
    ///
    /// [`DatasetError::UnknownDateColumn`] when the label is stale.
    pub fn date_index(&self, date: &str) -> Result<usize, DatasetError> {
        self.dates()
            .iter()
            .position(|label| label == date)
            .ok_or_else(|| DatasetError::UnknownDateColumn {
                well: self.well.clone(),
                date: date.to_owned(),
            })
    }

    /// Computation `Abs` values at the truncation mask.
    pub fn masked_abs(&self) -> Vec<f64> {
        self.mask
            .iter()
            .map(|&position| self.computations.abs[position])
            .collect()
    }

    /// Computation reading rows at the truncation mask, one row per
    /// masked elevation, one value per date label.
    pub fn masked_values(&self) -> Vec<Vec<f64>> {
        self.mask
            .iter()
            .map(|&position| self.computations.values[position].clone())
            .collect()
    }

    /// One computation date column at the truncation mask.
    pub fn masked_column(&self, date_index: usize) -> Vec<f64> {
        self.mask
            .iter()
            .map(|&position| {
                self.computations.values[position]
                    .get(date_index)
                    .copied()
                    .unwrap_or(f64::NAN)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loaded_pair, scenario, SheetSpec};
    use approx::assert_relative_eq;

    #[test]
    fn resolve_derives_min_depth_and_mask() {
        let dataset = WellDataset::resolve(&scenario(), "W1").unwrap();

        assert_relative_eq!(dataset.min_depth, 100.0);
        // The Abs == min_depth row at position 1 is included, 95.0 is not.
        assert_eq!(dataset.mask, vec![1, 2, 3, 4]);
        assert_eq!(dataset.masked_abs(), vec![100.0, 105.0, 110.0, 115.0]);
        assert_eq!(dataset.masked_column(0), vec![10.0, 12.0, 9.0, 5.0]);
        assert_eq!(dataset.measurements.column(0), vec![10.0, 12.0, 9.0]);
    }

    #[test]
    fn resolve_rejects_unknown_well() {
        assert!(matches!(
            WellDataset::resolve(&scenario(), "W2"),
            Err(DatasetError::UnknownWell { well }) if well == "W2"
        ));
    }

    #[test]
    fn resolve_rejects_empty_measurements() {
        let loaded = loaded_pair(
            &[SheetSpec::new("W1", &[], &["2023-01"], &[])],
            &[SheetSpec::new("W1", &[100.0], &["2023-01"], &[&[1.0]])],
        );

        assert!(matches!(
            WellDataset::resolve(&loaded, "W1"),
            Err(DatasetError::EmptyMeasurementSet { well }) if well == "W1"
        ));
    }

    #[test]
    fn resolve_rejects_mismatched_date_columns() {
        let loaded = loaded_pair(
            &[SheetSpec::new("W1", &[100.0], &["2023-01"], &[&[1.0]])],
            &[SheetSpec::new("W1", &[100.0], &["2023-02"], &[&[1.0]])],
        );

        match WellDataset::resolve(&loaded, "W1") {
            Err(DatasetError::SchemaMismatch {
                measured, computed, ..
            }) => {
                assert_eq!(measured, vec!["2023-01"]);
                assert_eq!(computed, vec!["2023-02"]);
            }
            other => panic!("expected SchemaMismatch, got {:?}", other),
        }
    }

    #[test]
    fn date_index_checks_staleness() {
        let dataset = WellDataset::resolve(&scenario(), "W1").unwrap();

        assert_eq!(dataset.date_index("2023-01").unwrap(), 0);
        assert!(matches!(
            dataset.date_index("2019-12"),
            Err(DatasetError::UnknownDateColumn { date, .. }) if date == "2019-12"
        ));
    }

    #[test]
    fn mask_keeps_everything_when_measurements_reach_deeper() {
        let loaded = loaded_pair(
            &[SheetSpec::new("W1", &[50.0, 110.0], &["2023-01"], &[&[1.0], &[2.0]])],
            &[SheetSpec::new("W1", &[100.0, 105.0], &["2023-01"], &[&[3.0], &[4.0]])],
        );

        let dataset = WellDataset::resolve(&loaded, "W1").unwrap();
        assert_eq!(dataset.mask, vec![0, 1]);
    }
}
