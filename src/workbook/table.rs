use calamine::{Data, DataType, Range};
use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Header label of the elevation column shared by both workbooks.
pub const ELEVATION_COLUMN: &str = "Abs";

/// Day-first date labels ("31.01.2023") as they appear in field sheets.
static DAY_FIRST_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("Hardcoded pattern"));

/// Errors raised while shaping a sheet into a [`WellTable`].
#[derive(Error, Debug)]
pub enum TableError {
    /// Sheet exists but contains no data
    #[error("Empty sheet or missing data")]
    EmptySheet,

    /// Header row expected but not found
    #[error("Missing header row")]
    MissingHeaderRow,

    /// Column header is missing or invalid
    #[error("Missing column name at '{position}'")]
    MissingHeaderColumn { position: String },

    /// The sheet has no elevation column in the expected position
    #[error("Sheet '{sheet}' has no 'Abs' elevation column")]
    MissingElevationColumn { sheet: String },

    /// Invalid cell value that cannot be converted to the expected type
    #[error("Invalid cell value at '{position}': {message}")]
    InvalidCellValue { position: String, message: String },
}

/// One well's sheet shaped into the comparison layout: a row-key column,
/// an `Abs` elevation column, and numeric readings under date labels.
///
/// The same shape is produced for measurement and computation sheets; only
/// the interpretation of the row key differs (semantic index vs ignored
/// ordinal), and that interpretation lives entirely with the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct WellTable {
    /// Sheet (well) name this table was extracted from
    pub sheet: String,
    /// Column 0 rendered as text, one entry per data row
    pub row_keys: Vec<String>,
    /// Absolute elevation per data row, metres
    pub abs: Vec<f64>,
    /// Date labels, in sheet column order
    pub dates: Vec<String>,
    /// Readings per row, one value per date label; NaN marks a gap
    pub values: Vec<Vec<f64>>,
}

impl WellTable {
    /// Shapes a calamine cell range into a well table.
    ///
    /// The first row must be a header of the form `[key, Abs, date...]`;
    /// every following non-empty row contributes one data row. Reading
    /// cells that are empty or not numeric become NaN so the plotting
    /// layer renders them as gaps; a non-numeric `Abs` cell is an error
    /// because the depth alignment cannot be computed from it.
    ///
    /// # Arguments
    ///
    /// * `sheet` - Sheet name, used in messages
    /// * `range` - Used-cell range as returned by the workbook reader
    ///
    /// # Returns
    ///
    /// * `Result<WellTable, TableError>` - The shaped table or error
    pub fn parse(sheet: &str, range: &Range<Data>) -> Result<WellTable, TableError> {
        if range.is_empty() {
            return Err(TableError::EmptySheet);
        }
        let (row_offset, column_offset) = range
            .start()
            .map(|(row, column)| (row as usize, column as usize))
            .ok_or(TableError::EmptySheet)?;

        let mut rows = range.rows();
        let header = rows.next().ok_or(TableError::MissingHeaderRow)?;
        let labels = header_labels(header, row_offset, column_offset)?;
        if labels.iter().all(|label| label.is_empty()) {
            return Err(TableError::MissingHeaderRow);
        }
        if labels.len() < 2 || labels[1] != ELEVATION_COLUMN {
            return Err(TableError::MissingElevationColumn {
                sheet: sheet.to_owned(),
            });
        }
        let dates: Vec<String> = labels[2..].to_vec();

        let mut row_keys = Vec::new();
        let mut abs = Vec::new();
        let mut values = Vec::new();
        for (index, row) in rows.enumerate() {
            if row.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            let sheet_row = row_offset + index + 1;

            row_keys.push(row.first().map(render_cell).unwrap_or_default());

            let elevation = row
                .get(1)
                .and_then(|cell| cell.as_f64())
                .ok_or_else(|| TableError::InvalidCellValue {
                    position: cell_position(sheet_row, column_offset + 1),
                    message: "expected a numeric elevation".to_owned(),
                })?;
            abs.push(elevation);

            let readings = (0..dates.len())
                .map(|offset| {
                    row.get(2 + offset)
                        .and_then(|cell| cell.as_f64())
                        .unwrap_or(f64::NAN)
                })
                .collect();
            values.push(readings);
        }

        Ok(WellTable {
            sheet: sheet.to_owned(),
            row_keys,
            abs,
            dates,
            values,
        })
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.abs.is_empty()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.abs.len()
    }

    /// Minimum of the `Abs` column, if any rows exist.
    pub fn min_abs(&self) -> Option<f64> {
        self.abs
            .iter()
            .copied()
            .filter(|value| !value.is_nan())
            .reduce(f64::min)
    }

    /// One date column as a vector, in row order.
    pub fn column(&self, date_index: usize) -> Vec<f64> {
        self.values
            .iter()
            .map(|row| row.get(date_index).copied().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Renders header cells to labels for the comparison columns.
///
/// A run of trailing empty header cells is dropped; an empty header cell
/// before a named one is an error, mirroring how a ragged header would
/// silently shift every date pairing after it.
fn header_labels(
    header: &[Data],
    header_row: usize,
    column_offset: usize,
) -> Result<Vec<String>, TableError> {
    let labels: Vec<Option<String>> = header.iter().map(header_label).collect();
    let width = labels
        .iter()
        .rposition(Option::is_some)
        .map(|position| position + 1)
        .unwrap_or(0);
    labels
        .into_iter()
        .take(width)
        .enumerate()
        .map(|(column, label)| {
            label.ok_or_else(|| TableError::MissingHeaderColumn {
                position: cell_position(header_row, column_offset + column),
            })
        })
        .collect()
}

/// Renders one header cell to its label, normalizing date cells so the
/// Shell's date slider shows uniform `YYYY-MM-DD` values.
fn header_label(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(normalize_date_label(trimmed))
            }
        }
        Data::DateTime(value) => value.as_datetime().map(|datetime| {
            // Observation labels are calendar dates; keep the time only
            // when the sheet actually recorded one.
            if datetime.time() == NaiveTime::MIN {
                datetime.date().format("%Y-%m-%d").to_string()
            } else {
                datetime.format("%Y-%m-%d %H:%M").to_string()
            }
        }),
        Data::DateTimeIso(value) => Some(value.chars().take(10).collect()),
        other => Some(render_cell(other)),
    }
}

/// Renders any cell as display text; row keys and scalar labels share this.
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_owned(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 => (*value as i64).to_string(),
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|datetime| datetime.to_string())
            .unwrap_or_default(),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.to_owned(),
        Data::Error(error) => error.to_string(),
    }
}

/// Rewrites day-first labels ("31.01.2023") to ISO order; anything else
/// passes through untouched.
fn normalize_date_label(label: &str) -> String {
    match DAY_FIRST_DATE.captures(label) {
        Some(captures) => format!("{}-{:0>2}-{:0>2}", &captures[3], &captures[2], &captures[1]),
        None => label.to_owned(),
    }
}

/// Convert 0-based row & column indexes to an Excel-style cell position.
///
/// # Arguments
///
/// * `row` - The 0-based row index
/// * `column` - The 0-based column index
///
/// # Returns
///
/// * `String` - Excel-style cell position in upper case
pub(crate) fn cell_position(row: usize, column: usize) -> String {
    let row = (row + 1).to_string();
    let mut column: u32 = column as u32 + 1;
    let mut position = String::from("");
    while column > 0 {
        column -= 1;
        let digit = char::from_u32(65 + column % 26).expect("Hardcoded letters");
        column /= 26;
        position.insert(0, digit)
    }
    position.push_str(row.as_str());
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sheet_range(cells: &[(u32, u32, Data)]) -> Range<Data> {
        let max_row = cells.iter().map(|(row, _, _)| *row).max().unwrap_or(0);
        let max_column = cells.iter().map(|(_, column, _)| *column).max().unwrap_or(0);
        let mut range = Range::new((0, 0), (max_row, max_column));
        for (row, column, value) in cells {
            range.set_value((*row, *column), value.clone());
        }
        range
    }

    fn well_range() -> Range<Data> {
        sheet_range(&[
            (0, 0, Data::String("Depth".to_owned())),
            (0, 1, Data::String("Abs".to_owned())),
            (0, 2, Data::String("2023-01".to_owned())),
            (0, 3, Data::String("2023-02".to_owned())),
            (1, 0, Data::Int(1)),
            (1, 1, Data::Float(100.0)),
            (1, 2, Data::Float(10.0)),
            (1, 3, Data::Float(11.0)),
            (2, 0, Data::Int(2)),
            (2, 1, Data::Float(105.0)),
            (2, 2, Data::Float(12.0)),
            // (2, 3) left empty: a measurement gap
        ])
    }

    #[test]
    fn parse_shapes_rows_and_dates() {
        let table = WellTable::parse("W1", &well_range()).unwrap();

        assert_eq!(table.sheet, "W1");
        assert_eq!(table.row_keys, vec!["1", "2"]);
        assert_eq!(table.dates, vec!["2023-01", "2023-02"]);
        assert_eq!(table.abs, vec![100.0, 105.0]);
        assert_eq!(table.values[0], vec![10.0, 11.0]);
        assert_relative_eq!(table.values[1][0], 12.0);
        assert!(table.values[1][1].is_nan());
        assert_relative_eq!(table.min_abs().unwrap(), 100.0);
    }

    #[test]
    fn parse_skips_blank_rows() {
        let table = WellTable::parse(
            "W1",
            &sheet_range(&[
                (0, 0, Data::String("Depth".to_owned())),
                (0, 1, Data::String("Abs".to_owned())),
                (0, 2, Data::String("2023-01".to_owned())),
                (2, 0, Data::Int(1)),
                (2, 1, Data::Float(100.0)),
                (2, 2, Data::Float(1.5)),
            ]),
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.abs, vec![100.0]);
    }

    #[test]
    fn parse_rejects_missing_elevation_column() {
        let result = WellTable::parse(
            "W9",
            &sheet_range(&[
                (0, 0, Data::String("Depth".to_owned())),
                (0, 1, Data::String("Elevation".to_owned())),
                (1, 0, Data::Int(1)),
                (1, 1, Data::Float(100.0)),
            ]),
        );

        assert!(matches!(
            result,
            Err(TableError::MissingElevationColumn { sheet }) if sheet == "W9"
        ));
    }

    #[test]
    fn parse_reports_bad_elevation_with_position() {
        let result = WellTable::parse(
            "W1",
            &sheet_range(&[
                (0, 0, Data::String("Depth".to_owned())),
                (0, 1, Data::String("Abs".to_owned())),
                (0, 2, Data::String("2023-01".to_owned())),
                (1, 0, Data::Int(1)),
                (1, 1, Data::String("n/a".to_owned())),
                (1, 2, Data::Float(1.0)),
            ]),
        );

        match result {
            Err(TableError::InvalidCellValue { position, .. }) => assert_eq!(position, "B2"),
            other => panic!("expected InvalidCellValue, got {:?}", other),
        }
    }

    #[test]
    fn parse_rejects_empty_sheet() {
        assert!(matches!(
            WellTable::parse("W1", &Range::empty()),
            Err(TableError::EmptySheet)
        ));
    }

    #[test]
    fn header_dates_normalize() {
        let mut range = well_range();
        range.set_value((0, 2), Data::String("31.01.2023".to_owned()));
        let table = WellTable::parse("W1", &range).unwrap();
        assert_eq!(table.dates[0], "2023-01-31");
        assert_eq!(table.dates[1], "2023-02");
    }

    #[test]
    fn cell_positions_match_excel_references() {
        assert_eq!(cell_position(0, 0), "A1");
        assert_eq!(cell_position(1, 1), "B2");
        assert_eq!(cell_position(9, 25), "Z10");
        assert_eq!(cell_position(0, 26), "AA1");
    }
}
