//! Shared fixtures for module tests: synthesizes real workbook bytes so
//! loader-level tests exercise the same path as operator uploads.
use crate::workbook::{LoadedWorkbooks, WorkbookSource};
use rust_xlsxwriter::Workbook as FixtureWorkbook;

/// One fixture sheet: a key column, elevations, and readings per date.
pub(crate) struct SheetSpec<'a> {
    pub name: &'a str,
    pub abs: &'a [f64],
    pub dates: &'a [&'a str],
    pub rows: &'a [&'a [f64]],
}

impl<'a> SheetSpec<'a> {
    pub(crate) fn new(
        name: &'a str,
        abs: &'a [f64],
        dates: &'a [&'a str],
        rows: &'a [&'a [f64]],
    ) -> SheetSpec<'a> {
        SheetSpec {
            name,
            abs,
            dates,
            rows,
        }
    }
}

/// Builds xlsx bytes holding the given sheets in the comparison layout.
pub(crate) fn workbook_bytes(sheets: &[SheetSpec]) -> Vec<u8> {
    let mut workbook = FixtureWorkbook::new();
    for spec in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(spec.name).unwrap();
        sheet.write_string(0, 0, "Depth").unwrap();
        sheet.write_string(0, 1, "Abs").unwrap();
        for (index, date) in spec.dates.iter().enumerate() {
            sheet.write_string(0, 2 + index as u16, *date).unwrap();
        }
        for (row, abs) in spec.abs.iter().enumerate() {
            let sheet_row = (row + 1) as u32;
            sheet.write_number(sheet_row, 0, (row + 1) as f64).unwrap();
            sheet.write_number(sheet_row, 1, *abs).unwrap();
            for (column, value) in spec.rows[row].iter().enumerate() {
                sheet
                    .write_number(sheet_row, 2 + column as u16, *value)
                    .unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Builds a (measurement, computation) source pair from fixture sheets.
pub(crate) fn sources_for(
    measurements: &[SheetSpec],
    computations: &[SheetSpec],
) -> (WorkbookSource, WorkbookSource) {
    (
        WorkbookSource::from_bytes("measurements.xlsx", workbook_bytes(measurements)),
        WorkbookSource::from_bytes("computations.xlsx", workbook_bytes(computations)),
    )
}

/// Loads a (measurement, computation) pair built from fixture sheets.
pub(crate) fn loaded_pair(
    measurements: &[SheetSpec],
    computations: &[SheetSpec],
) -> LoadedWorkbooks {
    let (measurements, computations) = sources_for(measurements, computations);
    LoadedWorkbooks::load(&measurements, &computations).unwrap()
}

/// The worked comparison scenario: well "W1" measured at Abs
/// [100, 105, 110] and computed at [95, 100, 105, 110, 115] for one
/// date column.
pub(crate) fn scenario() -> LoadedWorkbooks {
    loaded_pair(
        &[SheetSpec::new(
            "W1",
            &[100.0, 105.0, 110.0],
            &["2023-01"],
            &[&[10.0], &[12.0], &[9.0]],
        )],
        &[SheetSpec::new(
            "W1",
            &[95.0, 100.0, 105.0, 110.0, 115.0],
            &["2023-01"],
            &[&[20.0], &[10.0], &[12.0], &[9.0], &[5.0]],
        )],
    )
}
