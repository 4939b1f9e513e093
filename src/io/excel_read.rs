use std::path::Path;

use calamine::{Data, Dimensions, Range, Reader, Xlsx, open_workbook};

use crate::error::Result;
use crate::model::{Cell, MergedRange, Sheet, Workbook};

/// Reads every worksheet of an `.xlsx` file, keeping cells at their absolute
/// positions and recording merged ranges for later resolution.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let merged = workbook
            .worksheet_merge_cells(&name)
            .transpose()?
            .unwrap_or_default();
        sheets.push(build_sheet(name, &range, &merged));
    }

    Ok(Workbook::new(sheets))
}

fn build_sheet(name: String, range: &Range<Data>, merged: &[Dimensions]) -> Sheet {
    let mut sheet = Sheet::new(name);

    if let Some((start_row, start_col)) = range.start() {
        for (row, col, value) in range.used_cells() {
            let cell = data_to_cell(value);
            if cell.is_empty() {
                continue;
            }
            sheet.set(start_row as usize + row, start_col as usize + col, cell);
        }
    }

    for dimensions in merged {
        sheet.add_merged_range(MergedRange::new(
            dimensions.start.0 as usize,
            dimensions.start.1 as usize,
            dimensions.end.0 as usize,
            dimensions.end.1 as usize,
        ));
    }

    sheet
}

fn data_to_cell(value: &Data) -> Cell {
    match value {
        Data::Empty => Cell::Empty,
        Data::String(value) => Cell::Text(value.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => Cell::Date(value.as_f64()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => Cell::Text(value.clone()),
        Data::Error(error) => Cell::Text(error.to_string()),
    }
}
