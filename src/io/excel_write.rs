use std::path::Path;

use rust_xlsxwriter::{ColNum, Format, RowNum, Worksheet};

use crate::error::{Result, ToolError};
use crate::model::{Cell, Sheet, Workbook};

/// Font applied to every written cell.
pub const FONT_NAME: &str = "Times New Roman";
pub const FONT_SIZE: f64 = 10.0;
/// Height of every written row, in points.
pub const ROW_HEIGHT: f64 = 15.0;
/// Width of every column, in characters, unless it is a description column.
pub const DEFAULT_COLUMN_WIDTH: f64 = 15.0;

const WIDE_COLUMNS: &[&str] = &["Description", "Descriptions"];

/// Number formats for date cells, picked by whether the serial has a day part,
/// a time-of-day part, or both.
pub const DATE_FORMAT: &str = "yyyy-mm-dd";
pub const TIME_FORMAT: &str = "hh:mm:ss";
pub const DATE_TIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes the normalized workbook to the given path with the house style:
/// uniform font, fixed row height, and fixed column widths except for
/// description columns, which grow to fit their longest text.
pub fn write_workbook(path: &Path, workbook: &Workbook) -> Result<()> {
    if workbook.sheets.is_empty() {
        return Err(ToolError::InvalidWorkbook(
            "cannot write a workbook without sheets".into(),
        ));
    }

    let mut workbook_writer = rust_xlsxwriter::Workbook::new();
    let format = Format::new()
        .set_font_name(FONT_NAME)
        .set_font_size(FONT_SIZE);

    for sheet in &workbook.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_cells(worksheet, sheet, &format)?;

        for (col_idx, width) in column_widths(sheet).into_iter().enumerate() {
            worksheet.set_column_width(col_num(col_idx)?, width)?;
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}

/// Column widths, in characters, used when writing `sheet`.
pub fn column_widths(sheet: &Sheet) -> Vec<f64> {
    (0..sheet.width())
        .map(|col| {
            let header = sheet.get(0, col);
            let is_wide = header
                .as_text()
                .is_some_and(|label| WIDE_COLUMNS.contains(&label));
            if !is_wide {
                return DEFAULT_COLUMN_WIDTH;
            }
            let longest = sheet
                .rows()
                .iter()
                .filter_map(|row| row[col].as_text())
                .map(|text| text.chars().count())
                .max()
                .unwrap_or(0);
            DEFAULT_COLUMN_WIDTH.max((longest as f64 + 2.0) * 1.1)
        })
        .collect()
}

fn write_cells(worksheet: &mut Worksheet, sheet: &Sheet, format: &Format) -> Result<()> {
    for (row_idx, cells) in sheet.rows().iter().enumerate() {
        let row = row_num(row_idx)?;
        worksheet.set_row_height(row, ROW_HEIGHT)?;

        for (col_idx, cell) in cells.iter().enumerate() {
            let col = col_num(col_idx)?;
            match cell {
                Cell::Empty => {
                    worksheet.write_blank(row, col, format)?;
                }
                Cell::Text(value) => {
                    worksheet.write_string_with_format(row, col, value, format)?;
                }
                Cell::Number(value) => {
                    worksheet.write_number_with_format(row, col, *value, format)?;
                }
                Cell::Date(serial) => {
                    let date_format = format.clone().set_num_format(date_pattern(*serial));
                    worksheet.write_number_with_format(row, col, *serial, &date_format)?;
                }
                Cell::Bool(value) => {
                    worksheet.write_boolean_with_format(row, col, *value, format)?;
                }
            }
        }
    }
    Ok(())
}

/// Number format that shows every component an Excel serial carries.
pub fn date_pattern(serial: f64) -> &'static str {
    let has_date = serial.floor() > 0.0;
    let has_time = serial.fract().abs() > 0.0001;
    match (has_date, has_time) {
        (true, true) => DATE_TIME_FORMAT,
        (false, true) => TIME_FORMAT,
        _ => DATE_FORMAT,
    }
}

fn row_num(index: usize) -> Result<RowNum> {
    RowNum::try_from(index)
        .map_err(|_| ToolError::InvalidWorkbook(format!("row {index} is out of range")))
}

fn col_num(index: usize) -> Result<ColNum> {
    ColNum::try_from(index)
        .map_err(|_| ToolError::InvalidWorkbook(format!("column {index} is out of range")))
}
