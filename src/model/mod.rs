use std::fmt;

use serde::{Deserialize, Serialize};

static EMPTY_CELL: Cell = Cell::Empty;

/// Represents a single scalar cell value in a sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Cell {
    /// No value.
    #[default]
    Empty,
    /// Plain string value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Date, time, or date-time as an Excel serial number.
    Date(f64),
    /// Boolean value.
    Bool(bool),
}

impl Cell {
    /// Returns `true` for empty cells and for text cells holding an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.is_empty(),
            Cell::Number(_) | Cell::Date(_) | Cell::Bool(_) => false,
        }
    }

    /// Returns the text content of the cell, if it holds text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Creates a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(value) => f.write_str(value),
            Cell::Number(value) | Cell::Date(value) => write!(f, "{value}"),
            Cell::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// Inclusive, zero-based rectangle of cells that the source workbook marks as
/// merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRange {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl MergedRange {
    pub fn new(first_row: usize, first_col: usize, last_row: usize, last_col: usize) -> Self {
        Self {
            first_row: first_row.min(last_row),
            first_col: first_col.min(last_col),
            last_row: first_row.max(last_row),
            last_col: first_col.max(last_col),
        }
    }
}

/// A named, rectangular grid of cells.
///
/// Rows and columns are addressed with zero-based indices; row `0` is the
/// first spreadsheet row. Every row always holds exactly [`Sheet::width`]
/// cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    rows: Vec<Vec<Cell>>,
    width: usize,
    merged: Vec<MergedRange>,
}

impl Sheet {
    /// Creates an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a sheet from row data, padding short rows with empty cells.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut sheet = Self {
            name: name.into(),
            rows,
            width,
            merged: Vec::new(),
        };
        for row in &mut sheet.rows {
            row.resize(width, Cell::Empty);
        }
        sheet
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Returns the cell at the given position, or an empty cell outside the grid.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Stores a value, growing the grid when the position lies outside it.
    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        if col >= self.width {
            self.width = col + 1;
            for cells in &mut self.rows {
                cells.resize(self.width, Cell::Empty);
            }
        }
        while self.rows.len() <= row {
            self.rows.push(vec![Cell::Empty; self.width]);
        }
        self.rows[row][col] = value;
    }

    /// The first row of the sheet.
    pub fn header(&self) -> Option<&[Cell]> {
        self.rows.first().map(Vec::as_slice)
    }

    pub fn merged_ranges(&self) -> &[MergedRange] {
        &self.merged
    }

    pub fn add_merged_range(&mut self, range: MergedRange) {
        self.merged.push(range);
    }

    /// Resolves every merged range by copying its top-left value into each
    /// cell it covers. Afterwards the sheet has no merged ranges.
    pub fn unmerge(&mut self) {
        let ranges = std::mem::take(&mut self.merged);
        for range in ranges {
            let anchor = self.get(range.first_row, range.first_col).clone();
            for row in range.first_row..=range.last_row {
                for col in range.first_col..=range.last_col {
                    self.set(row, col, anchor.clone());
                }
            }
        }
    }

    /// Deletes `count` rows starting at `start`, shifting later rows up.
    /// Must only be called once merged ranges have been resolved.
    pub fn delete_rows(&mut self, start: usize, count: usize) {
        debug_assert!(self.merged.is_empty(), "unmerge before deleting rows");
        let start = start.min(self.rows.len());
        let end = start.saturating_add(count).min(self.rows.len());
        self.rows.drain(start..end);
    }

    /// Deletes one column, shifting later columns left.
    /// Must only be called once merged ranges have been resolved.
    pub fn delete_column(&mut self, col: usize) {
        debug_assert!(self.merged.is_empty(), "unmerge before deleting columns");
        if col >= self.width {
            return;
        }
        for cells in &mut self.rows {
            cells.remove(col);
        }
        self.width -= 1;
    }

    /// Appends a column after the last one. `cells[i]` lands in row `i`;
    /// missing trailing values are left empty.
    pub fn push_column(&mut self, cells: Vec<Cell>) {
        let col = self.width;
        self.width += 1;
        for row in &mut self.rows {
            row.push(Cell::Empty);
        }
        for (row, value) in cells.into_iter().enumerate() {
            self.set(row, col, value);
        }
    }

    /// Text values of the header row, with non-text cells rendered as strings.
    pub fn header_labels(&self) -> Vec<String> {
        self.header()
            .map(|cells| cells.iter().map(Cell::to_string).collect())
            .unwrap_or_default()
    }
}

/// Ordered collection of sheets loaded from one spreadsheet file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_rows(rows: &[&[&str]]) -> Vec<Vec<Cell>> {
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|value| {
                        if value.is_empty() {
                            Cell::Empty
                        } else {
                            Cell::from(*value)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn from_rows_pads_to_rectangle() {
        let sheet = Sheet::from_rows("S", text_rows(&[&["a"], &["b", "c", "d"]]));
        assert_eq!(sheet.width(), 3);
        assert!(sheet.rows().iter().all(|row| row.len() == 3));
        assert_eq!(sheet.get(0, 2), &Cell::Empty);
        assert_eq!(sheet.get(10, 10), &Cell::Empty);
    }

    #[test]
    fn unmerge_copies_anchor_value_into_every_cell() {
        let mut sheet = Sheet::from_rows("S", text_rows(&[&["X", "y"], &["", "z"], &["", ""]]));
        sheet.add_merged_range(MergedRange::new(0, 0, 2, 0));
        sheet.unmerge();

        assert!(sheet.merged_ranges().is_empty());
        for row in 0..3 {
            assert_eq!(sheet.get(row, 0), &Cell::from("X"));
        }
        assert_eq!(sheet.get(1, 1), &Cell::from("z"));
    }

    #[test]
    fn delete_rows_and_columns_shift_remaining_cells() {
        let mut sheet = Sheet::from_rows(
            "S",
            text_rows(&[&["a", "b", "c"], &["d", "e", "f"], &["g", "h", "i"]]),
        );
        sheet.delete_rows(0, 1);
        sheet.delete_column(1);

        assert_eq!(sheet.height(), 2);
        assert_eq!(sheet.width(), 2);
        assert_eq!(sheet.header_labels(), vec!["d", "f"]);
        assert_eq!(sheet.get(1, 1), &Cell::from("i"));
    }

    #[test]
    fn push_column_extends_width_and_fills_rows() {
        let mut sheet = Sheet::from_rows("S", text_rows(&[&["a"], &["b"], &["c"]]));
        sheet.push_column(vec![Cell::from("h"), Cell::from("v")]);

        assert_eq!(sheet.width(), 2);
        assert_eq!(sheet.get(0, 1), &Cell::from("h"));
        assert_eq!(sheet.get(1, 1), &Cell::from("v"));
        assert_eq!(sheet.get(2, 1), &Cell::Empty);
    }

    #[test]
    fn empty_text_counts_as_empty() {
        assert!(Cell::Empty.is_empty());
        assert!(Cell::from("").is_empty());
        assert!(!Cell::from(" ").is_empty());
        assert!(!Cell::Number(0.0).is_empty());
    }
}
