//! Per-sheet cleanup: header discovery, row trimming, header renaming, and
//! column pruning.

use tracing::debug;

use crate::header::locate_header;
use crate::matcher::FuzzyMatcher;
use crate::model::{Cell, Sheet};
use crate::vocabulary::Vocabulary;

/// Rows holding a cell with exactly this text are dropped as summary lines.
pub const TOTAL_MARKER: &str = "TOTAL";
/// Header-only placeholder column filled in manually downstream.
pub const GW_PER_UNIT_COLUMN: &str = "GW per unit";
/// Column carrying the token parsed from the source file name.
pub const SO_LO_COLUMN: &str = "So lo";

/// Result of normalizing one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetOutcome {
    /// No row holds a vocabulary term; the sheet must be dropped.
    Excluded,
    /// The sheet was trimmed down to its vocabulary columns.
    Included(SheetStats),
}

/// What the normalizer removed or renamed in an included sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetStats {
    /// Zero-based index the header row had before trimming.
    pub header_row: usize,
    pub leading_rows_dropped: usize,
    pub boilerplate_rows_dropped: usize,
    pub headers_renamed: usize,
    pub columns_pruned: usize,
}

/// Runs the cleanup steps on one sheet, in order: unmerge, header discovery,
/// leading-row removal, boilerplate-row removal, header renaming, and column
/// pruning. Stops after header discovery when no header exists.
pub fn normalize_sheet(sheet: &mut Sheet, matcher: &mut FuzzyMatcher) -> SheetOutcome {
    sheet.unmerge();

    let Some(header_row) = locate_header(sheet, matcher.vocabulary()) else {
        debug!(sheet = %sheet.name, "no vocabulary term found, excluding sheet");
        return SheetOutcome::Excluded;
    };

    let leading_rows_dropped = drop_leading_rows(sheet, header_row);
    let boilerplate_rows_dropped = drop_boilerplate_rows(sheet);
    let headers_renamed = rename_headers(sheet, matcher);
    let columns_pruned = prune_columns(sheet, matcher.vocabulary());

    let stats = SheetStats {
        header_row,
        leading_rows_dropped,
        boilerplate_rows_dropped,
        headers_renamed,
        columns_pruned,
    };
    debug!(sheet = %sheet.name, ?stats, "sheet normalized");
    SheetOutcome::Included(stats)
}

/// Deletes every row above `header_row` so the header becomes the first row.
pub fn drop_leading_rows(sheet: &mut Sheet, header_row: usize) -> usize {
    let count = header_row.min(sheet.height());
    if count > 0 {
        sheet.delete_rows(0, count);
    }
    count
}

/// Returns `true` for rows with no values or with a `TOTAL` cell.
pub fn is_boilerplate_row(row: &[Cell]) -> bool {
    row.iter().all(Cell::is_empty) || row.iter().any(|cell| cell.as_text() == Some(TOTAL_MARKER))
}

/// Deletes empty and `TOTAL` rows below the header row.
pub fn drop_boilerplate_rows(sheet: &mut Sheet) -> usize {
    let doomed: Vec<usize> = sheet
        .rows()
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, row)| is_boilerplate_row(row))
        .map(|(index, _)| index)
        .collect();

    for &index in doomed.iter().rev() {
        sheet.delete_rows(index, 1);
    }
    doomed.len()
}

/// Overwrites header labels with the canonical term the matcher resolves them
/// to. Unmatched, empty, and non-text headers are left untouched.
pub fn rename_headers(sheet: &mut Sheet, matcher: &mut FuzzyMatcher) -> usize {
    let mut renamed = 0;
    for col in 0..sheet.width() {
        let Some(label) = sheet.get(0, col).as_text().map(str::to_string) else {
            continue;
        };
        if label.is_empty() {
            continue;
        }
        let Some(term) = matcher.resolve(&label).map(str::to_string) else {
            continue;
        };
        if term != label {
            sheet.set(0, col, Cell::Text(term));
            renamed += 1;
        }
    }
    renamed
}

/// Deletes every column whose header is not literally a vocabulary term,
/// working right to left.
pub fn prune_columns(sheet: &mut Sheet, vocabulary: &Vocabulary) -> usize {
    let doomed: Vec<usize> = (0..sheet.width())
        .filter(|&col| !vocabulary.contains_cell(sheet.get(0, col)))
        .collect();

    for &col in doomed.iter().rev() {
        sheet.delete_column(col);
    }
    doomed.len()
}

/// Appends the `GW per unit` placeholder column and the `So lo` column, whose
/// data rows all hold `token`.
pub fn append_derived_columns(sheet: &mut Sheet, token: &str) {
    sheet.push_column(vec![Cell::text(GW_PER_UNIT_COLUMN)]);

    let data_rows = sheet.height().saturating_sub(1);
    let mut so_lo = Vec::with_capacity(data_rows + 1);
    so_lo.push(Cell::text(SO_LO_COLUMN));
    so_lo.extend(std::iter::repeat_n(Cell::text(token), data_rows));
    sheet.push_column(so_lo);
}

/// Text before the first `_` of a file name, or the whole name without one.
pub fn source_token(file_name: &str) -> &str {
    file_name
        .split_once('_')
        .map_or(file_name, |(token, _)| token)
}
