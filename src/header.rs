use crate::model::Sheet;
use crate::vocabulary::Vocabulary;

/// Returns the zero-based index of the first row holding a cell whose text is
/// literally a vocabulary term.
///
/// Matching is whole-cell and case-sensitive: a term embedded in longer text
/// does not count, and neither do numeric cells.
pub fn locate_header(sheet: &Sheet, vocabulary: &Vocabulary) -> Option<usize> {
    sheet
        .rows()
        .iter()
        .position(|row| row.iter().any(|cell| vocabulary.contains_cell(cell)))
}
