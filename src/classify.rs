use tracing::{debug, instrument};

use crate::matcher::FuzzyMatcher;
use crate::model::Workbook;
use crate::normalize::{SheetOutcome, append_derived_columns, normalize_sheet, source_token};

/// Workbook-level verdict produced by [`classify_workbook`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Names of the sheets left in the workbook, in their original order.
    pub surviving: Vec<String>,
    /// Names of the sheets removed for lacking a header row.
    pub excluded: Vec<String>,
}

impl Classification {
    /// A workbook is accepted when at least one sheet survives.
    pub fn is_accepted(&self) -> bool {
        !self.surviving.is_empty()
    }
}

/// Normalizes every sheet, removes the ones without a header, and appends the
/// derived columns to the survivors.
///
/// Every sheet is evaluated before any is removed, so removal never disturbs
/// the evaluation of another sheet. When no sheet survives the workbook is
/// left without sheets and the caller is expected to fall back to the source
/// file.
#[instrument(level = "debug", skip_all, fields(file = file_name))]
pub fn classify_workbook(
    workbook: &mut Workbook,
    file_name: &str,
    matcher: &mut FuzzyMatcher,
) -> Classification {
    let outcomes: Vec<SheetOutcome> = workbook
        .sheets
        .iter_mut()
        .map(|sheet| normalize_sheet(sheet, matcher))
        .collect();

    let excluded: Vec<String> = workbook
        .sheets
        .iter()
        .zip(&outcomes)
        .filter(|(_, outcome)| matches!(outcome, SheetOutcome::Excluded))
        .map(|(sheet, _)| sheet.name.clone())
        .collect();

    let mut keep = outcomes
        .iter()
        .map(|outcome| matches!(outcome, SheetOutcome::Included(_)));
    workbook
        .sheets
        .retain(|_| keep.next().unwrap_or(false));

    let token = source_token(file_name);
    for sheet in &mut workbook.sheets {
        append_derived_columns(sheet, token);
    }

    let classification = Classification {
        surviving: workbook.sheet_names(),
        excluded,
    };
    debug!(
        surviving = classification.surviving.len(),
        excluded = classification.excluded.len(),
        "workbook classified"
    );
    classification
}
