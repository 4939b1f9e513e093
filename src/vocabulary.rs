use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::Cell;

/// Column names recognised when no configuration overrides them.
pub const DEFAULT_TERMS: &[&str] = &[
    "SKU",
    "Description",
    "Descriptions",
    "Material",
    "Quantity",
    "Qty",
    "G/W(KG)",
    "Gross Weight",
    "SKU No.",
];

/// Ordered set of canonical column names.
///
/// Duplicates are dropped on construction, keeping the first occurrence, so
/// the order of [`Vocabulary::terms`] decides which entry wins a tie during
/// fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    lookup: HashSet<String>,
}

impl Vocabulary {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered = Vec::new();
        let mut lookup = HashSet::new();
        for term in terms {
            let term = term.into();
            if lookup.insert(term.clone()) {
                ordered.push(term);
            }
        }
        Self {
            terms: ordered,
            lookup,
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, term: &str) -> bool {
        self.lookup.contains(term)
    }

    /// Returns `true` when the cell holds text that is literally a vocabulary term.
    pub fn contains_cell(&self, cell: &Cell) -> bool {
        cell.as_text().is_some_and(|text| self.contains(text))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_TERMS.iter().copied())
    }
}

impl From<Vec<String>> for Vocabulary {
    fn from(terms: Vec<String>) -> Self {
        Self::new(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}
