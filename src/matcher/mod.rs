//! Fuzzy reconciliation of observed column labels against the vocabulary.

pub mod similarity;

use std::collections::HashMap;

use tracing::debug;

use crate::vocabulary::Vocabulary;

/// Minimum score a label needs to be renamed when no configuration overrides it.
pub const DEFAULT_THRESHOLD: u8 = 90;

/// Best vocabulary candidate for a label, regardless of the acceptance threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub term: String,
    pub score: u8,
}

/// Remembers how each observed label was resolved during a run.
///
/// `Some(term)` records an accepted match and `None` a rejected one; both are
/// final for the lifetime of the cache.
#[derive(Debug, Clone, Default)]
pub struct MatchCache {
    entries: HashMap<String, Option<String>>,
}

impl MatchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded decision, or `None` when the label has not been seen.
    pub fn get(&self, label: &str) -> Option<Option<&str>> {
        self.entries.get(label).map(Option::as_deref)
    }

    pub fn insert(&mut self, label: String, resolution: Option<String>) {
        self.entries.insert(label, resolution);
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps column labels to canonical vocabulary terms.
///
/// A single matcher is meant to live for a whole folder run: its cache makes
/// the first resolution of a label authoritative for every later sheet and
/// workbook.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    vocabulary: Vocabulary,
    threshold: u8,
    cache: MatchCache,
}

impl FuzzyMatcher {
    pub fn new(vocabulary: Vocabulary, threshold: u8) -> Self {
        Self::with_cache(vocabulary, threshold, MatchCache::new())
    }

    /// Creates a matcher that continues from previously recorded decisions.
    pub fn with_cache(vocabulary: Vocabulary, threshold: u8, cache: MatchCache) -> Self {
        Self {
            vocabulary,
            threshold,
            cache,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    /// Scores the label against every term and returns the highest-scoring one.
    /// Ties go to the term listed first. Does not consult or update the cache.
    pub fn best_candidate(&self, label: &str) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for term in self.vocabulary.terms() {
            let score = similarity::weighted_ratio(label, term);
            if best.as_ref().is_none_or(|current| score > current.score) {
                best = Some(Candidate {
                    term: term.clone(),
                    score,
                });
            }
        }
        best
    }

    /// Resolves a label to its canonical term, or `None` when no term scores at
    /// least the threshold. The decision is cached and reused verbatim for
    /// every later call with the same label.
    pub fn resolve(&mut self, label: &str) -> Option<&str> {
        if !self.cache.contains(label) {
            let candidate = self.best_candidate(label);
            let resolution = candidate
                .as_ref()
                .filter(|candidate| candidate.score >= self.threshold)
                .map(|candidate| candidate.term.clone());
            debug!(
                label,
                best = ?candidate,
                accepted = resolution.is_some(),
                "resolved column label"
            );
            self.cache.insert(label.to_string(), resolution);
        }
        self.cache.get(label).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(terms: &[&str]) -> FuzzyMatcher {
        FuzzyMatcher::new(Vocabulary::new(terms.iter().copied()), DEFAULT_THRESHOLD)
    }

    #[test]
    fn resolves_close_label_to_canonical_term() {
        let mut matcher = matcher(&["SKU", "Description", "Quantity"]);
        assert_eq!(matcher.resolve("Descriptions "), Some("Description"));
        assert_eq!(matcher.resolve("Random Notes"), None);
    }

    #[test]
    fn records_both_matches_and_misses() {
        let mut matcher = matcher(&["SKU", "Description"]);
        matcher.resolve("sku");
        matcher.resolve("Random Notes");

        assert_eq!(matcher.cache().len(), 2);
        assert_eq!(matcher.cache().get("sku"), Some(Some("SKU")));
        assert_eq!(matcher.cache().get("Random Notes"), Some(None));
        assert_eq!(matcher.cache().get("unseen"), None);
    }

    #[test]
    fn cached_decision_wins_over_recomputation() {
        let mut cache = MatchCache::new();
        cache.insert("Descriptions".to_string(), None);
        let mut matcher = FuzzyMatcher::with_cache(
            Vocabulary::new(["Description"]),
            DEFAULT_THRESHOLD,
            cache,
        );

        assert_eq!(matcher.resolve("Descriptions"), None);
    }

    #[test]
    fn ties_prefer_first_listed_term() {
        let matcher = matcher(&["Qty", "QTY"]);
        let candidate = matcher.best_candidate("qty").expect("candidate");
        assert_eq!(candidate.term, "Qty");
        assert_eq!(candidate.score, 100);
    }

    #[test]
    fn threshold_is_inclusive_and_configurable() {
        let mut strict = FuzzyMatcher::new(Vocabulary::new(["Description"]), 97);
        assert_eq!(strict.resolve("Descriptions"), None);
        assert_eq!(strict.threshold(), 97);

        let mut lenient = FuzzyMatcher::new(Vocabulary::new(["Description"]), 96);
        assert_eq!(lenient.resolve("Descriptions"), Some("Description"));
    }

    #[test]
    fn plural_labels_resolve_with_default_vocabulary() {
        let mut matcher = FuzzyMatcher::new(Vocabulary::default(), DEFAULT_THRESHOLD);
        assert_eq!(matcher.resolve("Materials"), Some("Material"));
        assert_eq!(matcher.resolve("Quantitys"), Some("Quantity"));
    }

    #[test]
    fn empty_vocabulary_never_matches() {
        let mut matcher = FuzzyMatcher::new(Vocabulary::new(Vec::<String>::new()), 0);
        assert_eq!(matcher.best_candidate("SKU"), None);
        assert_eq!(matcher.resolve("SKU"), None);
    }
}
