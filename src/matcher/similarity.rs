//! Token-aware string similarity scores on a 0–100 scale.
//!
//! Every scorer builds on [`ratio`], the insertion/deletion (Indel) similarity
//! `2 * lcs / (len1 + len2)`. [`weighted_ratio`] combines them the way column
//! labels are compared against the vocabulary.

use std::collections::BTreeSet;

const UNBASE_SCALE: f64 = 0.95;
const PARTIAL_SCALE: f64 = 0.9;
const LONG_PARTIAL_SCALE: f64 = 0.6;

/// Lower-cases the input, replaces every non-alphanumeric character with a
/// space, and trims the result.
pub fn preprocess(value: &str) -> String {
    let replaced: String = value
        .chars()
        .flat_map(|ch| {
            let mapped = if ch.is_alphanumeric() { ch } else { ' ' };
            mapped.to_lowercase()
        })
        .collect();
    replaced.trim().to_string()
}

/// Indel similarity: the share of both strings covered by their longest common
/// subsequence. Empty input scores zero.
pub fn ratio(lhs: &str, rhs: &str) -> u8 {
    let lhs: Vec<char> = lhs.chars().collect();
    let rhs: Vec<char> = rhs.chars().collect();
    let total = lhs.len() + rhs.len();
    if lhs.is_empty() || rhs.is_empty() {
        return 0;
    }
    percent((2 * lcs_len(&lhs, &rhs)) as f64 / total as f64)
}

fn lcs_len(lhs: &[char], rhs: &[char]) -> usize {
    let mut prev = vec![0; rhs.len() + 1];
    let mut curr = vec![0; rhs.len() + 1];
    for &left in lhs {
        for (j, &right) in rhs.iter().enumerate() {
            curr[j + 1] = if left == right {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[rhs.len()]
}

/// Best [`ratio`] of the shorter string against every equally long window of
/// the longer one.
pub fn partial_ratio(lhs: &str, rhs: &str) -> u8 {
    let lhs_chars: Vec<char> = lhs.chars().collect();
    let rhs_chars: Vec<char> = rhs.chars().collect();
    let (shorter, longer) = if lhs_chars.len() <= rhs_chars.len() {
        (lhs, &rhs_chars)
    } else {
        (rhs, &lhs_chars)
    };
    let window = shorter.chars().count();
    if window == 0 {
        return 0;
    }
    if window == longer.len() {
        return ratio(lhs, rhs);
    }

    let mut best = 0;
    for start in 0..=(longer.len() - window) {
        let candidate: String = longer[start..start + window].iter().collect();
        best = best.max(ratio(shorter, &candidate));
        if best == 100 {
            break;
        }
    }
    best
}

/// [`ratio`] after sorting each string's whitespace-separated tokens.
pub fn token_sort_ratio(lhs: &str, rhs: &str) -> u8 {
    ratio(&sorted_tokens(lhs), &sorted_tokens(rhs))
}

/// [`partial_ratio`] after sorting each string's tokens.
pub fn partial_token_sort_ratio(lhs: &str, rhs: &str) -> u8 {
    partial_ratio(&sorted_tokens(lhs), &sorted_tokens(rhs))
}

/// Compares the shared tokens against each side's remaining tokens.
pub fn token_set_ratio(lhs: &str, rhs: &str) -> u8 {
    token_set_with(lhs, rhs, ratio)
}

/// [`token_set_ratio`] using [`partial_ratio`] for the pairwise comparisons.
pub fn partial_token_set_ratio(lhs: &str, rhs: &str) -> u8 {
    token_set_with(lhs, rhs, partial_ratio)
}

/// Weighted combination of the scorers above, applied to pre-processed input.
///
/// Strings of similar length are compared as a whole and by token order/sets.
/// When one string is at least 1.5 times longer the partial scorers are used
/// instead, scaled down (more strongly once the length ratio exceeds 8).
pub fn weighted_ratio(lhs: &str, rhs: &str) -> u8 {
    let lhs = preprocess(lhs);
    let rhs = preprocess(rhs);
    if lhs.is_empty() || rhs.is_empty() {
        return 0;
    }

    let base = f64::from(ratio(&lhs, &rhs));
    let lhs_len = lhs.chars().count();
    let rhs_len = rhs.chars().count();
    let len_ratio = lhs_len.max(rhs_len) as f64 / lhs_len.min(rhs_len) as f64;

    let best = if len_ratio < 1.5 {
        let sort = f64::from(token_sort_ratio(&lhs, &rhs)) * UNBASE_SCALE;
        let set = f64::from(token_set_ratio(&lhs, &rhs)) * UNBASE_SCALE;
        base.max(sort).max(set)
    } else {
        let scale = if len_ratio > 8.0 {
            LONG_PARTIAL_SCALE
        } else {
            PARTIAL_SCALE
        };
        let partial = f64::from(partial_ratio(&lhs, &rhs)) * scale;
        let sort = f64::from(partial_token_sort_ratio(&lhs, &rhs)) * UNBASE_SCALE * scale;
        let set = f64::from(partial_token_set_ratio(&lhs, &rhs)) * UNBASE_SCALE * scale;
        base.max(partial).max(sort).max(set)
    };

    best.round().clamp(0.0, 100.0) as u8
}

fn token_set_with(lhs: &str, rhs: &str, scorer: fn(&str, &str) -> u8) -> u8 {
    let lhs_tokens: BTreeSet<&str> = lhs.split_whitespace().collect();
    let rhs_tokens: BTreeSet<&str> = rhs.split_whitespace().collect();

    let shared = join(lhs_tokens.intersection(&rhs_tokens));
    let lhs_combined = combine(&shared, &join(lhs_tokens.difference(&rhs_tokens)));
    let rhs_combined = combine(&shared, &join(rhs_tokens.difference(&lhs_tokens)));

    let mut best = scorer(&lhs_combined, &rhs_combined);
    if !shared.is_empty() {
        best = best
            .max(scorer(&shared, &lhs_combined))
            .max(scorer(&shared, &rhs_combined));
    }
    best
}

fn sorted_tokens(value: &str) -> String {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn combine(shared: &str, rest: &str) -> String {
    format!("{shared} {rest}").trim().to_string()
}

fn percent(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
