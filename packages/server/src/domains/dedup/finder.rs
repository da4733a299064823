//! Candidate-pair finding over a homogeneous collection.

use serde::Serialize;

use super::similarity::similarity;

/// A candidate duplicate pair with its similarity score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatePair<E> {
    pub entity1: E,
    pub entity2: E,
    pub similarity: f64,
}

/// Find all unordered pairs whose comparison strings meet the threshold.
///
/// O(n²) comparisons; acceptable because callers pre-filter to one entity
/// kind and catalog sizes stay in the hundreds-to-low-thousands range.
/// Comparison strings are built once per entity, not once per pair.
///
/// Pairs come back in input order (`entity1` before `entity2`, earlier
/// `entity1` first), so repeated calls against unchanged data are
/// byte-for-byte identical. The threshold must already be validated to lie
/// in [0, 1] by the caller.
pub fn find_duplicate_pairs<E, F>(
    entities: &[E],
    to_comparison_string: F,
    threshold: f64,
) -> Vec<DuplicatePair<E>>
where
    E: Clone,
    F: Fn(&E) -> String,
{
    let comparison_strings: Vec<String> = entities.iter().map(&to_comparison_string).collect();

    let mut pairs = Vec::new();
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            let score = similarity(&comparison_strings[i], &comparison_strings[j]);
            if score >= threshold {
                pairs.push(DuplicatePair {
                    entity1: entities[i].clone(),
                    entity2: entities[j].clone(),
                    similarity: score,
                });
            }
        }
    }

    pairs
}
