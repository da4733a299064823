//! Token-set similarity scoring.
//!
//! The Jaccard index over whitespace-delimited token sets. Token overlap is
//! resilient to word reordering and partial-field differences (an added
//! suite number, a swapped word) that strict edit distance over-penalizes,
//! and it is linear in token count, which matters when scoring O(n²)
//! candidate pairs.

use std::collections::HashSet;

/// Similarity of two normalized strings, in [0, 1].
///
/// Two empty strings score 0.0: blank records carry no comparable
/// information, so they are defined as no match rather than a perfect one.
pub fn similarity(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<&str> = a.split_whitespace().collect();
    let tokens_b: HashSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();

    intersection as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(similarity("county fairgrounds", "county fairgrounds"), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(similarity("alpha beta", "gamma delta"), 0.0);
    }

    #[test]
    fn test_both_empty_is_no_match() {
        assert_eq!(similarity("", ""), 0.0);
    }

    #[test]
    fn test_one_empty_scores_zero() {
        assert_eq!(similarity("county fairgrounds", ""), 0.0);
        assert_eq!(similarity("", "county fairgrounds"), 0.0);
    }

    #[test]
    fn test_word_order_is_irrelevant() {
        assert_eq!(similarity("spring craft fair", "fair craft spring"), 1.0);
    }

    #[test]
    fn test_fairgrounds_example() {
        // {county, fairgrounds} vs {county, fair, grounds}:
        // intersection 1, union 4
        let score = similarity("county fairgrounds", "county fair grounds");
        assert!((score - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_repeated_tokens_count_once() {
        assert_eq!(similarity("fair fair fair", "fair"), 1.0);
    }

    #[test]
    fn test_score_is_bounded() {
        let samples = [
            ("a b c", "c d e"),
            ("x", "x y z w"),
            ("long venue name here", "short"),
        ];
        for (a, b) in samples {
            let s = similarity(a, b);
            assert!((0.0..=1.0).contains(&s), "similarity({a:?}, {b:?}) = {s}");
        }
    }
}
