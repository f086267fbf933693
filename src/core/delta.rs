// cross-method agreement between two alignments of the same corpus
use std::collections::HashSet;

use serde::Serialize;

use crate::core::alignment::AlignmentStore;
use crate::core::types::{Link, SentenceIndex};

/// |A ∩ B| / |A ∪ B|, or `None` when both sets are empty.
///
/// Two empty sets are not "perfect agreement"; callers leave them out of any mean.
pub fn jaccard(a: &HashSet<Link>, b: &HashSet<Link>) -> Option<f64> {
    let union = a.union(b).count();
    if union == 0 {
        return None;
    }
    let intersection = a.intersection(b).count();
    Some(intersection as f64 / union as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentenceAgreement {
    pub sentence: SentenceIndex,
    pub jaccard: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agreement {
    pub method: String,
    /// Sentences present in both stores.
    pub compared_sentences: usize,
    /// Sentences where both link sets were empty.
    pub excluded_sentences: usize,
    pub per_sentence: Vec<SentenceAgreement>,
    pub mean_jaccard: Option<f64>,
}

impl Agreement {
    pub fn scored_sentences(&self) -> usize {
        self.per_sentence.len()
    }
}

/// Compare sentence by sentence over the indices both stores share.
pub fn compare(primary: &AlignmentStore, other: &AlignmentStore, method: &str) -> Agreement {
    let compared = primary.len().min(other.len());
    if primary.len() != other.len() {
        log::warn!(
            "alignment stores differ in length ({} vs {}); comparing the first {compared} sentences",
            primary.len(),
            other.len()
        );
    }

    let mut per_sentence = Vec::new();
    for sentence in 0..compared {
        let (Some(a), Some(b)) = (primary.get(sentence), other.get(sentence)) else {
            continue;
        };
        if let Some(j) = jaccard(&a.link_set(), &b.link_set()) {
            per_sentence.push(SentenceAgreement {
                sentence,
                jaccard: j,
            });
        }
    }

    let mean_jaccard = match per_sentence.len() {
        0 => None,
        n => Some(per_sentence.iter().map(|s| s.jaccard).sum::<f64>() / n as f64),
    };

    Agreement {
        method: method.to_string(),
        compared_sentences: compared,
        excluded_sentences: compared - per_sentence.len(),
        per_sentence,
        mean_jaccard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(usize, usize)]) -> HashSet<Link> {
        pairs.iter().map(|&(s, t)| Link::new(s, t)).collect()
    }

    #[test]
    fn jaccard_bounds() {
        let a = set(&[(0, 0), (1, 1)]);
        assert_eq!(jaccard(&a, &a), Some(1.0));
        assert_eq!(jaccard(&a, &set(&[(2, 2)])), Some(0.0));
        assert_eq!(jaccard(&set(&[]), &set(&[])), None);

        let half = jaccard(&a, &set(&[(0, 0)])).unwrap();
        assert!((half - 0.5).abs() < 1e-9);
    }

    #[test]
    fn self_comparison_is_perfect() {
        let store = AlignmentStore::parse_str("0\t0-0 1-2\n1\t2-2\n");
        let agreement = compare(&store, &store, "self");
        assert_eq!(agreement.mean_jaccard, Some(1.0));
        assert_eq!(agreement.scored_sentences(), 2);
    }

    ///scenario D: one-sided sentence is scored, both-empty sentences are excluded
    #[test]
    fn both_empty_sentences_are_excluded_from_the_mean() {
        let a = AlignmentStore::parse_str("0\t0-1\n\n\n");
        let b = AlignmentStore::parse_str("\n\n\n");
        let agreement = compare(&a, &b, "other");

        assert_eq!(agreement.compared_sentences, 3);
        assert_eq!(agreement.excluded_sentences, 2);
        assert_eq!(agreement.per_sentence, vec![SentenceAgreement { sentence: 0, jaccard: 0.0 }]);
        assert_eq!(agreement.mean_jaccard, Some(0.0));

        let none = compare(&b, &b, "empty");
        assert_eq!(none.mean_jaccard, None);
        assert_eq!(none.excluded_sentences, 3);
    }

    #[test]
    fn duplicate_links_collapse_before_comparison() {
        let a = AlignmentStore::parse_str("0\t0-0 0-0\n");
        let b = AlignmentStore::parse_str("0\t0-0\n");
        assert_eq!(compare(&a, &b, "dup").mean_jaccard, Some(1.0));
    }

    #[test]
    fn only_shared_prefix_is_compared() {
        let a = AlignmentStore::parse_str("0\t0-0\n1\t1-1\n");
        let b = AlignmentStore::parse_str("0\t0-0\n");
        let agreement = compare(&a, &b, "short");
        assert_eq!(agreement.compared_sentences, 1);
        assert_eq!(agreement.mean_jaccard, Some(1.0));
    }
}
