// aligner-token position -> annotation-token position
use crate::core::types::{Position, fold_case};
use crate::mapping::Substitutions;

/// Partial, strictly increasing map for one sentence.
///
/// Indexed by aligner-source position (arena style); `None` means the position
/// found no annotation counterpart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationMap {
    targets: Vec<Option<Position>>,
}

impl ReconciliationMap {
    pub fn get(&self, aligner_pos: Position) -> Option<Position> {
        self.targets.get(aligner_pos).copied().flatten()
    }

    /// Number of aligner positions covered (mapped or not).
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn mapped_len(&self) -> usize {
        self.targets.iter().filter(|t| t.is_some()).count()
    }

    //for reports
    pub fn iter(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .filter_map(|(p, t)| t.map(|a| (p, a)))
    }
}

/// Greedy single-pass matcher between the aligner tokenization and the
/// annotation tokenization of the same sentence.
#[derive(Debug, Clone, Copy)]
pub struct TokenReconciler<'a> {
    substitutions: &'a Substitutions,
}

impl<'a> TokenReconciler<'a> {
    pub fn new(substitutions: &'a Substitutions) -> Self {
        Self { substitutions }
    }

    /// For each aligner position in order, advance a cursor over the annotation
    /// tokens until a case-folded match is found. Every annotation token is
    /// consumed at most once, so tokens skipped over by an earlier mismatch are
    /// lost to later positions. Once the cursor is exhausted nothing else maps.
    /// A token substituted to the empty string stays unmapped and leaves the
    /// cursor where it is.
    pub fn reconcile(&self, aligner: &[String], annotation: &[String]) -> ReconciliationMap {
        let folded: Vec<String> = annotation.iter().map(|t| fold_case(t)).collect();
        let mut targets = vec![None; aligner.len()];
        let mut cursor = 0;

        for (p, token) in aligner.iter().enumerate() {
            let wanted = fold_case(self.substitutions.apply(token));
            if wanted.is_empty() {
                continue;
            }
            while cursor < folded.len() {
                let here = cursor;
                cursor += 1;
                if folded[here] == wanted {
                    targets[p] = Some(here);
                    break;
                }
            }
        }

        ReconciliationMap { targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    fn assert_strictly_increasing(map: &ReconciliationMap) {
        let pairs: Vec<_> = map.iter().collect();
        for w in pairs.windows(2) {
            assert!(w[0].0 < w[1].0 && w[0].1 < w[1].1, "not monotonic: {pairs:?}");
        }
    }

    #[test]
    fn identical_sequences_map_one_to_one() {
        let subs = Substitutions::identity();
        let map = TokenReconciler::new(&subs).reconcile(&toks("The cat sat"), &toks("the CAT sat"));
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(map.mapped_len(), 3);
    }

    #[test]
    fn extra_annotation_tokens_are_skipped() {
        let subs = Substitutions::identity();
        let map = TokenReconciler::new(&subs)
            .reconcile(&toks("The cat sat"), &toks("The big cat , sat"));
        assert_eq!(map.get(0), Some(0));
        assert_eq!(map.get(1), Some(2));
        assert_eq!(map.get(2), Some(4));
        assert_strictly_increasing(&map);
    }

    ///an unmatched aligner token drains the cursor; everything after it stays unmapped
    #[test]
    fn unmatched_token_exhausts_cursor() {
        let subs = Substitutions::identity();
        let map = TokenReconciler::new(&subs).reconcile(&toks("The cat's sat"), &toks("The cat 's sat"));
        assert_eq!(map.get(0), Some(0));
        assert_eq!(map.get(1), None);
        assert_eq!(map.get(2), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn consumed_annotation_token_is_never_reused() {
        let subs = Substitutions::identity();
        let map = TokenReconciler::new(&subs).reconcile(&toks("a a a"), &toks("a b a"));
        assert_eq!(map.get(0), Some(0));
        assert_eq!(map.get(1), Some(2));
        assert_eq!(map.get(2), None);
        assert_strictly_increasing(&map);
    }

    #[test]
    fn substitution_table_is_applied_before_comparison() {
        let subs = Substitutions::from_pairs([("13,000", "13000"), ("'s", "s")]);
        let map = TokenReconciler::new(&subs)
            .reconcile(&toks("13,000 'S men"), &toks("13000 s men"));
        // lookup is exact: "'S" is not in the table and drains the cursor
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(0, 0)]);
        let map = TokenReconciler::new(&subs).reconcile(&toks("13,000 's men"), &toks("13000 s men"));
        assert_eq!(map.mapped_len(), 3);
    }

    ///a token rewritten to "" is dropped without consuming annotation tokens
    #[test]
    fn token_substituted_to_empty_is_skipped_without_advancing() {
        let subs = Substitutions::parse_str("'\t\n");
        let map = TokenReconciler::new(&subs)
            .reconcile(&toks("cats ' sleep well"), &toks("cats sleep well"));
        assert_eq!(map.get(1), None);
        assert_eq!(map.get(2), Some(1));
        assert_eq!(map.get(3), Some(2));
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(0, 0), (2, 1), (3, 2)]);
        assert_strictly_increasing(&map);
    }

    #[test]
    fn empty_inputs() {
        let subs = Substitutions::identity();
        let r = TokenReconciler::new(&subs);
        assert!(r.reconcile(&[], &toks("a b")).is_empty());
        let map = r.reconcile(&toks("a b"), &[]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.mapped_len(), 0);
    }
}
