// alignment quality diagnostics without a gold standard
use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::core::alignment::AlignmentStore;
use crate::core::classify::{Degrees, TopologyCounts, has_crossing};
use crate::core::delta::{Agreement, compare};
use crate::core::tokens::TokenCorpus;
use crate::core::types::{Link, LinkView, Position, SentenceIndex, fold_case};

/// Everything measured on one sentence. Pure value; corpus figures are
/// reductions over a list of these.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceDiagnostics {
    pub sentence: SentenceIndex,
    pub links: usize,
    pub topology: TopologyCounts,
    pub crossing: bool,
    pub max_source_degree: usize,
    pub max_target_degree: usize,
    /// (source, target) fractions; `None` when token data is missing or a side is empty.
    pub coverage: Option<(f64, f64)>,
    pub function_words_aligned: usize,
    pub function_words_total: usize,
    pub unaligned: Option<UnalignedExample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnalignedExample {
    pub sentence: SentenceIndex,
    pub source: Vec<String>,
    pub target: Vec<String>,
}

/// Diagnose one sentence. Links pointing past either token sequence are
/// ignored for coverage and unaligned-token figures; topology, degrees and
/// crossings are computed on the raw link list.
pub fn analyze_sentence(
    sentence: SentenceIndex,
    links: &[Link],
    source: Option<&[String]>,
    target: Option<&[String]>,
    function_words: &HashSet<String>,
) -> SentenceDiagnostics {
    let degrees = Degrees::from_links(links);
    let mut topology = TopologyCounts::default();
    for &l in links {
        topology.add(degrees.classify(l));
    }

    let aligned_source = in_range(links.iter().map(|l| l.source), source);
    let aligned_target = in_range(links.iter().map(|l| l.target), target);

    let coverage = match (source, target) {
        (Some(s), Some(t)) if !s.is_empty() && !t.is_empty() => Some((
            aligned_source.len() as f64 / s.len() as f64,
            aligned_target.len() as f64 / t.len() as f64,
        )),
        _ => None,
    };

    let (mut fw_aligned, mut fw_total) = (0, 0);
    for (i, token) in source.unwrap_or(&[]).iter().enumerate() {
        if function_words.contains(&fold_case(token)) {
            fw_total += 1;
            if aligned_source.contains(&i) {
                fw_aligned += 1;
            }
        }
    }

    let unaligned = match (source, target) {
        (Some(s), Some(t)) => {
            let src = unaligned_tokens(s, &aligned_source);
            let tgt = unaligned_tokens(t, &aligned_target);
            (!src.is_empty() || !tgt.is_empty()).then_some(UnalignedExample {
                sentence,
                source: src,
                target: tgt,
            })
        }
        _ => None,
    };

    SentenceDiagnostics {
        sentence,
        links: links.len(),
        topology,
        crossing: has_crossing(links),
        max_source_degree: degrees.max_source(),
        max_target_degree: degrees.max_target(),
        coverage,
        function_words_aligned: fw_aligned,
        function_words_total: fw_total,
        unaligned,
    }
}

fn in_range(
    positions: impl Iterator<Item = Position>,
    tokens: Option<&[String]>,
) -> HashSet<Position> {
    let len = tokens.map(<[String]>::len).unwrap_or(0);
    positions.filter(|&p| p < len).collect()
}

fn unaligned_tokens(tokens: &[String], aligned: &HashSet<Position>) -> Vec<String> {
    tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| !aligned.contains(i))
        .map(|(_, t)| t.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicStats {
    pub sentences: usize,
    pub total_links: usize,
    pub average_links: f64,
    pub empty_sentences: usize,
    pub empty_percent: f64,
    pub min_links: usize,
    pub max_links: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Sentences with both token sides present and non-empty.
    pub scored_sentences: usize,
    pub average_source: f64,
    pub average_target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossingSummary {
    /// Sentences with at least two links.
    pub eligible_sentences: usize,
    pub crossing_sentences: usize,
    pub crossing_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    pub max_source_degree: usize,
    pub max_target_degree: usize,
    pub threshold: usize,
    pub source_suspicious: bool,
    pub target_suspicious: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionWordSummary {
    pub aligned: usize,
    pub total: usize,
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnalignedSummary {
    pub affected_sentences: usize,
    pub examples: Vec<UnalignedExample>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionSample {
    pub sentence: SentenceIndex,
    pub source_tokens: Vec<String>,
    pub target_tokens: Vec<String>,
    pub links: Vec<LinkView>,
}

fn mean(values: impl Iterator<Item = f64>) -> (usize, f64) {
    let (n, sum) = values.fold((0usize, 0.0), |(n, s), v| (n + 1, s + v));
    (n, if n == 0 { 0.0 } else { sum / n as f64 })
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// Sorted sample of up to `amount` items, reproducible for a given seed.
fn seeded_sample<T: Clone>(items: &[T], amount: usize, seed: u64) -> Vec<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    let amount = amount.min(items.len());
    let mut picked = rand::seq::index::sample(&mut rng, items.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| items[i].clone()).collect()
}

/// Read-only view over an alignment store and the aligner token files.
#[derive(Debug, Clone, Copy)]
pub struct AlignmentQualityAnalyzer<'a> {
    alignments: &'a AlignmentStore,
    source: &'a TokenCorpus,
    target: &'a TokenCorpus,
    config: &'a AnalyzerConfig,
}

impl<'a> AlignmentQualityAnalyzer<'a> {
    pub fn new(
        alignments: &'a AlignmentStore,
        source: &'a TokenCorpus,
        target: &'a TokenCorpus,
        config: &'a AnalyzerConfig,
    ) -> Self {
        Self {
            alignments,
            source,
            target,
            config,
        }
    }

    fn function_words(&self) -> HashSet<String> {
        self.config
            .function_words
            .iter()
            .map(|w| fold_case(w))
            .collect()
    }

    pub fn sentence(&self, sentence: SentenceIndex) -> Option<SentenceDiagnostics> {
        let alignment = self.alignments.get(sentence)?;
        Some(analyze_sentence(
            sentence,
            alignment.links(),
            self.source.get(sentence),
            self.target.get(sentence),
            &self.function_words(),
        ))
    }

    /// One entry per alignment line.
    pub fn diagnostics(&self) -> Vec<SentenceDiagnostics> {
        let fw = self.function_words();
        self.alignments
            .iter()
            .map(|(i, a)| {
                analyze_sentence(i, a.links(), self.source.get(i), self.target.get(i), &fw)
            })
            .collect()
    }

    pub fn basic_stats(&self) -> BasicStats {
        let counts: Vec<usize> = self.alignments.iter().map(|(_, a)| a.len()).collect();
        let empty = counts.iter().filter(|&&c| c == 0).count();
        BasicStats {
            sentences: counts.len(),
            total_links: self.alignments.total_links(),
            average_links: self.alignments.average_links(),
            empty_sentences: empty,
            empty_percent: percent(empty, counts.len()),
            min_links: counts.iter().copied().min().unwrap_or(0),
            max_links: counts.iter().copied().max().unwrap_or(0),
        }
    }

    pub fn coverage(diags: &[SentenceDiagnostics]) -> CoverageSummary {
        let scored: Vec<(f64, f64)> = diags.iter().filter_map(|d| d.coverage).collect();
        let (n, average_source) = mean(scored.iter().map(|c| c.0));
        let (_, average_target) = mean(scored.iter().map(|c| c.1));
        CoverageSummary {
            scored_sentences: n,
            average_source,
            average_target,
        }
    }

    /// Bucket counts summed over sentences.
    pub fn topology(diags: &[SentenceDiagnostics]) -> TopologyCounts {
        diags.iter().fold(TopologyCounts::default(), |mut acc, d| {
            acc += d.topology;
            acc
        })
    }

    pub fn crossings(diags: &[SentenceDiagnostics]) -> CrossingSummary {
        let eligible = diags.iter().filter(|d| d.links >= 2).count();
        let crossing = diags.iter().filter(|d| d.crossing).count();
        CrossingSummary {
            eligible_sentences: eligible,
            crossing_sentences: crossing,
            crossing_percent: percent(crossing, eligible),
        }
    }

    pub fn chains(&self, diags: &[SentenceDiagnostics]) -> ChainSummary {
        let max_source = diags.iter().map(|d| d.max_source_degree).max().unwrap_or(0);
        let max_target = diags.iter().map(|d| d.max_target_degree).max().unwrap_or(0);
        let threshold = self.config.chain_threshold;
        ChainSummary {
            max_source_degree: max_source,
            max_target_degree: max_target,
            threshold,
            source_suspicious: max_source > threshold,
            target_suspicious: max_target > threshold,
        }
    }

    pub fn function_word_rate(diags: &[SentenceDiagnostics]) -> FunctionWordSummary {
        let aligned = diags.iter().map(|d| d.function_words_aligned).sum();
        let total = diags.iter().map(|d| d.function_words_total).sum();
        FunctionWordSummary {
            aligned,
            total,
            percent: (total > 0).then(|| percent(aligned, total)),
        }
    }

    pub fn unaligned(&self, diags: &[SentenceDiagnostics]) -> UnalignedSummary {
        let affected: Vec<UnalignedExample> =
            diags.iter().filter_map(|d| d.unaligned.clone()).collect();
        UnalignedSummary {
            affected_sentences: affected.len(),
            examples: seeded_sample(
                &affected,
                self.config.unaligned_examples,
                self.config.sample_seed,
            ),
        }
    }

    /// Random sentences rendered with their links, for reading by hand.
    pub fn inspection_samples(&self) -> Vec<InspectionSample> {
        let indices: Vec<SentenceIndex> = (0..self.alignments.len()).collect();
        seeded_sample(
            &indices,
            self.config.inspection_samples,
            self.config.sample_seed,
        )
        .into_iter()
        .filter_map(|i| {
            let alignment = self.alignments.get(i)?;
            let source = self.source.get(i)?;
            let target = self.target.get(i)?;
            Some(InspectionSample {
                sentence: i,
                source_tokens: source.to_vec(),
                target_tokens: target.to_vec(),
                links: alignment
                    .links()
                    .iter()
                    .map(|&l| LinkView::new(l, source, target))
                    .collect(),
            })
        })
        .collect()
    }

    pub fn agreement(&self, other: &AlignmentStore, method: &str) -> Agreement {
        compare(self.alignments, other, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    fn mk_corpus(lines: &[&str]) -> TokenCorpus {
        TokenCorpus::new(lines.iter().map(|l| toks(l)).collect())
    }

    #[test]
    fn cat_sentence_diagnostics() {
        let alignments = AlignmentStore::parse_str("0\t0-0 1-2 2-1");
        let source = mk_corpus(&["The cat sat"]);
        let target = mk_corpus(&["X Y Z"]);
        let cfg = AnalyzerConfig::default();
        let analyzer = AlignmentQualityAnalyzer::new(&alignments, &source, &target, &cfg);

        let d = analyzer.sentence(0).unwrap();
        assert!(d.crossing);
        assert_eq!(d.topology.one_to_one, 3);
        assert_eq!(d.coverage, Some((1.0, 1.0)));
        assert_eq!((d.function_words_aligned, d.function_words_total), (1, 1));
        assert!(d.unaligned.is_none());
    }

    #[test]
    fn coverage_ignores_out_of_range_links_and_empty_sides() {
        let alignments = AlignmentStore::parse_str("0\t0-0 0-1 7-7\n1\t0-0\n2\t0-0\n");
        let source = mk_corpus(&["a b", "", "x"]);
        let target = mk_corpus(&["A B C D", "Q"]);
        let cfg = AnalyzerConfig::default();
        let analyzer = AlignmentQualityAnalyzer::new(&alignments, &source, &target, &cfg);
        let diags = analyzer.diagnostics();

        assert_eq!(diags[0].coverage, Some((0.5, 0.5)));
        assert_eq!(diags[1].coverage, None);
        assert_eq!(diags[2].coverage, None);

        let c = AlignmentQualityAnalyzer::coverage(&diags);
        assert_eq!(c.scored_sentences, 1);
        assert!((c.average_source - 0.5).abs() < 1e-9);
    }

    #[test]
    fn topology_totals_match_link_counts() {
        let alignments = AlignmentStore::parse_str("0\t0-0 0-1 1-1 1-1\n1\t0-0\n\n");
        let empty = TokenCorpus::default();
        let cfg = AnalyzerConfig::default();
        let analyzer = AlignmentQualityAnalyzer::new(&alignments, &empty, &empty, &cfg);
        let diags = analyzer.diagnostics();

        for d in &diags {
            assert_eq!(d.topology.total(), d.links);
        }
        assert_eq!(
            AlignmentQualityAnalyzer::topology(&diags).total(),
            alignments.total_links()
        );
    }

    #[test]
    fn basic_stats_and_crossing_ratio() {
        let alignments = AlignmentStore::parse_str("0\t0-1 1-0\n\n2\t0-0 1-1 2-2\n3\t4-4\n");
        let empty = TokenCorpus::default();
        let cfg = AnalyzerConfig::default();
        let analyzer = AlignmentQualityAnalyzer::new(&alignments, &empty, &empty, &cfg);

        let basic = analyzer.basic_stats();
        assert_eq!(basic.sentences, 4);
        assert_eq!(basic.total_links, 6);
        assert!((basic.average_links - 1.5).abs() < 1e-9);
        assert_eq!(basic.empty_sentences, 1);
        assert!((basic.empty_percent - 25.0).abs() < 1e-9);
        assert_eq!((basic.min_links, basic.max_links), (0, 3));

        let crossings = AlignmentQualityAnalyzer::crossings(&analyzer.diagnostics());
        assert_eq!(crossings.eligible_sentences, 2);
        assert_eq!(crossings.crossing_sentences, 1);
        assert!((crossings.crossing_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn chains_above_threshold_are_flagged() {
        let fan_out: Vec<String> = (0..7).map(|j| format!("0-{j}")).collect();
        let alignments = AlignmentStore::parse_str(&format!("0\t{}\n1\t0-0 1-0\n", fan_out.join(" ")));
        let empty = TokenCorpus::default();
        let cfg = AnalyzerConfig::default();
        let analyzer = AlignmentQualityAnalyzer::new(&alignments, &empty, &empty, &cfg);

        let chains = analyzer.chains(&analyzer.diagnostics());
        assert_eq!(chains.max_source_degree, 7);
        assert_eq!(chains.max_target_degree, 2);
        assert!(chains.source_suspicious);
        assert!(!chains.target_suspicious);
    }

    #[test]
    fn function_words_are_case_folded() {
        let alignments = AlignmentStore::parse_str("0\t1-0\n");
        let source = mk_corpus(&["THE cat Of"]);
        let target = mk_corpus(&["mao"]);
        let cfg = AnalyzerConfig::default();
        let analyzer = AlignmentQualityAnalyzer::new(&alignments, &source, &target, &cfg);

        let fw = AlignmentQualityAnalyzer::function_word_rate(&analyzer.diagnostics());
        assert_eq!((fw.aligned, fw.total), (0, 2));
        assert_eq!(fw.percent, Some(0.0));
    }

    #[test]
    fn unaligned_examples_and_samples_are_reproducible() {
        let alignments = AlignmentStore::parse_str("0\t0-0\n1\t0-0\n2\t0-0 1-1\n3\t0-0\n");
        let source = mk_corpus(&["a b", "a", "a b", "a c"]);
        let target = mk_corpus(&["A", "A B", "A B", "A"]);
        let cfg = AnalyzerConfig {
            unaligned_examples: 2,
            inspection_samples: 3,
            ..Default::default()
        };
        let analyzer = AlignmentQualityAnalyzer::new(&alignments, &source, &target, &cfg);
        let diags = analyzer.diagnostics();

        let unaligned = analyzer.unaligned(&diags);
        assert_eq!(unaligned.affected_sentences, 3);
        assert_eq!(unaligned.examples.len(), 2);
        assert_eq!(analyzer.unaligned(&diags), unaligned);
        assert_eq!(diags[0].unaligned.as_ref().unwrap().source, vec!["b"]);
        assert_eq!(diags[1].unaligned.as_ref().unwrap().target, vec!["B"]);

        let samples = analyzer.inspection_samples();
        assert_eq!(samples.len(), 3);
        assert!(samples.windows(2).all(|w| w[0].sentence < w[1].sentence));
        assert_eq!(analyzer.inspection_samples(), samples);
    }
}
