//! Quality report assembly and rendering (text, JSON, TOON).
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::alignment::AlignmentStore;
use crate::core::classify::{Topology, TopologyCounts};
use crate::core::delta::Agreement;
use crate::core::error::{LoadError, Result};
use crate::core::quality::{
    AlignmentQualityAnalyzer, BasicStats, ChainSummary, CoverageSummary, CrossingSummary,
    FunctionWordSummary, InspectionSample, UnalignedSummary,
};
use crate::core::types::indexed_tokens;

const RULE: &str = "======================================================================";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Toon,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "toon" => Ok(Self::Toon),
            other => Err(format!("unknown report format '{other}' (expected text, json or toon)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub basic: BasicStats,
    pub coverage: CoverageSummary,
    pub topology: TopologyCounts,
    pub crossings: CrossingSummary,
    pub chains: ChainSummary,
    pub function_words: FunctionWordSummary,
    pub unaligned: UnalignedSummary,
    pub inspection: Vec<InspectionSample>,
    pub agreement: Option<Agreement>,
}

impl QualityReport {
    /// Run every diagnostic once; `comparison` adds the cross-method section.
    pub fn build(
        analyzer: &AlignmentQualityAnalyzer<'_>,
        comparison: Option<(&AlignmentStore, &str)>,
    ) -> Self {
        let diags = analyzer.diagnostics();
        Self {
            basic: analyzer.basic_stats(),
            coverage: AlignmentQualityAnalyzer::coverage(&diags),
            topology: AlignmentQualityAnalyzer::topology(&diags),
            crossings: AlignmentQualityAnalyzer::crossings(&diags),
            chains: analyzer.chains(&diags),
            function_words: AlignmentQualityAnalyzer::function_word_rate(&diags),
            unaligned: analyzer.unaligned(&diags),
            inspection: analyzer.inspection_samples(),
            agreement: comparison.map(|(other, name)| analyzer.agreement(other, name)),
        }
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| LoadError::Encode(e.to_string()))
            }
            ReportFormat::Toon => {
                let value =
                    serde_json::to_value(self).map_err(|e| LoadError::Encode(e.to_string()))?;
                toon_format::encode_default(&value).map_err(|e| LoadError::Encode(e.to_string()))
            }
        }
    }
}

fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{RULE}")?;
    writeln!(f, "{title}")?;
    writeln!(f, "{RULE}")
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ALIGNMENT QUALITY EVALUATION REPORT")?;

        let b = &self.basic;
        section(f, "BASIC STATISTICS")?;
        writeln!(f, "Total sentences: {}", b.sentences)?;
        writeln!(f, "Total alignments: {}", b.total_links)?;
        writeln!(f, "Average alignments per sentence: {:.2}", b.average_links)?;
        writeln!(
            f,
            "Sentences with no alignments: {} ({:.1}%)",
            b.empty_sentences, b.empty_percent
        )?;
        writeln!(f, "Min alignments in a sentence: {}", b.min_links)?;
        writeln!(f, "Max alignments in a sentence: {}", b.max_links)?;
        writeln!(f, "Coverage ({} sentences scored):", self.coverage.scored_sentences)?;
        writeln!(
            f,
            "  Average source token coverage: {:.1}%",
            100.0 * self.coverage.average_source
        )?;
        writeln!(
            f,
            "  Average target token coverage: {:.1}%",
            100.0 * self.coverage.average_target
        )?;

        let t = &self.topology;
        section(f, "ALIGNMENT PATTERNS")?;
        for (label, kind) in [
            ("One-to-one", Topology::OneToOne),
            ("One-to-many (source)", Topology::OneToMany),
            ("Many-to-one (target)", Topology::ManyToOne),
            ("Many-to-many", Topology::ManyToMany),
        ] {
            writeln!(f, "{label}: {} ({:.1}%)", t.get(kind), t.percent(kind))?;
        }

        section(f, "TYPICAL ERROR PATTERNS")?;
        let fw = &self.function_words;
        match fw.percent {
            Some(p) => writeln!(f, "1. Function words aligned: {}/{} ({p:.1}%)", fw.aligned, fw.total)?,
            None => writeln!(f, "1. Function words aligned: no function words found")?,
        }
        let c = &self.chains;
        writeln!(f, "2. Suspicious alignment chains (threshold {}):", c.threshold)?;
        writeln!(
            f,
            "   Max alignments from single source word: {}{}",
            c.max_source_degree,
            if c.source_suspicious { " [suspicious]" } else { "" }
        )?;
        writeln!(
            f,
            "   Max alignments to single target word: {}{}",
            c.max_target_degree,
            if c.target_suspicious { " [suspicious]" } else { "" }
        )?;
        let x = &self.crossings;
        writeln!(
            f,
            "3. Sentences with crossing alignments: {}/{} ({:.1}%)",
            x.crossing_sentences, x.eligible_sentences, x.crossing_percent
        )?;

        section(f, "UNALIGNED TOKENS")?;
        writeln!(
            f,
            "Sentences with unaligned tokens: {}",
            self.unaligned.affected_sentences
        )?;
        for ex in &self.unaligned.examples {
            writeln!(f, "Sentence {}:", ex.sentence)?;
            writeln!(f, "  Source unaligned: {:?}", ex.source)?;
            writeln!(f, "  Target unaligned: {:?}", ex.target)?;
        }

        section(f, "MANUAL INSPECTION SAMPLES")?;
        for s in &self.inspection {
            writeln!(f, "--- Sentence {} ---", s.sentence)?;
            writeln!(f, "SRC: {}", indexed_tokens(&s.source_tokens))?;
            writeln!(f, "TGT: {}", indexed_tokens(&s.target_tokens))?;
            writeln!(f, "Alignments ({} pairs):", s.links.len())?;
            for l in &s.links {
                writeln!(
                    f,
                    "  [{}]{} <-> [{}]{}",
                    l.source, l.source_text, l.target, l.target_text
                )?;
            }
        }

        if let Some(a) = &self.agreement {
            section(f, &format!("COMPARISON WITH {}", a.method))?;
            match a.mean_jaccard {
                Some(j) => writeln!(f, "Average agreement (Jaccard): {j:.3}")?,
                None => writeln!(f, "Average agreement (Jaccard): n/a")?,
            }
            writeln!(
                f,
                "Sentences scored: {} (excluded, both empty: {})",
                a.scored_sentences(),
                a.excluded_sentences
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::core::tokens::TokenCorpus;

    fn mk_report(compare: bool) -> QualityReport {
        let alignments = AlignmentStore::parse_str("0\t0-0 1-2 2-1\n");
        let source = TokenCorpus::parse_str("The cat sat\n");
        let target = TokenCorpus::parse_str("X Y Z\n");
        let cfg = AnalyzerConfig::default();
        let analyzer = AlignmentQualityAnalyzer::new(&alignments, &source, &target, &cfg);
        let other = AlignmentStore::parse_str("0\t0-0\n");
        QualityReport::build(&analyzer, compare.then_some((&other, "itermax")))
    }

    #[test]
    fn text_report_carries_the_figures() {
        let text = mk_report(true).render(ReportFormat::Text).unwrap();
        assert!(text.contains("One-to-one: 3 (100.0%)"));
        assert!(text.contains("Sentences with crossing alignments: 1/1 (100.0%)"));
        assert!(text.contains("Average source token coverage: 100.0%"));
        assert!(text.contains("COMPARISON WITH itermax"));
        assert!(text.contains("Average agreement (Jaccard): 0.333"));
    }

    #[test]
    fn comparison_section_is_optional() {
        let report = mk_report(false);
        assert!(report.agreement.is_none());
        assert!(!report.to_string().contains("COMPARISON WITH"));
    }

    #[test]
    fn json_report_is_structured() {
        let json = mk_report(false).render(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["topology"]["one_to_one"], 3);
        assert_eq!(value["basic"]["total_links"], 3);
    }

    #[test]
    fn format_names_parse() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert_eq!("toon".parse::<ReportFormat>(), Ok(ReportFormat::Toon));
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
