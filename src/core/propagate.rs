// sense projection through alignment links
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::ops::AddAssign;
use std::path::Path;

use serde::Serialize;

use crate::core::alignment::Alignment;
use crate::core::error::{LoadError, Result};
use crate::core::mapping::{ReconciliationMap, TokenReconciler};
use crate::core::snapshot::Snapshot;
use crate::core::types::{
    Link, LinkView, Position, ProjectionRecord, SentenceIndex, fold_case, indexed_tokens,
    token_or_unknown,
};

/// Why a link produced no projection. Policy exclusions, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkipReason {
    SourceOutOfRange,
    Unmapped,
    NoInstance,
    DuplicateMention,
    NoSense,
    TargetOutOfRange,
}

/// Per-reason link counters; summed across sentences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionStats {
    pub links_seen: usize,
    pub missing_sentence_data: usize,
    pub source_out_of_range: usize,
    pub unmapped: usize,
    pub no_instance: usize,
    pub duplicate_mention: usize,
    pub no_sense: usize,
    pub target_out_of_range: usize,
    pub emitted: usize,
}

impl ProjectionStats {
    fn record(&mut self, outcome: std::result::Result<(), SkipReason>) {
        self.links_seen += 1;
        let slot = match outcome {
            Ok(()) => &mut self.emitted,
            Err(SkipReason::SourceOutOfRange) => &mut self.source_out_of_range,
            Err(SkipReason::Unmapped) => &mut self.unmapped,
            Err(SkipReason::NoInstance) => &mut self.no_instance,
            Err(SkipReason::DuplicateMention) => &mut self.duplicate_mention,
            Err(SkipReason::NoSense) => &mut self.no_sense,
            Err(SkipReason::TargetOutOfRange) => &mut self.target_out_of_range,
        };
        *slot += 1;
    }

    pub fn skipped(&self) -> usize {
        self.links_seen - self.emitted
    }
}

impl AddAssign for ProjectionStats {
    fn add_assign(&mut self, rhs: Self) {
        self.links_seen += rhs.links_seen;
        self.missing_sentence_data += rhs.missing_sentence_data;
        self.source_out_of_range += rhs.source_out_of_range;
        self.unmapped += rhs.unmapped;
        self.no_instance += rhs.no_instance;
        self.duplicate_mention += rhs.duplicate_mention;
        self.no_sense += rhs.no_sense;
        self.target_out_of_range += rhs.target_out_of_range;
        self.emitted += rhs.emitted;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceProjection {
    pub sentence: SentenceIndex,
    pub records: Vec<ProjectionRecord>,
    pub stats: ProjectionStats,
}

/// Whole-corpus result: records concatenated in sentence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub records: Vec<ProjectionRecord>,
    pub stats: ProjectionStats,
}

impl Projection {
    fn absorb(&mut self, part: SentenceProjection) {
        self.records.extend(part.records);
        self.stats += part.stats;
    }

    pub fn summary(&self, sample: usize) -> ProjectionSummary {
        ProjectionSummary::from_records(&self.records, sample)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionSummary {
    pub total: usize,
    pub unique_senses: usize,
    pub unique_tokens: usize,
    pub sample: Vec<ProjectionRecord>,
}

impl ProjectionSummary {
    pub fn from_records(records: &[ProjectionRecord], sample: usize) -> Self {
        let senses: BTreeSet<&str> = records.iter().map(|r| r.sense.as_str()).collect();
        let tokens: BTreeSet<&str> = records.iter().map(|r| r.token.as_str()).collect();
        Self {
            total: records.len(),
            unique_senses: senses.len(),
            unique_tokens: tokens.len(),
            sample: records.iter().take(sample).cloned().collect(),
        }
    }
}

impl fmt::Display for ProjectionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PROJECTION STATISTICS")?;
        writeln!(f, "Total projections: {}", self.total)?;
        writeln!(f, "Unique sense labels: {}", self.unique_senses)?;
        writeln!(f, "Unique target tokens: {}", self.unique_tokens)?;
        writeln!(f, "Sample projections:")?;
        for r in &self.sample {
            writeln!(f, "  {} -> {}", r.sense, r.token)?;
        }
        if self.total > self.sample.len() {
            writeln!(f, "  ... and {} more", self.total - self.sample.len())?;
        }
        Ok(())
    }
}

/// Accepted projection with its positions, for traces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TracedProjection {
    pub sense: String,
    pub source: Position,
    pub source_text: String,
    pub target: Position,
    pub target_text: String,
}

/// Human-readable walk through one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentenceTrace {
    pub sentence: SentenceIndex,
    pub sentence_id: String,
    pub source_tokens: Vec<String>,
    pub target_tokens: Vec<String>,
    pub links: Vec<LinkView>,
    pub projections: Vec<TracedProjection>,
}

impl fmt::Display for SentenceTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "EXAMPLE SENTENCE (index {})", self.sentence)?;
        writeln!(f, "Sentence ID: {}", self.sentence_id)?;
        writeln!(f, "Source tokens ({}):", self.source_tokens.len())?;
        writeln!(f, "  {}", indexed_tokens(&self.source_tokens))?;
        writeln!(f, "Target tokens ({}):", self.target_tokens.len())?;
        writeln!(f, "  {}", indexed_tokens(&self.target_tokens))?;
        writeln!(f, "Alignments ({} pairs):", self.links.len())?;
        for l in &self.links {
            writeln!(
                f,
                "  [{}]{} <-> [{}]{}",
                l.source, l.source_text, l.target, l.target_text
            )?;
        }
        writeln!(f, "Sense projections:")?;
        if self.projections.is_empty() {
            writeln!(f, "  (No sense projections in this sentence)")?;
        }
        for p in &self.projections {
            writeln!(
                f,
                "  {}: [{}]{} -> [{}]{}",
                p.sense, p.source, p.source_text, p.target, p.target_text
            )?;
        }
        Ok(())
    }
}

//everything one sentence needs, borrowed from the snapshot
struct SentenceView<'a> {
    index: SentenceIndex,
    sentence_id: &'a str,
    alignment: &'a Alignment,
    source: &'a [String],
    target: &'a [String],
    map: ReconciliationMap,
}

/// Read-only consumer of a [`Snapshot`] that turns alignment links into
/// (sense, target token) records.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionEngine<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> ProjectionEngine<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    //None when any of the inputs has no line for this sentence
    fn view(&self, sentence: SentenceIndex) -> Option<SentenceView<'a>> {
        let s = self.snapshot;
        let alignment = s.alignments.get(sentence)?;
        let source = s.source.get(sentence)?;
        let target = s.target.get(sentence)?;
        let annotated = s.annotations.get(sentence)?;
        let map = TokenReconciler::new(&s.substitutions).reconcile(source, &annotated.tokens);

        Some(SentenceView {
            index: sentence,
            sentence_id: annotated.id.as_str(),
            alignment,
            source,
            target,
            map,
        })
    }

    /// Steps 1-5 of the projection policy for one link; returns the sense label.
    fn resolve(
        &self,
        view: &SentenceView<'a>,
        link: Link,
    ) -> std::result::Result<&'a str, SkipReason> {
        let snapshot: &'a Snapshot = self.snapshot;
        let senses = &snapshot.senses;

        if link.source >= view.source.len() {
            return Err(SkipReason::SourceOutOfRange);
        }
        let position = view.map.get(link.source).ok_or(SkipReason::Unmapped)?;
        let instance = senses
            .instance_at(view.index, position)
            .ok_or(SkipReason::NoInstance)?;
        if senses.mention_count(view.index, instance) != 1 {
            return Err(SkipReason::DuplicateMention);
        }
        let sense = senses.sense_of(instance).ok_or(SkipReason::NoSense)?;
        if link.target >= view.target.len() {
            return Err(SkipReason::TargetOutOfRange);
        }
        Ok(sense)
    }

    pub fn project(&self, sentence: SentenceIndex) -> Vec<ProjectionRecord> {
        self.project_sentence(sentence).records
    }

    pub fn project_sentence(&self, sentence: SentenceIndex) -> SentenceProjection {
        let mut out = SentenceProjection {
            sentence,
            ..Default::default()
        };

        let Some(view) = self.view(sentence) else {
            let links = self
                .snapshot
                .alignments
                .get(sentence)
                .map(Alignment::len)
                .unwrap_or(0);
            out.stats.links_seen = links;
            out.stats.missing_sentence_data = links;
            if links > 0 {
                log::debug!("sentence {sentence}: no token/annotation data, {links} links skipped");
            }
            return out;
        };

        for &link in view.alignment.links() {
            match self.resolve(&view, link) {
                Ok(sense) => {
                    out.records
                        .push(ProjectionRecord::new(sense, fold_case(&view.target[link.target])));
                    out.stats.record(Ok(()));
                }
                Err(reason) => out.stats.record(Err(reason)),
            }
        }
        out
    }

    /// Every sentence of the alignment store, merged in sentence order.
    pub fn project_all(&self) -> Projection {
        let mut projection = Projection::default();
        for sentence in 0..self.snapshot.alignments.len() {
            projection.absorb(self.project_sentence(sentence));
        }
        log::info!(
            "Projected {} senses from {} links ({} skipped)",
            projection.stats.emitted,
            projection.stats.links_seen,
            projection.stats.skipped()
        );
        projection
    }

    pub fn trace(&self, sentence: SentenceIndex) -> Option<SentenceTrace> {
        let view = self.view(sentence)?;
        let links = view.alignment.links();

        let projections = links
            .iter()
            .filter_map(|&link| {
                let sense = self.resolve(&view, link).ok()?;
                Some(TracedProjection {
                    sense: sense.to_string(),
                    source: link.source,
                    source_text: token_or_unknown(view.source, link.source),
                    target: link.target,
                    target_text: token_or_unknown(view.target, link.target),
                })
            })
            .collect();

        Some(SentenceTrace {
            sentence,
            sentence_id: view.sentence_id.to_string(),
            source_tokens: view.source.to_vec(),
            target_tokens: view.target.to_vec(),
            links: links
                .iter()
                .map(|&l| LinkView::new(l, view.source, view.target))
                .collect(),
            projections,
        })
    }
}

/// `sense<TAB>token` per record, in the given order.
pub fn write_tsv<W: Write>(records: &[ProjectionRecord], mut out: W) -> io::Result<()> {
    for r in records {
        writeln!(out, "{}\t{}", r.sense, r.token)?;
    }
    out.flush()
}

pub fn save_tsv(records: &[ProjectionRecord], path: &Path) -> Result<()> {
    let wrap = |source| LoadError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(wrap)?;
    write_tsv(records, BufWriter::new(file)).map_err(wrap)?;
    log::info!("Saved {} sense projections to {}", records.len(), path.display());
    Ok(())
}
