//! # Sense projection
//!
//! Cross-lingual annotation transfer over word alignments, plus structural
//! diagnostics of alignment quality when no gold alignment exists.
//!
//! ```text
//! annotation table ──> AnnotationCorpus ──┐
//! sense key file   ──> SenseIndex ────────┤
//! alignment file   ──> AlignmentStore ────┼──> Snapshot (immutable)
//! token files      ──> TokenCorpus x2 ────┤        │
//! substitutions    ──> Substitutions ─────┘        │
//!                                                  ├──> ProjectionEngine
//!                                                  │      ├─ TokenReconciler (aligner pos -> annotation pos)
//!                                                  │      └─ (sense, target token) records
//!                                                  │
//!                                                  └──> AlignmentQualityAnalyzer
//!                                                         ├─ coverage, topology, crossings, chains
//!                                                         └─ cross-method Jaccard agreement
//! ```

pub mod config;
pub mod core;
pub mod mapping;
pub mod report;

pub use crate::config::AnalyzerConfig;
pub use crate::core::alignment::{Alignment, AlignmentStore};
pub use crate::core::annotation::{AnnotatedSentence, AnnotationCorpus, AnnotationRecord};
pub use crate::core::classify::{Topology, TopologyCounts};
pub use crate::core::delta::{Agreement, jaccard};
pub use crate::core::error::{LoadError, Result};
pub use crate::core::mapping::{ReconciliationMap, TokenReconciler};
pub use crate::core::propagate::{
    Projection, ProjectionEngine, ProjectionStats, ProjectionSummary, SentenceTrace, save_tsv,
    write_tsv,
};
pub use crate::core::quality::AlignmentQualityAnalyzer;
pub use crate::core::senses::{SenseIndex, SenseKeyEntry};
pub use crate::core::snapshot::{InputPaths, Snapshot};
pub use crate::core::tokens::TokenCorpus;
pub use crate::core::types::{Link, Position, ProjectionRecord, SentenceIndex};
pub use crate::mapping::Substitutions;
pub use crate::report::{QualityReport, ReportFormat};
