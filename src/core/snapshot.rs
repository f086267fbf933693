// immutable inputs shared by projection and quality analysis
use std::path::PathBuf;

use crate::core::alignment::AlignmentStore;
use crate::core::annotation::AnnotationCorpus;
use crate::core::error::Result;
use crate::core::senses::SenseIndex;
use crate::core::tokens::TokenCorpus;
use crate::mapping::Substitutions;

/// Paths of everything a projection run reads.
#[derive(Debug, Clone)]
pub struct InputPaths {
    pub annotations: PathBuf,
    pub key: PathBuf,
    pub alignments: PathBuf,
    pub source: PathBuf,
    pub target: PathBuf,
    pub substitutions: Option<PathBuf>,
}

/// All stores, loaded once. Consumers only ever borrow it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub annotations: AnnotationCorpus,
    pub senses: SenseIndex,
    pub alignments: AlignmentStore,
    pub source: TokenCorpus,
    pub target: TokenCorpus,
    pub substitutions: Substitutions,
}

impl Snapshot {
    pub fn new(
        annotations: AnnotationCorpus,
        mut senses: SenseIndex,
        alignments: AlignmentStore,
        source: TokenCorpus,
        target: TokenCorpus,
        substitutions: Substitutions,
    ) -> Self {
        senses.load_mentions(&annotations);
        let snapshot = Self {
            annotations,
            senses,
            alignments,
            source,
            target,
            substitutions,
        };
        snapshot.warn_on_size_mismatch();
        snapshot
    }

    /// Any missing required file aborts the whole load.
    pub fn load(paths: &InputPaths) -> Result<Self> {
        let annotations = AnnotationCorpus::load(&paths.annotations)?;
        let mut senses = SenseIndex::new();
        senses.load_key_file(&paths.key)?;
        let alignments = AlignmentStore::load(&paths.alignments)?;
        let source = TokenCorpus::load(&paths.source)?;
        let target = TokenCorpus::load(&paths.target)?;
        let substitutions = match &paths.substitutions {
            Some(p) => Substitutions::load(p)?,
            None => Substitutions::identity(),
        };

        Ok(Self::new(
            annotations,
            senses,
            alignments,
            source,
            target,
            substitutions,
        ))
    }

    fn warn_on_size_mismatch(&self) {
        let sizes = [
            ("annotation", self.annotations.len()),
            ("alignment", self.alignments.len()),
            ("source token", self.source.len()),
            ("target token", self.target.len()),
        ];
        let expected = sizes[1].1;
        for (name, n) in sizes {
            if n != expected {
                log::warn!(
                    "{name} input has {n} sentences but alignments have {expected}; missing sentences are skipped"
                );
            }
        }
    }
}
