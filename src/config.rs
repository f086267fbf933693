//! Analyzer settings, optionally read from a TOML file.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{LoadError, Result, read_file};

pub const DEFAULT_CHAIN_THRESHOLD: usize = 5;

const DEFAULT_FUNCTION_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "were", "of", "to", "in", "for", "on", "with", "at", "by",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Degrees above this are flagged as suspicious chains.
    pub chain_threshold: usize,
    /// Compared against case-folded source tokens.
    pub function_words: Vec<String>,
    pub unaligned_examples: usize,
    pub inspection_samples: usize,
    pub sample_seed: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            chain_threshold: DEFAULT_CHAIN_THRESHOLD,
            function_words: DEFAULT_FUNCTION_WORDS.iter().map(|w| w.to_string()).collect(),
            unaligned_examples: 5,
            inspection_samples: 10,
            sample_seed: 42,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| LoadError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let cfg = Self::from_toml(&read_file(path)?, path)?;
        log::info!("Loaded analyzer config from {}", path.display());
        Ok(cfg)
    }
}
