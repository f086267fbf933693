// token substitution table for tokenizer mismatches
/*
Input:

    substitutions.tsv   old<TAB>new per line, `new` may be empty

Responsibilities:

    Rewrite known aligner-side token spellings ("'s" -> "s", "13,000" -> "13000")
    before they are compared against the annotation tokenization

    Stay data-driven: the table is supplied per corpus, nothing is hardcoded
*/
use std::collections::HashMap;
use std::path::Path;

use crate::core::error::{Result, read_file};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    table: HashMap<String, String>,
}

impl Substitutions {
    /// Empty table: every token maps to itself.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            table: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    //lines without a tab are ignored, later rows win
    pub fn parse_str(text: &str) -> Self {
        let mut table = HashMap::new();
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if let Some((old, new)) = line.split_once('\t') {
                if old.is_empty() {
                    continue;
                }
                table.insert(old.to_string(), new.to_string());
            }
        }
        Self { table }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let subs = Self::parse_str(&read_file(path)?);
        log::info!(
            "Loaded {} token substitutions from {}",
            subs.len(),
            path.display()
        );
        Ok(subs)
    }

    pub fn apply<'a>(&'a self, token: &'a str) -> &'a str {
        self.table.get(token).map(String::as_str).unwrap_or(token)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
