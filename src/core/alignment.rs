// per-sentence alignment link sets
use std::collections::HashSet;
use std::path::Path;

use crate::core::error::{Result, read_file};
use crate::core::types::{Link, SentenceIndex};

/// Links of one sentence in file order. Duplicates are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    links: Vec<Link>,
}

impl Alignment {
    pub fn new(links: Vec<Link>) -> Self {
        Self { links }
    }

    /// Parse `sentence_index<TAB>i-j i-j ...`.
    ///
    /// Never fails: a blank line, a line without exactly one tab, and any token
    /// that is not `int-int` all contribute nothing. The leading index field is
    /// ignored; the line number is the sentence index.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::default();
        }

        let mut parts = line.split('\t');
        let (Some(_index), Some(payload), None) = (parts.next(), parts.next(), parts.next()) else {
            return Self::default();
        };

        let links = payload.split_whitespace().filter_map(parse_link).collect();
        Self { links }
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Set view used for agreement comparisons (duplicates collapse here).
    pub fn link_set(&self) -> HashSet<Link> {
        self.links.iter().copied().collect()
    }
}

fn parse_link(token: &str) -> Option<Link> {
    let mut halves = token.split('-');
    let (Some(src), Some(tgt), None) = (halves.next(), halves.next(), halves.next()) else {
        return None;
    };
    Some(Link::new(src.parse().ok()?, tgt.parse().ok()?))
}

/// One [`Alignment`] per line of an aligner output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentStore {
    alignments: Vec<Alignment>,
}

impl AlignmentStore {
    pub fn new(alignments: Vec<Alignment>) -> Self {
        Self { alignments }
    }

    pub fn parse_str(text: &str) -> Self {
        Self {
            alignments: text.lines().map(Alignment::parse).collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let store = Self::parse_str(&read_file(path)?);
        log::info!(
            "Loaded alignments for {} sentences ({} links) from {}",
            store.len(),
            store.total_links(),
            path.display()
        );
        Ok(store)
    }

    pub fn get(&self, sentence: SentenceIndex) -> Option<&Alignment> {
        self.alignments.get(sentence)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SentenceIndex, &Alignment)> {
        self.alignments.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.alignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alignments.is_empty()
    }

    pub fn total_links(&self) -> usize {
        self.alignments.iter().map(Alignment::len).sum()
    }

    /// 0.0 for an empty store.
    pub fn average_links(&self) -> f64 {
        if self.alignments.is_empty() {
            return 0.0;
        }
        self.total_links() as f64 / self.alignments.len() as f64
    }

    pub fn link_sets(&self) -> Vec<HashSet<Link>> {
        self.alignments.iter().map(Alignment::link_set).collect()
    }
}
