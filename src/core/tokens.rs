// plain-text token files: one sentence per line, space separated
use std::path::Path;

use crate::core::error::{Result, read_file};
use crate::core::types::{Position, SentenceIndex};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCorpus {
    sentences: Vec<Vec<String>>,
}

impl TokenCorpus {
    pub fn new(sentences: Vec<Vec<String>>) -> Self {
        Self { sentences }
    }

    /// Blank lines are kept as empty sentences so line numbers stay sentence indices.
    pub fn parse_str(text: &str) -> Self {
        Self {
            sentences: text
                .lines()
                .map(|line| line.split_whitespace().map(str::to_string).collect())
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let corpus = Self::parse_str(&read_file(path)?);
        log::info!("Loaded {} sentences from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    pub fn get(&self, sentence: SentenceIndex) -> Option<&[String]> {
        self.sentences.get(sentence).map(Vec::as_slice)
    }

    pub fn token(&self, sentence: SentenceIndex, pos: Position) -> Option<&str> {
        self.get(sentence)?.get(pos).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SentenceIndex, &[String])> {
        self.sentences.iter().map(Vec::as_slice).enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_stay_as_empty_sentences() {
        let corpus = TokenCorpus::parse_str("The cat sat\n\n  A  dog \n");
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.get(1), Some(&[][..]));
        assert_eq!(corpus.token(2, 1), Some("dog"));
        assert_eq!(corpus.token(0, 3), None);
        assert_eq!(corpus.token(9, 0), None);
    }
}
