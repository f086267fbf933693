// annotation table: ordered (sentence_id, instance_id?, token) records
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::{Result, read_file};
use crate::core::types::SentenceIndex;

/// One row of the annotation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    pub sentence_id: String,
    pub instance_id: Option<String>,
    pub text: String,
}

impl AnnotationRecord {
    pub fn new(
        sentence_id: impl Into<String>,
        instance_id: Option<&str>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sentence_id: sentence_id.into(),
            instance_id: instance_id.map(str::to_string),
            text: text.into(),
        }
    }

    /// `sentence_id<TAB>instance_id<TAB>token_text`; `None` for short rows and the header row.
    pub fn parse_tsv_row(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut fields = line.splitn(3, '\t');
        let sentence_id = fields.next()?.trim();
        let instance_id = fields.next()?.trim();
        let text = fields.next()?.trim();

        if sentence_id.is_empty() || sentence_id == "sentence_id" {
            return None;
        }

        let instance_id = match instance_id {
            "" | "-" | "None" | "nan" => None,
            id => Some(id),
        };
        Some(Self::new(sentence_id, instance_id, text))
    }
}

/// Tokens and instance ids of one sentence, addressed by annotation position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedSentence {
    pub id: String,
    pub tokens: Vec<String>,
    pub instances: Vec<Option<String>>,
}

impl AnnotatedSentence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Annotation records grouped per sentence.
///
/// Sentence index = rank of the sentence id in sorted order, which is the
/// order the aligner token files were written in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationCorpus {
    sentences: Vec<AnnotatedSentence>,
}

impl AnnotationCorpus {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = AnnotationRecord>,
    {
        let mut grouped: BTreeMap<String, AnnotatedSentence> = BTreeMap::new();
        for r in records {
            let sentence = grouped
                .entry(r.sentence_id.clone())
                .or_insert_with(|| AnnotatedSentence {
                    id: r.sentence_id.clone(),
                    ..Default::default()
                });
            sentence.tokens.push(r.text);
            sentence.instances.push(r.instance_id);
        }
        Self {
            sentences: grouped.into_values().collect(),
        }
    }

    pub fn parse_tsv(text: &str) -> Self {
        Self::from_records(text.lines().filter_map(AnnotationRecord::parse_tsv_row))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let corpus = Self::parse_tsv(&read_file(path)?);
        log::info!(
            "Loaded annotation table for {} sentences from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }

    pub fn get(&self, sentence: SentenceIndex) -> Option<&AnnotatedSentence> {
        self.sentences.get(sentence)
    }

    pub fn index_of(&self, sentence_id: &str) -> Option<SentenceIndex> {
        self.sentences
            .binary_search_by(|s| s.id.as_str().cmp(sentence_id))
            .ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SentenceIndex, &AnnotatedSentence)> {
        self.sentences.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}
