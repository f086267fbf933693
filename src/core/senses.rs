// gold sense table + per-sentence mention index
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use crate::core::annotation::AnnotationCorpus;
use crate::core::error::{Result, read_file};
use crate::core::types::{Position, SentenceIndex};

/// One line of a sense key file: `instance_id label [label...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenseKeyEntry {
    pub instance_id: String,
    pub labels: Vec<String>,
}

impl SenseKeyEntry {
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let instance_id = fields.next()?.to_string();
        Some(Self {
            instance_id,
            labels: fields.map(str::to_string).collect(),
        })
    }
}

/// An annotation position carrying an instance id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub position: Position,
    pub instance_id: String,
}

/// Instance -> sense lookups with the ambiguity policy applied at load time.
///
/// An instance gets a sense only if all key lines for it together name exactly
/// one distinct label. Instances with several labels are kept out of the map
/// entirely and only counted.
#[derive(Debug, Clone, Default)]
pub struct SenseIndex {
    senses: HashMap<String, String>,
    ambiguous: BTreeSet<String>,
    mentions: Vec<Vec<Mention>>,
}

impl SenseIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_senses<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = SenseKeyEntry>,
    {
        let mut labels: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for e in entries {
            labels.entry(e.instance_id).or_default().extend(e.labels);
        }

        self.senses.clear();
        self.ambiguous.clear();
        for (instance_id, set) in labels {
            match set.len() {
                0 => {}
                1 => {
                    if let Some(label) = set.into_iter().next() {
                        self.senses.insert(instance_id, label);
                    }
                }
                _ => {
                    self.ambiguous.insert(instance_id);
                }
            }
        }
    }

    pub fn load_key_file(&mut self, path: &Path) -> Result<()> {
        let text = read_file(path)?;
        self.load_senses(text.lines().filter_map(SenseKeyEntry::parse));
        log::info!(
            "Loaded {} unambiguous senses ({} multi-sense instances excluded) from {}",
            self.senses.len(),
            self.ambiguous.len(),
            path.display()
        );
        Ok(())
    }

    pub fn load_mentions(&mut self, corpus: &AnnotationCorpus) {
        self.mentions = corpus
            .iter()
            .map(|(_, sentence)| {
                sentence
                    .instances
                    .iter()
                    .enumerate()
                    .filter_map(|(position, id)| {
                        id.as_ref().map(|id| Mention {
                            position,
                            instance_id: id.clone(),
                        })
                    })
                    .collect()
            })
            .collect();
    }

    pub fn instance_at(&self, sentence: SentenceIndex, position: Position) -> Option<&str> {
        let mentions = self.mentions.get(sentence)?;
        let i = mentions
            .binary_search_by_key(&position, |m| m.position)
            .ok()?;
        Some(mentions[i].instance_id.as_str())
    }

    pub fn sense_of(&self, instance_id: &str) -> Option<&str> {
        self.senses.get(instance_id).map(String::as_str)
    }

    pub fn mention_count(&self, sentence: SentenceIndex, instance_id: &str) -> usize {
        self.mentions
            .get(sentence)
            .map(|ms| ms.iter().filter(|m| m.instance_id == instance_id).count())
            .unwrap_or(0)
    }

    pub fn is_ambiguous(&self, instance_id: &str) -> bool {
        self.ambiguous.contains(instance_id)
    }

    pub fn sense_count(&self) -> usize {
        self.senses.len()
    }

    pub fn ambiguous_count(&self) -> usize {
        self.ambiguous.len()
    }

    /// Instance ids mentioned more than once within a single sentence, summed over sentences.
    pub fn duplicate_mention_count(&self) -> usize {
        self.mentions
            .iter()
            .map(|ms| {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for m in ms {
                    *counts.entry(m.instance_id.as_str()).or_default() += 1;
                }
                counts.values().filter(|&&c| c > 1).count()
            })
            .sum()
    }
}
