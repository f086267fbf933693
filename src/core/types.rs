// shared value types
use serde::Serialize;

/// 0-based index into one tokenization of one sentence.
pub type Position = usize;

/// Line index of a sentence in the aligner/token files.
pub type SentenceIndex = usize;

/// One alignment link: aligner-source position -> aligner-target position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Link {
    pub source: Position,
    pub target: Position,
}

impl Link {
    pub fn new(source: Position, target: Position) -> Self {
        Self { source, target }
    }
}

/// (sense label, case-folded target token) emitted by the projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectionRecord {
    pub sense: String,
    pub token: String,
}

impl ProjectionRecord {
    pub fn new(sense: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            sense: sense.into(),
            token: token.into(),
        }
    }
}

/// A link rendered with the token texts on both sides, `???` when a side is out of range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkView {
    pub source: Position,
    pub target: Position,
    pub source_text: String,
    pub target_text: String,
}

impl LinkView {
    pub fn new(link: Link, source: &[String], target: &[String]) -> Self {
        Self {
            source: link.source,
            target: link.target,
            source_text: token_or_unknown(source, link.source),
            target_text: token_or_unknown(target, link.target),
        }
    }
}

pub(crate) fn token_or_unknown(tokens: &[String], pos: Position) -> String {
    tokens.get(pos).cloned().unwrap_or_else(|| "???".to_string())
}

/// Case folding used for every token comparison and for projected target text.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// `[0]The [1]cat ...`
pub fn indexed_tokens(tokens: &[String]) -> String {
    tokens
        .iter()
        .enumerate()
        .map(|(i, t)| format!("[{i}]{t}"))
        .collect::<Vec<_>>()
        .join(" ")
}
