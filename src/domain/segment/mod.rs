pub mod segmenter;

pub use segmenter::{segment, split_sentences};
use serde::{Deserialize, Serialize};

/// One speakable chunk of the source text. Indexes start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub index: usize,
    pub text: String,
}

/// How the source text is cut into segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SegmentationMode {
    /// Pack whole sentences up to `max_chars`.
    Sentences { max_chars: usize },
    /// Pack sentences up to `max_chars`, then re-cut each chunk on a word budget.
    SentencesThenWords { max_chars: usize, max_words: usize },
}

impl SegmentationMode {
    pub fn max_chars(&self) -> usize {
        match self {
            SegmentationMode::Sentences { max_chars } => *max_chars,
            SegmentationMode::SentencesThenWords { max_chars, .. } => *max_chars,
        }
    }
}
