use super::{Segment, SegmentationMode};
use regex::Regex;
use std::sync::OnceLock;

const SENTENCE_DELIMITER: char = '.';

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern"))
}

/// Split text into sentences on `.` only.
///
/// Each fragment is trimmed, internal whitespace (newlines from the uploaded
/// file included) collapses to single spaces, empty fragments are dropped and
/// a terminating `.` is put back.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(SENTENCE_DELIMITER)
        .map(|fragment| whitespace_pattern().replace_all(fragment.trim(), " "))
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("{fragment}{SENTENCE_DELIMITER}"))
        .collect()
}

/// Cut `text` into ordered, 1-indexed segments.
///
/// The character bound is soft: a sentence longer than `max_chars` becomes
/// its own chunk. In `SentencesThenWords` mode the word bound is hard.
pub fn segment(text: &str, mode: SegmentationMode) -> Vec<Segment> {
    let sentences = split_sentences(text);
    let chunks = pack_sentences(&sentences, mode.max_chars());

    let chunks = match mode {
        SegmentationMode::Sentences { .. } => chunks,
        SegmentationMode::SentencesThenWords { max_words, .. } => chunks
            .iter()
            .flat_map(|chunk| pack_words(chunk, max_words))
            .collect(),
    };

    tracing::debug!(
        sentence_count = sentences.len(),
        segment_count = chunks.len(),
        ?mode,
        "Text segmented"
    );

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, text)| Segment { index: i + 1, text })
        .collect()
}

fn pack_sentences(sentences: &[String], max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in sentences {
        let sentence_len = sentence.chars().count();

        if current.is_empty() {
            current.push_str(sentence);
            current_len = sentence_len;
        } else if current_len + 1 + sentence_len <= max_chars {
            current.push(' ');
            current.push_str(sentence);
            current_len += 1 + sentence_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(sentence);
            current_len = sentence_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

fn pack_words(chunk: &str, max_words: usize) -> Vec<String> {
    let max_words = max_words.max(1);
    chunk
        .split_whitespace()
        .collect::<Vec<_>>()
        .chunks(max_words)
        .map(|words| words.join(" "))
        .collect()
}
