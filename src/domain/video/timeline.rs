use crate::domain::tts::SynthesisResult;
use image::RgbImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Speech { segment_index: usize },
    Promotional,
}

/// One still image shown for `duration_seconds`, with its narration if any.
#[derive(Debug)]
pub struct TimelineEntry {
    pub start_offset_seconds: f64,
    pub duration_seconds: f64,
    pub image: RgbImage,
    /// `None` for the promotional card, which plays over silence.
    pub audio: Option<SynthesisResult>,
    pub kind: EntryKind,
}

impl TimelineEntry {
    pub fn end_offset_seconds(&self) -> f64 {
        self.start_offset_seconds + self.duration_seconds
    }
}

/// Contiguous, non-overlapping sequence of entries.
///
/// Offsets are assigned here and nowhere else: every push starts at the
/// running total of what came before. Dropping the timeline releases every
/// temporary audio file it holds.
#[derive(Debug, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    cursor: f64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_speech(&mut self, segment_index: usize, image: RgbImage, audio: SynthesisResult) {
        let duration = audio.duration_seconds;
        self.push(EntryKind::Speech { segment_index }, duration, image, Some(audio));
    }

    pub fn push_promotional(&mut self, image: RgbImage, duration_seconds: f64) {
        self.push(EntryKind::Promotional, duration_seconds, image, None);
    }

    fn push(
        &mut self,
        kind: EntryKind,
        duration_seconds: f64,
        image: RgbImage,
        audio: Option<SynthesisResult>,
    ) {
        let duration_seconds = duration_seconds.max(0.0);
        self.entries.push(TimelineEntry {
            start_offset_seconds: self.cursor,
            duration_seconds,
            image,
            audio,
            kind,
        });
        self.cursor += duration_seconds;
    }

    pub fn total_duration(&self) -> f64 {
        self.cursor
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn speech_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, EntryKind::Speech { .. }))
            .count()
    }

    /// Cut the timeline down to `cap` seconds.
    ///
    /// Entries starting at or after the cap are dropped (their audio files go
    /// with them); the entry straddling the cap is clipped. Returns whether
    /// anything changed.
    pub fn truncate(&mut self, cap: f64) -> bool {
        let cap = cap.max(0.0);
        if self.cursor <= cap {
            return false;
        }

        self.entries.retain(|e| e.start_offset_seconds < cap);
        if let Some(last) = self.entries.last_mut() {
            last.duration_seconds = last.duration_seconds.min(cap - last.start_offset_seconds);
        }
        self.cursor = self
            .entries
            .last()
            .map(TimelineEntry::end_offset_seconds)
            .unwrap_or(0.0);

        tracing::info!(
            cap_secs = cap,
            entries = self.entries.len(),
            "Timeline truncated to duration cap"
        );
        true
    }

    pub fn into_entries(self) -> Vec<TimelineEntry> {
        self.entries
    }
}
