use crate::application::ports::ProviderResult;
use crate::domain::Segment;

/// Seconds of speech grouped into one segment when only word-level timing is
/// available.
const WORD_GROUP_SPAN_SECONDS: f64 = 10.0;

const DEFAULT_SPEAKER: &str = "Speaker 1";

/// Converts provider output into canonical segments: applies the window
/// offset so chunk-local times become session-absolute, canonicalizes speaker
/// labels, and drops entries too short or empty to keep.
pub struct SegmentNormalizer {
    min_segment_duration: f64,
}

impl SegmentNormalizer {
    pub fn new(min_segment_duration: f64) -> Self {
        Self {
            min_segment_duration,
        }
    }

    /// Normalize one chunk's provider result.
    ///
    /// Preference order: diarized entries, then word-level timing grouped
    /// into ~10s spans, then the whole-chunk transcript under a default
    /// speaker label. The last is degraded-but-valid output, not an error.
    ///
    /// Speaker labels are stable within one call (first speaker seen becomes
    /// "Speaker 1") but not across independently submitted chunks; the merger
    /// resolves that.
    pub fn normalize(
        &self,
        result: &ProviderResult,
        offset_seconds: f64,
        window_duration_seconds: f64,
    ) -> Vec<Segment> {
        let mut segments = if !result.entries.is_empty() {
            self.from_diarized_entries(result, offset_seconds)
        } else if !result.words.is_empty() {
            self.from_words(result, offset_seconds)
        } else {
            self.whole_chunk_fallback(result, offset_seconds, window_duration_seconds)
        };

        segments.retain(|s| {
            !s.text.is_empty() && s.duration_seconds() >= self.min_segment_duration
        });

        for (index, segment) in segments.iter_mut().enumerate() {
            segment.id = index as u32 + 1;
        }

        segments
    }

    fn from_diarized_entries(&self, result: &ProviderResult, offset: f64) -> Vec<Segment> {
        let mut speakers_seen: Vec<String> = Vec::new();
        result
            .entries
            .iter()
            .map(|entry| {
                let speaker = match &entry.speaker {
                    Some(raw) => {
                        let position = match speakers_seen.iter().position(|s| s == raw) {
                            Some(p) => p,
                            None => {
                                speakers_seen.push(raw.clone());
                                speakers_seen.len() - 1
                            }
                        };
                        format!("Speaker {}", position + 1)
                    }
                    None => DEFAULT_SPEAKER.to_string(),
                };
                Segment::new(
                    0,
                    speaker,
                    entry.text.trim(),
                    entry.start_seconds + offset,
                    entry.end_seconds + offset,
                )
            })
            .collect()
    }

    fn from_words(&self, result: &ProviderResult, offset: f64) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut group: Vec<&str> = Vec::new();
        let mut group_start = offset;
        let mut group_end = offset;

        for word in &result.words {
            let word_start = word.start_seconds + offset;
            if !group.is_empty() && word_start - group_start > WORD_GROUP_SPAN_SECONDS {
                segments.push(Segment::new(
                    0,
                    DEFAULT_SPEAKER,
                    group.join(" "),
                    group_start,
                    group_end,
                ));
                group.clear();
                group_start = word_start;
            }
            if group.is_empty() {
                group_start = word_start;
            }
            group_end = word.end_seconds + offset;
            group.push(word.text.as_str());
        }

        if !group.is_empty() {
            segments.push(Segment::new(
                0,
                DEFAULT_SPEAKER,
                group.join(" "),
                group_start,
                group_end,
            ));
        }

        segments
    }

    fn whole_chunk_fallback(
        &self,
        result: &ProviderResult,
        offset: f64,
        window_duration: f64,
    ) -> Vec<Segment> {
        let text = result.transcript.trim();
        if text.is_empty() {
            return Vec::new();
        }
        tracing::debug!("Provider returned no diarization or word timing; using whole-chunk segment");
        vec![Segment::new(
            0,
            DEFAULT_SPEAKER,
            text,
            offset,
            offset + window_duration,
        )]
    }
}
