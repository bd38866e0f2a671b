use serde::{Deserialize, Serialize};

/// One contiguous span of speech attributed to one speaker.
///
/// Timestamps are session-absolute once past the normalizer. The `id` is
/// chunk-local until the merger renumbers the final transcript 1..N.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub speaker: String,
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl Segment {
    pub fn new(
        id: u32,
        speaker: impl Into<String>,
        text: impl Into<String>,
        start_seconds: f64,
        end_seconds: f64,
    ) -> Self {
        Self {
            id,
            speaker: speaker.into(),
            text: text.into(),
            start_seconds,
            end_seconds,
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}
