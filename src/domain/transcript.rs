use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Segment;

/// Final stitched transcript: segments in start order, ids 1..N, no two
/// adjacent segments sharing a speaker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedTranscript {
    pub segments: Vec<Segment>,
    pub total_duration_seconds: f64,
    pub generated_at: DateTime<Utc>,
}

impl MergedTranscript {
    pub fn new(segments: Vec<Segment>, total_duration_seconds: f64) -> Self {
        Self {
            segments,
            total_duration_seconds,
            generated_at: Utc::now(),
        }
    }
}

/// Render seconds as an `HH:MM:SS` display timestamp.
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
