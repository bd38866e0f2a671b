use std::collections::HashSet;

use crate::domain::Segment;

/// Tolerance added to the overlap window when flagging duplicate candidates;
/// provider timestamps near a cut are not exact.
const OVERLAP_SLACK_SECONDS: f64 = 1.0;

/// Approximate, tunable dedup heuristic: the similarity threshold and the
/// number of trailing merged segments compared against are policy, not a
/// verified-optimal choice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergePolicy {
    pub similarity_threshold: f64,
    pub dedup_window: usize,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.8,
            dedup_window: 3,
        }
    }
}

/// Stitches per-chunk segment lists into one deduplicated, speaker-coalesced,
/// sequentially renumbered transcript.
pub struct OverlapMerger {
    chunk_overlap_seconds: f64,
    policy: MergePolicy,
}

impl OverlapMerger {
    pub fn new(chunk_overlap_seconds: f64, policy: MergePolicy) -> Self {
        Self {
            chunk_overlap_seconds,
            policy,
        }
    }

    /// Merge chunk results, input ordered by chunk index.
    ///
    /// The first chunk is taken verbatim. For each later chunk, segments that
    /// start inside the previous chunk's overlap window are compared against
    /// the tail of the merged list by word-set Jaccard similarity and dropped
    /// when they repeat already-kept speech. Same-speaker neighbours are then
    /// coalesced and ids renumbered from 1.
    pub fn merge(&self, chunk_lists: Vec<Vec<Segment>>) -> Result<Vec<Segment>, MergeError> {
        let mut merged: Vec<Segment> = Vec::new();

        for (chunk_index, chunk) in chunk_lists.into_iter().enumerate() {
            if chunk_index == 0 || merged.is_empty() {
                merged.extend(chunk);
                continue;
            }

            // Drift note: the window is anchored on the last merged segment's
            // end, not the nominal chunk boundary, so silence trimmed by the
            // provider shifts the window with the speech that survived.
            let overlap_start = merged
                .last()
                .map(|s| s.end_seconds - self.chunk_overlap_seconds)
                .unwrap_or(0.0);

            for segment in chunk {
                let candidate =
                    segment.start_seconds < overlap_start + OVERLAP_SLACK_SECONDS;
                if candidate && self.repeats_merged_tail(&merged, &segment) {
                    tracing::debug!(
                        chunk = chunk_index,
                        start = segment.start_seconds,
                        "Dropping duplicate segment from overlap window"
                    );
                    continue;
                }
                merged.push(segment);
            }
        }

        if merged.is_empty() {
            return Err(MergeError::NoSegments);
        }

        merged = coalesce_speakers(merged);

        for (index, segment) in merged.iter_mut().enumerate() {
            segment.id = index as u32 + 1;
        }

        Ok(merged)
    }

    fn repeats_merged_tail(&self, merged: &[Segment], incoming: &Segment) -> bool {
        merged
            .iter()
            .rev()
            .take(self.policy.dedup_window)
            .any(|kept| {
                jaccard_similarity(&kept.text, &incoming.text) > self.policy.similarity_threshold
            })
    }
}

/// Word-set Jaccard similarity over lower-cased whitespace-split tokens.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let set_a: HashSet<String> = a.split_whitespace().map(|w| w.to_lowercase()).collect();
    let set_b: HashSet<String> = b.split_whitespace().map(|w| w.to_lowercase()).collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

fn coalesce_speakers(segments: Vec<Segment>) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match out.last_mut() {
            Some(previous) if previous.speaker == segment.speaker => {
                previous.text.push(' ');
                previous.text.push_str(&segment.text);
                previous.end_seconds = previous.end_seconds.max(segment.end_seconds);
            }
            _ => out.push(segment),
        }
    }
    out
}

#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("no segments produced by any chunk")]
    NoSegments,
}
