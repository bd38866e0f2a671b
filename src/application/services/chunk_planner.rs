use crate::domain::{AudioWindow, ChunkPlan};

/// Tunable chunking policy. The ceiling on chunk count protects against
/// runaway provider usage for absurdly long inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkPolicy {
    pub threshold_seconds: f64,
    pub batch_max_duration_seconds: f64,
    pub overlap_seconds: f64,
    pub max_chunks: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            threshold_seconds: 3600.0,
            batch_max_duration_seconds: 3300.0,
            overlap_seconds: 30.0,
            max_chunks: 48,
        }
    }
}

/// Decides single-job vs multi-chunk processing and computes window
/// boundaries with overlap.
pub struct ChunkPlanner {
    policy: ChunkPolicy,
}

impl ChunkPlanner {
    pub fn new(policy: ChunkPolicy) -> Self {
        Self { policy }
    }

    /// Plan provider-sized windows over `[0, total_duration_seconds]`.
    ///
    /// Recordings at or below the chunking threshold become one window and
    /// are submitted as a single job. Longer recordings are cut with stride
    /// `L - O` and span `L + O` (clamped at the tail), so speech straddling
    /// a cut is fully captured in at least one window.
    pub fn plan(&self, total_duration_seconds: f64) -> Result<ChunkPlan, PlanError> {
        if total_duration_seconds <= 0.0 {
            return Err(PlanError::InvalidDuration(total_duration_seconds));
        }

        if total_duration_seconds <= self.policy.threshold_seconds {
            return Ok(ChunkPlan {
                total_duration_seconds,
                windows: vec![AudioWindow::new(0.0, total_duration_seconds)],
            });
        }

        let chunk_length = self.policy.batch_max_duration_seconds;
        let overlap = self.policy.overlap_seconds;
        let stride = chunk_length - overlap;

        let count = ((total_duration_seconds - overlap) / stride).floor() as usize + 1;
        if count > self.policy.max_chunks {
            return Err(PlanError::TooLarge {
                chunks: count,
                max: self.policy.max_chunks,
            });
        }

        let mut windows = Vec::with_capacity(count);
        for i in 0..count {
            let start = i as f64 * stride;
            let duration = (chunk_length + overlap).min(total_duration_seconds - start);
            windows.push(AudioWindow::new(start, duration));
        }

        tracing::debug!(
            total_seconds = total_duration_seconds,
            chunks = count,
            "Planned chunked transcription"
        );

        Ok(ChunkPlan {
            total_duration_seconds,
            windows,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("recording would need {chunks} chunks, above the configured ceiling of {max}")]
    TooLarge { chunks: usize, max: usize },
    #[error("invalid audio duration: {0}s")]
    InvalidDuration(f64),
}
