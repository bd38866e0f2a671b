/// One bounded slice of the source recording, sized to fit provider limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioWindow {
    pub start_seconds: f64,
    pub duration_seconds: f64,
}

impl AudioWindow {
    pub fn new(start_seconds: f64, duration_seconds: f64) -> Self {
        debug_assert!(start_seconds >= 0.0);
        debug_assert!(duration_seconds > 0.0);
        Self {
            start_seconds,
            duration_seconds,
        }
    }

    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.duration_seconds
    }
}

/// Ordered windows covering the full recording, produced by the chunk planner.
/// Consecutive windows overlap so boundary speech is captured whole in at
/// least one of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPlan {
    pub total_duration_seconds: f64,
    pub windows: Vec<AudioWindow>,
}

impl ChunkPlan {
    pub fn is_single(&self) -> bool {
        self.windows.len() == 1
    }

    pub fn chunk_count(&self) -> usize {
        self.windows.len()
    }
}
