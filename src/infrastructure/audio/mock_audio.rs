use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{ChunkExtractor, DurationProber, ExtractError, ProbeError};
use crate::domain::AudioWindow;

/// Prober returning a fixed duration, or a fixed failure.
pub struct MockDurationProber {
    outcome: Result<f64, String>,
}

impl MockDurationProber {
    pub fn returning(duration_seconds: f64) -> Self {
        Self {
            outcome: Ok(duration_seconds),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

#[async_trait]
impl DurationProber for MockDurationProber {
    async fn probe(&self, _artifact: &Path) -> Result<f64, ProbeError> {
        match &self.outcome {
            Ok(duration) => Ok(*duration),
            Err(message) => Err(ProbeError::Unreadable(message.clone())),
        }
    }
}

/// Extractor that writes a placeholder artifact and records the windows it
/// was asked for.
#[derive(Default)]
pub struct MockChunkExtractor {
    pub extracted_windows: Mutex<Vec<AudioWindow>>,
}

#[async_trait]
impl ChunkExtractor for MockChunkExtractor {
    async fn extract(
        &self,
        _source: &Path,
        window: &AudioWindow,
        destination: &Path,
    ) -> Result<(), ExtractError> {
        self.extracted_windows
            .lock()
            .expect("extractor mutex poisoned")
            .push(*window);
        tokio::fs::write(destination, b"mock pcm audio").await?;
        Ok(())
    }
}
