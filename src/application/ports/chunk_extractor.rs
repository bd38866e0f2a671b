use std::path::Path;

use async_trait::async_trait;

use crate::domain::AudioWindow;

/// Produces a standalone, normalized-format audio artifact for one window of
/// the source recording.
#[async_trait]
pub trait ChunkExtractor: Send + Sync {
    async fn extract(
        &self,
        source: &Path,
        window: &AudioWindow,
        destination: &Path,
    ) -> Result<(), ExtractError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("extraction command failed: {0}")]
    CommandFailed(String),
    #[error("extraction timed out")]
    TimedOut,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
