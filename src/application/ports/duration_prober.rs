use std::path::Path;

use async_trait::async_trait;

/// Reads the duration of an audio artifact without decoding it.
#[async_trait]
pub trait DurationProber: Send + Sync {
    async fn probe(&self, artifact: &Path) -> Result<f64, ProbeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("artifact unreadable: {0}")]
    Unreadable(String),
    #[error("probe command failed: {0}")]
    CommandFailed(String),
    #[error("probe timed out")]
    TimedOut,
}
