use async_trait::async_trait;

use crate::domain::{MergedTranscript, SessionId};

/// Key-value transcript cache keyed by session, used for cache-or-generate
/// semantics. Persistence is owned by the adapter, not the pipeline.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn get(&self, session: &SessionId) -> Result<Option<MergedTranscript>, TranscriptStoreError>;

    async fn put(
        &self,
        session: &SessionId,
        transcript: &MergedTranscript,
    ) -> Result<(), TranscriptStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptStoreError {
    #[error("store read failed: {0}")]
    ReadFailed(String),
    #[error("store write failed: {0}")]
    WriteFailed(String),
}
