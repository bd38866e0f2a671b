use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{TranscriptStore, TranscriptStoreError};
use crate::domain::{MergedTranscript, SessionId};

/// Process-local transcript cache. Good enough for a single instance; swap
/// for a database-backed adapter behind the same port when persistence is
/// required across restarts.
#[derive(Default)]
pub struct InMemoryTranscriptStore {
    transcripts: RwLock<HashMap<SessionId, MergedTranscript>>,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn get(
        &self,
        session: &SessionId,
    ) -> Result<Option<MergedTranscript>, TranscriptStoreError> {
        Ok(self.transcripts.read().await.get(session).cloned())
    }

    async fn put(
        &self,
        session: &SessionId,
        transcript: &MergedTranscript,
    ) -> Result<(), TranscriptStoreError> {
        self.transcripts
            .write()
            .await
            .insert(*session, transcript.clone());
        Ok(())
    }
}
