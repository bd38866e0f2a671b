use std::sync::Arc;

use crate::application::ports::TranscriptStore;
use crate::application::services::{ProgressBroadcaster, TranscriptionService};

#[derive(Clone)]
pub struct AppState {
    pub transcription_service: Arc<TranscriptionService>,
    pub transcript_store: Arc<dyn TranscriptStore>,
    pub broadcaster: Arc<ProgressBroadcaster>,
}
