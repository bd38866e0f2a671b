use async_trait::async_trait;

use super::ProviderResult;

/// Uniform surface over an external batch speech-to-text capability.
///
/// Pure protocol boundary: no chunking, stitching, or retry policy lives
/// here, so the provider can be swapped without touching the pipeline.
#[async_trait]
pub trait BatchTranscriptionProvider: Send + Sync {
    async fn create_job(&self, config: &JobConfig) -> Result<JobHandle, ProviderError>;

    async fn upload_audio(&self, handle: &JobHandle, audio: &[u8]) -> Result<(), ProviderError>;

    async fn start(&self, handle: &JobHandle) -> Result<(), ProviderError>;

    async fn poll_status(&self, handle: &JobHandle) -> Result<ProviderJobState, ProviderError>;

    async fn fetch_results(&self, handle: &JobHandle) -> Result<ProviderResult, ProviderError>;
}

/// Opaque provider-side job identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct JobConfig {
    pub language_code: String,
    pub model: String,
    pub with_diarization: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            language_code: "en-IN".to_string(),
            model: "saarika:v2.5".to_string(),
            with_diarization: true,
        }
    }
}

/// Provider-reported lifecycle state. Unrecognized states are carried as
/// `Unknown` and treated as still-in-progress by the job runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderJobState {
    Created,
    Uploaded,
    Queued,
    Processing,
    Completed,
    Failed,
    Unknown(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Network trouble or provider-side throttling; safe for the caller to
    /// retry at the whole-run level.
    #[error("transient provider error: {0}")]
    Transient(String),
    /// Auth, malformed input, or a provider-declared failure. Never retried.
    #[error("fatal provider error: {0}")]
    Fatal(String),
}
