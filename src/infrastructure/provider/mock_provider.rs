use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::ports::{
    BatchTranscriptionProvider, JobConfig, JobHandle, ProviderError, ProviderJobState,
    ProviderResult,
};

/// Scripted provider for tests: polls drain a queue of states (the last one
/// repeats), results and fetch failures are pre-arranged.
pub struct MockBatchProvider {
    poll_states: Mutex<Vec<ProviderJobState>>,
    result: Result<ProviderResult, String>,
    fetch_failures_before_success: Mutex<usize>,
    pub uploads: Mutex<Vec<usize>>,
}

impl MockBatchProvider {
    pub fn completing_with(result: ProviderResult) -> Self {
        Self {
            poll_states: Mutex::new(vec![
                ProviderJobState::Queued,
                ProviderJobState::Processing,
                ProviderJobState::Completed,
            ]),
            result: Ok(result),
            fetch_failures_before_success: Mutex::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_job() -> Self {
        Self {
            poll_states: Mutex::new(vec![
                ProviderJobState::Queued,
                ProviderJobState::Failed,
            ]),
            result: Err("job failed".to_string()),
            fetch_failures_before_success: Mutex::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn never_completing() -> Self {
        Self {
            poll_states: Mutex::new(vec![ProviderJobState::Processing]),
            result: Err("never completes".to_string()),
            fetch_failures_before_success: Mutex::new(0),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_poll_states(mut self, states: Vec<ProviderJobState>) -> Self {
        self.poll_states = Mutex::new(states);
        self
    }

    pub fn with_fetch_failures(self, failures: usize) -> Self {
        *self
            .fetch_failures_before_success
            .lock()
            .expect("mock mutex poisoned") = failures;
        self
    }
}

#[async_trait]
impl BatchTranscriptionProvider for MockBatchProvider {
    async fn create_job(&self, _config: &JobConfig) -> Result<JobHandle, ProviderError> {
        Ok(JobHandle::new("mock-job-1"))
    }

    async fn upload_audio(&self, _handle: &JobHandle, audio: &[u8]) -> Result<(), ProviderError> {
        self.uploads
            .lock()
            .expect("mock mutex poisoned")
            .push(audio.len());
        Ok(())
    }

    async fn start(&self, _handle: &JobHandle) -> Result<(), ProviderError> {
        Ok(())
    }

    async fn poll_status(&self, _handle: &JobHandle) -> Result<ProviderJobState, ProviderError> {
        let mut states = self.poll_states.lock().expect("mock mutex poisoned");
        if states.len() > 1 {
            Ok(states.remove(0))
        } else {
            Ok(states
                .first()
                .cloned()
                .unwrap_or(ProviderJobState::Processing))
        }
    }

    async fn fetch_results(&self, _handle: &JobHandle) -> Result<ProviderResult, ProviderError> {
        let mut failures = self
            .fetch_failures_before_success
            .lock()
            .expect("mock mutex poisoned");
        if *failures > 0 {
            *failures -= 1;
            return Err(ProviderError::Transient("results not ready".to_string()));
        }
        match &self.result {
            Ok(result) => Ok(result.clone()),
            Err(message) => Err(ProviderError::Fatal(message.clone())),
        }
    }
}
