use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::ports::{
    BatchTranscriptionProvider, JobConfig, ProviderError, ProviderJobState, ProviderResult,
};
use crate::application::services::ProgressBroadcaster;
use crate::domain::{ProgressStep, SessionId, StatusEvent};

/// Share of the overall progress bar given to chunk processing; probing sits
/// below it, merging above.
const CHUNK_PROGRESS_BASE: f64 = 5.0;
const CHUNK_PROGRESS_SPAN: f64 = 85.0;

/// Drives one provider job through its lifecycle:
/// created -> uploaded -> started -> {queued, processing} -> completed | failed,
/// with a synthetic timed-out terminal when the wall-clock budget runs out.
pub struct JobRunner {
    provider: Arc<dyn BatchTranscriptionProvider>,
    broadcaster: Arc<ProgressBroadcaster>,
    job_config: JobConfig,
    poll_interval: Duration,
    max_wait: Duration,
    settle_delay: Duration,
}

impl JobRunner {
    pub fn new(
        provider: Arc<dyn BatchTranscriptionProvider>,
        broadcaster: Arc<ProgressBroadcaster>,
        job_config: JobConfig,
        poll_interval: Duration,
        max_wait: Duration,
        settle_delay: Duration,
    ) -> Self {
        Self {
            provider,
            broadcaster,
            job_config,
            poll_interval,
            max_wait,
            settle_delay,
        }
    }

    /// Run one chunk's audio through the provider and return its results.
    ///
    /// Unknown provider states keep the poll loop alive; transient poll
    /// errors are absorbed inside the wait budget. Exceeding `max_wait`
    /// before a terminal state is `JobError::TimedOut`, reported distinctly
    /// from a provider-declared failure.
    pub async fn run(
        &self,
        session: &SessionId,
        audio: &[u8],
        chunk_index: usize,
        chunk_count: usize,
    ) -> Result<ProviderResult, JobError> {
        let mut progress = ChunkProgress::new(chunk_index, chunk_count);

        let handle = self.provider.create_job(&self.job_config).await?;
        tracing::debug!(session_id = %session, job = handle.as_str(), "Provider job created");

        self.publish(
            session,
            ProgressStep::Uploading,
            format!("Uploading chunk {}/{}", chunk_index + 1, chunk_count),
            progress.at(0.05),
        );
        self.provider.upload_audio(&handle, audio).await?;
        self.provider.start(&handle).await?;

        self.publish(
            session,
            ProgressStep::Transcribing,
            format!("Transcribing chunk {}/{}", chunk_index + 1, chunk_count),
            progress.at(0.15),
        );

        let started = Instant::now();
        loop {
            let waited = started.elapsed();
            if waited >= self.max_wait {
                tracing::warn!(
                    session_id = %session,
                    job = handle.as_str(),
                    waited_seconds = waited.as_secs(),
                    "Provider job exceeded wait budget"
                );
                return Err(JobError::TimedOut {
                    waited_seconds: waited.as_secs(),
                });
            }

            match self.provider.poll_status(&handle).await {
                Ok(ProviderJobState::Completed) => break,
                Ok(ProviderJobState::Failed) => {
                    return Err(JobError::Provider(ProviderError::Fatal(
                        "provider reported job failure".to_string(),
                    )));
                }
                Ok(state) => {
                    if let ProviderJobState::Unknown(raw) = &state {
                        tracing::debug!(job = handle.as_str(), state = %raw, "Unrecognized provider state, continuing to poll");
                    }
                    // Providers rarely report their own progress; interpolate
                    // from elapsed time against the wait budget instead.
                    let fraction =
                        0.15 + 0.8 * (waited.as_secs_f64() / self.max_wait.as_secs_f64());
                    self.publish(
                        session,
                        ProgressStep::Transcribing,
                        format!("Transcribing chunk {}/{}", chunk_index + 1, chunk_count),
                        progress.at(fraction.min(0.95)),
                    );
                }
                Err(ProviderError::Transient(reason)) => {
                    tracing::warn!(job = handle.as_str(), error = %reason, "Transient poll failure, retrying");
                }
                Err(fatal @ ProviderError::Fatal(_)) => return Err(JobError::Provider(fatal)),
            }

            tokio::time::sleep(self.poll_interval).await;
        }

        // Provider storage is eventually consistent; give results a moment to
        // land before the first fetch.
        tokio::time::sleep(self.settle_delay).await;

        match self.provider.fetch_results(&handle).await {
            Ok(result) => Ok(result),
            Err(ProviderError::Transient(first_reason)) => {
                tracing::warn!(
                    job = handle.as_str(),
                    error = %first_reason,
                    "Results not ready after completion, re-checking once"
                );
                tokio::time::sleep(self.settle_delay).await;
                self.provider
                    .fetch_results(&handle)
                    .await
                    .map_err(|second| JobError::Stuck(format!("{first_reason}; then {second}")))
            }
            Err(fatal) => Err(JobError::Provider(fatal)),
        }
    }

    fn publish(&self, session: &SessionId, step: ProgressStep, message: String, percent: u8) {
        self.broadcaster
            .publish(session, StatusEvent::new(step, message, percent));
    }
}

/// Maps a phase fraction within one chunk onto the session-level progress
/// range, clamped monotone so observers never see the bar move backwards.
struct ChunkProgress {
    base: f64,
    span: f64,
    last: u8,
}

impl ChunkProgress {
    fn new(chunk_index: usize, chunk_count: usize) -> Self {
        let count = chunk_count.max(1) as f64;
        Self {
            base: CHUNK_PROGRESS_BASE + CHUNK_PROGRESS_SPAN * chunk_index as f64 / count,
            span: CHUNK_PROGRESS_SPAN / count,
            last: 0,
        }
    }

    fn at(&mut self, fraction: f64) -> u8 {
        let percent = (self.base + self.span * fraction).round() as u8;
        self.last = self.last.max(percent.min(99));
        self.last
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("provider job did not finish within the wait budget ({waited_seconds}s)")]
    TimedOut { waited_seconds: u64 },
    #[error("job completed but results stayed unavailable: {0}")]
    Stuck(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
