use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::application::ports::{
    BatchTranscriptionProvider, ChunkExtractor, DurationProber, ExtractError, JobConfig,
    ProbeError, TranscriptStore, TranscriptStoreError,
};
use crate::application::services::{
    ChunkPlanner, ChunkPolicy, JobError, JobRunner, MergeError, MergePolicy, OverlapMerger,
    PlanError, ProgressBroadcaster, SegmentNormalizer,
};
use crate::domain::{ChunkPlan, MergedTranscript, ProgressStep, Segment, SessionId, StatusEvent};

/// Timing knobs for the per-job lifecycle and inter-chunk pacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunPolicy {
    pub poll_interval: Duration,
    pub max_wait: Duration,
    pub settle_delay: Duration,
    pub inter_chunk_delay: Duration,
    pub min_segment_duration: f64,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            max_wait: Duration::from_secs(600),
            settle_delay: Duration::from_secs(2),
            inter_chunk_delay: Duration::from_secs(1),
            min_segment_duration: 0.5,
        }
    }
}

/// Top-level coordinator: probe -> plan -> per-window extract/submit/normalize
/// -> merge -> store, publishing live progress throughout.
///
/// Chunks are processed sequentially with a fixed inter-chunk delay to
/// respect provider rate limits; segment lists reach the merger in chunk
/// index order. One run owns its chunk artifacts exclusively and removes
/// them on every exit path.
pub struct TranscriptionService {
    prober: Arc<dyn DurationProber>,
    extractor: Arc<dyn ChunkExtractor>,
    store: Arc<dyn TranscriptStore>,
    broadcaster: Arc<ProgressBroadcaster>,
    planner: ChunkPlanner,
    normalizer: SegmentNormalizer,
    merger: OverlapMerger,
    job_runner: JobRunner,
    run_policy: RunPolicy,
}

impl TranscriptionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        prober: Arc<dyn DurationProber>,
        extractor: Arc<dyn ChunkExtractor>,
        provider: Arc<dyn BatchTranscriptionProvider>,
        store: Arc<dyn TranscriptStore>,
        broadcaster: Arc<ProgressBroadcaster>,
        chunk_policy: ChunkPolicy,
        merge_policy: MergePolicy,
        run_policy: RunPolicy,
        job_config: JobConfig,
    ) -> Self {
        let job_runner = JobRunner::new(
            provider,
            Arc::clone(&broadcaster),
            job_config,
            run_policy.poll_interval,
            run_policy.max_wait,
            run_policy.settle_delay,
        );
        Self {
            prober,
            extractor,
            store,
            broadcaster,
            planner: ChunkPlanner::new(chunk_policy),
            normalizer: SegmentNormalizer::new(run_policy.min_segment_duration),
            merger: OverlapMerger::new(chunk_policy.overlap_seconds, merge_policy),
            job_runner,
            run_policy,
        }
    }

    /// Cache-or-generate entry point. Unless `force_regenerate` is set, a
    /// stored transcript short-circuits the pipeline. Any chunk's failure
    /// aborts the whole run; nothing partial is persisted.
    pub async fn transcribe(
        &self,
        session: &SessionId,
        artifact: &Path,
        force_regenerate: bool,
    ) -> Result<MergedTranscript, TranscriptionRunError> {
        if !force_regenerate {
            if let Some(cached) = self.store.get(session).await? {
                tracing::info!(session_id = %session, "Returning cached transcript");
                return Ok(cached);
            }
        }

        let span = tracing::info_span!("transcription_run", session_id = %session);
        let result = self.run_pipeline(session, artifact).instrument(span).await;
        match &result {
            Ok(transcript) => {
                tracing::info!(
                    session_id = %session,
                    segments = transcript.segments.len(),
                    "Transcription completed"
                );
                self.broadcaster
                    .publish_terminal(session, StatusEvent::completed());
            }
            Err(error) => {
                tracing::error!(session_id = %session, error = %error, "Transcription failed");
                self.broadcaster
                    .publish_terminal(session, StatusEvent::failed(error.to_string()));
            }
        }
        result
    }

    async fn run_pipeline(
        &self,
        session: &SessionId,
        artifact: &Path,
    ) -> Result<MergedTranscript, TranscriptionRunError> {
        self.broadcaster.publish(
            session,
            StatusEvent::new(ProgressStep::Probing, "Reading audio duration", 2),
        );
        let total_duration = self.prober.probe(artifact).await?;
        let plan = self.planner.plan(total_duration)?;

        let chunk_lists = if plan.is_single() {
            let window = plan.windows[0];
            let audio = tokio::fs::read(artifact).await?;
            let result = self.job_runner.run(session, &audio, 0, 1).await?;
            vec![self
                .normalizer
                .normalize(&result, window.start_seconds, window.duration_seconds)]
        } else {
            let chunks_dir = chunks_dir_for(artifact);
            tokio::fs::create_dir_all(&chunks_dir).await?;

            let outcome = self
                .run_chunked(session, artifact, &plan, &chunks_dir)
                .await;

            // Best-effort cleanup on both paths; a failing unlink must not
            // mask the primary error.
            if let Err(cleanup) = tokio::fs::remove_dir_all(&chunks_dir).await {
                tracing::warn!(
                    path = %chunks_dir.display(),
                    error = %cleanup,
                    "Failed to remove chunk artifacts"
                );
            }

            outcome?
        };

        self.broadcaster.publish(
            session,
            StatusEvent::new(ProgressStep::Merging, "Stitching chunk transcripts", 92),
        );
        let segments = self.merger.merge(chunk_lists)?;

        let transcript = MergedTranscript::new(segments, total_duration);
        self.store.put(session, &transcript).await?;

        Ok(transcript)
    }

    async fn run_chunked(
        &self,
        session: &SessionId,
        artifact: &Path,
        plan: &ChunkPlan,
        chunks_dir: &Path,
    ) -> Result<Vec<Vec<Segment>>, TranscriptionRunError> {
        let chunk_count = plan.chunk_count();
        tracing::info!(
            session_id = %session,
            chunks = chunk_count,
            total_seconds = plan.total_duration_seconds,
            "Chunking recording for batch transcription"
        );

        let mut chunk_lists = Vec::with_capacity(chunk_count);
        for (index, window) in plan.windows.iter().enumerate() {
            self.broadcaster.publish(
                session,
                StatusEvent::new(
                    ProgressStep::Extracting,
                    format!("Extracting chunk {}/{}", index + 1, chunk_count),
                    extraction_percent(index, chunk_count),
                ),
            );

            let chunk_path = chunks_dir.join(format!("chunk_{index:04}.wav"));
            self.extractor
                .extract(artifact, window, &chunk_path)
                .await
                .map_err(|source| TranscriptionRunError::Extraction {
                    chunk: index,
                    source,
                })?;

            let audio = tokio::fs::read(&chunk_path).await?;
            let result = self
                .job_runner
                .run(session, &audio, index, chunk_count)
                .await?;
            chunk_lists.push(self.normalizer.normalize(
                &result,
                window.start_seconds,
                window.duration_seconds,
            ));

            if index + 1 < chunk_count {
                tokio::time::sleep(self.run_policy.inter_chunk_delay).await;
            }
        }

        Ok(chunk_lists)
    }

    pub fn broadcaster(&self) -> Arc<ProgressBroadcaster> {
        Arc::clone(&self.broadcaster)
    }
}

fn chunks_dir_for(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    artifact.with_file_name(format!("{stem}_chunks"))
}

fn extraction_percent(chunk_index: usize, chunk_count: usize) -> u8 {
    let count = chunk_count.max(1) as f64;
    (5.0 + 85.0 * chunk_index as f64 / count).round() as u8
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionRunError {
    #[error("duration probe failed: {0}")]
    Probe(#[from] ProbeError),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error("failed to extract chunk {chunk}: {source}")]
    Extraction {
        chunk: usize,
        source: ExtractError,
    },
    #[error(transparent)]
    Job(#[from] JobError),
    #[error(transparent)]
    Merge(#[from] MergeError),
    #[error("transcript store: {0}")]
    Store(#[from] TranscriptStoreError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
