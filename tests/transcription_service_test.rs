mod helpers;

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use helpers::{build_harness, diarized_result};
use kuching::application::ports::{ProviderError, TranscriptStore};
use kuching::application::services::{JobError, TranscriptionRunError};
use kuching::domain::{ProgressStep, SessionId};
use kuching::infrastructure::provider::MockBatchProvider;

fn temp_audio_file() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("recording.wav");
    std::fs::write(&path, b"fake wav bytes").expect("write audio fixture");
    (dir, path)
}

#[tokio::test]
async fn given_short_recording_when_transcribing_then_single_job_and_sequential_ids() {
    let provider = Arc::new(MockBatchProvider::completing_with(diarized_result(vec![
        ("spk_1", "hello and welcome", 0.0, 5.0),
        ("spk_2", "glad to be here", 5.0, 9.0),
    ])));
    let harness = build_harness(31.0, Arc::clone(&provider));
    let (_dir, audio) = temp_audio_file();
    let session = SessionId::new();

    let transcript = harness
        .service
        .transcribe(&session, &audio, false)
        .await
        .unwrap();

    // Below the chunking threshold: the source artifact is submitted whole.
    assert!(harness.extractor.extracted_windows.lock().unwrap().is_empty());
    assert_eq!(*provider.uploads.lock().unwrap(), vec![14]);

    let ids: Vec<u32> = transcript.segments.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(transcript.total_duration_seconds, 31.0);

    let stored = harness.store.get(&session).await.unwrap();
    assert_eq!(stored, Some(transcript));
}

#[tokio::test]
async fn given_long_recording_when_transcribing_then_windows_are_extracted_in_order() {
    let provider = Arc::new(MockBatchProvider::completing_with(diarized_result(vec![(
        "spk_1",
        "some chunk speech",
        0.0,
        5.0,
    )])));
    let harness = build_harness(4200.0, provider);
    let (_dir, audio) = temp_audio_file();
    let session = SessionId::new();

    let transcript = harness
        .service
        .transcribe(&session, &audio, false)
        .await
        .unwrap();

    let windows = harness.extractor.extracted_windows.lock().unwrap().clone();
    assert_eq!(windows.len(), 2);
    assert_eq!(windows[0].start_seconds, 0.0);
    assert_eq!(windows[0].duration_seconds, 3330.0);
    assert_eq!(windows[1].start_seconds, 3270.0);
    assert_eq!(windows[1].duration_seconds, 930.0);

    // Same speaker in both chunks coalesces into one final segment.
    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(transcript.segments[0].id, 1);
}

#[tokio::test]
async fn given_chunked_run_when_finished_then_chunk_artifacts_are_removed() {
    let provider = Arc::new(MockBatchProvider::completing_with(diarized_result(vec![(
        "spk_1",
        "speech",
        0.0,
        5.0,
    )])));
    let harness = build_harness(4200.0, provider);
    let (_dir, audio) = temp_audio_file();

    harness
        .service
        .transcribe(&SessionId::new(), &audio, false)
        .await
        .unwrap();

    let chunks_dir = audio.with_file_name("recording_chunks");
    assert!(!chunks_dir.exists());
}

#[tokio::test]
async fn given_cached_transcript_when_transcribing_again_then_cache_is_returned() {
    let provider = Arc::new(MockBatchProvider::completing_with(diarized_result(vec![(
        "spk_1",
        "first run",
        0.0,
        5.0,
    )])));
    let harness = build_harness(31.0, Arc::clone(&provider));
    let (_dir, audio) = temp_audio_file();
    let session = SessionId::new();

    let first = harness
        .service
        .transcribe(&session, &audio, false)
        .await
        .unwrap();
    let second = harness
        .service
        .transcribe(&session, &audio, false)
        .await
        .unwrap();

    assert_eq!(first, second);
    // Only the first run reached the provider.
    assert_eq!(provider.uploads.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn given_force_regenerate_when_transcribing_then_pipeline_runs_again() {
    let provider = Arc::new(MockBatchProvider::completing_with(diarized_result(vec![(
        "spk_1",
        "fresh run",
        0.0,
        5.0,
    )])));
    let harness = build_harness(31.0, Arc::clone(&provider));
    let (_dir, audio) = temp_audio_file();
    let session = SessionId::new();

    harness
        .service
        .transcribe(&session, &audio, false)
        .await
        .unwrap();
    harness
        .service
        .transcribe(&session, &audio, true)
        .await
        .unwrap();

    assert_eq!(provider.uploads.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn given_provider_job_fails_when_transcribing_then_run_aborts_and_nothing_is_stored() {
    let provider = Arc::new(MockBatchProvider::failing_job());
    let harness = build_harness(4200.0, provider);
    let (_dir, audio) = temp_audio_file();
    let session = SessionId::new();

    let error = harness
        .service
        .transcribe(&session, &audio, false)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        TranscriptionRunError::Job(JobError::Provider(ProviderError::Fatal(_)))
    ));
    assert!(harness.store.get(&session).await.unwrap().is_none());

    let mut stream = harness.broadcaster.subscribe(&session);
    let terminal = tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("expected a progress event")
        .expect("stream ended early");
    assert_eq!(terminal.step, ProgressStep::Failed);
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn given_provider_never_finishes_when_transcribing_then_timed_out_error() {
    let provider = Arc::new(MockBatchProvider::never_completing());
    let harness = build_harness(31.0, provider);
    let (_dir, audio) = temp_audio_file();

    let error = harness
        .service
        .transcribe(&SessionId::new(), &audio, false)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        TranscriptionRunError::Job(JobError::TimedOut { .. })
    ));
}

#[tokio::test]
async fn given_unreadable_artifact_when_transcribing_then_probe_failure_surfaces() {
    let provider = Arc::new(MockBatchProvider::never_completing());
    let prober = Arc::new(kuching::infrastructure::audio::MockDurationProber::failing(
        "bad container",
    ));
    let extractor = Arc::new(kuching::infrastructure::audio::MockChunkExtractor::default());
    let store = Arc::new(kuching::infrastructure::persistence::InMemoryTranscriptStore::new());
    let broadcaster = Arc::new(kuching::application::services::ProgressBroadcaster::new(
        Duration::from_millis(10),
    ));
    let service = kuching::application::services::TranscriptionService::new(
        prober,
        extractor,
        provider,
        store,
        broadcaster,
        kuching::application::services::ChunkPolicy::default(),
        kuching::application::services::MergePolicy::default(),
        helpers::fast_run_policy(),
        kuching::application::ports::JobConfig::default(),
    );
    let (_dir, audio) = temp_audio_file();

    let error = service
        .transcribe(&SessionId::new(), &audio, false)
        .await
        .unwrap_err();

    assert!(matches!(error, TranscriptionRunError::Probe(_)));
}
