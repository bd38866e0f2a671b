#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use kuching::application::ports::{
    DiarizedEntry, JobConfig, ProviderResult, ProviderWord, TranscriptStore,
};
use kuching::application::services::{
    ChunkPolicy, MergePolicy, ProgressBroadcaster, RunPolicy, TranscriptionService,
};
use kuching::domain::Segment;
use kuching::infrastructure::audio::{MockChunkExtractor, MockDurationProber};
use kuching::infrastructure::persistence::InMemoryTranscriptStore;
use kuching::infrastructure::provider::MockBatchProvider;

pub fn fast_run_policy() -> RunPolicy {
    RunPolicy {
        poll_interval: Duration::from_millis(5),
        max_wait: Duration::from_millis(250),
        settle_delay: Duration::from_millis(1),
        inter_chunk_delay: Duration::from_millis(1),
        min_segment_duration: 0.5,
    }
}

pub fn segment(id: u32, speaker: &str, text: &str, start: f64, end: f64) -> Segment {
    Segment::new(id, speaker, text, start, end)
}

pub fn diarized_result(entries: Vec<(&str, &str, f64, f64)>) -> ProviderResult {
    ProviderResult {
        transcript: entries
            .iter()
            .map(|(_, text, _, _)| *text)
            .collect::<Vec<_>>()
            .join(" "),
        entries: entries
            .into_iter()
            .map(|(speaker, text, start, end)| DiarizedEntry {
                speaker: Some(speaker.to_string()),
                text: text.to_string(),
                start_seconds: start,
                end_seconds: end,
            })
            .collect(),
        words: Vec::new(),
    }
}

pub fn words_result(words: Vec<(&str, f64, f64)>) -> ProviderResult {
    ProviderResult {
        transcript: words
            .iter()
            .map(|(text, _, _)| *text)
            .collect::<Vec<_>>()
            .join(" "),
        entries: Vec::new(),
        words: words
            .into_iter()
            .map(|(text, start, end)| ProviderWord {
                text: text.to_string(),
                start_seconds: start,
                end_seconds: end,
            })
            .collect(),
    }
}

pub struct Harness {
    pub service: Arc<TranscriptionService>,
    pub store: Arc<InMemoryTranscriptStore>,
    pub broadcaster: Arc<ProgressBroadcaster>,
    pub extractor: Arc<MockChunkExtractor>,
}

pub fn build_harness(duration_seconds: f64, provider: Arc<MockBatchProvider>) -> Harness {
    let prober = Arc::new(MockDurationProber::returning(duration_seconds));
    let extractor = Arc::new(MockChunkExtractor::default());
    let store = Arc::new(InMemoryTranscriptStore::new());
    let broadcaster = Arc::new(ProgressBroadcaster::new(Duration::from_millis(10)));

    let service = Arc::new(TranscriptionService::new(
        prober,
        Arc::clone(&extractor) as _,
        provider,
        Arc::clone(&store) as Arc<dyn TranscriptStore>,
        Arc::clone(&broadcaster),
        ChunkPolicy::default(),
        MergePolicy::default(),
        fast_run_policy(),
        JobConfig::default(),
    ));

    Harness {
        service,
        store,
        broadcaster,
        extractor,
    }
}
