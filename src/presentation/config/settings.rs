use serde::Deserialize;

use crate::application::services::{ChunkPolicy, MergePolicy, RunPolicy};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub chunking: ChunkingSettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub merge: MergeSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: String,
    pub language_code: String,
    pub model: String,
    pub with_diarization: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.sarvam.ai".to_string(),
            api_key: String::new(),
            language_code: "en-IN".to_string(),
            model: "saarika:v2.5".to_string(),
            with_diarization: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkingSettings {
    pub threshold_seconds: f64,
    pub batch_max_duration_seconds: f64,
    pub overlap_seconds: f64,
    pub max_chunks: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        let policy = ChunkPolicy::default();
        Self {
            threshold_seconds: policy.threshold_seconds,
            batch_max_duration_seconds: policy.batch_max_duration_seconds,
            overlap_seconds: policy.overlap_seconds,
            max_chunks: policy.max_chunks,
        }
    }
}

impl ChunkingSettings {
    pub fn to_policy(&self) -> ChunkPolicy {
        ChunkPolicy {
            threshold_seconds: self.threshold_seconds,
            batch_max_duration_seconds: self.batch_max_duration_seconds,
            overlap_seconds: self.overlap_seconds,
            max_chunks: self.max_chunks,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingSettings {
    pub interval_seconds: f64,
    pub max_wait_seconds: f64,
    pub settle_seconds: f64,
    pub inter_chunk_delay_seconds: f64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_seconds: 3.0,
            max_wait_seconds: 600.0,
            settle_seconds: 2.0,
            inter_chunk_delay_seconds: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeSettings {
    pub min_segment_duration: f64,
    pub similarity_threshold: f64,
    pub dedup_window: usize,
}

impl Default for MergeSettings {
    fn default() -> Self {
        let policy = MergePolicy::default();
        Self {
            min_segment_duration: 0.5,
            similarity_threshold: policy.similarity_threshold,
            dedup_window: policy.dedup_window,
        }
    }
}

impl MergeSettings {
    pub fn to_policy(&self) -> MergePolicy {
        MergePolicy {
            similarity_threshold: self.similarity_threshold,
            dedup_window: self.dedup_window,
        }
    }
}

impl Settings {
    pub fn run_policy(&self) -> RunPolicy {
        RunPolicy {
            poll_interval: std::time::Duration::from_secs_f64(self.polling.interval_seconds),
            max_wait: std::time::Duration::from_secs_f64(self.polling.max_wait_seconds),
            settle_delay: std::time::Duration::from_secs_f64(self.polling.settle_seconds),
            inter_chunk_delay: std::time::Duration::from_secs_f64(
                self.polling.inter_chunk_delay_seconds,
            ),
            min_segment_duration: self.merge.min_segment_duration,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}
