use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{
    BatchTranscriptionProvider, DiarizedEntry, JobConfig, JobHandle, ProviderError,
    ProviderJobState, ProviderResult, ProviderWord,
};

const API_KEY_HEADER: &str = "api-subscription-key";

/// Adapter for the Sarvam batch speech-to-text API: job init, audio upload,
/// start, status polling, and result download. Protocol only; the job
/// lifecycle policy lives in the job runner.
pub struct SarvamBatchProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SarvamBatchProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn job_url(&self, handle: &JobHandle, suffix: &str) -> String {
        format!(
            "{}/speech-to-text/jobs/{}{}",
            self.base_url,
            handle.as_str(),
            suffix
        )
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        let message = format!("status {}: {}", status, body);
        if is_transient_status(status) {
            Err(ProviderError::Transient(message))
        } else {
            Err(ProviderError::Fatal(message))
        }
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}

fn transport_error(context: &str, error: reqwest::Error) -> ProviderError {
    ProviderError::Transient(format!("{context}: {error}"))
}

#[derive(Deserialize)]
struct CreateJobResponse {
    job_id: String,
}

#[derive(Deserialize)]
struct JobStatusResponse {
    status: String,
}

#[derive(Deserialize)]
struct JobResultsResponse {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    diarized_transcript: Option<SarvamDiarizedTranscript>,
    #[serde(default)]
    words: Vec<SarvamWord>,
}

#[derive(Deserialize)]
struct SarvamDiarizedTranscript {
    #[serde(default)]
    entries: Vec<SarvamEntry>,
}

#[derive(Deserialize)]
struct SarvamEntry {
    #[serde(default)]
    speaker_id: Option<String>,
    #[serde(default)]
    transcript: String,
    start_time_seconds: f64,
    end_time_seconds: f64,
}

#[derive(Deserialize)]
struct SarvamWord {
    word: String,
    start: f64,
    end: f64,
}

#[async_trait]
impl BatchTranscriptionProvider for SarvamBatchProvider {
    async fn create_job(&self, config: &JobConfig) -> Result<JobHandle, ProviderError> {
        let url = format!("{}/speech-to-text/jobs", self.base_url);
        let body = json!({
            "language_code": config.language_code,
            "model": config.model,
            "with_diarization": config.with_diarization,
        });

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error("create job", e))?;

        let parsed: CreateJobResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Fatal(format!("parse create response: {e}")))?;

        tracing::debug!(job = %parsed.job_id, "Created provider job");
        Ok(JobHandle::new(parsed.job_id))
    }

    async fn upload_audio(&self, handle: &JobHandle, audio: &[u8]) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(self.job_url(handle, "/audio"))
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| transport_error("upload audio", e))?;

        Self::check_status(response).await?;
        tracing::debug!(job = handle.as_str(), bytes = audio.len(), "Uploaded chunk audio");
        Ok(())
    }

    async fn start(&self, handle: &JobHandle) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(self.job_url(handle, "/start"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error("start job", e))?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn poll_status(&self, handle: &JobHandle) -> Result<ProviderJobState, ProviderError> {
        let response = self
            .client
            .get(self.job_url(handle, "/status"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error("poll status", e))?;

        let parsed: JobStatusResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Fatal(format!("parse status response: {e}")))?;

        Ok(map_provider_state(&parsed.status))
    }

    async fn fetch_results(&self, handle: &JobHandle) -> Result<ProviderResult, ProviderError> {
        let response = self
            .client
            .get(self.job_url(handle, "/results"))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error("fetch results", e))?;

        let parsed: JobResultsResponse = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Fatal(format!("parse results response: {e}")))?;

        let entries = parsed
            .diarized_transcript
            .map(|d| d.entries)
            .unwrap_or_default()
            .into_iter()
            .map(|entry| DiarizedEntry {
                speaker: entry.speaker_id,
                text: entry.transcript,
                start_seconds: entry.start_time_seconds,
                end_seconds: entry.end_time_seconds,
            })
            .collect();

        let words = parsed
            .words
            .into_iter()
            .map(|word| ProviderWord {
                text: word.word,
                start_seconds: word.start,
                end_seconds: word.end,
            })
            .collect();

        Ok(ProviderResult {
            transcript: parsed.transcript,
            entries,
            words,
        })
    }
}

fn map_provider_state(raw: &str) -> ProviderJobState {
    match raw.to_ascii_lowercase().as_str() {
        "created" | "initialized" => ProviderJobState::Created,
        "uploaded" => ProviderJobState::Uploaded,
        "queued" | "accepted" | "pending" => ProviderJobState::Queued,
        "processing" | "in_progress" | "running" => ProviderJobState::Processing,
        "completed" | "succeeded" | "success" => ProviderJobState::Completed,
        "failed" | "error" => ProviderJobState::Failed,
        _ => ProviderJobState::Unknown(raw.to_string()),
    }
}
