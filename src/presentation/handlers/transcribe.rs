use std::path::PathBuf;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::ProviderError;
use crate::application::services::{JobError, MergeError, PlanError, TranscriptionRunError};
use crate::domain::{format_timestamp, MergedTranscript, Segment, SessionId};
use crate::presentation::state::AppState;

#[derive(Deserialize)]
pub struct TranscribeRequest {
    pub audio_path: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub session_id: String,
    pub generated_at: String,
    pub total_duration_seconds: f64,
    pub segments: Vec<SegmentPayload>,
}

#[derive(Serialize)]
pub struct SegmentPayload {
    pub id: u32,
    pub speaker: String,
    pub timestamp: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl TranscriptResponse {
    pub fn from_transcript(session: &SessionId, transcript: &MergedTranscript) -> Self {
        Self {
            session_id: session.to_string(),
            generated_at: transcript.generated_at.to_rfc3339(),
            total_duration_seconds: transcript.total_duration_seconds,
            segments: transcript.segments.iter().map(SegmentPayload::from).collect(),
        }
    }
}

impl From<&Segment> for SegmentPayload {
    fn from(segment: &Segment) -> Self {
        Self {
            id: segment.id,
            speaker: segment.speaker.clone(),
            timestamp: format_timestamp(segment.start_seconds),
            start_seconds: segment.start_seconds,
            end_seconds: segment.end_seconds,
            text: segment.text.clone(),
        }
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TranscribeRequest>,
) -> impl IntoResponse {
    let session = SessionId::from_uuid(session_id);
    let artifact = PathBuf::from(&request.audio_path);

    if !artifact.exists() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Audio file not found: {}", request.audio_path),
            }),
        )
            .into_response();
    }

    match state
        .transcription_service
        .transcribe(&session, &artifact, request.force)
        .await
    {
        Ok(transcript) => (
            StatusCode::OK,
            Json(TranscriptResponse::from_transcript(&session, &transcript)),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(session_id = %session, error = %error, "Transcription request failed");
            (
                error_status(&error),
                Json(ErrorResponse {
                    error: error.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn get_transcript_handler(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> impl IntoResponse {
    let session = SessionId::from_uuid(session_id);

    match state.transcript_store.get(&session).await {
        Ok(Some(transcript)) => (
            StatusCode::OK,
            Json(TranscriptResponse::from_transcript(&session, &transcript)),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No transcript for session {session}"),
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(session_id = %session, error = %error, "Failed to fetch transcript");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: error.to_string(),
                }),
            )
                .into_response()
        }
    }
}

fn error_status(error: &TranscriptionRunError) -> StatusCode {
    match error {
        TranscriptionRunError::Probe(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TranscriptionRunError::Plan(PlanError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        TranscriptionRunError::Plan(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TranscriptionRunError::Merge(MergeError::NoSegments) => StatusCode::UNPROCESSABLE_ENTITY,
        TranscriptionRunError::Job(JobError::TimedOut { .. }) => StatusCode::GATEWAY_TIMEOUT,
        TranscriptionRunError::Job(JobError::Provider(ProviderError::Transient(_))) => {
            StatusCode::BAD_GATEWAY
        }
        TranscriptionRunError::Job(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
