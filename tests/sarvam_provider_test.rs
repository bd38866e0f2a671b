use axum::Router;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use kuching::application::ports::{
    BatchTranscriptionProvider, JobConfig, JobHandle, ProviderError, ProviderJobState,
};
use kuching::infrastructure::provider::SarvamBatchProvider;

async fn start_mock_sarvam_server() -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new()
        .route(
            "/speech-to-text/jobs",
            post(|| async { r#"{"job_id": "job-42"}"# }),
        )
        .route(
            "/speech-to-text/jobs/{job_id}/audio",
            post(|| async { "{}" }),
        )
        .route(
            "/speech-to-text/jobs/{job_id}/start",
            post(|| async { "{}" }),
        )
        .route(
            "/speech-to-text/jobs/{job_id}/status",
            get(|| async { r#"{"status": "Completed"}"# }),
        )
        .route(
            "/speech-to-text/jobs/{job_id}/results",
            get(|| async {
                r#"{
                    "transcript": "hello there general",
                    "diarized_transcript": {
                        "entries": [
                            {"speaker_id": "spk_1", "transcript": "hello there", "start_time_seconds": 0.0, "end_time_seconds": 1.5},
                            {"speaker_id": "spk_2", "transcript": "general", "start_time_seconds": 1.5, "end_time_seconds": 2.5}
                        ]
                    },
                    "words": [
                        {"word": "hello", "start": 0.0, "end": 0.5}
                    ]
                }"#
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

async fn start_erroring_server(status: u16, body: &'static str) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/speech-to-text/jobs",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(status).unwrap();
            (status, body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

#[tokio::test]
async fn given_healthy_api_when_running_job_lifecycle_then_all_calls_succeed() {
    let (base_url, shutdown_tx) = start_mock_sarvam_server().await;
    let provider = SarvamBatchProvider::new(&base_url, "test-key");

    let handle = provider.create_job(&JobConfig::default()).await.unwrap();
    assert_eq!(handle.as_str(), "job-42");

    provider
        .upload_audio(&handle, b"fake wav bytes")
        .await
        .unwrap();
    provider.start(&handle).await.unwrap();

    let state = provider.poll_status(&handle).await.unwrap();
    assert_eq!(state, ProviderJobState::Completed);

    let result = provider.fetch_results(&handle).await.unwrap();
    assert_eq!(result.transcript, "hello there general");
    assert_eq!(result.entries.len(), 2);
    assert_eq!(result.entries[0].speaker.as_deref(), Some("spk_1"));
    assert_eq!(result.entries[1].text, "general");
    assert_eq!(result.words.len(), 1);
    assert_eq!(result.words[0].text, "hello");

    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unauthorized_response_when_creating_job_then_fatal_error() {
    let (base_url, shutdown_tx) =
        start_erroring_server(401, r#"{"error": "invalid api key"}"#).await;
    let provider = SarvamBatchProvider::new(&base_url, "wrong-key");

    let result = provider.create_job(&JobConfig::default()).await;

    assert!(matches!(result, Err(ProviderError::Fatal(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_creating_job_then_transient_error() {
    let (base_url, shutdown_tx) =
        start_erroring_server(503, r#"{"error": "upstream overloaded"}"#).await;
    let provider = SarvamBatchProvider::new(&base_url, "test-key");

    let result = provider.create_job(&JobConfig::default()).await;

    assert!(matches!(result, Err(ProviderError::Transient(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unrecognized_status_string_when_polling_then_unknown_state() {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let app = Router::new().route(
        "/speech-to-text/jobs/{job_id}/status",
        get(|| async { r#"{"status": "Reticulating"}"# }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    let provider = SarvamBatchProvider::new(&base_url, "test-key");
    let state = provider
        .poll_status(&JobHandle::new("job-42"))
        .await
        .unwrap();

    assert_eq!(state, ProviderJobState::Unknown("Reticulating".to_string()));
    shutdown_tx.send(()).ok();
}
