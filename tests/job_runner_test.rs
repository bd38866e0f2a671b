mod helpers;

use std::sync::Arc;
use std::time::Duration;

use helpers::diarized_result;
use kuching::application::ports::{JobConfig, ProviderError, ProviderJobState};
use kuching::application::services::{JobError, JobRunner, ProgressBroadcaster};
use kuching::domain::SessionId;
use kuching::infrastructure::provider::MockBatchProvider;

fn runner(provider: Arc<MockBatchProvider>) -> (JobRunner, Arc<ProgressBroadcaster>) {
    let broadcaster = Arc::new(ProgressBroadcaster::new(Duration::from_millis(5)));
    let runner = JobRunner::new(
        provider,
        Arc::clone(&broadcaster),
        JobConfig::default(),
        Duration::from_millis(5),
        Duration::from_millis(250),
        Duration::from_millis(1),
    );
    (runner, broadcaster)
}

#[tokio::test]
async fn given_provider_completes_when_running_then_results_are_returned() {
    let expected = diarized_result(vec![("spk_1", "hello world", 0.0, 3.0)]);
    let provider = Arc::new(MockBatchProvider::completing_with(expected.clone()));
    let (runner, _broadcaster) = runner(Arc::clone(&provider));
    let session = SessionId::new();

    let result = runner.run(&session, b"audio bytes", 0, 1).await.unwrap();

    assert_eq!(result, expected);
    assert_eq!(*provider.uploads.lock().unwrap(), vec![11]);
}

#[tokio::test]
async fn given_unknown_provider_states_when_polling_then_loop_continues_to_completion() {
    let expected = diarized_result(vec![("spk_1", "done", 0.0, 2.0)]);
    let provider = Arc::new(
        MockBatchProvider::completing_with(expected.clone()).with_poll_states(vec![
            ProviderJobState::Unknown("Warming".to_string()),
            ProviderJobState::Unknown("AlmostThere".to_string()),
            ProviderJobState::Completed,
        ]),
    );
    let (runner, _broadcaster) = runner(provider);

    let result = runner.run(&SessionId::new(), b"audio", 0, 1).await.unwrap();

    assert_eq!(result, expected);
}

#[tokio::test]
async fn given_provider_reports_failure_when_running_then_fatal_error_without_retry() {
    let provider = Arc::new(MockBatchProvider::failing_job());
    let (runner, _broadcaster) = runner(provider);

    let error = runner
        .run(&SessionId::new(), b"audio", 0, 1)
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        JobError::Provider(ProviderError::Fatal(_))
    ));
}

#[tokio::test]
async fn given_provider_never_terminal_when_running_then_times_out_distinctly() {
    let provider = Arc::new(MockBatchProvider::never_completing());
    let (runner, _broadcaster) = runner(provider);

    let error = runner
        .run(&SessionId::new(), b"audio", 0, 1)
        .await
        .unwrap_err();

    assert!(matches!(error, JobError::TimedOut { .. }));
}

#[tokio::test]
async fn given_results_lag_completion_when_fetching_then_one_recheck_succeeds() {
    let expected = diarized_result(vec![("spk_1", "late results", 0.0, 3.0)]);
    let provider =
        Arc::new(MockBatchProvider::completing_with(expected.clone()).with_fetch_failures(1));
    let (runner, _broadcaster) = runner(provider);

    let result = runner.run(&SessionId::new(), b"audio", 0, 1).await.unwrap();

    assert_eq!(result, expected);
}

#[tokio::test]
async fn given_results_stay_unavailable_when_fetching_then_stuck_error() {
    let expected = diarized_result(vec![("spk_1", "never arrives", 0.0, 3.0)]);
    let provider = Arc::new(MockBatchProvider::completing_with(expected).with_fetch_failures(2));
    let (runner, _broadcaster) = runner(provider);

    let error = runner
        .run(&SessionId::new(), b"audio", 0, 1)
        .await
        .unwrap_err();

    assert!(matches!(error, JobError::Stuck(_)));
}

#[tokio::test]
async fn given_status_updates_when_running_then_progress_never_decreases() {
    let expected = diarized_result(vec![("spk_1", "steady", 0.0, 2.0)]);
    let provider = Arc::new(MockBatchProvider::completing_with(expected).with_poll_states(vec![
        ProviderJobState::Queued,
        ProviderJobState::Processing,
        ProviderJobState::Processing,
        ProviderJobState::Processing,
        ProviderJobState::Completed,
    ]));
    let (runner, broadcaster) = runner(provider);
    let session = SessionId::new();

    let watch = {
        let broadcaster = Arc::clone(&broadcaster);
        tokio::spawn(async move {
            let mut max = 0u8;
            for _ in 0..50 {
                if let Some(event) = broadcaster.current(&session) {
                    assert!(event.progress_percent >= max, "progress went backwards");
                    max = event.progress_percent;
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
            max
        })
    };

    runner.run(&session, b"audio", 0, 1).await.unwrap();
    let last_seen = watch.await.unwrap();
    assert!(last_seen > 0);
}
