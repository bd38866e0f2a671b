use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use config::Environment as EnvironmentSource;
use config::{Config, File};
use tokio::net::TcpListener;

use kuching::application::ports::JobConfig;
use kuching::application::services::{ProgressBroadcaster, TranscriptionService};
use kuching::infrastructure::audio::{FfmpegChunkExtractor, FfprobeDurationProber};
use kuching::infrastructure::observability::{init_tracing, TracingConfig};
use kuching::infrastructure::persistence::InMemoryTranscriptStore;
use kuching::infrastructure::provider::SarvamBatchProvider;
use kuching::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let configuration = Config::builder()
        .add_source(
            File::with_name(&format!(
                "appsettings.{}",
                environment.as_str().to_lowercase()
            ))
            .required(false),
        )
        .add_source(EnvironmentSource::with_prefix("APP").separator("_"))
        .build()?;

    let settings: Settings = configuration.try_deserialize()?;

    init_tracing(
        TracingConfig::new(
            environment.to_string(),
            settings.logging.level.clone(),
            settings.logging.enable_json,
        ),
        settings.server.port,
    );

    let prober = Arc::new(FfprobeDurationProber);
    let extractor = Arc::new(FfmpegChunkExtractor);
    let provider = Arc::new(SarvamBatchProvider::new(
        &settings.provider.base_url,
        &settings.provider.api_key,
    ));
    let store: Arc<InMemoryTranscriptStore> = Arc::new(InMemoryTranscriptStore::new());
    let broadcaster = Arc::new(ProgressBroadcaster::default());

    let job_config = JobConfig {
        language_code: settings.provider.language_code.clone(),
        model: settings.provider.model.clone(),
        with_diarization: settings.provider.with_diarization,
    };

    let transcription_service = Arc::new(TranscriptionService::new(
        prober,
        extractor,
        provider,
        Arc::clone(&store) as Arc<dyn kuching::application::ports::TranscriptStore>,
        Arc::clone(&broadcaster),
        settings.chunking.to_policy(),
        settings.merge.to_policy(),
        settings.run_policy(),
        job_config,
    ));

    let state = AppState {
        transcription_service,
        transcript_store: store,
        broadcaster,
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
