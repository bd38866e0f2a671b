mod batch_provider;
mod chunk_extractor;
mod duration_prober;
mod provider_result;
mod transcript_store;

pub use batch_provider::{
    BatchTranscriptionProvider, JobConfig, JobHandle, ProviderError, ProviderJobState,
};
pub use chunk_extractor::{ChunkExtractor, ExtractError};
pub use duration_prober::{DurationProber, ProbeError};
pub use provider_result::{DiarizedEntry, ProviderResult, ProviderWord};
pub use transcript_store::{TranscriptStore, TranscriptStoreError};
