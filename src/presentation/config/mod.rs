mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ChunkingSettings, LoggingSettings, MergeSettings, PollingSettings, ProviderSettings,
    ServerSettings, Settings,
};
