/// Diarized output fetched from a completed provider job, already decoded
/// from the provider's wire format but not yet normalized into segments.
///
/// Timestamps are chunk-local; the normalizer applies the window offset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResult {
    /// Full plain-text transcript of the chunk.
    pub transcript: String,
    /// Speaker-attributed spans, when the provider ran diarization.
    pub entries: Vec<DiarizedEntry>,
    /// Word-level timing, when exposed. Used as a fallback when no diarized
    /// entries are present.
    pub words: Vec<ProviderWord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiarizedEntry {
    pub speaker: Option<String>,
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderWord {
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}
