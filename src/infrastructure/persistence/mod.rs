mod memory_transcript_store;

pub use memory_transcript_store::InMemoryTranscriptStore;
