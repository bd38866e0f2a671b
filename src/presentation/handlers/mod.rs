mod health;
mod progress;
mod transcribe;

pub use health::health_handler;
pub use progress::progress_events_handler;
pub use transcribe::{
    get_transcript_handler, transcribe_handler, ErrorResponse, SegmentPayload, TranscribeRequest,
    TranscriptResponse,
};
