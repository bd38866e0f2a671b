mod audio_window;
mod segment;
mod session_id;
mod status_event;
mod transcript;

pub use audio_window::{AudioWindow, ChunkPlan};
pub use segment::Segment;
pub use session_id::SessionId;
pub use status_event::{ProgressStep, StatusEvent};
pub use transcript::{format_timestamp, MergedTranscript};
