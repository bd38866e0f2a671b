mod chunk_planner;
mod job_runner;
mod overlap_merger;
mod progress_broadcaster;
mod segment_normalizer;
mod transcription_service;

pub use chunk_planner::{ChunkPlanner, ChunkPolicy, PlanError};
pub use job_runner::{JobError, JobRunner};
pub use overlap_merger::{jaccard_similarity, MergeError, MergePolicy, OverlapMerger};
pub use progress_broadcaster::ProgressBroadcaster;
pub use segment_normalizer::SegmentNormalizer;
pub use transcription_service::{RunPolicy, TranscriptionRunError, TranscriptionService};
