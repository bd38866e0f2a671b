mod ffmpeg_extractor;
mod ffprobe_prober;
mod mock_audio;

pub use ffmpeg_extractor::FfmpegChunkExtractor;
pub use ffprobe_prober::FfprobeDurationProber;
pub use mock_audio::{MockChunkExtractor, MockDurationProber};
