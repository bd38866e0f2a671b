use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::ffprobe_prober::tail;
use crate::application::ports::{ChunkExtractor, ExtractError};
use crate::domain::AudioWindow;

const EXTRACT_TIMEOUT: Duration = Duration::from_secs(60);

/// Chunk extraction backed by ffmpeg, producing 16 kHz mono PCM WAV slices.
pub struct FfmpegChunkExtractor;

#[async_trait]
impl ChunkExtractor for FfmpegChunkExtractor {
    async fn extract(
        &self,
        source: &Path,
        window: &AudioWindow,
        destination: &Path,
    ) -> Result<(), ExtractError> {
        let output = Command::new("ffmpeg")
            .arg("-i")
            .arg(source)
            .arg("-ss")
            .arg(window.start_seconds.to_string())
            .arg("-t")
            .arg(window.duration_seconds.to_string())
            .arg("-acodec")
            .arg("pcm_s16le")
            .arg("-ar")
            .arg("16000")
            .arg("-ac")
            .arg("1")
            .arg("-y")
            .arg(destination)
            .output();

        let output = tokio::time::timeout(EXTRACT_TIMEOUT, output)
            .await
            .map_err(|_| ExtractError::TimedOut)?
            .map_err(|e| ExtractError::CommandFailed(format!("spawn ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::CommandFailed(format!(
                "ffmpeg: {}",
                tail(&stderr, 200)
            )));
        }

        tracing::debug!(
            start = window.start_seconds,
            duration = window.duration_seconds,
            destination = %destination.display(),
            "Extracted audio chunk"
        );

        Ok(())
    }
}
