use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::application::ports::{DurationProber, ProbeError};

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Duration probe backed by `ffprobe -show_entries format=duration -of json`.
pub struct FfprobeDurationProber;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FfprobeFormat>,
}

#[derive(Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[async_trait]
impl DurationProber for FfprobeDurationProber {
    async fn probe(&self, artifact: &Path) -> Result<f64, ProbeError> {
        let output = Command::new("ffprobe")
            .arg("-v")
            .arg("error")
            .arg("-show_entries")
            .arg("format=duration")
            .arg("-of")
            .arg("json")
            .arg(artifact)
            .output();

        let output = tokio::time::timeout(PROBE_TIMEOUT, output)
            .await
            .map_err(|_| ProbeError::TimedOut)?
            .map_err(|e| ProbeError::CommandFailed(format!("spawn ffprobe: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::Unreadable(tail(&stderr, 200).to_string()));
        }

        let parsed: FfprobeOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| ProbeError::CommandFailed(format!("parse ffprobe output: {e}")))?;

        parsed
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.parse::<f64>().ok())
            .filter(|d| *d > 0.0)
            .ok_or_else(|| ProbeError::Unreadable("no duration in ffprobe output".to_string()))
    }
}

pub(crate) fn tail(s: &str, max_chars: usize) -> &str {
    let start = s
        .char_indices()
        .rev()
        .nth(max_chars.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    &s[start..]
}
