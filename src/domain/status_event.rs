use serde::{Deserialize, Serialize};

/// Pipeline stage a live observer can be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStep {
    Waiting,
    Probing,
    Extracting,
    Uploading,
    Transcribing,
    Merging,
    Completed,
    Failed,
}

impl ProgressStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStep::Waiting => "waiting",
            ProgressStep::Probing => "probing",
            ProgressStep::Extracting => "extracting",
            ProgressStep::Uploading => "uploading",
            ProgressStep::Transcribing => "transcribing",
            ProgressStep::Merging => "merging",
            ProgressStep::Completed => "completed",
            ProgressStep::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressStep::Completed | ProgressStep::Failed)
    }
}

impl std::fmt::Display for ProgressStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Current progress of one session's transcription run. Each new event for a
/// key supersedes the previous one; observers see latest state, not history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub step: ProgressStep,
    pub message: String,
    pub progress_percent: u8,
}

impl StatusEvent {
    pub fn new(step: ProgressStep, message: impl Into<String>, progress_percent: u8) -> Self {
        Self {
            step,
            message: message.into(),
            progress_percent: progress_percent.min(100),
        }
    }

    pub fn waiting() -> Self {
        Self::new(ProgressStep::Waiting, "Waiting for transcription to start", 0)
    }

    pub fn completed() -> Self {
        Self::new(ProgressStep::Completed, "Transcription completed", 100)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ProgressStep::Failed, message, 100)
    }
}
