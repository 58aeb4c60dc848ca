//! Progress event types for the generation pipeline
//!
//! Each running job owns an ordered channel of `ProgressEvent`s. The stage
//! names are a wire contract consumed by live clients: the progress stream
//! serializes one event per frame and closes after the first terminal event.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage carried by every progress event
///
/// `Done` and `Error` are terminal: exactly one of them is emitted per job,
/// and no further events follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStage {
    /// Job accepted, pipeline starting
    Init,

    /// Emotion classification in progress or completed
    Emotion,

    /// Voice direction and speech synthesis, per sentence
    Tts,

    /// Background resolution, overlay mixing, and artifact export
    Mixing,

    /// Terminal: job finished, artifact available
    Done,

    /// Terminal: job failed, no artifact
    Error,
}

impl ProgressStage {
    /// Whether this stage ends the event stream for a job
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressStage::Done | ProgressStage::Error)
    }

    /// Wire name of the stage (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStage::Init => "init",
            ProgressStage::Emotion => "emotion",
            ProgressStage::Tts => "tts",
            ProgressStage::Mixing => "mixing",
            ProgressStage::Done => "done",
            ProgressStage::Error => "error",
        }
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ordered notification of pipeline progress
///
/// Immutable once created; emission order within a job is the only ordering
/// that matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub stage: ProgressStage,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(stage: ProgressStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    /// Terminal success event
    pub fn done(message: impl Into<String>) -> Self {
        Self::new(ProgressStage::Done, message)
    }

    /// Terminal failure event
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ProgressStage::Error, message)
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }
}
