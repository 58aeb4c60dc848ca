//! External collaborator seams
//!
//! The pipeline core treats emotion classification, voice direction, and
//! speech synthesis as opaque external calls behind trait objects. The
//! production implementation drives a remote inference service over HTTP
//! (see `hf`); tests substitute in-process stubs.
//!
//! No retry policy lives here; a failed call for one sentence is absorbed
//! by the narration assembler.

pub mod hf;

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use storymix_common::Emotion;

/// Base seed for per-sentence synthesis; sentence `i` uses `BASE_SEED + i`
/// so stochastic generation is reproducible per index within a run.
pub const BASE_SEED: u64 = 42;

/// Raw mono PCM returned by a synthesizer
#[derive(Debug, Clone)]
pub struct SynthesizedSpeech {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Maps sentences to discrete emotion labels
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Classify all sentences in order; returns one label per sentence
    async fn classify(&self, sentences: &[String]) -> Result<Vec<Emotion>>;
}

/// Generates free-text vocal delivery instructions for one sentence
#[async_trait]
pub trait VoiceDirector: Send + Sync {
    async fn direct(&self, sentence: &str, emotion: &Emotion) -> Result<String>;
}

/// Synthesizes speech for one sentence under a voice-direction prompt
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, prompt: &str, text: &str, seed: u64) -> Result<SynthesizedSpeech>;
}

/// The three collaborator handles the orchestrator needs for one job
#[derive(Clone)]
pub struct Collaborators {
    pub classifier: Arc<dyn EmotionClassifier>,
    pub director: Arc<dyn VoiceDirector>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
}

/// Wrap a generated voice direction into the narrator prompt handed to the
/// synthesizer
pub fn voice_prompt(direction: &str, sentence: &str) -> String {
    format!("A calm woman narrates {}: '{}'", direction.trim(), sentence)
}
