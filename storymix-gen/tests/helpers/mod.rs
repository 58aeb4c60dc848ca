//! Shared test helpers: stub collaborators and job-context builders
#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use storymix_common::{Emotion, ProgressEvent};
use storymix_gen::audio::WORKING_SAMPLE_RATE;
use storymix_gen::collab::{
    Collaborators, EmotionClassifier, SpeechSynthesizer, SynthesizedSpeech, VoiceDirector,
    BASE_SEED,
};
use storymix_gen::error::{Error, Result};
use storymix_gen::pipeline::background::BackgroundResolver;
use storymix_gen::pipeline::orchestrator::JobContext;
use storymix_gen::progress::ProgressReceiver;
use storymix_gen::state::SharedState;

/// Classifier returning a fixed label per sentence position
pub struct ScriptedClassifier {
    pub labels: Vec<&'static str>,
}

#[async_trait]
impl EmotionClassifier for ScriptedClassifier {
    async fn classify(&self, sentences: &[String]) -> Result<Vec<Emotion>> {
        Ok(sentences
            .iter()
            .enumerate()
            .map(|(i, _)| Emotion::new(self.labels.get(i).copied().unwrap_or("neutral")))
            .collect())
    }
}

/// Director returning a constant delivery style
pub struct FixedDirector;

#[async_trait]
impl VoiceDirector for FixedDirector {
    async fn direct(&self, _sentence: &str, _emotion: &Emotion) -> Result<String> {
        Ok("in a warm, steady tone".to_string())
    }
}

/// Synthesizer producing constant-amplitude audio of a fixed duration,
/// failing for the listed sentence indices (derived from the seed) and
/// optionally simulating call latency.
pub struct ConstSynthesizer {
    pub duration_ms: u64,
    pub fail_indices: Vec<usize>,
    pub delay: Option<Duration>,
}

impl ConstSynthesizer {
    pub fn ok(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            fail_indices: Vec::new(),
            delay: None,
        }
    }

    pub fn failing(duration_ms: u64, fail_indices: Vec<usize>) -> Self {
        Self {
            duration_ms,
            fail_indices,
            delay: None,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ConstSynthesizer {
    async fn synthesize(&self, _prompt: &str, _text: &str, seed: u64) -> Result<SynthesizedSpeech> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let index = (seed - BASE_SEED) as usize;
        if self.fail_indices.contains(&index) {
            return Err(Error::Synthesis(format!("sentence {} unavailable", index)));
        }
        let samples = vec![0.25; (self.duration_ms * WORKING_SAMPLE_RATE as u64 / 1000) as usize];
        Ok(SynthesizedSpeech {
            samples,
            sample_rate: WORKING_SAMPLE_RATE,
        })
    }
}

/// Bundle stubs into the collaborator handles the orchestrator expects
pub fn collaborators(classifier: ScriptedClassifier, synthesizer: ConstSynthesizer) -> Collaborators {
    Collaborators {
        classifier: Arc::new(classifier),
        director: Arc::new(FixedDirector),
        synthesizer: Arc::new(synthesizer),
    }
}

/// Job context over temp directories
pub fn job_context(
    state: Arc<SharedState>,
    collaborators: Collaborators,
    assets_dir: &Path,
    output_dir: &Path,
) -> JobContext {
    JobContext {
        state,
        collaborators,
        resolver: BackgroundResolver::new(assets_dir),
        output_dir: output_dir.to_path_buf(),
    }
}

/// Collect events until (and including) the first terminal one
pub async fn drain(mut rx: ProgressReceiver) -> Vec<ProgressEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        let terminal = event.is_terminal();
        events.push(event);
        if terminal {
            break;
        }
    }
    events
}

/// Write a mono WAV background asset of the given duration
pub fn write_asset(dir: &Path, name: &str, duration_ms: u64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: WORKING_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(dir.join(name), spec).unwrap();
    for _ in 0..(duration_ms * WORKING_SAMPLE_RATE as u64 / 1000) {
        writer.write_sample(4000i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Number of samples in a WAV file
pub fn wav_len(path: &Path) -> u32 {
    hound::WavReader::open(path).unwrap().len()
}
