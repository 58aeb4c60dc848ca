//! Narration assembler
//!
//! Drives per-sentence voice direction and synthesis in original sentence
//! order, concatenating each successful clip with an emotion-calibrated
//! pause. A failed sentence is recorded and skipped; only the degenerate
//! case where every sentence fails aborts the job (empty narration is not
//! a valid artifact).

use crate::audio::{resample, AudioSegment, WORKING_SAMPLE_RATE};
use crate::collab::{voice_prompt, SpeechSynthesizer, VoiceDirector, BASE_SEED};
use crate::error::{Error, Result};
use crate::progress::ProgressSender;
use storymix_common::{Emotion, PacingTable, ProgressStage};
use tracing::warn;

/// Per-sentence assembly outcome, in original story order
#[derive(Debug)]
pub struct SentenceUnit {
    pub index: usize,
    pub text: String,
    pub emotion: Emotion,
    /// Synthesized clip, or the failure message for this sentence
    pub outcome: std::result::Result<AudioSegment, String>,
}

impl SentenceUnit {
    pub fn failed(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Synthesize one sentence: direction, prompt, speech, rate coercion
async fn synthesize_sentence(
    index: usize,
    text: &str,
    emotion: &Emotion,
    director: &dyn VoiceDirector,
    synthesizer: &dyn SpeechSynthesizer,
) -> Result<AudioSegment> {
    let direction = director.direct(text, emotion).await?;
    let prompt = voice_prompt(&direction, text);

    let speech = synthesizer
        .synthesize(&prompt, text, BASE_SEED + index as u64)
        .await?;

    let samples = resample::to_working_rate(&speech.samples, speech.sample_rate)?;
    Ok(AudioSegment::from_samples(samples, WORKING_SAMPLE_RATE))
}

/// Assemble the narration for a classified story.
///
/// Returns the concatenated narration (each successful clip followed by its
/// pacing pause) and the full-order per-sentence outcomes, failed entries
/// included.
pub async fn assemble(
    sentences: &[(String, Emotion)],
    director: &dyn VoiceDirector,
    synthesizer: &dyn SpeechSynthesizer,
    pacing: &PacingTable,
    progress: &ProgressSender,
) -> Result<(AudioSegment, Vec<SentenceUnit>)> {
    let total = sentences.len();
    let mut narration = AudioSegment::empty(WORKING_SAMPLE_RATE);
    let mut units = Vec::with_capacity(total);

    for (index, (text, emotion)) in sentences.iter().enumerate() {
        let outcome =
            match synthesize_sentence(index, text, emotion, director, synthesizer).await {
                Ok(clip) => {
                    narration.append(&clip)?;
                    let pause = AudioSegment::silence(pacing.pause_ms(emotion), WORKING_SAMPLE_RATE);
                    narration.append(&pause)?;
                    progress.stage(
                        ProgressStage::Tts,
                        format!("Finished sentence {}/{}", index + 1, total),
                    );
                    Ok(clip)
                }
                Err(e) => {
                    // One bad sentence never aborts the story
                    warn!("Sentence {} failed: {}", index + 1, e);
                    progress.stage(
                        ProgressStage::Tts,
                        format!("Skipping sentence {}/{}: {}", index + 1, total, e),
                    );
                    Err(e.to_string())
                }
            };

        units.push(SentenceUnit {
            index,
            text: text.clone(),
            emotion: emotion.clone(),
            outcome,
        });
    }

    if units.iter().all(|unit| unit.failed()) {
        return Err(Error::Synthesis(format!(
            "all {} sentences failed to synthesize",
            total
        )));
    }

    Ok((narration, units))
}
