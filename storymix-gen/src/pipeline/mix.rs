//! Mix engine
//!
//! Stretches the background bed to exactly the narration length, shapes it
//! with fade envelopes and a fixed attenuation, then lays the narration
//! over it with a small asymmetric gain offset keeping the voice
//! perceptually dominant. The mix never alters the narration's duration.

use crate::audio::AudioSegment;
use crate::error::Result;

/// Fade-in/fade-out applied to the background bed
pub const BACKGROUND_FADE_MS: u64 = 1000;

/// Fixed attenuation applied to the background bed
pub const BACKGROUND_ATTENUATION_DB: f32 = -14.0;

/// Narration is pulled down slightly while the bed comes up slightly,
/// keeping the voice forward in the blend
pub const NARRATION_OFFSET_DB: f32 = -1.0;
pub const BACKGROUND_OFFSET_DB: f32 = 1.0;

/// Mix the narration over a background bed.
///
/// A zero-length bed (failed resolution with no fallback) becomes silence
/// of narration length rather than an error.
pub fn mix(narration: &AudioSegment, background: &AudioSegment) -> Result<AudioSegment> {
    let target_ms = narration.duration_ms();

    let bed = if background.is_empty() {
        AudioSegment::silence(target_ms, narration.sample_rate())
    } else {
        background.loop_to_length(target_ms)?
    };

    let bed = bed
        .fade_in(BACKGROUND_FADE_MS)
        .fade_out(BACKGROUND_FADE_MS)
        .gain_db(BACKGROUND_ATTENUATION_DB);

    // Narration is the longer operand (the bed is floor-rounded to its
    // millisecond duration), so the output length equals the narration's.
    AudioSegment::overlay(narration, &bed, NARRATION_OFFSET_DB, BACKGROUND_OFFSET_DB)
}
