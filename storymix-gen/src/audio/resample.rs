//! Audio resampling using rubato
//!
//! Converts foreign-rate audio (synthesized speech payloads, background
//! assets) to the working sample rate before it enters segment composition.

use crate::error::{Error, Result};
use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use tracing::debug;

/// Working sample rate for all audio composed into a job
pub const WORKING_SAMPLE_RATE: u32 = 44100;

/// Resample mono audio to the working sample rate.
///
/// Returns the input unchanged when it is already at the working rate.
pub fn to_working_rate(input: &[f32], input_rate: u32) -> Result<Vec<f32>> {
    if input_rate == WORKING_SAMPLE_RATE {
        return Ok(input.to_vec());
    }
    if input.is_empty() {
        return Ok(Vec::new());
    }

    debug!(
        "Resampling {} frames from {}Hz to {}Hz",
        input.len(),
        input_rate,
        WORKING_SAMPLE_RATE
    );

    // FastFixedIn: good quality/performance tradeoff for one-shot conversion
    let mut resampler = FastFixedIn::<f32>::new(
        WORKING_SAMPLE_RATE as f64 / input_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        input.len(),
        1,
    )
    .map_err(|e| Error::Decode(format!("Failed to create resampler: {}", e)))?;

    let planar_input = vec![input.to_vec()];
    let mut planar_output = resampler
        .process(&planar_input, None)
        .map_err(|e| Error::Decode(format!("Resampling failed: {}", e)))?;

    Ok(planar_output.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_is_identity() {
        let input = vec![0.1, 0.2, 0.3, 0.4];
        let output = to_working_rate(&input, WORKING_SAMPLE_RATE).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_input() {
        let output = to_working_rate(&[], 48000).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_resample_length_ratio() {
        // 1 second of a 440 Hz tone at 48kHz
        let input_rate = 48000;
        let input: Vec<f32> = (0..input_rate)
            .map(|i| {
                let t = i as f32 / input_rate as f32;
                (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
            })
            .collect();

        let output = to_working_rate(&input, input_rate as u32).unwrap();

        // Output should be roughly 44100/48000 of the input length;
        // allow variance for resampler delay handling
        let expected = (input.len() as f64 * 44100.0 / input_rate as f64) as usize;
        assert!(
            output.len() >= expected - 64 && output.len() <= expected + 64,
            "expected ~{} frames, got {}",
            expected,
            output.len()
        );
    }
}
