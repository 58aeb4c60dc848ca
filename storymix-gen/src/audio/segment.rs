//! Audio segment value type
//!
//! An `AudioSegment` is an immutable-by-convention buffer of mono f32 PCM
//! samples (-1.0 to 1.0) at a known sample rate. All operations return new
//! segments; there are no hidden shared buffers.
//!
//! Composition rules:
//! - Segments composed into one job share one sample rate; `concat` and
//!   `overlay` fail fast on a mismatch.
//! - `overlay` performs plain sample-wise addition of the gain-adjusted
//!   inputs. Headroom is the caller's responsibility (clipping is only
//!   clamped at WAV export).

use crate::error::{Error, Result};

/// Mono PCM audio at a known sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    samples: Vec<f32>,
    sample_rate: u32,
}

/// Convert a millisecond duration to a sample count at the given rate
fn ms_to_samples(duration_ms: u64, sample_rate: u32) -> usize {
    (duration_ms * sample_rate as u64 / 1000) as usize
}

impl AudioSegment {
    /// Zero-length segment at the given sample rate
    pub fn empty(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    /// Segment from raw mono samples
    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Silent segment of the given duration
    pub fn silence(duration_ms: u64, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; ms_to_samples(duration_ms, sample_rate)],
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in milliseconds (floor)
    pub fn duration_ms(&self) -> u64 {
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Append another segment in place; sample rates must match
    pub fn append(&mut self, other: &AudioSegment) -> Result<()> {
        if other.sample_rate != self.sample_rate {
            return Err(Error::Mix(format!(
                "sample rate mismatch: {} vs {}",
                self.sample_rate, other.sample_rate
            )));
        }
        self.samples.extend_from_slice(&other.samples);
        Ok(())
    }

    /// Concatenation of two segments; sample rates must match
    pub fn concat(&self, other: &AudioSegment) -> Result<AudioSegment> {
        let mut out = self.clone();
        out.append(other)?;
        Ok(out)
    }

    /// Scale amplitude by a decibel gain (linear factor 10^(dB/20))
    pub fn gain_db(&self, db: f32) -> AudioSegment {
        let factor = 10.0f32.powf(db / 20.0);
        AudioSegment {
            samples: self.samples.iter().map(|s| s * factor).collect(),
            sample_rate: self.sample_rate,
        }
    }

    /// Linear fade-in over the first `duration_ms` of the segment
    ///
    /// A fade longer than the segment is clamped to the segment length.
    pub fn fade_in(&self, duration_ms: u64) -> AudioSegment {
        let fade_len = ms_to_samples(duration_ms, self.sample_rate).min(self.samples.len());
        let mut samples = self.samples.clone();
        for (i, sample) in samples.iter_mut().take(fade_len).enumerate() {
            *sample *= i as f32 / fade_len as f32;
        }
        AudioSegment {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    /// Linear fade-out over the last `duration_ms` of the segment
    ///
    /// A fade longer than the segment is clamped to the segment length.
    pub fn fade_out(&self, duration_ms: u64) -> AudioSegment {
        let fade_len = ms_to_samples(duration_ms, self.sample_rate).min(self.samples.len());
        let mut samples = self.samples.clone();
        let total = samples.len();
        for i in 0..fade_len {
            let position = (i + 1) as f32 / fade_len as f32;
            samples[total - fade_len + i] *= 1.0 - position;
        }
        AudioSegment {
            samples,
            sample_rate: self.sample_rate,
        }
    }

    /// Repeat the segment end-to-end until it reaches at least the target
    /// duration, then truncate to exactly the target.
    ///
    /// Looping a zero-length segment is an error (nothing to repeat).
    pub fn loop_to_length(&self, target_ms: u64) -> Result<AudioSegment> {
        if self.samples.is_empty() {
            return Err(Error::Mix("cannot loop a zero-length segment".to_string()));
        }
        let target_len = ms_to_samples(target_ms, self.sample_rate);
        let samples: Vec<f32> = self
            .samples
            .iter()
            .copied()
            .cycle()
            .take(target_len)
            .collect();
        Ok(AudioSegment {
            samples,
            sample_rate: self.sample_rate,
        })
    }

    /// Sample-wise addition of two gain-adjusted segments, aligned at the
    /// start. Output length is max(len(base), len(other)).
    ///
    /// No clamping is applied here; the caller's chosen gains must leave
    /// enough headroom.
    pub fn overlay(
        base: &AudioSegment,
        other: &AudioSegment,
        base_db: f32,
        other_db: f32,
    ) -> Result<AudioSegment> {
        if base.sample_rate != other.sample_rate {
            return Err(Error::Mix(format!(
                "sample rate mismatch: {} vs {}",
                base.sample_rate, other.sample_rate
            )));
        }

        let base_factor = 10.0f32.powf(base_db / 20.0);
        let other_factor = 10.0f32.powf(other_db / 20.0);

        let out_len = base.samples.len().max(other.samples.len());
        let mut samples = Vec::with_capacity(out_len);
        for i in 0..out_len {
            let a = base.samples.get(i).copied().unwrap_or(0.0) * base_factor;
            let b = other.samples.get(i).copied().unwrap_or(0.0) * other_factor;
            samples.push(a + b);
        }

        Ok(AudioSegment {
            samples,
            sample_rate: base.sample_rate,
        })
    }
}
