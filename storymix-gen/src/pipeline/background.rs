//! Background track resolver
//!
//! Locates the music bed for a dominant emotion: an exact-match asset file,
//! else the neutral asset, else a zero-length silent placeholder stretched
//! later by the mix engine. Missing or undecodable assets are an explicit,
//! logged degradation, never a failure.

use crate::audio::{decode, resample, AudioSegment, WORKING_SAMPLE_RATE};
use std::path::{Path, PathBuf};
use storymix_common::Emotion;
use tracing::{debug, warn};

/// Asset extensions tried for each candidate name, in preference order
const ASSET_EXTENSIONS: &[&str] = &["mp3", "wav"];

/// Resolves dominant emotions to background music beds
#[derive(Debug, Clone)]
pub struct BackgroundResolver {
    assets_dir: PathBuf,
}

impl BackgroundResolver {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
        }
    }

    /// First existing asset among `{label}.{mp3,wav}` then `neutral.{mp3,wav}`
    fn candidate(&self, emotion: &Emotion) -> Option<PathBuf> {
        let names = [emotion.as_str(), "neutral"];
        for name in names {
            for ext in ASSET_EXTENSIONS {
                let path = self.assets_dir.join(format!("{}.{}", name, ext));
                if path.exists() {
                    return Some(path);
                }
            }
        }
        None
    }

    /// Resolve a background bed for the emotion at the working sample rate.
    ///
    /// Returns a zero-length segment when no asset resolves or decoding
    /// fails; the mix engine substitutes silence of narration length.
    pub fn resolve(&self, emotion: &Emotion) -> AudioSegment {
        let Some(path) = self.candidate(emotion) else {
            warn!(
                "No background asset for '{}' (and no neutral fallback) in {}",
                emotion,
                self.assets_dir.display()
            );
            return AudioSegment::empty(WORKING_SAMPLE_RATE);
        };

        match Self::load(&path) {
            Ok(segment) => {
                debug!(
                    "Background for '{}': {} ({}ms)",
                    emotion,
                    path.display(),
                    segment.duration_ms()
                );
                segment
            }
            Err(e) => {
                warn!("Background asset {} skipped: {}", path.display(), e);
                AudioSegment::empty(WORKING_SAMPLE_RATE)
            }
        }
    }

    fn load(path: &Path) -> crate::error::Result<AudioSegment> {
        let (samples, rate) = decode::decode_to_mono(path)?;
        let samples = resample::to_working_rate(&samples, rate)?;
        Ok(AudioSegment::from_samples(samples, WORKING_SAMPLE_RATE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_asset(dir: &Path, name: &str, duration_ms: u64) {
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

    #[test]
    fn test_exact_match_preferred() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), "joy.wav", 200);
        write_asset(dir.path(), "neutral.wav", 400);

        let resolver = BackgroundResolver::new(dir.path());
        let bed = resolver.resolve(&Emotion::new("joy"));
        assert_eq!(bed.duration_ms(), 200);
    }

    #[test]
    fn test_neutral_fallback() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), "neutral.wav", 400);

        let resolver = BackgroundResolver::new(dir.path());
        let bed = resolver.resolve(&Emotion::new("anger"));
        assert_eq!(bed.duration_ms(), 400);
    }

    #[test]
    fn test_nothing_resolves_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = BackgroundResolver::new(dir.path());
        let bed = resolver.resolve(&Emotion::new("joy"));
        assert!(bed.is_empty());
    }

    #[test]
    fn test_undecodable_asset_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("joy.mp3"), b"not really audio").unwrap();

        let resolver = BackgroundResolver::new(dir.path());
        let bed = resolver.resolve(&Emotion::new("joy"));
        assert!(bed.is_empty());
    }
}
