//! WAV artifact export
//!
//! Writes mono 16-bit PCM WAV files using hound. Float samples are clamped
//! to [-1.0, 1.0] here, at the export boundary; composition operations never
//! clamp.

use crate::audio::segment::AudioSegment;
use crate::error::{Error, Result};
use std::path::Path;

/// Export a segment as a mono 16-bit WAV file
pub fn write_wav(path: &Path, segment: &AudioSegment) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: segment.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| Error::Export(format!("cannot create {}: {}", path.display(), e)))?;

    for &sample in segment.samples() {
        let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(value)
            .map_err(|e| Error::Export(format!("write failed for {}: {}", path.display(), e)))?;
    }

    writer
        .finalize()
        .map_err(|e| Error::Export(format!("finalize failed for {}: {}", path.display(), e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::WORKING_SAMPLE_RATE;

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");

        let segment = AudioSegment::from_samples(vec![0.5; 4410], WORKING_SAMPLE_RATE);
        write_wav(&path, &segment).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, WORKING_SAMPLE_RATE);
        assert_eq!(reader.len(), 4410);
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hot.wav");

        let segment = AudioSegment::from_samples(vec![1.6, -1.6], WORKING_SAMPLE_RATE);
        write_wav(&path, &segment).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![i16::MAX, -i16::MAX]);
    }
}
