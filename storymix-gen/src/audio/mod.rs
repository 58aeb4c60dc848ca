//! Audio processing: segment model, asset decoding, resampling, WAV export
//!
//! All audio inside one job is mono f32 at the working sample rate.
//! Background assets of any rate or channel count are coerced at decode
//! time; mixing segments of differing sample rates is a contract violation.

pub mod decode;
pub mod resample;
pub mod segment;
pub mod wav;

pub use resample::WORKING_SAMPLE_RATE;
pub use segment::AudioSegment;
