//! # Storymix Common Library
//!
//! Shared code for the storymix workspace:
//! - Progress event types (wire contract for the progress stream)
//! - Emotion labels and dominant-emotion selection
//! - Emotion pacing table (inter-sentence pause durations)

pub mod emotion;
pub mod events;
pub mod pacing;

pub use emotion::Emotion;
pub use events::{ProgressEvent, ProgressStage};
pub use pacing::PacingTable;
