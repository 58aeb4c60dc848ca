//! # Storymix Generator Library (storymix-gen)
//!
//! Story-to-audio generation service: segments a prose narrative into
//! sentences, classifies per-sentence emotion, drives emotion-directed
//! speech synthesis, and assembles the clips into one mixed artifact with
//! looped, faded background music under the narration.
//!
//! **Architecture:** one orchestrator task per submitted job, producing
//! ordered progress events into a per-job channel drained by a streaming
//! HTTP reader. External collaborators (classifier, voice director,
//! synthesizer) are reached through trait objects.

pub mod api;
pub mod audio;
pub mod collab;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod state;
pub mod text;

pub use error::{Error, Result};
pub use state::SharedState;
