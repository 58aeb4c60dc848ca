//! Emotion pacing table
//!
//! Maps an emotion label to the silence inserted after each sentence of
//! narration. Labels outside the table get the default pause, so the
//! classifier vocabulary can extend without code changes here.

use crate::emotion::Emotion;
use std::collections::HashMap;

/// Default inter-sentence pause for labels not in the table
pub const DEFAULT_PAUSE_MS: u64 = 300;

/// Read-only mapping from emotion label to inter-sentence pause duration
#[derive(Debug, Clone)]
pub struct PacingTable {
    pauses: HashMap<Emotion, u64>,
    default_ms: u64,
}

impl PacingTable {
    /// The standard pacing table used by the generation pipeline
    pub fn standard() -> Self {
        let pauses = [
            ("joy", 300),
            ("sadness", 600),
            ("anger", 200),
            ("fear", 500),
            ("surprise", 400),
            ("love", 350),
            ("neutral", 300),
        ]
        .into_iter()
        .map(|(label, ms)| (Emotion::new(label), ms))
        .collect();

        Self {
            pauses,
            default_ms: DEFAULT_PAUSE_MS,
        }
    }

    /// Pause duration in milliseconds for the given emotion
    pub fn pause_ms(&self, emotion: &Emotion) -> u64 {
        self.pauses.get(emotion).copied().unwrap_or(self.default_ms)
    }
}

impl Default for PacingTable {
    fn default() -> Self {
        Self::standard()
    }
}
