//! Emotion labels and dominant-emotion selection
//!
//! Emotion labels come from an external classifier whose vocabulary may
//! extend over time, so labels are normalized strings rather than a closed
//! enum. The well-known labels (joy, sadness, anger, fear, surprise, love,
//! neutral) get dedicated pacing and background assets; anything else falls
//! back to defaults.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A normalized (trimmed, lowercased) emotion label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Emotion(String);

// Wire reads go through `Emotion::new` so a raw "JOY" cannot bypass
// normalization and miss the pacing table
impl<'de> Deserialize<'de> for Emotion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        Ok(Emotion::new(&label))
    }
}

impl Emotion {
    /// Create a label, normalizing case and surrounding whitespace
    pub fn new(label: &str) -> Self {
        Emotion(label.trim().to_lowercase())
    }

    /// The neutral fallback label
    pub fn neutral() -> Self {
        Emotion("neutral".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Emotion {
    fn from(label: &str) -> Self {
        Emotion::new(label)
    }
}

/// Select the dominant emotion of a story: the most frequent label.
///
/// Ties are broken deterministically in favor of the label whose first
/// occurrence appears earliest in the sentence order.
pub fn dominant(emotions: &[Emotion]) -> Option<Emotion> {
    // label -> (count, index of first occurrence)
    let mut counts: HashMap<&Emotion, (usize, usize)> = HashMap::new();
    for (index, emotion) in emotions.iter().enumerate() {
        let entry = counts.entry(emotion).or_insert((0, index));
        entry.0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(emotion, _)| emotion.clone())
}
