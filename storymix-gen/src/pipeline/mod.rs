//! Generation pipeline
//!
//! Stages: segment -> classify -> direct+synthesize per sentence ->
//! assemble narration -> resolve background -> mix -> export, with ordered
//! progress events at every stage boundary and per-sentence failure
//! isolation in the assembler.

pub mod assembler;
pub mod background;
pub mod mix;
pub mod orchestrator;

pub use assembler::{assemble, SentenceUnit};
pub use background::BackgroundResolver;
pub use mix::mix;
