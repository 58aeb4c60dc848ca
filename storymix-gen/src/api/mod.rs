//! HTTP API for the story generation service
//!
//! Endpoints: story submission, live progress stream, artifact download,
//! and per-sentence emotion metadata.

pub mod handlers;
pub mod progress;
pub mod server;

pub use server::{create_router, AppContext};
