//! Live progress stream
//!
//! Streams a job's progress events as newline-delimited JSON frames, one
//! event per line, closing after the first terminal event. The channel is
//! single-shot: the first reader claims the receiver, and any later read
//! (or a read for an unknown id) gets exactly one synthetic terminal error
//! frame instead of blocking or faulting.

use crate::api::server::AppContext;
use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use storymix_common::ProgressEvent;
use tracing::{debug, warn};
use uuid::Uuid;

/// Serialize one event as an NDJSON frame
fn frame(event: &ProgressEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(json) => Some(json + "\n"),
        Err(e) => {
            warn!("Failed to serialize progress event: {}", e);
            None
        }
    }
}

/// GET /api/progress/:job_id - NDJSON progress event stream
pub async fn progress_stream(
    State(ctx): State<AppContext>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    debug!("New progress stream client for job {}", job_id);

    // Invalid and unknown ids both get a synthetic terminal frame
    let receiver = match job_id.parse::<Uuid>() {
        Ok(id) => ctx.state.take_receiver(id).await,
        Err(_) => None,
    };

    let stream = async_stream::stream! {
        let mut rx = match receiver {
            Some(rx) => rx,
            None => {
                let event = ProgressEvent::error("Invalid progress ID");
                if let Some(f) = frame(&event) {
                    yield Ok::<_, Infallible>(f);
                }
                return;
            }
        };

        loop {
            match rx.recv().await {
                Some(event) => {
                    let terminal = event.is_terminal();
                    if let Some(f) = frame(&event) {
                        yield Ok(f);
                    }
                    if terminal {
                        break;
                    }
                }
                None => {
                    // Producer vanished without a terminal event; close the
                    // stream with a synthetic one rather than hanging
                    let event = ProgressEvent::error("Processing terminated unexpectedly");
                    if let Some(f) = frame(&event) {
                        yield Ok(f);
                    }
                    break;
                }
            }
        }
    };

    Response::builder()
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
