//! HTTP request handlers
//!
//! Job submission, artifact download, and emotion metadata endpoints.
//! Submission returns a job id immediately; all synthesis work runs on the
//! spawned orchestrator task.

use crate::api::server::AppContext;
use crate::pipeline::orchestrator::{self, JobContext};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use storymix_common::Emotion;
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StoryRequest {
    story: String,
}

#[derive(Debug, Serialize)]
pub struct StoryResponse {
    job_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
pub struct EmotionsResponse {
    job_id: Uuid,
    dominant_emotion: Emotion,
    sentences: Vec<SentenceInfo>,
}

#[derive(Debug, Serialize)]
pub struct SentenceInfo {
    index: usize,
    text: String,
    emotion: Emotion,
    failed: bool,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

// ============================================================================
// Submission
// ============================================================================

/// POST /api/story - Submit a story for generation
///
/// Rejects empty/whitespace-only text with 400 and creates no job; otherwise
/// registers the job, spawns its orchestrator task, and returns the id
/// without blocking on any synthesis work.
pub async fn submit_story(
    State(ctx): State<AppContext>,
    Json(req): Json<StoryRequest>,
) -> Result<Json<StoryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let story = req.story.trim();
    if story.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "No story provided"));
    }

    let (job_id, progress) = ctx.state.create_job(story.to_string()).await;
    info!("Accepted story job {} ({} chars)", job_id, story.len());

    orchestrator::spawn(
        JobContext {
            state: ctx.state.clone(),
            collaborators: ctx.collaborators.clone(),
            resolver: ctx.resolver.clone(),
            output_dir: ctx.output_dir.clone(),
        },
        job_id,
        story.to_string(),
        progress,
    );

    Ok(Json(StoryResponse { job_id }))
}

// ============================================================================
// Artifact Retrieval
// ============================================================================

/// GET /api/audio/:job_id - Download the final mixed artifact
///
/// 404 until the artifact exists; never serves a partial or zero-byte file.
pub async fn download_audio(
    State(ctx): State<AppContext>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let record = ctx
        .state
        .get_job(job_id)
        .await
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Unknown job"))?;

    let path = record
        .mix_path
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Audio not available"))?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        error!("Failed to read artifact {}: {}", path.display(), e);
        error_response(StatusCode::NOT_FOUND, "Audio not available")
    })?;

    if bytes.is_empty() {
        return Err(error_response(StatusCode::NOT_FOUND, "Audio not available"));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"story.wav\"".to_string(),
            ),
        ],
        bytes,
    ))
}

// ============================================================================
// Emotion Metadata
// ============================================================================

/// GET /api/emotions/:job_id - Ordered per-sentence emotion metadata
pub async fn get_emotions(
    State(ctx): State<AppContext>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<EmotionsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let record = ctx
        .state
        .get_job(job_id)
        .await
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Unknown job"))?;

    let dominant_emotion = record
        .dominant_emotion
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Emotions not available yet"))?;

    let sentences = record
        .sentences
        .into_iter()
        .map(|s| SentenceInfo {
            index: s.index,
            text: s.text,
            emotion: s.emotion,
            failed: s.failed,
        })
        .collect();

    Ok(Json(EmotionsResponse {
        job_id,
        dominant_emotion,
        sentences,
    }))
}
