//! Job orchestrator
//!
//! One orchestrator task runs per submitted job: segment -> classify ->
//! assemble narration -> export voice-only -> resolve background -> mix ->
//! export, pushing ordered progress events at every stage boundary.
//!
//! The single most safety-critical invariant lives here: every exit path,
//! including panics inside the pipeline body, produces exactly one terminal
//! event. An abandoned channel would hang the client's progress stream
//! forever.

use crate::audio::wav;
use crate::collab::Collaborators;
use crate::error::{Error, Result};
use crate::pipeline::{assembler, background::BackgroundResolver, mix};
use crate::progress::ProgressSender;
use crate::state::{JobStatus, SentenceRecord, SharedState};
use crate::text;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use storymix_common::{emotion, Emotion, PacingTable, ProgressEvent, ProgressStage};
use tracing::{error, info};
use uuid::Uuid;

/// Everything an orchestrator task needs beyond the job itself
#[derive(Clone)]
pub struct JobContext {
    pub state: Arc<SharedState>,
    pub collaborators: Collaborators,
    pub resolver: BackgroundResolver,
    pub output_dir: PathBuf,
}

/// Spawn the orchestrator task for a freshly submitted job.
///
/// Returns immediately; all synthesis work happens on the spawned task.
pub fn spawn(ctx: JobContext, job_id: Uuid, story: String, progress: ProgressSender) {
    tokio::spawn(async move {
        let outcome = AssertUnwindSafe(run(&ctx, job_id, &story, &progress))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => {
                info!("Job {} completed", job_id);
            }
            Ok(Err(e)) => {
                error!("Job {} failed: {}", job_id, e);
                ctx.state.finish_job(job_id, JobStatus::Error).await;
                progress.push(ProgressEvent::error(format!("Generation failed: {}", e)));
            }
            Err(_) => {
                error!("Job {} panicked", job_id);
                ctx.state.finish_job(job_id, JobStatus::Error).await;
                progress.push(ProgressEvent::error(
                    "Processing terminated unexpectedly".to_string(),
                ));
            }
        }
    });
}

/// The fallible pipeline body; pushes the terminal `done` event itself on
/// success, and leaves failure terminalization to `spawn`.
async fn run(ctx: &JobContext, job_id: Uuid, story: &str, progress: &ProgressSender) -> Result<()> {
    progress.stage(ProgressStage::Init, "Story received, starting pipeline");

    let sentences = text::split_sentences(story);
    if sentences.is_empty() {
        return Err(Error::BadRequest("story contains no sentences".to_string()));
    }

    // Stage: emotion classification
    progress.stage(
        ProgressStage::Emotion,
        "Detecting emotions for all sentences...",
    );
    let emotions = ctx.collaborators.classifier.classify(&sentences).await?;
    if emotions.len() != sentences.len() {
        return Err(Error::Classify(format!(
            "classifier returned {} labels for {} sentences",
            emotions.len(),
            sentences.len()
        )));
    }

    let dominant = emotion::dominant(&emotions).unwrap_or_else(Emotion::neutral);
    progress.stage(
        ProgressStage::Emotion,
        format!("Dominant emotion: {}", dominant),
    );

    let records: Vec<SentenceRecord> = sentences
        .iter()
        .zip(emotions.iter())
        .enumerate()
        .map(|(index, (text, emotion))| SentenceRecord {
            index,
            text: text.clone(),
            emotion: emotion.clone(),
            failed: false,
            detail: None,
        })
        .collect();
    {
        let dominant = dominant.clone();
        ctx.state
            .update_job(job_id, move |record| {
                record.dominant_emotion = Some(dominant);
                record.sentences = records;
            })
            .await;
    }

    // Stage: per-sentence direction + synthesis
    progress.stage(
        ProgressStage::Tts,
        "Generating voice directions and narration for all sentences...",
    );
    let classified: Vec<(String, Emotion)> = sentences.into_iter().zip(emotions).collect();
    let (narration, units) = assembler::assemble(
        &classified,
        ctx.collaborators.director.as_ref(),
        ctx.collaborators.synthesizer.as_ref(),
        &PacingTable::standard(),
        progress,
    )
    .await?;

    let outcomes: Vec<(bool, Option<String>)> = units
        .iter()
        .map(|unit| (unit.failed(), unit.outcome.as_ref().err().cloned()))
        .collect();
    ctx.state
        .update_job(job_id, move |record| {
            for (sentence, (failed, detail)) in record.sentences.iter_mut().zip(outcomes) {
                sentence.failed = failed;
                sentence.detail = detail;
            }
        })
        .await;

    // Stage: export + mix
    std::fs::create_dir_all(&ctx.output_dir)?;

    let voice_path = ctx.output_dir.join(format!("{}_voice.wav", job_id));
    progress.stage(
        ProgressStage::Mixing,
        format!("Exporting voice-only narration ({}ms)", narration.duration_ms()),
    );
    wav::write_wav(&voice_path, &narration)?;
    {
        let voice_path = voice_path.clone();
        ctx.state
            .update_job(job_id, move |record| record.voice_path = Some(voice_path))
            .await;
    }

    progress.stage(
        ProgressStage::Mixing,
        format!("Adding {} background music...", dominant),
    );
    let bed = ctx.resolver.resolve(&dominant);
    let mixed = mix::mix(&narration, &bed)?;

    let mix_path = ctx.output_dir.join(format!("{}.wav", job_id));
    wav::write_wav(&mix_path, &mixed)?;
    {
        let mix_path = mix_path.clone();
        ctx.state
            .update_job(job_id, move |record| record.mix_path = Some(mix_path))
            .await;
    }

    ctx.state.finish_job(job_id, JobStatus::Done).await;
    progress.push(ProgressEvent::done("Processing complete"));
    Ok(())
}
