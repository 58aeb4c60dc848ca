//! End-to-end pipeline tests
//!
//! Drives the orchestrator with stub collaborators and verifies progress
//! event ordering, terminal-event guarantees, artifact durations, and
//! per-sentence failure isolation.

mod helpers;

use helpers::{collaborators, drain, job_context, wav_len, write_asset, ConstSynthesizer, ScriptedClassifier};
use std::sync::Arc;
use std::time::Duration;
use storymix_common::{ProgressEvent, ProgressStage};
use storymix_gen::pipeline::orchestrator::{self, JobContext};
use storymix_gen::progress::ProgressReceiver;
use storymix_gen::state::{JobStatus, SharedState};
use uuid::Uuid;

/// Submit a story through the orchestrator and claim its receiver
async fn run_job(ctx: &JobContext, story: &str) -> (Uuid, ProgressReceiver) {
    let (id, tx) = ctx.state.create_job(story.to_string()).await;
    orchestrator::spawn(ctx.clone(), id, story.to_string(), tx);
    let rx = ctx.state.take_receiver(id).await.unwrap();
    (id, rx)
}

fn terminal_count(events: &[ProgressEvent]) -> usize {
    events.iter().filter(|e| e.is_terminal()).count()
}

#[tokio::test]
async fn test_happy_path_produces_done_and_artifacts() {
    let assets = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_asset(assets.path(), "neutral.wav", 400);

    let state = Arc::new(SharedState::new());
    let ctx = job_context(
        state.clone(),
        collaborators(
            ScriptedClassifier {
                labels: vec!["joy", "sadness"],
            },
            ConstSynthesizer::ok(500),
        ),
        assets.path(),
        output.path(),
    );

    let (id, rx) = run_job(&ctx, "I am happy. I am sad.").await;
    let events = drain(rx).await;

    // Ordered stages with exactly one terminal event, and no error stage
    assert_eq!(events[0].stage, ProgressStage::Init);
    assert_eq!(terminal_count(&events), 1);
    let last = events.last().unwrap();
    assert_eq!(last.stage, ProgressStage::Done);
    assert!(events.iter().all(|e| e.stage != ProgressStage::Error));
    assert!(events
        .iter()
        .any(|e| e.message == "Dominant emotion: joy"));

    let record = state.get_job(id).await.unwrap();
    assert_eq!(record.status, JobStatus::Done);
    assert_eq!(record.dominant_emotion.unwrap().as_str(), "joy");
    assert_eq!(record.sentences.len(), 2);
    assert!(record.sentences.iter().all(|s| !s.failed));

    // 500ms clip + 300ms joy pause + 500ms clip + 600ms sadness pause
    let expected_samples = 1900 * 44100 / 1000;
    assert_eq!(wav_len(&record.voice_path.unwrap()), expected_samples);
    // Mixing never changes narration duration
    assert_eq!(wav_len(&record.mix_path.unwrap()), expected_samples);
}

#[tokio::test]
async fn test_failed_sentence_is_skipped_not_fatal() {
    let assets = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let state = Arc::new(SharedState::new());
    let ctx = job_context(
        state.clone(),
        collaborators(
            ScriptedClassifier {
                labels: vec!["joy", "joy", "joy"],
            },
            ConstSynthesizer::failing(500, vec![1]),
        ),
        assets.path(),
        output.path(),
    );

    let (id, rx) = run_job(&ctx, "One. Two. Three.").await;
    let events = drain(rx).await;

    assert_eq!(terminal_count(&events), 1);
    assert_eq!(events.last().unwrap().stage, ProgressStage::Done);
    // The skip surfaces as a non-terminal synthesis-stage notice
    assert!(events
        .iter()
        .any(|e| e.stage == ProgressStage::Tts && e.message.contains("Skipping sentence")));

    let record = state.get_job(id).await.unwrap();
    assert_eq!(record.status, JobStatus::Done);
    assert!(!record.sentences[0].failed);
    assert!(record.sentences[1].failed);
    assert!(record.sentences[1].detail.is_some());
    assert!(!record.sentences[2].failed);

    // Two surviving sentences at 500ms each plus their 300ms joy pauses
    let expected_samples = 1600 * 44100 / 1000;
    assert_eq!(wav_len(&record.mix_path.unwrap()), expected_samples);
}

#[tokio::test]
async fn test_all_sentences_failing_terminates_with_error() {
    let assets = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let state = Arc::new(SharedState::new());
    let ctx = job_context(
        state.clone(),
        collaborators(
            ScriptedClassifier {
                labels: vec!["joy", "sadness"],
            },
            ConstSynthesizer::failing(500, vec![0, 1]),
        ),
        assets.path(),
        output.path(),
    );

    let (id, rx) = run_job(&ctx, "One. Two.").await;
    let events = drain(rx).await;

    assert_eq!(terminal_count(&events), 1);
    assert_eq!(events.last().unwrap().stage, ProgressStage::Error);

    let record = state.get_job(id).await.unwrap();
    assert_eq!(record.status, JobStatus::Error);
    assert!(record.mix_path.is_none());
}

#[tokio::test]
async fn test_story_with_no_sentences_terminates_with_error() {
    let assets = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let state = Arc::new(SharedState::new());
    let ctx = job_context(
        state.clone(),
        collaborators(
            ScriptedClassifier { labels: vec![] },
            ConstSynthesizer::ok(500),
        ),
        assets.path(),
        output.path(),
    );

    let (id, rx) = run_job(&ctx, "   ").await;
    let events = drain(rx).await;

    assert_eq!(terminal_count(&events), 1);
    assert_eq!(events.last().unwrap().stage, ProgressStage::Error);
    assert_eq!(state.get_job(id).await.unwrap().status, JobStatus::Error);
}

#[tokio::test]
async fn test_missing_background_assets_still_completes() {
    let assets = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let state = Arc::new(SharedState::new());
    let ctx = job_context(
        state.clone(),
        collaborators(
            ScriptedClassifier {
                labels: vec!["fear"],
            },
            ConstSynthesizer::ok(400),
        ),
        assets.path(),
        output.path(),
    );

    let (id, rx) = run_job(&ctx, "A noise in the dark.").await;
    let events = drain(rx).await;

    assert_eq!(events.last().unwrap().stage, ProgressStage::Done);

    // Silence substitutes for the bed; the mix matches the narration exactly
    let record = state.get_job(id).await.unwrap();
    let voice = wav_len(&record.voice_path.unwrap());
    let mixed = wav_len(&record.mix_path.unwrap());
    assert_eq!(voice, mixed);
    // 400ms clip + 500ms fear pause
    assert_eq!(mixed, 900 * 44100 / 1000);
}

#[tokio::test]
async fn test_submission_does_not_block_on_synthesis() {
    let assets = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let mut synth = ConstSynthesizer::ok(300);
    synth.delay = Some(Duration::from_millis(200));

    let state = Arc::new(SharedState::new());
    let ctx = job_context(
        state.clone(),
        collaborators(
            ScriptedClassifier {
                labels: vec!["joy"],
            },
            synth,
        ),
        assets.path(),
        output.path(),
    );

    let (id, rx) = run_job(&ctx, "A slow sentence.").await;

    // Synthesis is still in flight; the job is registered and running
    assert_eq!(state.get_job(id).await.unwrap().status, JobStatus::Running);

    let events = drain(rx).await;
    assert_eq!(events.last().unwrap().stage, ProgressStage::Done);
}

#[tokio::test]
async fn test_events_are_buffered_for_late_readers() {
    let assets = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_asset(assets.path(), "joy.wav", 300);

    let state = Arc::new(SharedState::new());
    let ctx = job_context(
        state.clone(),
        collaborators(
            ScriptedClassifier {
                labels: vec!["joy"],
            },
            ConstSynthesizer::ok(200),
        ),
        assets.path(),
        output.path(),
    );

    // Submit without claiming the receiver; wait for the job to finish
    let (id, tx) = ctx.state.create_job("A short tale.".to_string()).await;
    orchestrator::spawn(ctx.clone(), id, "A short tale.".to_string(), tx);

    let mut waited = Duration::ZERO;
    loop {
        if state.get_job(id).await.unwrap().status.is_terminal() {
            break;
        }
        assert!(waited < Duration::from_secs(10), "job never finished");
        tokio::time::sleep(Duration::from_millis(20)).await;
        waited += Duration::from_millis(20);
    }

    // Every event, terminal included, is still waiting in the channel
    let rx = state.take_receiver(id).await.unwrap();
    let events = drain(rx).await;
    assert_eq!(events[0].stage, ProgressStage::Init);
    assert_eq!(terminal_count(&events), 1);
    assert_eq!(events.last().unwrap().stage, ProgressStage::Done);
}
