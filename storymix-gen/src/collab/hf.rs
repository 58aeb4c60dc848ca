//! HTTP collaborator client for a hosted inference service
//!
//! Implements all three collaborator traits against Hugging Face style
//! model-inference endpoints: a text-classification model for emotions, a
//! text-generation model for voice directions, and a text-to-speech model
//! returning WAV bytes.

use crate::collab::{EmotionClassifier, SpeechSynthesizer, SynthesizedSpeech, VoiceDirector};
use crate::config::CollaboratorConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use storymix_common::Emotion;
use tracing::debug;

/// Marker splitting the instruction prompt from the generated direction
const DIRECTION_MARKER: &str = "### Voice direction:";

/// Remote inference client implementing the collaborator traits
pub struct HfClient {
    http: reqwest::Client,
    base_url: String,
    classifier_model: String,
    director_model: String,
    synthesizer_model: String,
    token: Option<String>,
}

/// One `{label, score}` entry of a classification response
#[derive(Debug, Deserialize)]
struct Classification {
    label: String,
    #[allow(dead_code)]
    score: f64,
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}

impl HfClient {
    /// Build a client from configuration; the API token is read from the
    /// configured environment variable and may be absent for local
    /// endpoints.
    pub fn from_config(config: &CollaboratorConfig) -> Self {
        let token = std::env::var(&config.token_env).ok();
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            classifier_model: config.classifier_model.clone(),
            director_model: config.director_model.clone(),
            synthesizer_model: config.synthesizer_model.clone(),
            token,
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }

    fn request(&self, model: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.post(self.model_url(model));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Build the instruction prompt handed to the direction generator
    fn direction_prompt(sentence: &str, emotion: &Emotion) -> String {
        format!(
            "### Instruction:\n\
             You are a voice direction assistant. Given a sentence and its dominant emotion, \
             write a one-sentence, natural-sounding vocal delivery style for a female narrator \
             describing exactly how her voice should express the emotion.\n\n\
             ### Sentence:\n\"{sentence}\"\n\n\
             ### Emotion:\n{emotion}\n\n\
             {DIRECTION_MARKER}"
        )
    }

    /// Extract the direction text following the marker in the generation
    fn parse_direction(generated: &str) -> String {
        generated
            .rsplit(DIRECTION_MARKER)
            .next()
            .unwrap_or(generated)
            .trim()
            .to_string()
    }

    /// Decode a WAV payload into mono f32 samples
    fn decode_wav_payload(bytes: &[u8]) -> Result<SynthesizedSpeech> {
        let reader = hound::WavReader::new(Cursor::new(bytes))
            .map_err(|e| Error::Synthesis(format!("invalid WAV payload: {}", e)))?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| Error::Synthesis(format!("corrupt WAV payload: {}", e)))?
            }
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| Error::Synthesis(format!("corrupt WAV payload: {}", e)))?,
        };

        let samples = if channels == 1 {
            interleaved
        } else {
            interleaved
                .chunks_exact(channels)
                .map(|frame| frame.iter().sum::<f32>() / channels as f32)
                .collect()
        };

        Ok(SynthesizedSpeech {
            samples,
            sample_rate: spec.sample_rate,
        })
    }
}

#[async_trait]
impl EmotionClassifier for HfClient {
    async fn classify(&self, sentences: &[String]) -> Result<Vec<Emotion>> {
        debug!("Classifying {} sentences", sentences.len());

        let response = self
            .request(&self.classifier_model)
            .json(&json!({ "inputs": sentences }))
            .send()
            .await
            .map_err(|e| Error::Classify(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Classify(format!(
                "classifier returned {}",
                response.status()
            )));
        }

        // One ranked list of {label, score} per sentence; top entry wins
        let ranked: Vec<Vec<Classification>> = response
            .json()
            .await
            .map_err(|e| Error::Classify(format!("bad response: {}", e)))?;

        if ranked.len() != sentences.len() {
            return Err(Error::Classify(format!(
                "expected {} results, got {}",
                sentences.len(),
                ranked.len()
            )));
        }

        ranked
            .iter()
            .map(|results| {
                results
                    .first()
                    .map(|c| Emotion::new(&c.label))
                    .ok_or_else(|| Error::Classify("empty classification result".to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl VoiceDirector for HfClient {
    async fn direct(&self, sentence: &str, emotion: &Emotion) -> Result<String> {
        let prompt = Self::direction_prompt(sentence, emotion);

        let response = self
            .request(&self.director_model)
            .json(&json!({
                "inputs": prompt,
                "parameters": { "max_new_tokens": 60, "temperature": 0.7, "do_sample": true }
            }))
            .send()
            .await
            .map_err(|e| Error::Synthesis(format!("direction request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Synthesis(format!(
                "director returned {}",
                response.status()
            )));
        }

        let generations: Vec<Generation> = response
            .json()
            .await
            .map_err(|e| Error::Synthesis(format!("bad direction response: {}", e)))?;

        let generated = generations
            .first()
            .map(|g| g.generated_text.as_str())
            .ok_or_else(|| Error::Synthesis("empty direction response".to_string()))?;

        Ok(Self::parse_direction(generated))
    }
}

#[async_trait]
impl SpeechSynthesizer for HfClient {
    async fn synthesize(&self, prompt: &str, text: &str, seed: u64) -> Result<SynthesizedSpeech> {
        let response = self
            .request(&self.synthesizer_model)
            .json(&json!({
                "inputs": text,
                "parameters": { "description": prompt, "seed": seed }
            }))
            .send()
            .await
            .map_err(|e| Error::Synthesis(format!("synthesis request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Synthesis(format!(
                "synthesizer returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Synthesis(format!("failed to read audio payload: {}", e)))?;

        Self::decode_wav_payload(&bytes)
    }
}
