//! Configuration management for storymix-gen
//!
//! Two-tier configuration:
//! 1. **TOML bootstrap**: port, asset/output directories, logging, and
//!    collaborator endpoints (static, read once at startup)
//! 2. **Built-in defaults**: defined in code, used when the TOML file or
//!    individual keys are missing
//!
//! Command-line arguments override TOML values; see `main.rs`.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime. The service must restart
/// to pick up changes.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory containing background music assets ({emotion}.mp3 / .wav)
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Directory receiving exported audio artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Seconds a terminal job's registry entry and artifacts are retained
    /// before the sweep task evicts them
    #[serde(default = "default_retention_secs")]
    pub retention_secs: u64,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Collaborator endpoint configuration (optional)
    #[serde(default)]
    pub collaborator: CollaboratorConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Remote inference endpoints for the external collaborators
#[derive(Debug, Clone, Deserialize)]
pub struct CollaboratorConfig {
    /// Base URL of the model-inference service
    #[serde(default = "default_inference_base_url")]
    pub base_url: String,

    /// Sentence emotion classifier model id
    #[serde(default = "default_classifier_model")]
    pub classifier_model: String,

    /// Voice-direction text generator model id
    #[serde(default = "default_director_model")]
    pub director_model: String,

    /// Text-to-speech synthesizer model id
    #[serde(default = "default_synthesizer_model")]
    pub synthesizer_model: String,

    /// Environment variable holding the API token (not the token itself)
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_port() -> u16 {
    5750
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("bg")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

fn default_retention_secs() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_inference_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_classifier_model() -> String {
    "j-hartmann/emotion-english-distilroberta-base".to_string()
}

fn default_director_model() -> String {
    "TinyLlama/TinyLlama-1.1B-Chat-v1.0".to_string()
}

fn default_synthesizer_model() -> String {
    "parler-tts/parler-tts-mini-v1".to_string()
}

fn default_token_env() -> String {
    "HF_TOKEN".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_base_url(),
            classifier_model: default_classifier_model(),
            director_model: default_director_model(),
            synthesizer_model: default_synthesizer_model(),
            token_env: default_token_env(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            assets_dir: default_assets_dir(),
            output_dir: default_output_dir(),
            retention_secs: default_retention_secs(),
            logging: LoggingConfig::default(),
            collaborator: CollaboratorConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))
    }

    /// Load from file if it exists, otherwise built-in defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
