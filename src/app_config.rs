use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::encoders::{FcpxmlOptions, SubtitleFormat};
use crate::frame_clock::{FrameClock, FrameRate};
use crate::segment_normalizer::{InvalidSegmentPolicy, SegmentNormalizer};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Output format written when none is given on the command line
    #[serde(default)]
    pub format: SubtitleFormat,

    /// Project frame rate captions are snapped to
    #[serde(default)]
    pub frame_rate: FrameRate,

    /// What to do with segments that cannot become captions
    #[serde(default)]
    pub invalid_segment_policy: InvalidSegmentPolicy,

    /// Treat a transcript without any usable caption as an error
    #[serde(default)]
    pub require_captions: bool,

    /// FCPXML project settings
    #[serde(default)]
    pub fcpxml: FcpxmlOptions,

    /// Speech recognition settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Audio extraction settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Whisper model sizes accepted by the recognizer
pub const WHISPER_MODELS: [&str; 5] = ["tiny", "base", "small", "medium", "large"];

/// Speech recognition configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Whisper executable
    #[serde(default = "default_whisper_command")]
    pub whisper_command: String,

    /// Model size (e.g., "base", "medium", "large-v3", "small.en")
    #[serde(default = "default_model")]
    pub model: String,

    /// Language code, auto-detected when absent
    #[serde(default)]
    pub language: Option<String>,

    /// Transcription timeout in seconds
    #[serde(default = "default_transcription_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            whisper_command: default_whisper_command(),
            model: default_model(),
            language: None,
            timeout_secs: default_transcription_timeout_secs(),
        }
    }
}

/// Audio extraction configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AudioConfig {
    /// ffmpeg executable
    #[serde(default = "default_ffmpeg_command")]
    pub ffmpeg_command: String,

    /// Extraction timeout in seconds
    #[serde(default = "default_audio_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffmpeg_command: default_ffmpeg_command(),
            timeout_secs: default_audio_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_whisper_command() -> String {
    "whisper".to_string()
}

fn default_ffmpeg_command() -> String {
    "ffmpeg".to_string()
}

fn default_model() -> String {
    "base".to_string()
}

fn default_transcription_timeout_secs() -> u64 {
    3600 // large models on long recordings are slow
}

fn default_audio_timeout_secs() -> u64 {
    120
}

/// Accepts the plain sizes plus versioned ("large-v3") and English-only ("base.en") variants
pub fn is_valid_model(model: &str) -> bool {
    let base = model.strip_suffix(".en").unwrap_or(model);
    let base = match base.split_once("-v") {
        Some((size, version)) if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) => size,
        _ => base,
    };
    WHISPER_MODELS.contains(&base)
}

impl Config {
    /// Load a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        FrameRate::new(self.frame_rate.numerator, self.frame_rate.denominator)?;

        if !is_valid_model(&self.transcription.model) {
            return Err(anyhow!(
                "Invalid Whisper model '{}', expected one of: {}",
                self.transcription.model,
                WHISPER_MODELS.join(", ")
            ));
        }

        if let Some(language) = &self.transcription.language {
            crate::language_utils::validate_language_code(language)?;
        }

        if self.transcription.timeout_secs == 0 || self.audio.timeout_secs == 0 {
            return Err(anyhow!("Timeouts must be greater than zero"));
        }

        Ok(())
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.frame_rate)
    }

    pub fn normalizer(&self) -> SegmentNormalizer {
        SegmentNormalizer::new(self.frame_clock(), self.invalid_segment_policy)
    }
}
