use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::errors::TranscriptionError;
use crate::segment_normalizer::RawSegment;

// @module: Whisper JSON transcript model

/// Transcription result in the layout written by Whisper's JSON output.
///
/// Word timings and decoder statistics are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full transcript text
    #[serde(default)]
    pub text: String,

    /// Detected or requested language code
    #[serde(default)]
    pub language: Option<String>,

    /// Timestamped segments in recognition order
    pub segments: Vec<RawSegment>,
}

impl Transcript {
    pub fn from_json_str(json: &str) -> Result<Self, TranscriptionError> {
        serde_json::from_str(json).map_err(|e| TranscriptionError::InvalidOutput(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transcript: {:?}", path))?;
        let transcript = Self::from_json_str(&json)
            .with_context(|| format!("Failed to parse transcript: {:?}", path))?;
        Ok(transcript)
    }

    /// Whether a JSON file is well-formed but lacks a `segments` array, such as a config file.
    ///
    /// Unreadable or malformed files return `false`: they may be damaged transcripts.
    pub fn is_foreign_json<P: AsRef<Path>>(path: P) -> bool {
        std::fs::read_to_string(path.as_ref())
            .ok()
            .and_then(|json| serde_json::from_str::<serde_json::Value>(&json).ok())
            .is_some_and(|value| !value.get("segments").is_some_and(serde_json::Value::is_array))
    }
}
