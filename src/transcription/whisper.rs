use std::ffi::OsString;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use log::{info, warn};

use super::process::run_tool;
use super::transcript::Transcript;
use crate::app_config::TranscriptionConfig;
use crate::language_utils;

// @module: Speech recognition through the Whisper command-line tool

/// Runs the Whisper CLI on an audio file and reads back its JSON transcript
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    command: String,
    model: String,
    language: Option<String>,
    timeout_secs: u64,
}

impl WhisperTranscriber {
    pub fn from_config(config: &TranscriptionConfig) -> Self {
        Self {
            command: config.whisper_command.clone(),
            model: config.model.clone(),
            language: config.language.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_args(&self, audio_path: &Path, output_dir: &Path) -> Result<Vec<OsString>> {
        let mut args: Vec<OsString> = vec![
            audio_path.as_os_str().to_owned(),
            "--model".into(),
            self.model.clone().into(),
            "--output_format".into(),
            "json".into(),
            "--output_dir".into(),
            output_dir.as_os_str().to_owned(),
            "--word_timestamps".into(),
            "True".into(),
            "--verbose".into(),
            "False".into(),
        ];
        if let Some(language) = &self.language {
            args.push("--language".into());
            args.push(language_utils::to_recognizer_code(language)?.into());
        }
        Ok(args)
    }

    pub async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let output_dir = tempfile::Builder::new()
            .prefix("fcpsub-whisper-")
            .tempdir()
            .context("Failed to create temporary transcript directory")?;

        info!(
            "Transcribing with Whisper model '{}' (language: {})",
            self.model,
            self.language.as_deref().unwrap_or("auto-detect")
        );
        run_tool(&self.command, self.build_args(audio_path, output_dir.path())?, self.timeout_secs)
            .await
            .with_context(|| format!("Transcription failed for {:?}", audio_path))?;

        let stem = audio_path
            .file_stem()
            .ok_or_else(|| anyhow!("Audio path has no file name: {:?}", audio_path))?;
        let mut json_name = stem.to_os_string();
        json_name.push(".json");
        let json_path = output_dir.path().join(json_name);
        let transcript = Transcript::load(&json_path)?;

        if let (Some(requested), Some(detected)) = (&self.language, &transcript.language) {
            if !language_utils::language_codes_match(requested, detected) {
                warn!("Requested language '{}' but transcript reports '{}'", requested, detected);
            }
        }

        Ok(transcript)
    }
}
