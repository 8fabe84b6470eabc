use std::ffi::OsString;
use std::path::Path;
use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use tempfile::TempPath;

use super::process::run_tool;
use crate::app_config::AudioConfig;

// @module: Audio extraction from video containers

/// Extracts the audio track of a video into a temporary WAV file
#[derive(Debug, Clone)]
pub struct AudioExtractor {
    ffmpeg_command: String,
    timeout_secs: u64,
}

impl AudioExtractor {
    pub fn new(ffmpeg_command: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            ffmpeg_command: ffmpeg_command.into(),
            timeout_secs,
        }
    }

    pub fn from_config(config: &AudioConfig) -> Self {
        Self::new(config.ffmpeg_command.clone(), config.timeout_secs)
    }

    /// ffmpeg arguments producing 16 kHz mono PCM, the recognizer's native input
    pub fn build_args(video_path: &Path, output_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into(), "-i".into(), video_path.as_os_str().to_owned()];
        args.extend(
            ["-vn", "-ac", "1", "-ar", "16000", "-c:a", "pcm_s16le"]
                .iter()
                .map(OsString::from),
        );
        args.push(output_path.as_os_str().to_owned());
        args
    }

    /// Extracts audio; the file is removed when the returned path is dropped
    pub async fn extract(&self, video_path: &Path) -> Result<TempPath> {
        if !video_path.exists() {
            return Err(anyhow!("Video file does not exist: {:?}", video_path));
        }

        let audio_path = tempfile::Builder::new()
            .prefix("fcpsub-audio-")
            .suffix(".wav")
            .tempfile()
            .context("Failed to create temporary audio file")?
            .into_temp_path();

        info!("Extracting audio from {:?}", video_path);
        run_tool(&self.ffmpeg_command, Self::build_args(video_path, &audio_path), self.timeout_secs)
            .await
            .with_context(|| format!("Audio extraction failed for {:?}", video_path))?;

        let file_size = std::fs::metadata(&audio_path)?.len();
        if file_size == 0 {
            return Err(anyhow!("Extracted audio is empty, {:?} may have no audio track", video_path));
        }
        debug!("Extracted {} bytes of audio to {:?}", file_size, audio_path);

        Ok(audio_path)
    }
}
