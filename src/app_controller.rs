use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::encoders::{EncodedDocument, SubtitleEncoder, SubtitleFormat};
use crate::errors::SubtitleError;
use crate::file_utils::{FileManager, FileType};
use crate::segment_normalizer::{RawSegment, SkippedSegment};
use crate::transcription::{AudioExtractor, Transcript, WhisperTranscriber};

// @module: Application controller for subtitle generation

/// Result of converting one set of segments
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Encoded subtitle file contents
    pub document: EncodedDocument,
    /// Number of captions written
    pub caption_count: usize,
    /// Segments dropped by the normalizer
    pub skipped: Vec<SkippedSegment>,
}

/// Outcome counts of a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller: input file in, subtitle file out
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Normalize and encode segments without touching the filesystem
    pub fn convert_segments(&self, segments: &[RawSegment], format: SubtitleFormat) -> Result<Conversion, SubtitleError> {
        let track = self.config.normalizer().normalize(segments)?;
        if track.is_empty() {
            warn!("No captions left out of {} segments", segments.len());
        }
        if !track.skipped.is_empty() {
            warn!(
                "Skipped {} of {} segments ({} policy)",
                track.skipped.len(),
                segments.len(),
                self.config.invalid_segment_policy
            );
        }

        let encoder = SubtitleEncoder::for_format(
            format,
            self.config.frame_clock(),
            &self.config.fcpxml,
            self.config.require_captions,
        );
        let document = encoder.encode(&track.intervals)?;
        debug!("Encoded {} captions as {}", track.intervals.len(), format.display_name());

        Ok(Conversion {
            document,
            caption_count: track.intervals.len(),
            skipped: track.skipped,
        })
    }

    /// Obtain timestamped segments for an input, running extraction and recognition as needed
    pub async fn load_segments(&self, input_file: &Path) -> Result<Vec<RawSegment>> {
        let transcript = match FileManager::detect_file_type(input_file) {
            FileType::Transcript => {
                info!("Reading transcript {:?}", input_file);
                Transcript::load(input_file)?
            }
            FileType::Audio => self.transcribe(input_file).await?,
            FileType::Video => {
                let spinner = Self::spinner("Extracting audio...");
                let extracted = AudioExtractor::from_config(&self.config.audio).extract(input_file).await;
                spinner.finish_and_clear();
                let audio_path = extracted?;
                // The temporary WAV is deleted when audio_path goes out of scope
                self.transcribe(&audio_path).await?
            }
            FileType::Unknown => {
                return Err(anyhow!(
                    "Unsupported input file {:?}: expected audio, video or a JSON transcript",
                    input_file
                ));
            }
        };

        info!("Transcript contains {} segments", transcript.segments.len());
        Ok(transcript.segments)
    }

    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let transcriber = WhisperTranscriber::from_config(&self.config.transcription);
        let spinner = Self::spinner(&format!("Transcribing with Whisper ({})...", transcriber.model()));
        let result = transcriber.transcribe(audio_path).await;
        spinner.finish_and_clear();
        result
    }

    /// Convert a single input file.
    ///
    /// Returns the written path, or `None` when the output exists and `force_overwrite` is off.
    pub async fn run(&self, input_file: &Path, output_path: Option<PathBuf>, format: SubtitleFormat, force_overwrite: bool) -> Result<Option<PathBuf>> {
        let start_time = Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = output_path.unwrap_or_else(|| FileManager::default_output_path(input_file, format));
        if output_path.exists() && !force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_path);
            return Ok(None);
        }

        info!("Processing: {:?}", input_file);
        info!("Output: {:?} ({})", output_path, format.display_name());

        let segments = self.load_segments(input_file).await?;
        let conversion = self.convert_segments(&segments, format)
            .with_context(|| format!("Failed to convert {:?}", input_file))?;

        FileManager::write_atomically(&output_path, conversion.document.as_bytes())?;

        info!(
            "Subtitle file created: {:?} ({} captions) in {}",
            output_path,
            conversion.caption_count,
            Self::format_duration(start_time.elapsed())
        );

        Ok(Some(output_path))
    }

    /// Convert every supported file in a directory, next to its input
    pub async fn run_folder(&self, input_dir: &Path, format: SubtitleFormat, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = Instant::now();
        let files: Vec<PathBuf> = FileManager::find_media_files(input_dir)?
            .into_iter()
            .filter(|file| {
                let foreign = FileManager::detect_file_type(file) == FileType::Transcript
                    && Transcript::is_foreign_json(file);
                if foreign {
                    debug!("Ignoring {:?}: JSON without transcript segments", file);
                }
                !foreign
            })
            .collect();
        let mut summary = FolderSummary::default();

        if files.is_empty() {
            warn!("No audio, video or transcript files found in {:?}", input_dir);
            return Ok(summary);
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));

        for file in &files {
            folder_pb.set_message(
                file.file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );

            match self.run(file, None, format, force_overwrite).await {
                Ok(Some(_)) => summary.converted += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing {:?}: {:#}", file, e);
                    summary.failed += 1;
                }
            }
            folder_pb.inc(1);
        }
        folder_pb.finish_and_clear();

        info!(
            "Finished in {}: {} converted, {} skipped, {} failed",
            Self::format_duration(start_time.elapsed()),
            summary.converted,
            summary.skipped,
            summary.failed
        );

        Ok(summary)
    }

    fn spinner(message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
