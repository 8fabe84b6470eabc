use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::encoders::SubtitleFormat;

// @module: File and directory utilities

const AUDIO_EXTENSIONS: [&str; 6] = ["mp3", "wav", "m4a", "flac", "ogg", "aac"];
const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "mov", "mkv", "m4v", "avi", "webm"];
const TRANSCRIPT_EXTENSIONS: [&str; 1] = ["json"];

/// Enum representing different input file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Audio the recognizer can read directly
    Audio,
    /// Video container whose audio must be extracted first
    Video,
    /// Ready-made Whisper JSON transcript
    Transcript,
    /// Anything else
    Unknown,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Classifies an input file by its extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let ext = match path.as_ref().extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            None => return FileType::Unknown,
        };

        if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Audio
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Video
        } else if TRANSCRIPT_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Transcript
        } else {
            FileType::Unknown
        }
    }

    // @generates: Input path with the format's extension, e.g. talk.mp4 -> talk.fcpxml
    pub fn default_output_path<P: AsRef<Path>>(input_file: P, format: SubtitleFormat) -> PathBuf {
        input_file.as_ref().with_extension(format.extension())
    }

    /// Writes `contents` so the destination either holds the full data or is untouched.
    ///
    /// The data goes to a temporary file next to `path` which is then renamed over it.
    pub fn write_atomically<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self::ensure_dir(&parent)?;

        let mut temp_file = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in: {}", parent.display()))?;
        temp_file
            .write_all(contents)
            .with_context(|| format!("Failed to write subtitle data for: {}", path.display()))?;
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(path)
            .map_err(|e| anyhow!("Failed to move subtitle file into place at {}: {}", path.display(), e.error))?;

        Ok(())
    }

    /// Find every convertible input (audio, video, transcript) below a directory
    pub fn find_media_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.is_file() && Self::detect_file_type(path) != FileType::Unknown {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }
}
