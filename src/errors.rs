/*!
 * Error types for the fcpsub application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while turning transcription segments into subtitle documents
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// A segment starts earlier than the segment before it
    #[error("Segment {index} is out of order: starts at {start_seconds}s but the previous segment starts at {previous_start_seconds}s")]
    Ordering {
        /// Index of the offending segment in the source sequence
        index: usize,
        /// Start time of the last accepted segment
        previous_start_seconds: f64,
        /// Start time of the offending segment
        start_seconds: f64,
    },

    /// A segment has no text left after sanitizing
    #[error("Segment {index} has empty text after sanitizing (raw: {raw_text:?})")]
    EmptyText {
        /// Index of the offending segment in the source sequence
        index: usize,
        /// Text as delivered by the transcriber
        raw_text: String,
    },

    /// A segment carries times that cannot be placed on a timeline
    #[error("Segment {index} has invalid timing: start {start_seconds}s, end {end_seconds}s")]
    InvalidTiming {
        /// Index of the offending segment in the source sequence
        index: usize,
        /// Raw start time
        start_seconds: f64,
        /// Raw end time
        end_seconds: f64,
    },

    /// A caption was built with an empty frame range or blank text
    #[error("Invalid caption for frames {start_frame}..{end_frame}: {reason}")]
    InvalidCaption {
        /// First frame of the caption
        start_frame: u64,
        /// Frame after the last one of the caption
        end_frame: u64,
        /// What was wrong with it
        reason: String,
    },

    /// A structural precondition of an output format was violated
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// An unknown output format tag was requested
    #[error("Unsupported subtitle format: {0} (expected 'fcpxml' or 'srt')")]
    UnsupportedFormat(String),
}

impl SubtitleError {
    /// Source segment index for per-segment errors
    pub fn segment_index(&self) -> Option<usize> {
        match self {
            Self::Ordering { index, .. }
            | Self::EmptyText { index, .. }
            | Self::InvalidTiming { index, .. } => Some(*index),
            Self::InvalidCaption { .. } | Self::Encoding(_) | Self::UnsupportedFormat(_) => None,
        }
    }
}

/// Errors that can occur when running the external audio and speech tools
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The external executable could not be started
    #[error("Failed to run '{command}': {message}")]
    ToolNotFound {
        /// Executable name
        command: String,
        /// Error reported by the OS
        message: String,
    },

    /// The external executable exited unsuccessfully
    #[error("'{command}' failed: {stderr}")]
    ProcessFailed {
        /// Executable name
        command: String,
        /// Filtered standard error output
        stderr: String,
    },

    /// The external executable did not finish in time
    #[error("'{command}' timed out after {timeout_secs}s")]
    Timeout {
        /// Executable name
        command: String,
        /// Timeout that was exceeded
        timeout_secs: u64,
    },

    /// The transcript could not be read or parsed
    #[error("Invalid transcript: {0}")]
    InvalidOutput(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the transcription collaborators
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
