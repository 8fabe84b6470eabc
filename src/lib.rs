/*!
 * # fcpsub - Whisper transcripts to editor-ready subtitles
 *
 * A Rust library and CLI that turns speech-recognition output into subtitle
 * tracks for nonlinear video editors.
 *
 * ## Features
 *
 * - Transcribe audio or video through the Whisper command-line tool
 * - Read existing Whisper JSON transcripts
 * - Snap captions to a fixed project frame rate (29.97 fps by default)
 * - Guarantee non-overlapping, at-least-one-frame captions
 * - Write Final Cut Pro XML timelines or SRT caption files
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `frame_clock`: Exact conversion between seconds and frame indices
 * - `segment_normalizer`: Frame alignment of raw transcription segments
 * - `encoders`: Output formats:
 *   - `encoders::fcpxml`: Final Cut Pro XML timeline encoder
 *   - `encoders::srt`: SubRip encoder
 * - `transcription`: External collaborators (ffmpeg, Whisper) and the transcript model
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod encoders;
pub mod errors;
pub mod file_utils;
pub mod frame_clock;
pub mod language_utils;
pub mod segment_normalizer;
pub mod transcription;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use encoders::{EncodedDocument, SubtitleEncoder, SubtitleFormat};
pub use errors::{AppError, SubtitleError, TranscriptionError};
pub use frame_clock::{FrameClock, FrameRate, RationalTime};
pub use segment_normalizer::{CaptionInterval, InvalidSegmentPolicy, NormalizedTrack, RawSegment, SegmentNormalizer};
