/*!
 * Common test utilities for the fcpsub test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use fcpsub::RawSegment;

/// Routes library logging to the test harness; safe to call repeatedly
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Whisper JSON transcript with three segments, the second blank
pub const SAMPLE_TRANSCRIPT: &str = r#"{
  "text": " Hello world. Second line.",
  "language": "en",
  "segments": [
    {"id": 0, "seek": 0, "start": 0.0, "end": 1.5, "text": " Hello world."},
    {"id": 1, "seek": 0, "start": 1.5, "end": 2.0, "text": "   "},
    {"id": 2, "seek": 0, "start": 2.0, "end": 3.0, "text": " Tom & Jerry <3"}
  ]
}"#;

/// Creates a sample Whisper transcript for testing
pub fn create_test_transcript(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, SAMPLE_TRANSCRIPT)
}

/// The two-segment scenario used throughout the suite
pub fn hello_segments() -> Vec<RawSegment> {
    vec![
        RawSegment::new(0.0, 1.5, "Hello world"),
        RawSegment::new(1.5, 3.0, "Second line"),
    ]
}
