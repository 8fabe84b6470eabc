/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use fcpsub::file_utils::{FileManager, FileType};
use fcpsub::SubtitleFormat;
use crate::common;

/// Test input classification by extension
#[test]
fn test_detect_file_type_withKnownExtensions_shouldClassify() {
    assert_eq!(FileManager::detect_file_type("talk.mp3"), FileType::Audio);
    assert_eq!(FileManager::detect_file_type("talk.WAV"), FileType::Audio);
    assert_eq!(FileManager::detect_file_type("talk.m4a"), FileType::Audio);
    assert_eq!(FileManager::detect_file_type("talk.mp4"), FileType::Video);
    assert_eq!(FileManager::detect_file_type("talk.json"), FileType::Transcript);
    assert_eq!(FileManager::detect_file_type("talk.fcpxml"), FileType::Unknown);
    assert_eq!(FileManager::detect_file_type("README"), FileType::Unknown);
}

/// Test the default output path swaps the extension
#[test]
fn test_default_output_path_shouldUseFormatExtension() {
    assert_eq!(
        FileManager::default_output_path("/media/talk.mp4", SubtitleFormat::Fcpxml),
        Path::new("/media/talk.fcpxml")
    );
    assert_eq!(
        FileManager::default_output_path("interview.final.m4a", SubtitleFormat::Srt),
        Path::new("interview.final.srt")
    );
}

/// Test atomic writes create parents and replace existing files
#[test]
fn test_write_atomically_shouldReplaceWholeFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("nested").join("out.srt");

    FileManager::write_atomically(&target, b"first version, quite long")?;
    FileManager::write_atomically(&target, b"second")?;

    assert_eq!(fs::read_to_string(&target)?, "second");
    // Only the target remains, no stray temporary files
    assert_eq!(fs::read_dir(target.parent().unwrap())?.count(), 1);
    Ok(())
}

/// Test folder scanning only returns convertible inputs
#[test]
fn test_find_media_files_shouldSkipUnknownFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    common::create_test_file(dir, "b.mp3", "")?;
    common::create_test_file(dir, "a.json", "{}")?;
    common::create_test_file(dir, "notes.txt", "")?;
    fs::create_dir(dir.join("sub"))?;
    common::create_test_file(&dir.join("sub"), "c.mov", "")?;

    let files = FileManager::find_media_files(dir)?;

    let names: Vec<String> = files.iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.json", "b.mp3", "c.mov"]);
    Ok(())
}

/// Test existence helpers
#[test]
fn test_exists_helpers_shouldDistinguishFilesAndDirs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "x.json", "{}")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::dir_exists(&file));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.json")));
    Ok(())
}
