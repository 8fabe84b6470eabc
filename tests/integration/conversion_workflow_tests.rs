/*!
 * Integration tests for the transcript to subtitle file workflow
 */

use std::fs;
use anyhow::Result;

use fcpsub::app_config::Config;
use fcpsub::app_controller::FolderSummary;
use fcpsub::{Controller, InvalidSegmentPolicy, RawSegment, SubtitleFormat};
use crate::common;

/// Test a Whisper transcript becomes an FCPXML file next to it
#[tokio::test]
async fn test_run_withTranscript_shouldWriteFcpxmlNextToInput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_transcript(temp_dir.path(), "talk.json")?;
    let controller = Controller::with_config(Config::default())?;

    let written = controller.run(&input, None, SubtitleFormat::Fcpxml, false).await?;

    let expected = temp_dir.path().join("talk.fcpxml");
    assert_eq!(written.as_deref(), Some(expected.as_path()));
    let xml = fs::read_to_string(&expected)?;
    assert!(xml.contains("<text>Hello world.</text>"));
    assert!(xml.contains("<text>Tom &amp; Jerry &lt;3</text>"));
    assert_eq!(xml.matches("<title ").count(), 2);
    Ok(())
}

/// Test a skipped segment leaves no gap in SRT numbering
#[tokio::test]
async fn test_run_withBlankSegment_shouldNumberSrtWithoutGaps() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_transcript(temp_dir.path(), "talk.json")?;
    let output = temp_dir.path().join("captions.srt");
    let controller = Controller::with_config(Config::default())?;

    controller.run(&input, Some(output.clone()), SubtitleFormat::Srt, false).await?;

    let srt = fs::read_to_string(&output)?;
    assert_eq!(
        srt,
        "1\n00:00:00,000 --> 00:00:01,501\nHello world.\n\n\
         2\n00:00:02,002 --> 00:00:03,003\nTom & Jerry <3\n\n"
    );
    Ok(())
}

/// Test existing outputs are kept unless forced
#[tokio::test]
async fn test_run_withExistingOutput_shouldRespectForceFlag() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_transcript(temp_dir.path(), "talk.json")?;
    let output = common::create_test_file(temp_dir.path(), "talk.srt", "keep me")?;
    let controller = Controller::with_config(Config::default())?;

    let skipped = controller.run(&input, None, SubtitleFormat::Srt, false).await?;
    assert!(skipped.is_none());
    assert_eq!(fs::read_to_string(&output)?, "keep me");

    let written = controller.run(&input, None, SubtitleFormat::Srt, true).await?;
    assert_eq!(written.as_deref(), Some(output.as_path()));
    assert!(fs::read_to_string(&output)?.starts_with("1\n"));
    Ok(())
}

/// Test a failing conversion leaves no output behind
#[tokio::test]
async fn test_run_withAbortPolicy_andBadSegment_shouldNotWriteOutput() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_transcript(temp_dir.path(), "talk.json")?;
    let config = Config {
        invalid_segment_policy: InvalidSegmentPolicy::Abort,
        ..Config::default()
    };
    let controller = Controller::with_config(config)?;

    let result = controller.run(&input, None, SubtitleFormat::Fcpxml, false).await;

    assert!(result.is_err());
    assert!(format!("{:#}", result.unwrap_err()).contains("Segment 1"));
    assert!(!temp_dir.path().join("talk.fcpxml").exists());
    Ok(())
}

/// Test unsupported inputs are rejected before anything runs
#[tokio::test]
async fn test_run_withUnsupportedInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "notes.txt", "hello")?;
    let controller = Controller::with_config(Config::default())?;

    assert!(controller.run(&input, None, SubtitleFormat::Srt, false).await.is_err());
    Ok(())
}

/// Test folder mode converts each transcript and counts failures
#[tokio::test]
async fn test_run_folder_shouldConvertEachTranscript() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_transcript(temp_dir.path(), "one.json")?;
    common::create_test_transcript(temp_dir.path(), "two.json")?;
    common::create_test_file(temp_dir.path(), "broken.json", "not json")?;
    let controller = Controller::with_config(Config::default())?;

    let summary = controller.run_folder(temp_dir.path(), SubtitleFormat::Srt, false).await?;

    assert_eq!(summary.converted, 2);
    assert_eq!(summary.failed, 1);
    assert!(temp_dir.path().join("one.srt").exists());
    assert!(temp_dir.path().join("two.srt").exists());
    assert!(!temp_dir.path().join("broken.srt").exists());
    Ok(())
}

/// Test the tool's own config file in the folder is not treated as a transcript
#[tokio::test]
async fn test_run_folder_withConfigFileInFolder_shouldIgnoreIt() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    Config::default().save(temp_dir.path().join("conf.json"))?;
    common::create_test_transcript(temp_dir.path(), "talk.json")?;
    let controller = Controller::with_config(Config::default())?;

    let summary = controller.run_folder(temp_dir.path(), SubtitleFormat::Fcpxml, false).await?;

    assert_eq!(summary, FolderSummary { converted: 1, skipped: 0, failed: 0 });
    assert!(temp_dir.path().join("talk.fcpxml").exists());
    assert!(!temp_dir.path().join("conf.fcpxml").exists());
    Ok(())
}

/// Test timestamps beyond the timeline are skipped, not saturated into the output
#[test]
fn test_convert_segments_withHugeTimestamps_shouldSkipThem() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    let segments = vec![
        RawSegment::new(1.0, 2.0, "Hello"),
        RawSegment::new(1e16, 1e16 + 10.0, "Far away"),
        RawSegment::new(1e300, 1e300, "Further"),
    ];

    let conversion = controller.convert_segments(&segments, SubtitleFormat::Fcpxml)?;

    assert_eq!(conversion.caption_count, 1);
    let skipped: Vec<usize> = conversion.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, vec![1, 2]);
    assert!(!conversion.document.contents.contains("18446744073709551615"));
    assert!(conversion.document.contents.contains("offset=\"30030/30000s\""));
    Ok(())
}

/// Test the in-memory conversion reports skipped segments
#[test]
fn test_convert_segments_shouldReturnDocumentAndSkips() -> Result<()> {
    let controller = Controller::with_config(Config::default())?;
    let segments = vec![
        RawSegment::new(0.0, 1.5, "Hello world"),
        RawSegment::new(1.0, 1.2, ""),
        RawSegment::new(1.5, 3.0, "Second line"),
    ];

    let conversion = controller.convert_segments(&segments, SubtitleFormat::Srt)?;

    assert_eq!(conversion.caption_count, 2);
    assert_eq!(conversion.skipped.len(), 1);
    assert_eq!(conversion.skipped[0].index, 1);
    assert!(conversion.document.contents.contains("2\n00:00:01,501 --> 00:00:03,003\nSecond line\n"));
    Ok(())
}

/// Test an invalid configuration is rejected by the controller
#[test]
fn test_with_config_withInvalidModel_shouldFail() {
    let mut config = Config::default();
    config.transcription.model = "enormous".to_string();
    assert!(Controller::with_config(config).is_err());
}
