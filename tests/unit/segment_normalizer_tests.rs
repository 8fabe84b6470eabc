/*!
 * Tests for segment alignment
 */

use fcpsub::segment_normalizer::{sanitize_text, ORDERING_TOLERANCE_SECONDS};
use fcpsub::{CaptionInterval, FrameClock, FrameRate, InvalidSegmentPolicy, RawSegment, SegmentNormalizer, SubtitleError};
use crate::common;

/// Test the two-segment scenario produces back-to-back captions
#[test]
fn test_normalize_withHelloSegments_shouldProduceAdjacentIntervals() {
    let track = SegmentNormalizer::default().normalize(&common::hello_segments()).unwrap();

    assert_eq!(track.intervals.len(), 2);
    assert_eq!((track.intervals[0].start_frame(), track.intervals[0].end_frame()), (0, 45));
    assert_eq!((track.intervals[1].start_frame(), track.intervals[1].end_frame()), (45, 90));
    assert_eq!(track.intervals[1].text(), "Second line");
}

/// Test a zero-length segment still yields a caption
#[test]
fn test_normalize_withDegenerateSegment_shouldKeepOneFrame() {
    let segments = vec![RawSegment::new(1.0, 1.0, "Hi")];

    let track = SegmentNormalizer::default().normalize(&segments).unwrap();

    let interval = &track.intervals[0];
    assert_eq!(interval.end_frame(), interval.start_frame() + 1);
}

/// Test identical segments are stacked instead of overlapping
#[test]
fn test_normalize_withIdenticalTimes_shouldStackCaptions() {
    let segments = vec![
        RawSegment::new(2.0, 2.0, "a"),
        RawSegment::new(2.0, 2.0, "b"),
        RawSegment::new(2.0, 2.0, "c"),
    ];

    let track = SegmentNormalizer::default().normalize(&segments).unwrap();

    let frames: Vec<(u64, u64)> = track.intervals.iter().map(|i| (i.start_frame(), i.end_frame())).collect();
    assert_eq!(frames, vec![(60, 61), (61, 62), (62, 63)]);
}

/// Test multi-line text is folded into one line
#[test]
fn test_normalize_withMultilineText_shouldCollapseNewlines() {
    let segments = vec![RawSegment::new(0.0, 1.0, "  first line\nsecond line\r\n third  ")];

    let track = SegmentNormalizer::default().normalize(&segments).unwrap();

    assert_eq!(track.intervals[0].text(), "first line second line third");
}

/// Test the skip policy keeps going and reports each dropped segment
#[test]
fn test_normalize_withSkipPolicy_shouldReportEverySkippedSegment() {
    let segments = vec![
        RawSegment::new(1.0, 1.5, "kept"),
        RawSegment::new(1.2, 2.0, ""),
        RawSegment::new(0.5, 2.5, "too early"),
        RawSegment::new(3.0, 2.0, "backwards"),
        RawSegment::new(3.0, 4.0, "kept too"),
    ];
    let normalizer = SegmentNormalizer::new(FrameClock::default(), InvalidSegmentPolicy::Skip);

    let track = normalizer.normalize(&segments).unwrap();

    assert_eq!(track.intervals.len(), 2);
    let indices: Vec<usize> = track.skipped.iter().map(|s| s.index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert!(matches!(track.skipped[0].reason, SubtitleError::EmptyText { .. }));
    assert!(matches!(track.skipped[1].reason, SubtitleError::Ordering { .. }));
    assert!(matches!(track.skipped[2].reason, SubtitleError::InvalidTiming { .. }));
}

/// Test the abort policy stops at the first bad segment
#[test]
fn test_normalize_withAbortPolicy_shouldReturnFirstError() {
    let segments = vec![
        RawSegment::new(0.0, 1.0, "ok"),
        RawSegment::new(1.0, 2.0, "\n"),
        RawSegment::new(0.0, 1.0, "out of order"),
    ];
    let normalizer = SegmentNormalizer::new(FrameClock::default(), InvalidSegmentPolicy::Abort);

    let error = normalizer.normalize(&segments).unwrap_err();

    assert_eq!(error.segment_index(), Some(1));
}

/// Test small backwards jitter is tolerated
#[test]
fn test_normalize_withJitterBelowTolerance_shouldAccept() {
    let segments = vec![
        RawSegment::new(10.0, 11.0, "a"),
        RawSegment::new(10.0 - ORDERING_TOLERANCE_SECONDS / 2.0, 12.0, "b"),
    ];
    let normalizer = SegmentNormalizer::new(FrameClock::default(), InvalidSegmentPolicy::Abort);

    assert!(normalizer.normalize(&segments).is_ok());
}

/// Test the normalizer honours the configured rate
#[test]
fn test_normalize_withCustomRate_shouldUseThatRate() {
    let clock = FrameClock::new(FrameRate::new(25, 1).unwrap());
    let normalizer = SegmentNormalizer::new(clock, InvalidSegmentPolicy::Abort);

    let track = normalizer.normalize(&common::hello_segments()).unwrap();

    assert_eq!(track.intervals[0], CaptionInterval::new(0, 38, "Hello world").unwrap());
    assert_eq!(track.intervals[1], CaptionInterval::new(38, 75, "Second line").unwrap());
}

/// Test the sanitizer is exposed for callers
#[test]
fn test_sanitize_text_withOnlyWhitespace_shouldReturnNone() {
    assert_eq!(sanitize_text("\r\n\t"), None);
}
