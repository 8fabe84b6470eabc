use std::fmt;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::frame_clock::FrameClock;

// @module: Frame alignment of raw transcription segments

// @const: Line breaks and the whitespace around them
static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]*[\r\n]+\s*").unwrap()
});

/// Slack allowed when checking that segment starts never move backwards
pub const ORDERING_TOLERANCE_SECONDS: f64 = 0.001;

// @struct: Segment as produced by the speech recognizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    // @field: Start time in seconds
    #[serde(rename = "start")]
    pub start_seconds: f64,

    // @field: End time in seconds
    #[serde(rename = "end")]
    pub end_seconds: f64,

    // @field: Recognized text
    pub text: String,
}

impl RawSegment {
    pub fn new(start_seconds: f64, end_seconds: f64, text: impl Into<String>) -> Self {
        RawSegment {
            start_seconds,
            end_seconds,
            text: text.into(),
        }
    }
}

/// A frame-aligned caption ready for encoding.
///
/// Always spans at least one frame. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaptionInterval {
    start_frame: u64,
    end_frame: u64,
    text: String,
}

impl CaptionInterval {
    // @creates: Validated caption interval
    // @validates: Non-empty frame range and single-line non-empty text
    pub fn new(start_frame: u64, end_frame: u64, text: impl Into<String>) -> Result<Self, SubtitleError> {
        let invalid = |reason: &str| SubtitleError::InvalidCaption {
            start_frame,
            end_frame,
            reason: reason.to_string(),
        };

        if end_frame <= start_frame {
            return Err(invalid("end frame must come after start frame"));
        }

        let text = sanitize_text(&text.into()).ok_or_else(|| invalid("text is empty"))?;

        Ok(CaptionInterval { start_frame, end_frame, text })
    }

    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    pub fn end_frame(&self) -> u64 {
        self.end_frame
    }

    pub fn duration_frames(&self) -> u64 {
        self.end_frame - self.start_frame
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// What to do with a segment that cannot become a caption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidSegmentPolicy {
    /// Fail the whole conversion on the first bad segment
    Abort,
    /// Drop the bad segment, report it, and keep going
    #[default]
    Skip,
}

impl fmt::Display for InvalidSegmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// A segment dropped under [`InvalidSegmentPolicy::Skip`]
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSegment {
    /// Index of the segment in the source sequence
    pub index: usize,
    /// Why it was dropped
    pub reason: SubtitleError,
}

/// Normalizer output: captions plus anything that had to be dropped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTrack {
    pub intervals: Vec<CaptionInterval>,
    pub skipped: Vec<SkippedSegment>,
}

impl NormalizedTrack {
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

/// Trims a caption and folds line breaks into single spaces.
///
/// Returns `None` when nothing is left.
pub fn sanitize_text(text: &str) -> Option<String> {
    let collapsed = LINE_BREAK_REGEX.replace_all(text.trim(), " ");
    let collapsed = collapsed.trim();
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.to_string())
    }
}

/// Turns ordered raw segments into ordered, non-overlapping caption intervals.
///
/// Segments shorter than a frame are stretched to one frame and segments
/// that overlap the previous caption are pushed back to its end, so every
/// accepted segment produces exactly one caption.
#[derive(Debug, Clone, Copy)]
pub struct SegmentNormalizer {
    clock: FrameClock,
    policy: InvalidSegmentPolicy,
}

impl SegmentNormalizer {
    pub fn new(clock: FrameClock, policy: InvalidSegmentPolicy) -> Self {
        Self { clock, policy }
    }

    pub fn normalize(&self, segments: &[RawSegment]) -> Result<NormalizedTrack, SubtitleError> {
        let mut track = NormalizedTrack {
            intervals: Vec::with_capacity(segments.len()),
            skipped: Vec::new(),
        };
        let mut previous_start: Option<f64> = None;

        for (index, segment) in segments.iter().enumerate() {
            let checked = self
                .check_segment(index, segment, previous_start)
                .and_then(|text| self.align(index, segment, text, track.intervals.last()));
            let interval = match checked {
                Ok(interval) => interval,
                Err(reason) => match self.policy {
                    InvalidSegmentPolicy::Abort => return Err(reason),
                    InvalidSegmentPolicy::Skip => {
                        warn!("Skipping segment {}: {}", index, reason);
                        track.skipped.push(SkippedSegment { index, reason });
                        continue;
                    }
                },
            };
            previous_start = Some(segment.start_seconds);
            track.intervals.push(interval);
        }

        Ok(track)
    }

    // @validates: Timing, ordering against the last accepted segment, and text
    fn check_segment(&self, index: usize, segment: &RawSegment, previous_start: Option<f64>) -> Result<String, SubtitleError> {
        let start = segment.start_seconds;
        let end = segment.end_seconds;

        // end >= start, so an end inside the timeline covers the start too
        if !start.is_finite()
            || !end.is_finite()
            || start < 0.0
            || end < start
            || self.clock.checked_to_frame(end).is_none()
        {
            return Err(invalid_timing(index, segment));
        }

        if let Some(previous_start) = previous_start {
            if start + ORDERING_TOLERANCE_SECONDS < previous_start {
                return Err(SubtitleError::Ordering {
                    index,
                    previous_start_seconds: previous_start,
                    start_seconds: start,
                });
            }
        }

        sanitize_text(&segment.text).ok_or_else(|| SubtitleError::EmptyText {
            index,
            raw_text: segment.text.clone(),
        })
    }

    fn align(&self, index: usize, segment: &RawSegment, text: String, previous: Option<&CaptionInterval>) -> Result<CaptionInterval, SubtitleError> {
        let max_frame = self.clock.max_frame();
        let next_frame = |frame: u64| {
            frame
                .checked_add(1)
                .filter(|next| *next <= max_frame)
                .ok_or_else(|| invalid_timing(index, segment))
        };

        let mut start_frame = self.clock.checked_to_frame(segment.start_seconds).ok_or_else(|| invalid_timing(index, segment))?;
        let mut end_frame = self.clock.checked_to_frame(segment.end_seconds).ok_or_else(|| invalid_timing(index, segment))?;

        if end_frame <= start_frame {
            end_frame = next_frame(start_frame)?;
            debug!("Segment {} shorter than a frame, extending to frame {}", index, end_frame);
        }

        if let Some(previous) = previous {
            if start_frame < previous.end_frame {
                debug!(
                    "Segment {} overlaps previous caption, moving start from frame {} to {}",
                    index, start_frame, previous.end_frame
                );
                start_frame = previous.end_frame;
                if start_frame >= end_frame {
                    end_frame = next_frame(start_frame)?;
                }
            }
        }

        Ok(CaptionInterval { start_frame, end_frame, text })
    }
}

fn invalid_timing(index: usize, segment: &RawSegment) -> SubtitleError {
    SubtitleError::InvalidTiming {
        index,
        start_seconds: segment.start_seconds,
        end_seconds: segment.end_seconds,
    }
}

impl Default for SegmentNormalizer {
    fn default() -> Self {
        Self::new(FrameClock::default(), InvalidSegmentPolicy::default())
    }
}
