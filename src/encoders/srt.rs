use std::fmt;

use crate::errors::SubtitleError;
use crate::frame_clock::FrameClock;
use crate::segment_normalizer::CaptionInterval;

// @module: SubRip caption encoder

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

// @struct: One numbered SRT block
struct SrtBlock<'a> {
    seq_num: usize,
    start_ms: u64,
    end_ms: u64,
    text: &'a str,
}

impl fmt::Display for SrtBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", format_timestamp(self.start_ms), format_timestamp(self.end_ms))?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Writes captions as SRT blocks numbered from 1.
///
/// Timecodes come from the exact frame start times, truncated to the
/// millisecond.
#[derive(Debug, Clone)]
pub struct SrtEncoder {
    clock: FrameClock,
    require_captions: bool,
}

impl SrtEncoder {
    pub fn new(clock: FrameClock) -> Self {
        Self {
            clock,
            require_captions: false,
        }
    }

    pub fn require_captions(mut self, required: bool) -> Self {
        self.require_captions = required;
        self
    }

    pub fn encode(&self, intervals: &[CaptionInterval]) -> Result<String, SubtitleError> {
        if intervals.is_empty() && self.require_captions {
            return Err(SubtitleError::Encoding(
                "no captions to write to the SRT file".to_string(),
            ));
        }

        let mut out = String::new();
        for (index, interval) in intervals.iter().enumerate() {
            let block = SrtBlock {
                seq_num: index + 1,
                start_ms: self.frame_millis(interval.start_frame())?,
                end_ms: self.frame_millis(interval.end_frame())?,
                text: interval.text(),
            };
            out.push_str(&block.to_string());
        }

        Ok(out)
    }

    fn frame_millis(&self, frame: u64) -> Result<u64, SubtitleError> {
        self.clock
            .to_seconds(frame)
            .map(|time| time.to_millis_floor())
            .ok_or_else(|| SubtitleError::Encoding(format!("frame {} is past the end of the timeline", frame)))
    }
}
