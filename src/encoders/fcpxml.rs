use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::frame_clock::{FrameClock, FrameRate, RationalTime};
use crate::segment_normalizer::CaptionInterval;

// @module: Final Cut Pro XML timeline encoder

pub const FCPXML_VERSION: &str = "1.11";

const FORMAT_ID: &str = "r1";
const TITLE_EFFECT_ID: &str = "r2";
const TITLE_EFFECT_UID: &str = ".../Titles.localized/Bumper:Opener.localized/Basic Title.localized/Basic Title.moti";
// Titles are generators; their media timeline begins at one hour
const TITLE_MEDIA_START: &str = "3600s";

/// Names and picture settings written into the generated project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FcpxmlOptions {
    #[serde(default = "default_event_name")]
    pub event_name: String,

    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Name shown for every title clip
    #[serde(default = "default_title_name")]
    pub title_name: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for FcpxmlOptions {
    fn default() -> Self {
        Self {
            event_name: default_event_name(),
            project_name: default_project_name(),
            title_name: default_title_name(),
            width: default_width(),
            height: default_height(),
        }
    }
}

fn default_event_name() -> String {
    "Subtitles".to_string()
}

fn default_project_name() -> String {
    "Generated Subtitles".to_string()
}

fn default_title_name() -> String {
    "Basic Title".to_string()
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

/// Escapes the five XML special characters
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Writes captions as title clips on a single-sequence project spine.
///
/// Offsets and durations use rational seconds so the timeline reimports
/// on exact frame boundaries.
#[derive(Debug, Clone)]
pub struct FcpxmlEncoder {
    clock: FrameClock,
    options: FcpxmlOptions,
    require_captions: bool,
}

impl FcpxmlEncoder {
    pub fn new(clock: FrameClock, options: FcpxmlOptions) -> Self {
        Self {
            clock,
            options,
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
                "no captions to write to the FCPXML timeline".to_string(),
            ));
        }

        let rate = self.clock.rate();
        let sequence_frames = intervals.last().map(|last| last.end_frame()).unwrap_or(0);
        let mut out = String::new();

        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<!DOCTYPE fcpxml>\n");
        out.push_str(&format!("<fcpxml version=\"{}\">\n", FCPXML_VERSION));

        // Shared resources, referenced by id from the sequence and every title
        out.push_str("  <resources>\n");
        out.push_str(&format!(
            "    <format id=\"{}\" name=\"{}\" frameDuration=\"{}\" width=\"{}\" height=\"{}\" colorSpace=\"1-1-1 (Rec. 709)\"/>\n",
            FORMAT_ID,
            escape_xml(&self.format_name(rate)),
            rate.frame_duration(),
            self.options.width,
            self.options.height,
        ));
        out.push_str(&format!(
            "    <effect id=\"{}\" name=\"Basic Title\" uid=\"{}\"/>\n",
            TITLE_EFFECT_ID,
            escape_xml(TITLE_EFFECT_UID),
        ));
        out.push_str("  </resources>\n");

        out.push_str("  <library>\n");
        out.push_str(&format!("    <event name=\"{}\">\n", escape_xml(&self.options.event_name)));
        out.push_str(&format!("      <project name=\"{}\">\n", escape_xml(&self.options.project_name)));
        out.push_str(&format!(
            "        <sequence format=\"{}\" duration=\"{}\" tcStart=\"0s\" tcFormat=\"NDF\" audioLayout=\"stereo\" audioRate=\"48k\">\n",
            FORMAT_ID,
            self.time_of(sequence_frames)?,
        ));
        out.push_str("          <spine>\n");

        let title_name = escape_xml(&self.options.title_name);
        for interval in intervals {
            out.push_str(&format!(
                "            <title ref=\"{}\" name=\"{}\" offset=\"{}\" duration=\"{}\" start=\"{}\">\n",
                TITLE_EFFECT_ID,
                title_name,
                self.time_of(interval.start_frame())?,
                self.time_of(interval.duration_frames())?,
                TITLE_MEDIA_START,
            ));
            out.push_str(&format!("              <text>{}</text>\n", escape_xml(interval.text())));
            out.push_str("            </title>\n");
        }

        out.push_str("          </spine>\n");
        out.push_str("        </sequence>\n");
        out.push_str("      </project>\n");
        out.push_str("    </event>\n");
        out.push_str("  </library>\n");
        out.push_str("</fcpxml>\n");

        Ok(out)
    }

    fn time_of(&self, frames: u64) -> Result<RationalTime, SubtitleError> {
        self.clock
            .frames_to_time(frames)
            .ok_or_else(|| SubtitleError::Encoding(format!("frame {} is past the end of the timeline", frames)))
    }

    // e.g. FFVideoFormat1080p2997 for 30000/1001
    fn format_name(&self, rate: FrameRate) -> String {
        let rate_label = if rate.numerator % rate.denominator == 0 {
            (rate.numerator / rate.denominator).to_string()
        } else {
            format!("{:.2}", rate.fps()).replace('.', "")
        };
        format!("FFVideoFormat{}p{}", self.options.height, rate_label)
    }
}
