/*!
 * Subtitle encoders.
 *
 * Both encoders consume the same read-only slice of caption intervals
 * and share no state, so they can run side by side on one track.
 *
 * - `fcpxml`: Final Cut Pro XML timeline with one title clip per caption
 * - `srt`: SubRip numbered caption blocks
 */

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::frame_clock::FrameClock;
use crate::segment_normalizer::CaptionInterval;

pub mod fcpxml;
pub mod srt;

pub use fcpxml::{FcpxmlEncoder, FcpxmlOptions, escape_xml};
pub use srt::SrtEncoder;

/// Output formats the tool can write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// Final Cut Pro XML timeline
    #[default]
    Fcpxml,
    /// SubRip text captions
    Srt,
}

impl SubtitleFormat {
    pub const ALL: [SubtitleFormat; 2] = [SubtitleFormat::Fcpxml, SubtitleFormat::Srt];

    // @returns: Format tag as accepted on the command line
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Fcpxml => "fcpxml",
            Self::Srt => "srt",
        }
    }

    // @returns: Standard file extension without the dot
    pub fn extension(&self) -> &'static str {
        self.tag()
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Fcpxml => "Final Cut Pro XML",
            Self::Srt => "SubRip",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for SubtitleFormat {
    type Err = SubtitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "fcpxml" => Ok(Self::Fcpxml),
            "srt" => Ok(Self::Srt),
            _ => Err(SubtitleError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Serialized subtitle file contents for one format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedDocument {
    pub format: SubtitleFormat,
    pub contents: String,
}

impl EncodedDocument {
    pub fn as_bytes(&self) -> &[u8] {
        self.contents.as_bytes()
    }
}

/// One of the supported encoders, chosen once from a [`SubtitleFormat`]
#[derive(Debug, Clone)]
pub enum SubtitleEncoder {
    Fcpxml(FcpxmlEncoder),
    Srt(SrtEncoder),
}

impl SubtitleEncoder {
    /// Builds the encoder for `format`.
    ///
    /// `require_captions` makes an empty track an error instead of an empty document.
    pub fn for_format(format: SubtitleFormat, clock: FrameClock, fcpxml: &FcpxmlOptions, require_captions: bool) -> Self {
        match format {
            SubtitleFormat::Fcpxml => Self::Fcpxml(
                FcpxmlEncoder::new(clock, fcpxml.clone()).require_captions(require_captions),
            ),
            SubtitleFormat::Srt => Self::Srt(SrtEncoder::new(clock).require_captions(require_captions)),
        }
    }

    pub fn format(&self) -> SubtitleFormat {
        match self {
            Self::Fcpxml(_) => SubtitleFormat::Fcpxml,
            Self::Srt(_) => SubtitleFormat::Srt,
        }
    }

    pub fn encode(&self, intervals: &[CaptionInterval]) -> Result<EncodedDocument, SubtitleError> {
        let contents = match self {
            Self::Fcpxml(encoder) => encoder.encode(intervals)?,
            Self::Srt(encoder) => encoder.encode(intervals)?,
        };
        Ok(EncodedDocument {
            format: self.format(),
            contents,
        })
    }
}
