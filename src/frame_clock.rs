use std::fmt;
use std::str::FromStr;
use anyhow::{anyhow, Result, Context};
use serde::{Deserialize, Serialize};

// @module: Conversion between wall-clock seconds and frame indices

/// A frame rate expressed as an exact fraction of frames per second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Frames per `denominator` seconds
    pub numerator: u32,

    /// Seconds the `numerator` frames span
    pub denominator: u32,
}

impl FrameRate {
    /// 29.97 fps, the rate every generated project uses unless configured otherwise
    pub const NTSC_30: FrameRate = FrameRate { numerator: 30000, denominator: 1001 };

    /// Creates a frame rate, rejecting zero components
    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(anyhow!(
                "Invalid frame rate {}/{}: both components must be non-zero",
                numerator, denominator
            ));
        }
        Ok(Self { numerator, denominator })
    }

    /// Approximate frames per second, for display only
    pub fn fps(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// Exact duration of a single frame
    pub fn frame_duration(&self) -> RationalTime {
        RationalTime::new(u64::from(self.denominator), u64::from(self.numerator))
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::NTSC_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// Accepts "30000/1001" or a whole number such as "25"
impl FromStr for FrameRate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (numerator, denominator) = match s.split_once('/') {
            Some((num, den)) => (
                num.trim().parse::<u32>().with_context(|| format!("Invalid frame rate numerator in '{}'", s))?,
                den.trim().parse::<u32>().with_context(|| format!("Invalid frame rate denominator in '{}'", s))?,
            ),
            None => (
                s.parse::<u32>().with_context(|| format!("Invalid frame rate '{}', expected NUM/DEN or an integer", s))?,
                1,
            ),
        };
        Self::new(numerator, denominator)
    }
}

/// An exact number of seconds, `numerator / denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RationalTime {
    pub numerator: u64,
    pub denominator: u64,
}

impl RationalTime {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self { numerator, denominator }
    }

    /// Whole milliseconds, truncated toward zero
    pub fn to_millis_floor(&self) -> u64 {
        let millis = u128::from(self.numerator) * 1000 / u128::from(self.denominator);
        u64::try_from(millis).unwrap_or(u64::MAX)
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

// Rational time notation used by editing timelines, e.g. "45045/30000s"
impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}s", self.numerator, self.denominator)
    }
}

/// Converts between seconds and frame indices at a fixed rate.
///
/// Quantization rounds half to even: a time exactly between two frames
/// snaps to the even frame. The inverse is exact, so durations rebuilt
/// from frame counts match across output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    rate: FrameRate,
}

impl FrameClock {
    pub fn new(rate: FrameRate) -> Self {
        Self { rate }
    }

    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    /// Last frame whose start time still fits the rational notation
    pub fn max_frame(&self) -> u64 {
        u64::MAX / u64::from(self.rate.denominator)
    }

    /// Nearest frame index for a time in seconds.
    ///
    /// Callers validate the input first; negative values saturate to frame 0
    /// and huge values to `u64::MAX`.
    pub fn to_frame(&self, seconds: f64) -> u64 {
        let frames = seconds * f64::from(self.rate.numerator) / f64::from(self.rate.denominator);
        frames.round_ties_even() as u64
    }

    /// Like [`FrameClock::to_frame`], but `None` for negative or non-finite
    /// times and for times past [`FrameClock::max_frame`]
    pub fn checked_to_frame(&self, seconds: f64) -> Option<u64> {
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }
        let frames = (seconds * f64::from(self.rate.numerator) / f64::from(self.rate.denominator)).round_ties_even();
        // 2^64 and above would saturate in the cast
        if frames >= u64::MAX as f64 {
            return None;
        }
        let frame = frames as u64;
        (frame <= self.max_frame()).then_some(frame)
    }

    /// Exact start time of a frame, `None` past [`FrameClock::max_frame`]
    pub fn to_seconds(&self, frame: u64) -> Option<RationalTime> {
        self.frames_to_time(frame)
    }

    /// Exact length of a run of frames, `None` past [`FrameClock::max_frame`]
    pub fn frames_to_time(&self, frames: u64) -> Option<RationalTime> {
        frames
            .checked_mul(u64::from(self.rate.denominator))
            .map(|numerator| RationalTime::new(numerator, u64::from(self.rate.numerator)))
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(FrameRate::default())
    }
}
