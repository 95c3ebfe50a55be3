use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Result, TrackerError};

/// Largest hue value. Hue is stored halved so that it fits a byte (0..=179).
pub const HUE_MAX: u8 = 179;

/// 8-bit HSV colour, hue in `0..=179`, saturation and value in `0..=255`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }

    pub fn from_rgb(Rgb([r, g, b]): Rgb<u8>) -> Self {
        let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let s = if max > 0.0 { delta * 255.0 / max } else { 0.0 };
        let mut h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / delta
        } else if max == g {
            120.0 + 60.0 * (b - r) / delta
        } else {
            240.0 + 60.0 * (r - g) / delta
        };
        if h < 0.0 {
            h += 360.0;
        }

        Self {
            h: ((h / 2.0).round() as u8).min(HUE_MAX),
            s: s.round() as u8,
            v: max as u8,
        }
    }
}

impl fmt::Display for Hsv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.h, self.s, self.v)
    }
}

impl FromStr for Hsv {
    type Err = TrackerError;

    /// Parses `"h,s,v"`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TrackerError::InvalidColor(s.to_owned());
        let mut channels = s.split(',').map(|part| part.trim().parse::<u8>());
        let (Some(Ok(h)), Some(Ok(sat)), Some(Ok(v)), None) =
            (channels.next(), channels.next(), channels.next(), channels.next())
        else {
            return Err(invalid());
        };
        if h > HUE_MAX {
            return Err(invalid());
        }
        Ok(Self::new(h, sat, v))
    }
}

/// Inclusive per-channel colour range the pen is expected to fall into.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl HsvRange {
    pub fn new(lower: Hsv, upper: Hsv) -> Result<Self> {
        let range = Self { lower, upper };
        range.validate()?;
        Ok(range)
    }

    pub fn validate(&self) -> Result<()> {
        let Self { lower, upper } = self;
        if lower.h > upper.h || lower.s > upper.s || lower.v > upper.v {
            return Err(TrackerError::InvalidRange);
        }
        if upper.h > HUE_MAX {
            return Err(TrackerError::InvalidColor(upper.to_string()));
        }
        Ok(())
    }

    pub fn contains(&self, hsv: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&hsv.h)
            && (self.lower.s..=self.upper.s).contains(&hsv.s)
            && (self.lower.v..=self.upper.v).contains(&hsv.v)
    }
}

impl Default for HsvRange {
    /// Saturated blue, the colour of the stock pen cap.
    fn default() -> Self {
        Self {
            lower: Hsv::new(100, 150, 50),
            upper: Hsv::new(140, 255, 255),
        }
    }
}
