use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Target width and height in pixels. Both are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    width: u32,
    height: u32,
}

impl Dimensions {
    pub fn from_width_and_height(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidFormat(format!(
                "dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        Ok(Self { width, height })
    }

    /// Parse width and height supplied as separate strings.
    pub fn from_strings(width: &str, height: &str) -> Result<Self> {
        Self::from_width_and_height(parse_side("width", width)?, parse_side("height", height)?)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

fn parse_side(name: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidFormat(format!("{} '{}' is not a whole number", name, value)))
}

/// Parses the `WxH` form, e.g. `100x200`.
impl FromStr for Dimensions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (width, height) = s
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| Error::InvalidFormat(format!("expected WxH, got '{}'", s)))?;

        Self::from_strings(width, height)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
