use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

const MAX_QUALITY: u32 = 100;

/// Compression quality as a whole percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quality(u8);

impl Quality {
    pub fn from_string(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let value: u32 = trimmed.parse().map_err(|_| {
            Error::InvalidFormat(format!("quality '{}' is not a whole number", s))
        })?;

        if value > MAX_QUALITY {
            return Err(Error::InvalidFormat(format!(
                "quality {} exceeds {} percent",
                value, MAX_QUALITY
            )));
        }

        Ok(Self(value as u8))
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_string(s)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_canonical_string_verbatim() {
        for s in ["0", "1", "80", "100"] {
            assert_eq!(Quality::from_string(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_leading_zeros_are_normalised() {
        assert_eq!(Quality::from_string("080").unwrap().to_string(), "80");
    }

    #[test]
    fn test_rejects_non_numeric() {
        let err = Quality::from_string("eighty").unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));

        assert!(Quality::from_string("").is_err());
        assert!(Quality::from_string("80%").is_err());
        assert!(Quality::from_string("-5").is_err());
    }

    #[test]
    fn test_rejects_above_one_hundred() {
        let err = Quality::from_string("101").unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_parse_via_from_str() {
        let quality: Quality = "45".parse().unwrap();
        assert_eq!(quality.percent(), 45);
    }
}
