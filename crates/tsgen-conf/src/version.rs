use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseLanguageVersionError {
    #[error("Language version '{0}' is not in 'major' or 'major.minor' form")]
    Malformed(String),
}

/// Host language version, carried through to the declaration-only parse and
/// the final generation pass unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct LanguageVersion {
    major: u16,
    minor: u16,
}

impl LanguageVersion {
    /// Stand-in for "whatever the newest supported version is".
    pub const LATEST: Self = Self {
        major: u16::MAX,
        minor: 0,
    };

    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    #[must_use]
    pub const fn major(self) -> u16 {
        self.major
    }

    #[must_use]
    pub const fn minor(self) -> u16 {
        self.minor
    }
}

impl fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::LATEST {
            f.write_str("latest")
        } else {
            write!(f, "{}.{}", self.major, self.minor)
        }
    }
}

impl FromStr for LanguageVersion {
    type Err = ParseLanguageVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::LATEST);
        }

        let malformed = || ParseLanguageVersionError::Malformed(s.to_string());
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (
                major.parse().map_err(|_| malformed())?,
                minor.parse().map_err(|_| malformed())?,
            ),
            None => (s.parse().map_err(|_| malformed())?, 0),
        };
        Ok(Self { major, minor })
    }
}

impl TryFrom<String> for LanguageVersion {
    type Error = ParseLanguageVersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_major_minor() {
        assert_eq!(
            "11.0".parse::<LanguageVersion>().unwrap(),
            LanguageVersion::new(11, 0)
        );
    }

    #[test]
    fn parses_bare_major() {
        assert_eq!(
            "9".parse::<LanguageVersion>().unwrap(),
            LanguageVersion::new(9, 0)
        );
    }

    #[test]
    fn parses_latest_keyword() {
        assert_eq!(
            "latest".parse::<LanguageVersion>().unwrap(),
            LanguageVersion::LATEST
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!("eleven".parse::<LanguageVersion>().is_err());
        assert!("1.x".parse::<LanguageVersion>().is_err());
    }

    #[test]
    fn display_roundtrips() {
        assert_eq!(LanguageVersion::new(11, 0).to_string(), "11.0");
        assert_eq!(LanguageVersion::LATEST.to_string(), "latest");
    }
}
