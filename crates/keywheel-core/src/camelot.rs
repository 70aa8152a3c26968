//! Camelot wheel key notation.
//!
//! The Camelot wheel numbers the twelve pitch classes 1-12 so that
//! harmonically compatible keys sit next to each other, and appends a letter
//! for the scale: `A` for minor, `B` for major.
//!
//! The number depends only on the key spelling and the letter depends only on
//! the scale, so enharmonic spellings (`C#` and `Db`) always share a number.
//!
//! ```
//! use keywheel_core::camelot::camelot;
//!
//! assert_eq!(camelot("C#", "minor").unwrap().to_string(), "3A");
//! assert_eq!(camelot("Db", "major").unwrap().to_string(), "3B");
//! assert!(camelot("H", "minor").is_none());
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Camelot wheel number for every accepted key spelling.
///
/// Lookup is case-sensitive. Sharps and flats of the same pitch class carry
/// the same number.
static CAMELOT_NUMBERS: [(KeyName, &str, u8); 17] = [
    (KeyName::C, "C", 8),
    (KeyName::CSharp, "C#", 3),
    (KeyName::DFlat, "Db", 3),
    (KeyName::D, "D", 10),
    (KeyName::DSharp, "D#", 5),
    (KeyName::EFlat, "Eb", 5),
    (KeyName::E, "E", 12),
    (KeyName::F, "F", 7),
    (KeyName::FSharp, "F#", 2),
    (KeyName::GFlat, "Gb", 2),
    (KeyName::G, "G", 9),
    (KeyName::GSharp, "G#", 4),
    (KeyName::AFlat, "Ab", 4),
    (KeyName::A, "A", 11),
    (KeyName::ASharp, "A#", 6),
    (KeyName::BFlat, "Bb", 6),
    (KeyName::B, "B", 1),
];

/// One of the 17 key spellings an analyzer may report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyName {
    C,
    CSharp,
    DFlat,
    D,
    DSharp,
    EFlat,
    E,
    F,
    FSharp,
    GFlat,
    G,
    GSharp,
    AFlat,
    A,
    ASharp,
    BFlat,
    B,
}

impl KeyName {
    /// All spellings, in table order.
    pub fn all() -> impl Iterator<Item = KeyName> {
        CAMELOT_NUMBERS.iter().map(|(key, _, _)| *key)
    }

    /// Parses a key spelling. Matching is exact and case-sensitive.
    pub fn parse(spelling: &str) -> Option<Self> {
        CAMELOT_NUMBERS
            .iter()
            .find(|(_, name, _)| *name == spelling)
            .map(|(key, _, _)| *key)
    }

    /// Returns the canonical spelling (e.g., "C#", "Bb").
    pub fn as_str(&self) -> &'static str {
        self.entry().1
    }

    /// Returns the Camelot wheel number (1-12).
    pub fn camelot_number(&self) -> u8 {
        self.entry().2
    }

    fn entry(&self) -> &'static (KeyName, &'static str, u8) {
        // Every variant has exactly one row.
        &CAMELOT_NUMBERS[*self as usize]
    }
}

impl fmt::Display for KeyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Musical scale of a detected key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Major,
    Minor,
}

impl Scale {
    /// Interprets a scale label reported by an analyzer.
    ///
    /// Only the exact label `"major"` is major. Every other label, including
    /// `"Major"` and the empty string, is treated as minor.
    pub fn from_label(label: &str) -> Self {
        if label == "major" {
            Scale::Major
        } else {
            Scale::Minor
        }
    }

    /// Returns the lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
        }
    }

    /// Returns the Camelot letter for this scale.
    pub fn camelot_letter(&self) -> char {
        match self {
            Scale::Major => 'B',
            Scale::Minor => 'A',
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A position on the Camelot wheel, e.g. `8B` (C major) or `3A` (C# minor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CamelotCode {
    number: u8,
    scale: Scale,
}

impl CamelotCode {
    /// Builds the code for a parsed key and scale.
    pub fn new(key: KeyName, scale: Scale) -> Self {
        Self {
            number: key.camelot_number(),
            scale,
        }
    }

    /// Wheel number, 1-12.
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Scale the letter was derived from.
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Letter suffix: `A` (minor) or `B` (major).
    pub fn letter(&self) -> char {
        self.scale.camelot_letter()
    }
}

impl fmt::Display for CamelotCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.letter())
    }
}

/// Error returned when parsing a Camelot code string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid Camelot code '{0}': expected 1-12 followed by A or B")]
pub struct ParseCamelotError(String);

impl FromStr for CamelotCode {
    type Err = ParseCamelotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseCamelotError(s.to_string());

        let (digits, scale) = if let Some(digits) = s.strip_suffix('A') {
            (digits, Scale::Minor)
        } else if let Some(digits) = s.strip_suffix('B') {
            (digits, Scale::Major)
        } else {
            return Err(invalid());
        };
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let number: u8 = digits.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&number) {
            return Err(invalid());
        }

        Ok(Self { number, scale })
    }
}

impl Serialize for CamelotCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CamelotCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Converts an analyzer's key and scale labels to Camelot notation.
///
/// Returns `None` when `key` is not one of the 17 accepted spellings. Callers
/// should treat that as "could not classify", not as a failure. The scale is
/// interpreted with [`Scale::from_label`].
pub fn camelot(key: &str, scale: &str) -> Option<CamelotCode> {
    let key = KeyName::parse(key)?;
    Some(CamelotCode::new(key, Scale::from_label(scale)))
}
