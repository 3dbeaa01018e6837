//! Hardware address validation.
//!
//! Payloads arrive from browsers, shell scripts and older brokers that wrap
//! the address in JSON quotes or use Windows-style `-` separators. Every
//! candidate is normalized first, then checked position by position. All
//! violations are collected so a single log line can explain everything that
//! is wrong with a payload.

use core::{fmt, str::FromStr};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of a canonical `XX:XX:XX:XX:XX:XX` address.
pub const MAC_LEN: usize = 17;

/// Positions that must hold a `:` separator.
pub const SEPARATOR_POSITIONS: [usize; 5] = [2, 5, 8, 11, 14];

const HEX_DIGITS: &str = "0123456789ABCDEF";

/// A single failed check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Violation {
    /// The normalized string is not [`MAC_LEN`] characters long.
    Length { len: usize },
    /// Expected `:` at `position`.
    Separator { position: usize, found: char },
    /// Expected an uppercase hexadecimal digit at `position`.
    Digit { position: usize, found: char },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { len } => write!(f, "expected {MAC_LEN} characters, found {len}"),
            Self::Separator { position, found } => {
                write!(f, "expected ':' at position {position}, found '{found}'")
            }
            Self::Digit { position, found } => {
                write!(f, "invalid character at position {position}: '{found}'")
            }
        }
    }
}

/// Every violation found in a rejected candidate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("'{candidate}' ({})", display_violations(.violations))]
pub struct InvalidMac {
    /// The candidate after normalization.
    pub candidate: String,
    pub violations: Vec<Violation>,
}

fn display_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Trims whitespace, strips `"`, maps `-` to `:` and uppercases.
pub fn normalize(candidate: &str) -> String {
    candidate
        .trim()
        .chars()
        .filter(|&c| c != '"')
        .map(|c| if c == '-' { ':' } else { c.to_ascii_uppercase() })
        .collect()
}

/// Returns `true` iff `candidate` normalizes to a well-formed address.
///
/// Each violation is logged at `debug` level.
pub fn validate(candidate: &str) -> bool {
    match MacAddress::parse(candidate) {
        Ok(_) => true,
        Err(invalid) => {
            for violation in &invalid.violations {
                tracing::debug!(candidate = %invalid.candidate, "{violation}");
            }
            false
        }
    }
}

/// A hardware address in canonical uppercase, colon separated form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress(String);

impl MacAddress {
    /// Normalizes `candidate` and checks every position.
    ///
    /// A wrong length is reported alone; otherwise each bad separator and
    /// each bad digit is reported with its position.
    pub fn parse(candidate: &str) -> Result<Self, InvalidMac> {
        let normalized = normalize(candidate);
        let mut violations = Vec::new();

        let len = normalized.chars().count();
        if len == MAC_LEN {
            for (position, found) in normalized.chars().enumerate() {
                if SEPARATOR_POSITIONS.contains(&position) {
                    if found != ':' {
                        violations.push(Violation::Separator { position, found });
                    }
                } else if !HEX_DIGITS.contains(found) {
                    violations.push(Violation::Digit { position, found });
                }
            }
        } else {
            violations.push(Violation::Length { len });
        }

        if violations.is_empty() {
            Ok(Self(normalized))
        } else {
            Err(InvalidMac {
                candidate: normalized,
                violations,
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The six address bytes, most significant first.
    pub fn octets(&self) -> [u8; 6] {
        let mut octets = [0_u8; 6];
        for (octet, pair) in octets.iter_mut().zip(self.0.split(':')) {
            // Digits were checked in `parse`.
            *octet = u8::from_str_radix(pair, 16).unwrap_or_default();
        }
        octets
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MacAddress {
    type Err = InvalidMac;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_address() {
        assert!(validate("01:23:45:67:89:AB"));
        let mac = MacAddress::parse("01:23:45:67:89:AB").unwrap();
        assert_eq!(mac.as_str(), "01:23:45:67:89:AB");
    }

    #[test]
    fn accepts_dashed_lowercase_address() {
        assert!(validate("01-23-45-67-89-ab"));
        let mac = MacAddress::parse("01-23-45-67-89-ab").unwrap();
        assert_eq!(mac.to_string(), "01:23:45:67:89:AB");
    }

    #[test]
    fn strips_quotes_and_whitespace() {
        // Older brokers JSON-encode the payload.
        let mac = MacAddress::parse("  \"de:ad:be:ef:00:01\"\n").unwrap();
        assert_eq!(mac.as_str(), "DE:AD:BE:EF:00:01");
    }

    #[test]
    fn rejects_every_other_length() {
        let base = "01:23:45:67:89:AB";
        for len in 0..=32 {
            if len == MAC_LEN {
                continue;
            }
            let candidate: String = base.chars().cycle().take(len).collect();
            assert!(!validate(&candidate), "length {len} accepted");
        }
    }

    #[test]
    fn wrong_length_is_reported_alone() {
        let err = MacAddress::parse("01:23:45:67:89:ZZ:00").unwrap_err();
        assert_eq!(err.violations, vec![Violation::Length { len: 20 }]);
    }

    #[test]
    fn rejects_bad_separator_at_each_position() {
        for position in SEPARATOR_POSITIONS {
            let mut chars: Vec<char> = "01:23:45:67:89:AB".chars().collect();
            chars[position] = '.';
            let candidate: String = chars.into_iter().collect();
            let err = MacAddress::parse(&candidate).unwrap_err();
            assert_eq!(
                err.violations,
                vec![Violation::Separator {
                    position,
                    found: '.'
                }]
            );
        }
    }

    #[test]
    fn rejects_non_hex_at_each_digit_position() {
        for position in (0..MAC_LEN).filter(|p| !SEPARATOR_POSITIONS.contains(p)) {
            let mut chars: Vec<char> = "01:23:45:67:89:AB".chars().collect();
            chars[position] = 'g';
            let candidate: String = chars.into_iter().collect();
            let err = MacAddress::parse(&candidate).unwrap_err();
            assert_eq!(
                err.violations,
                vec![Violation::Digit {
                    position,
                    found: 'G'
                }]
            );
        }
    }

    #[test]
    fn collects_all_violations() {
        let err = MacAddress::parse("0Z:23x45:67:89:AQ").unwrap_err();
        assert_eq!(
            err.violations,
            vec![
                Violation::Digit {
                    position: 1,
                    found: 'Z'
                },
                Violation::Separator {
                    position: 5,
                    found: 'X'
                },
                Violation::Digit {
                    position: 16,
                    found: 'Q'
                },
            ]
        );
        assert_eq!(
            err.to_string(),
            "'0Z:23X45:67:89:AQ' (invalid character at position 1: 'Z'; \
             expected ':' at position 5, found 'X'; \
             invalid character at position 16: 'Q')"
        );
    }

    #[test]
    fn multibyte_input_counts_characters() {
        assert!(!validate("01:23:45:67:89:Aé"));
    }

    #[test]
    fn octets_follow_textual_order() {
        let mac = MacAddress::parse("DE:AD:BE:EF:00:01").unwrap();
        assert_eq!(mac.octets(), [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01]);
    }

    #[test]
    fn serde_uses_canonical_string() {
        let mac: MacAddress = serde_json::from_str("\"de-ad-be-ef-00-01\"").unwrap();
        assert_eq!(serde_json::to_string(&mac).unwrap(), "\"DE:AD:BE:EF:00:01\"");
        assert!(serde_json::from_str::<MacAddress>("\"nope\"").is_err());
    }
}
