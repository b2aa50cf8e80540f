//! Phone number normalization
//!
//! Every number in the pipeline is reduced to its trailing 10 digits, which
//! is the join key between call logs, SMS, voicemail, contacts and the
//! carrier cache. Numbers from different country codes that share the last
//! 10 digits collapse to the same key.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Length of a normalized subscriber number
pub const NUMBER_DIGITS: usize = 10;

/// A normalized phone number: exactly 10 ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize an arbitrary string, `None` if it has fewer than 10 digits
    pub fn parse(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() < NUMBER_DIGITS {
            return None;
        }
        Some(Self(digits[digits.len() - NUMBER_DIGITS..].to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First three digits
    pub fn area_code(&self) -> &str {
        &self.0[..3]
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PhoneNumber::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("'{}' has fewer than 10 digits", raw))
        })
    }
}

/// Normalize a number to its trailing 10 digits as a plain string
pub fn normalize(raw: &str) -> Option<String> {
    PhoneNumber::parse(raw).map(|n| n.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_formats() {
        assert_eq!(normalize("+1 (707) 266-8159").as_deref(), Some("7072668159"));
        assert_eq!(normalize("7072668159").as_deref(), Some("7072668159"));
        assert_eq!(normalize("\"406-555-0100\"").as_deref(), Some("4065550100"));
        assert_eq!(normalize("0044 20 7946 0958").as_deref(), Some("2079460958"));
    }

    #[test]
    fn test_normalize_too_short() {
        assert_eq!(normalize("123"), None);
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("555-1234"), None);
        assert_eq!(normalize("abc-def-ghij"), None);
    }

    #[test]
    fn test_normalize_idempotent() {
        for raw in ["+1 (707) 266-8159", "1-800-555-0199", "++44 7700 900123"] {
            let once = normalize(raw).unwrap();
            assert_eq!(normalize(&once), Some(once.clone()));
        }
    }

    #[test]
    fn test_area_code_and_deserialize() {
        let number = PhoneNumber::parse("(406) 555-0100").unwrap();
        assert_eq!(number.area_code(), "406");

        let parsed: PhoneNumber = serde_json::from_str("\"+1 406 555 0100\"").unwrap();
        assert_eq!(parsed, number);
        assert!(serde_json::from_str::<PhoneNumber>("\"911\"").is_err());
    }
}
