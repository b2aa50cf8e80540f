//! Carrier cache
//!
//! Write-once-per-key store of carrier metadata. The first info recorded for
//! a number is kept; later records for the same number are ignored, so a
//! caller must check [`CarrierCache::lookup`] before paying for a fetch.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

use super::types::{CarrierEntry, CarrierInfo};
use crate::error::{PhoneError, Result};
use crate::utils::PhoneNumber;

#[derive(Debug, Clone, Default)]
pub struct CarrierCache {
    entries: HashMap<PhoneNumber, CarrierInfo>,
}

impl CarrierCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, number: &PhoneNumber) -> Option<&CarrierInfo> {
        self.entries.get(number)
    }

    pub fn contains(&self, number: &PhoneNumber) -> bool {
        self.entries.contains_key(number)
    }

    /// Insert unless the number already has an entry
    ///
    /// Returns whether an insertion occurred.
    pub fn record(&mut self, number: PhoneNumber, info: CarrierInfo) -> bool {
        if self.entries.contains_key(&number) {
            return false;
        }
        self.entries.insert(number, info);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PhoneNumber, &CarrierInfo)> {
        self.entries.iter()
    }

    /// Load a newline-delimited JSON cache
    ///
    /// Blank lines are ignored. Any other line that is not a valid entry
    /// fails the whole load; `path` only labels the error.
    pub fn from_reader<R: BufRead>(reader: R, path: &Path) -> Result<Self> {
        let mut cache = Self::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let entry: CarrierEntry =
                serde_json::from_str(line.trim()).map_err(|e| PhoneError::CorruptCache {
                    path: path.to_path_buf(),
                    line: line_no,
                    reason: e.to_string(),
                })?;

            let raw_number = entry.number.clone();
            let (number, info) = entry.into_parts().ok_or_else(|| PhoneError::CorruptCache {
                path: path.to_path_buf(),
                line: line_no,
                reason: format!("invalid number '{}'", raw_number),
            })?;

            if !cache.record(number, info) {
                debug!("Carrier cache line {} repeats {}, keeping first", line_no, raw_number);
            }
        }

        Ok(cache)
    }

    pub fn from_ndjson(content: &str, path: &Path) -> Result<Self> {
        Self::from_reader(content.as_bytes(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn number(raw: &str) -> PhoneNumber {
        PhoneNumber::parse(raw).unwrap()
    }

    fn load(content: &str) -> Result<CarrierCache> {
        CarrierCache::from_ndjson(content, Path::new("numbers.dat"))
    }

    #[test]
    fn test_first_write_wins() {
        let mut cache = CarrierCache::new();
        let a = CarrierInfo::new("BANDWIDTH", "voip");
        let b = CarrierInfo::new("VERIZON", "landline");

        assert!(cache.record(number("5551234567"), a.clone()));
        assert!(!cache.record(number("5551234567"), b));
        assert_eq!(cache.lookup(&number("5551234567")), Some(&a));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_load_ndjson_with_aliases() {
        let content = r#"{"number": "5551234567", "carrier": "BANDWIDTH", "carrier_type": "voip"}

{"number": "+1 (406) 555-0100", "carrier": "VERIZON", "carrier-type": "landline"}
{"number": "7072668159", "carrier": null}
{"number": "5551234567", "carrier": "LATER", "carrier_type": "mobile"}
"#;
        let cache = load(content).unwrap();
        assert_eq!(cache.len(), 3);
        assert_eq!(
            cache.lookup(&number("4065550100")),
            Some(&CarrierInfo::new("VERIZON", "landline"))
        );
        assert_eq!(
            cache.lookup(&number("7072668159")),
            Some(&CarrierInfo::new("Unknown", "Unknown"))
        );
        assert_eq!(cache.lookup(&number("5551234567")).unwrap().carrier, "BANDWIDTH");
    }

    #[test]
    fn test_corrupt_line_fails_load() {
        let content = "{\"number\": \"5551234567\", \"carrier\": \"X\"}\n{not json\n";
        match load(content) {
            Err(PhoneError::CorruptCache { path, line, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(path, Path::new("numbers.dat"));
            }
            other => panic!("expected corrupt cache error, got {:?}", other),
        }

        let content = "{\"number\": \"123\", \"carrier\": \"X\"}\n";
        assert!(matches!(
            load(content),
            Err(PhoneError::CorruptCache { line: 1, .. })
        ));
    }

    #[test]
    fn test_both_type_spellings_prefer_hyphenated() {
        let content = r#"{"number":"5551234567","carrier":"BANDWIDTH","carrier_type":"landline","carrier-type":"voip"}"#;
        let cache = load(content).unwrap();
        assert_eq!(
            cache.lookup(&number("5551234567")),
            Some(&CarrierInfo::new("BANDWIDTH", "voip"))
        );
    }

    #[test]
    fn test_written_entries_use_one_spelling() {
        let entry = CarrierEntry::new(&number("5551234567"), &CarrierInfo::new("BANDWIDTH", "voip"));
        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"carrier_type\":\"voip\""));
        assert!(!line.contains("carrier-type"));
    }
}
