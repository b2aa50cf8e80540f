//! Contact store
//!
//! At most one contact per normalized number. Repeated provider hits for the
//! same number are merged field by field, last writer wins.

use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use super::types::{Contact, IngestOutcome};
use crate::error::{PhoneError, Result};
use crate::parser::tokenizer::collect_fields;
use crate::utils::PhoneNumber;

const NUMBER_FIELD: &str = "number";
const DISPLAY_NAME_FIELD: &str = "display_name";

#[derive(Debug, Clone, Default)]
pub struct ContactStore {
    contacts: BTreeMap<PhoneNumber, Contact>,
}

impl ContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or merge one contacts-provider row
    pub fn ingest_line(&mut self, line: &str) -> IngestOutcome {
        let fields = collect_fields(line);

        let Some(raw_number) = fields.get(NUMBER_FIELD).filter(|n| !n.is_empty()) else {
            return IngestOutcome::Skipped;
        };
        let raw_number = raw_number.to_string();

        let Some(number) = PhoneNumber::parse(&raw_number) else {
            debug!("Skipping contact with short number {:?}", raw_number);
            return IngestOutcome::Skipped;
        };

        if let Some(existing) = self.contacts.get_mut(&number) {
            existing.raw_fields.merge(fields);
            return IngestOutcome::Merged;
        }

        let name = fields.get(DISPLAY_NAME_FIELD).unwrap_or_default().to_string();
        self.contacts.insert(
            number.clone(),
            Contact {
                name,
                raw_number,
                normalized_number: number,
                raw_fields: fields,
            },
        );
        IngestOutcome::Added
    }

    pub fn get(&self, number: &PhoneNumber) -> Option<&Contact> {
        self.contacts.get(number)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    /// Numbers the classifier treats as known
    pub fn known_numbers(&self) -> HashSet<PhoneNumber> {
        self.contacts.keys().cloned().collect()
    }

    /// Snapshot as a JSON object keyed by normalized number
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.contacts)?)
    }

    /// Read back a snapshot written by [`ContactStore::to_json`]
    pub fn from_json(json: &str) -> Result<Self> {
        let contacts: BTreeMap<PhoneNumber, Contact> =
            serde_json::from_str(json).map_err(|e| PhoneError::CorruptContacts(e.to_string()))?;
        Ok(Self { contacts })
    }
}

/// Known numbers from a contacts snapshot
///
/// Accepts any JSON object; keys are re-normalized and keys with fewer than
/// 10 digits are ignored.
pub fn known_numbers_from_json(json: &str) -> Result<HashSet<PhoneNumber>> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| PhoneError::CorruptContacts(e.to_string()))?;

    let Value::Object(map) = value else {
        return Err(PhoneError::CorruptContacts(
            "expected a JSON object keyed by number".to_string(),
        ));
    };

    Ok(map.keys().filter_map(|key| PhoneNumber::parse(key)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_and_merge() {
        let mut store = ContactStore::new();
        assert_eq!(
            store.ingest_line("display_name=\"Jane\", number=\"+1 (555) 123-4567\", starred=0"),
            IngestOutcome::Added
        );
        assert_eq!(
            store.ingest_line("display_name=Janet number=5551234567 starred=1 times_contacted=5"),
            IngestOutcome::Merged
        );
        assert_eq!(store.ingest_line("_id=42 lookup_key=3030j"), IngestOutcome::Skipped);
        assert_eq!(store.ingest_line("display_name=Short number=555-1234"), IngestOutcome::Skipped);

        assert_eq!(store.len(), 1);
        let contact = store.get(&PhoneNumber::parse("5551234567").unwrap()).unwrap();
        assert_eq!(contact.name, "Jane");
        assert_eq!(contact.raw_number, "+1 (555) 123-4567");
        assert_eq!(contact.raw_fields.get("starred"), Some("1"));
        assert_eq!(contact.raw_fields.get("times_contacted"), Some("5"));
        assert_eq!(contact.raw_fields.get("display_name"), Some("Janet"));
    }

    #[test]
    fn test_snapshot_round_trip_keys() {
        let mut store = ContactStore::new();
        store.ingest_line("display_name=Jane number=5551234567");
        store.ingest_line("display_name=Bob number=4065550100");

        let json = store.to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["5551234567"]["name"], "Jane");
        assert_eq!(value["5551234567"]["raw_data"]["display_name"], "Jane");

        let known = known_numbers_from_json(&json).unwrap();
        assert_eq!(known, store.known_numbers());

        let reloaded = ContactStore::from_json(&json).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.get(&PhoneNumber::parse("4065550100").unwrap()).map(|c| c.name.as_str()),
            Some("Bob")
        );
    }

    #[test]
    fn test_known_numbers_from_loose_snapshot() {
        let json = r#"{"15551234567": {}, "+1 406 555 0100": {"name": "x"}, "911": {}}"#;
        let known = known_numbers_from_json(json).unwrap();
        assert_eq!(known.len(), 2);
        assert!(known.contains(&PhoneNumber::parse("5551234567").unwrap()));

        assert!(matches!(
            known_numbers_from_json("[1, 2]"),
            Err(PhoneError::CorruptContacts(_))
        ));
        assert!(known_numbers_from_json("{broken").is_err());
    }
}
