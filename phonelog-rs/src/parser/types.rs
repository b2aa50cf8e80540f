//! Parsed record types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::PhoneNumber;

/// Field name holding the phone number after normalization
pub const NUMBER_FIELD: &str = "number";
/// SMS rows carry the number in `address`
pub const ADDRESS_FIELD: &str = "address";
/// Synthetic field carrying the voicemail attachment row
pub const ENCODED_DATA_FIELD: &str = "_encoded_data";

/// Field-name to field-value mapping produced from one provider row
///
/// A `None` value is serialized as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: BTreeMap<String, Option<String>>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any earlier value (last writer wins)
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.fields.insert(key.into(), value);
    }

    /// Set a field only if the record does not already have it
    ///
    /// Returns whether the field was added.
    pub fn insert_if_absent(&mut self, key: &str, value: Option<String>) -> bool {
        if self.fields.contains_key(key) {
            return false;
        }
        self.fields.insert(key.to_string(), value);
        true
    }

    /// Non-null value of a field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Union another record into this one, last writer wins per field
    pub fn merge(&mut self, other: RawRecord) {
        self.fields.extend(other.fields);
    }

    /// The normalized `number` field, if present and valid
    pub fn number(&self) -> Option<PhoneNumber> {
        self.get(NUMBER_FIELD).and_then(PhoneNumber::parse)
    }
}

impl FromIterator<(String, Option<String>)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Result of parsing one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// At least one `key=value` pair was recognized
    Parsed(RawRecord),
    /// Nothing usable in the input
    Unparseable,
}

impl ParseOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }

    pub fn ok(self) -> Option<RawRecord> {
        match self {
            ParseOutcome::Parsed(record) => Some(record),
            ParseOutcome::Unparseable => None,
        }
    }

    /// The parsed record, or an empty one for unparseable input
    pub fn into_record(self) -> RawRecord {
        self.ok().unwrap_or_default()
    }
}
