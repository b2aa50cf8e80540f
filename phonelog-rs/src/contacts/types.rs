//! Contact types

use serde::{Deserialize, Serialize};

use crate::parser::RawRecord;
use crate::utils::PhoneNumber;

/// One contact, keyed by its normalized number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// `display_name` of the first row seen for this number
    pub name: String,
    /// Number exactly as the provider reported it
    pub raw_number: String,
    pub normalized_number: PhoneNumber,
    /// Union of every field seen for this number
    #[serde(rename = "raw_data")]
    pub raw_fields: RawRecord,
}

/// What happened to an ingested row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Added,
    Merged,
    /// No number, or fewer than 10 digits
    Skipped,
}
