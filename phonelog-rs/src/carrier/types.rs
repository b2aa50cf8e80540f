//! Carrier types and data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::PhoneNumber;

/// Placeholder stored when the lookup service omitted a field
pub const UNKNOWN: &str = "Unknown";

/// Carrier metadata for one number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierInfo {
    /// Carrier name, e.g. "BANDWIDTH"
    pub carrier: String,
    /// Line type, e.g. "voip" or "landline"
    pub carrier_type: String,
}

impl CarrierInfo {
    pub fn new(carrier: impl Into<String>, carrier_type: impl Into<String>) -> Self {
        Self {
            carrier: carrier.into(),
            carrier_type: carrier_type.into(),
        }
    }
}

/// One line of the persisted carrier cache
///
/// Older lines spell the type key `carrier-type`; some carry both spellings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarrierEntry {
    pub number: String,
    #[serde(default)]
    pub carrier: Option<String>,
    #[serde(default)]
    pub carrier_type: Option<String>,
    #[serde(
        default,
        rename = "carrier-type",
        skip_serializing_if = "Option::is_none"
    )]
    pub carrier_type_legacy: Option<String>,
}

impl CarrierEntry {
    pub fn new(number: &PhoneNumber, info: &CarrierInfo) -> Self {
        Self {
            number: number.to_string(),
            carrier: Some(info.carrier.clone()),
            carrier_type: Some(info.carrier_type.clone()),
            carrier_type_legacy: None,
        }
    }

    /// Split into key and info, substituting [`UNKNOWN`] for missing fields
    ///
    /// The hyphenated type key wins when both spellings are present.
    pub fn into_parts(self) -> Option<(PhoneNumber, CarrierInfo)> {
        let number = PhoneNumber::parse(&self.number)?;
        let carrier_type = self.carrier_type_legacy.or(self.carrier_type);
        let info = CarrierInfo {
            carrier: self.carrier.unwrap_or_else(|| UNKNOWN.to_string()),
            carrier_type: carrier_type.unwrap_or_else(|| UNKNOWN.to_string()),
        };
        Some((number, info))
    }
}

/// Outcome of a carrier refresh run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LookupSummary {
    /// Numbers fetched and recorded
    pub fetched: usize,
    /// Numbers already in the cache
    pub skipped: usize,
    /// Numbers the service could not resolve this run
    pub failed: usize,
    /// Fetched numbers per carrier
    pub carriers: BTreeMap<String, usize>,
}
