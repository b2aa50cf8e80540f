//! Carrier enrichment
//!
//! Joins parsed records against the carrier cache. Cache hits add
//! `carrier` / `carrier_type` to the record without touching fields the
//! record already has; misses are collected for a later lookup run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::carrier::{CarrierCache, CarrierInfo};
use crate::parser::RawRecord;
use crate::utils::PhoneNumber;

pub const CARRIER_FIELD: &str = "carrier";
pub const CARRIER_TYPE_FIELD: &str = "carrier_type";
pub const NAME_FIELD: &str = "name";

/// A parsed record plus any carrier fields from the cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrichedRecord {
    fields: RawRecord,
}

impl EnrichedRecord {
    /// Wrap a record without enrichment
    pub fn from_raw(fields: RawRecord) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &RawRecord {
        &self.fields
    }

    pub fn into_fields(self) -> RawRecord {
        self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    pub fn number(&self) -> Option<PhoneNumber> {
        self.fields.number()
    }

    pub fn carrier(&self) -> Option<&str> {
        self.get(CARRIER_FIELD)
    }

    pub fn carrier_type(&self) -> Option<&str> {
        self.get(CARRIER_TYPE_FIELD)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME_FIELD)
    }

    /// Add carrier fields the record does not already carry
    fn apply_carrier(&mut self, info: &CarrierInfo) {
        self.fields
            .insert_if_absent(CARRIER_FIELD, Some(info.carrier.clone()));
        self.fields
            .insert_if_absent(CARRIER_TYPE_FIELD, Some(info.carrier_type.clone()));
    }
}

/// Result of one enrichment pass
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    /// Records in input order
    pub records: Vec<EnrichedRecord>,
    /// Numbers with no cache entry
    pub needs_lookup: BTreeSet<PhoneNumber>,
    /// Records that received carrier fields
    pub hits: usize,
}

/// Enrich a batch of records against the cache
pub fn enrich(records: Vec<RawRecord>, cache: &CarrierCache) -> Enrichment {
    let mut needs_lookup = BTreeSet::new();
    let (records, hits) = enrich_into(records, cache, &mut needs_lookup);
    Enrichment {
        records,
        needs_lookup,
        hits,
    }
}

/// Enrich a batch, adding cache misses to a set shared across batches
///
/// Returns the enriched records in input order and the number of cache hits.
pub fn enrich_into(
    records: Vec<RawRecord>,
    cache: &CarrierCache,
    needs_lookup: &mut BTreeSet<PhoneNumber>,
) -> (Vec<EnrichedRecord>, usize) {
    let mut hits = 0;

    let enriched = records
        .into_iter()
        .map(|raw| {
            let mut record = EnrichedRecord::from_raw(raw);
            if let Some(number) = record.number() {
                match cache.lookup(&number) {
                    Some(info) => {
                        record.apply_carrier(info);
                        hits += 1;
                    }
                    None => {
                        needs_lookup.insert(number);
                    }
                }
            }
            record
        })
        .collect();

    (enriched, hits)
}
