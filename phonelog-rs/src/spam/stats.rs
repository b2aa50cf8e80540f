//! Classification statistics
//!
//! Purely derived reporting: nothing here feeds back into classification.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::types::{RecordKind, SpamReason, Verdict};
use crate::enrich::EnrichedRecord;
use crate::utils::PhoneNumber;

/// Per-run, per-record-type statistics accumulator
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationStats {
    pub kind: RecordKind,
    pub total: usize,
    pub spam: usize,
    pub not_spam: usize,
    /// Records let through without a number (counted in `not_spam`)
    pub unclassified: usize,
    pub reasons: BTreeMap<SpamReason, usize>,
    /// Spam records per carrier name
    pub spam_carriers: BTreeMap<String, usize>,
    spam_numbers: HashMap<PhoneNumber, usize>,
    area_codes: HashMap<String, usize>,
    samples: Vec<EnrichedRecord>,
    #[serde(skip)]
    sample_limit: usize,
}

impl ClassificationStats {
    pub fn new(kind: RecordKind, sample_limit: usize) -> Self {
        Self {
            kind,
            total: 0,
            spam: 0,
            not_spam: 0,
            unclassified: 0,
            reasons: BTreeMap::new(),
            spam_carriers: BTreeMap::new(),
            spam_numbers: HashMap::new(),
            area_codes: HashMap::new(),
            samples: Vec::new(),
            sample_limit,
        }
    }

    /// Account for one classified record
    pub fn observe(&mut self, record: &EnrichedRecord, verdict: Verdict) {
        self.total += 1;
        let number = record.number();

        if let Some(ref number) = number {
            *self
                .area_codes
                .entry(number.area_code().to_string())
                .or_insert(0) += 1;
        }

        match verdict.reason() {
            Some(reason) => *self.reasons.entry(reason).or_insert(0) += 1,
            None => self.unclassified += 1,
        }

        if !verdict.is_spam() {
            self.not_spam += 1;
            return;
        }

        self.spam += 1;
        if let Some(number) = number {
            *self.spam_numbers.entry(number).or_insert(0) += 1;
        }
        if let Some(carrier) = record.carrier().filter(|c| !c.is_empty()) {
            *self.spam_carriers.entry(carrier.to_string()).or_insert(0) += 1;
        }
        if self.samples.len() < self.sample_limit {
            self.samples.push(record.clone());
        }
    }

    pub fn reason_count(&self, reason: SpamReason) -> usize {
        self.reasons.get(&reason).copied().unwrap_or(0)
    }

    /// Most frequent spam numbers, ties broken by number
    pub fn top_spam_numbers(&self, n: usize) -> Vec<(PhoneNumber, usize)> {
        top_n(&self.spam_numbers, n)
    }

    /// Most frequent area codes over all records, ties broken by code
    pub fn top_area_codes(&self, n: usize) -> Vec<(String, usize)> {
        top_n(&self.area_codes, n)
    }

    /// First spam records seen, up to the sample limit
    pub fn samples(&self) -> &[EnrichedRecord] {
        &self.samples
    }
}

fn top_n<K: Clone + Ord + Hash>(counts: &HashMap<K, usize>, n: usize) -> Vec<(K, usize)> {
    let mut entries: Vec<(K, usize)> = counts.iter().map(|(k, v)| (k.clone(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}
