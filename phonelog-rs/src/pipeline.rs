//! Snapshot processing
//!
//! Parses every section of a [`PhoneSnapshot`], enriches the records
//! against the carrier cache and collects the numbers that still need a
//! carrier lookup.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::info;

use crate::carrier::CarrierCache;
use crate::device::PhoneSnapshot;
use crate::enrich::{enrich_into, EnrichedRecord};
use crate::parser::{parse_lines, parse_voicemail_rows, RawRecord};
use crate::spam::RecordKind;
use crate::utils::PhoneNumber;

/// Enriched records per type and the shared lookup worklist
#[derive(Debug, Clone, Default)]
pub struct ProcessOutcome {
    pub calls: Vec<EnrichedRecord>,
    pub voicemails: Vec<EnrichedRecord>,
    pub sms: Vec<EnrichedRecord>,
    pub needs_lookup: BTreeSet<PhoneNumber>,
    /// Records that received carrier fields
    pub cache_hits: usize,
}

impl ProcessOutcome {
    pub fn records(&self, kind: RecordKind) -> &[EnrichedRecord] {
        match kind {
            RecordKind::Call => &self.calls,
            RecordKind::Voicemail => &self.voicemails,
            RecordKind::Sms => &self.sms,
        }
    }
}

/// Parse the rows of one record type
///
/// SMS means the inbox: sent messages are never screened.
pub fn parse_section(snapshot: &PhoneSnapshot, kind: RecordKind) -> Vec<RawRecord> {
    match kind {
        RecordKind::Call => parse_lines(&snapshot.calls),
        RecordKind::Voicemail => parse_voicemail_rows(&snapshot.voicemail),
        RecordKind::Sms => parse_lines(&snapshot.sms_inbox),
    }
}

pub fn process_snapshot(snapshot: &PhoneSnapshot, cache: &CarrierCache) -> ProcessOutcome {
    let mut outcome = ProcessOutcome::default();

    for kind in RecordKind::ALL {
        let parsed = parse_section(snapshot, kind);
        let (records, hits) = enrich_into(parsed, cache, &mut outcome.needs_lookup);
        outcome.cache_hits += hits;

        match kind {
            RecordKind::Call => outcome.calls = records,
            RecordKind::Voicemail => outcome.voicemails = records,
            RecordKind::Sms => outcome.sms = records,
        }
    }

    info!(
        "Processed records - Calls: {}, Voicemails: {}, SMS: {}",
        outcome.calls.len(),
        outcome.voicemails.len(),
        outcome.sms.len()
    );
    info!("Found {} new numbers to lookup", outcome.needs_lookup.len());

    outcome
}

/// Values listed per field when rendering
const DEFAULT_TOP_VALUES: usize = 5;

/// Value frequencies of every field of one record type
#[derive(Debug, Clone, Default)]
pub struct FieldSummary {
    pub label: String,
    pub rows: usize,
    pub records: usize,
    /// Values listed per field by `Display`
    pub top: usize,
    counts: BTreeMap<String, HashMap<String, usize>>,
}

impl FieldSummary {
    pub fn new(label: impl Into<String>, rows: usize, records: &[RawRecord]) -> Self {
        let mut counts: BTreeMap<String, HashMap<String, usize>> = BTreeMap::new();
        for record in records {
            for (field, value) in record.iter() {
                let value = value.unwrap_or("NULL").to_string();
                *counts
                    .entry(field.to_string())
                    .or_default()
                    .entry(value)
                    .or_insert(0) += 1;
            }
        }

        Self {
            label: label.into(),
            rows,
            records: records.len(),
            top: DEFAULT_TOP_VALUES,
            counts,
        }
    }

    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }

    /// Field names, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    /// Most common values of a field, ties broken by value
    pub fn top_values(&self, field: &str, n: usize) -> Vec<(String, usize)> {
        let Some(values) = self.counts.get(field) else {
            return Vec::new();
        };
        let mut entries: Vec<(String, usize)> =
            values.iter().map(|(v, c)| (v.clone(), *c)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(n);
        entries
    }

}

impl fmt::Display for FieldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}:", self.label)?;
        writeln!(f, "Total rows: {}", self.rows)?;
        writeln!(f, "Parsed records: {}", self.records)?;
        for field in self.fields() {
            writeln!(f, "\n{} (top {}):", field, self.top)?;
            for (value, count) in self.top_values(field, self.top) {
                writeln!(f, "  {}: {}", value, count)?;
            }
        }
        Ok(())
    }
}

/// Field summaries for every snapshot section
pub fn summarize_snapshot(snapshot: &PhoneSnapshot) -> Vec<FieldSummary> {
    vec![
        FieldSummary::new("calls", snapshot.calls.len(), &parse_lines(&snapshot.calls)),
        FieldSummary::new(
            "voicemail",
            snapshot.voicemail.len(),
            &parse_voicemail_rows(&snapshot.voicemail),
        ),
        FieldSummary::new(
            "sms_inbox",
            snapshot.sms_inbox.len(),
            &parse_lines(&snapshot.sms_inbox),
        ),
        FieldSummary::new(
            "sms_sent",
            snapshot.sms_sent.len(),
            &parse_lines(&snapshot.sms_sent),
        ),
    ]
}
