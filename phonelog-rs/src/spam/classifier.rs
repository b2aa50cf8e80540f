//! Spam classifier
//!
//! Applies the fixed rule list to enriched records against a set of known
//! contact numbers.

use std::collections::HashSet;
use tracing::debug;

use super::rules::{evaluate, RuleInput};
use super::stats::ClassificationStats;
use super::types::{RecordKind, Verdict};
use crate::enrich::EnrichedRecord;
use crate::utils::PhoneNumber;

/// Spam records and statistics for one record type
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub spam: Vec<EnrichedRecord>,
    pub stats: ClassificationStats,
}

pub struct SpamClassifier {
    contacts: HashSet<PhoneNumber>,
}

impl SpamClassifier {
    pub fn new(contacts: HashSet<PhoneNumber>) -> Self {
        Self { contacts }
    }

    /// Classify one record
    pub fn classify(&self, record: &EnrichedRecord, kind: RecordKind) -> Verdict {
        let Some(number) = record.number() else {
            return Verdict::Unclassified;
        };

        let input = RuleInput {
            number: &number,
            record,
            kind,
            contacts: &self.contacts,
        };
        Verdict::Classified(evaluate(&input))
    }

    /// Classify a batch, keeping spam records in input order
    pub fn classify_batch(
        &self,
        records: &[EnrichedRecord],
        kind: RecordKind,
        sample_limit: usize,
    ) -> BatchResult {
        let mut stats = ClassificationStats::new(kind, sample_limit);
        let mut spam = Vec::new();

        for record in records {
            let verdict = self.classify(record, kind);
            stats.observe(record, verdict);
            if verdict.is_spam() {
                spam.push(record.clone());
            }
        }

        debug!(
            "Classified {} {} records: {} spam, {} not spam",
            stats.total, kind, stats.spam, stats.not_spam
        );

        BatchResult { spam, stats }
    }
}
