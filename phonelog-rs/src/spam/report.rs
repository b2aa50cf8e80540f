//! Text rendering of classification statistics

use std::fmt;

use super::stats::ClassificationStats;
use super::types::SpamReason;
use crate::carrier::CarrierCache;
use crate::enrich::EnrichedRecord;

/// Batch summary for one record type
pub struct Report<'a> {
    pub stats: &'a ClassificationStats,
    /// Used to annotate top spam numbers
    pub carriers: &'a CarrierCache,
    pub top_numbers: usize,
    pub top_area_codes: usize,
}

impl<'a> Report<'a> {
    pub fn new(stats: &'a ClassificationStats, carriers: &'a CarrierCache) -> Self {
        Self {
            stats,
            carriers,
            top_numbers: 10,
            top_area_codes: 5,
        }
    }

    pub fn with_limits(mut self, top_numbers: usize, top_area_codes: usize) -> Self {
        self.top_numbers = top_numbers;
        self.top_area_codes = top_area_codes;
        self
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats;
        let title = stats.kind.file_stem().to_uppercase();

        writeln!(f, "{:=<50}", "")?;
        writeln!(f, "{} Analysis:", title)?;
        writeln!(f, "{:=<50}", "")?;
        writeln!(f, "Total records processed: {}", stats.total)?;

        writeln!(f, "\nSPAM STATISTICS:")?;
        writeln!(f, "Total spam records: {}", stats.spam)?;
        writeln!(
            f,
            "  - Known spam carriers: {}",
            stats.reason_count(SpamReason::KnownCarrier)
        )?;
        writeln!(
            f,
            "  - VoIP/Wireless/Mobile: {}",
            stats.reason_count(SpamReason::VoipType)
        )?;
        writeln!(
            f,
            "  - Not in contacts: {}",
            stats.reason_count(SpamReason::NotInContacts)
        )?;

        writeln!(f, "\nNON-SPAM STATISTICS:")?;
        writeln!(f, "Total non-spam records: {}", stats.not_spam)?;
        let mut allowed: Vec<(SpamReason, usize)> = stats
            .reasons
            .iter()
            .filter(|(reason, _)| !reason.is_spam())
            .map(|(reason, count)| (*reason, *count))
            .collect();
        allowed.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        for (reason, count) in allowed {
            writeln!(f, "  - {}: {}", reason, count)?;
        }
        if stats.unclassified > 0 {
            writeln!(f, "  - no number (unclassified): {}", stats.unclassified)?;
        }

        writeln!(f, "\nTOP AREA CODES:")?;
        for (code, count) in stats.top_area_codes(self.top_area_codes) {
            writeln!(f, "  {}: {} {}", code, count, stats.kind.file_stem())?;
        }

        writeln!(f, "\nTOP {} SPAM {} NUMBERS:", self.top_numbers, title)?;
        for (number, count) in stats.top_spam_numbers(self.top_numbers) {
            let (carrier, carrier_type) = match self.carriers.lookup(&number) {
                Some(info) => (info.carrier.as_str(), info.carrier_type.as_str()),
                None => ("Unknown", "Unknown"),
            };
            writeln!(
                f,
                "  {}: {} times - {} ({})",
                number, count, carrier, carrier_type
            )?;
        }

        if !stats.samples().is_empty() {
            writeln!(f, "\nSAMPLE SPAM {} RECORDS:", title)?;
            for (i, record) in stats.samples().iter().enumerate() {
                writeln!(f, "\nRecord {}:", i + 1)?;
                write_sample(f, record)?;
            }
        }

        Ok(())
    }
}

fn write_sample(f: &mut fmt::Formatter<'_>, record: &EnrichedRecord) -> fmt::Result {
    writeln!(f, "    Number: {}", record.get("number").unwrap_or("Unknown"))?;
    writeln!(f, "    Carrier: {}", record.carrier().unwrap_or("Unknown"))?;
    writeln!(f, "    Type: {}", record.carrier_type().unwrap_or("Unknown"))?;
    writeln!(f, "    Duration: {}", record.get("duration").unwrap_or("N/A"))?;
    writeln!(f, "    Name: {}", record.name().unwrap_or("N/A"))
}
