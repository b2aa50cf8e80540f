//! Record parsing
//!
//! Turns the line-oriented output of `content query` into [`RawRecord`]s.
//! Malformed rows are never an error: they parse to
//! [`ParseOutcome::Unparseable`] and are dropped from the batch.

pub mod tokenizer;
pub mod types;
pub mod voicemail;

pub use tokenizer::{parse_line, tokenize, Token};
pub use types::{ParseOutcome, RawRecord};
pub use voicemail::{parse_voicemail, GroupStep, VoicemailScanner};

use tracing::debug;

/// Parse one row per line, dropping unparseable rows
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Vec<RawRecord> {
    lines
        .iter()
        .filter_map(|line| {
            let outcome = parse_line(line.as_ref());
            if !outcome.is_parsed() {
                debug!("Dropping unparseable row: {:?}", line.as_ref());
            }
            outcome.ok()
        })
        .collect()
}

/// Group voicemail rows into triples and parse each committed triple
pub fn parse_voicemail_rows<S: AsRef<str>>(rows: &[S]) -> Vec<RawRecord> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for step in VoicemailScanner::new(rows) {
        match step {
            GroupStep::Commit {
                header, payload, ..
            } => {
                if let ParseOutcome::Parsed(record) = parse_voicemail(header, payload) {
                    records.push(record);
                }
            }
            GroupStep::SkipOne { .. } => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!(
            "Voicemail scan: {} records, {} rows skipped",
            records.len(),
            skipped
        );
    }

    records
}
