//! Voicemail row grouping
//!
//! The voicemail provider returns one logical voicemail as three adjacent
//! rows: a `Row:` header with the metadata, a short opaque id, and the
//! attachment payload starting with [`PAYLOAD_MARKER`]. The scanner walks
//! the rows and either commits a whole triple or skips a single row.

use super::tokenizer::{collect_fields, finish, ROW_MARKER};
use super::types::{ParseOutcome, ENCODED_DATA_FIELD};

/// Prefix of the attachment payload row
pub const PAYLOAD_MARKER: &str = ":ABww";
/// Longest accepted id row, in characters after trimming
pub const MAX_ID_LEN: usize = 10;
/// Rows per voicemail
pub const GROUP_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    ExpectRowHeader,
    ExpectId,
    ExpectPayload,
}

/// One step of the scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupStep<'a> {
    /// A full triple starting at `index`
    Commit {
        index: usize,
        header: &'a str,
        payload: &'a str,
    },
    /// The row at `index` does not start a triple
    SkipOne { index: usize },
}

/// Iterator over the grouping decisions for a run of voicemail rows
pub struct VoicemailScanner<'a, S: AsRef<str>> {
    items: &'a [S],
    pos: usize,
}

impl<'a, S: AsRef<str>> VoicemailScanner<'a, S> {
    pub fn new(items: &'a [S]) -> Self {
        Self { items, pos: 0 }
    }

    /// Run the state machine over the rows starting at `start`
    fn match_group(&self, start: usize) -> Option<(&'a str, &'a str)> {
        let items: &'a [S] = self.items;
        let window = items.get(start..start + GROUP_LEN)?;
        let mut state = GroupState::ExpectRowHeader;
        let mut header = "";

        for item in window {
            let item = item.as_ref().trim();
            state = match state {
                GroupState::ExpectRowHeader => {
                    if !item.starts_with(ROW_MARKER) {
                        return None;
                    }
                    header = item;
                    GroupState::ExpectId
                }
                GroupState::ExpectId => {
                    if item.chars().count() > MAX_ID_LEN {
                        return None;
                    }
                    GroupState::ExpectPayload
                }
                GroupState::ExpectPayload => {
                    if !item.starts_with(PAYLOAD_MARKER) {
                        return None;
                    }
                    return Some((header, item));
                }
            };
        }

        None
    }
}

impl<'a, S: AsRef<str>> Iterator for VoicemailScanner<'a, S> {
    type Item = GroupStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.items.len() {
            return None;
        }

        let index = self.pos;
        match self.match_group(index) {
            Some((header, payload)) => {
                self.pos += GROUP_LEN;
                Some(GroupStep::Commit {
                    index,
                    header,
                    payload,
                })
            }
            None => {
                self.pos += 1;
                Some(GroupStep::SkipOne { index })
            }
        }
    }
}

/// Build a voicemail record from a committed triple
pub fn parse_voicemail(header: &str, payload: &str) -> ParseOutcome {
    let mut record = collect_fields(header);
    record.insert(ENCODED_DATA_FIELD, Some(payload.trim().to_string()));
    finish(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_triple() {
        let items = ["Row: foo=bar", "abc", ":ABwwBASE64DATA"];
        let steps: Vec<_> = VoicemailScanner::new(&items).collect();
        assert_eq!(
            steps,
            vec![GroupStep::Commit {
                index: 0,
                header: "Row: foo=bar",
                payload: ":ABwwBASE64DATA",
            }]
        );

        let record = parse_voicemail("Row: foo=bar", ":ABwwBASE64DATA").into_record();
        assert_eq!(record.get("foo"), Some("bar"));
        assert_eq!(record.get(ENCODED_DATA_FIELD), Some(":ABwwBASE64DATA"));
    }

    #[test]
    fn test_long_id_skips_one() {
        let items = ["Row: foo=bar", "abcdefghijk", ":ABwwBASE64DATA"];
        let steps: Vec<_> = VoicemailScanner::new(&items).collect();
        assert_eq!(
            steps,
            vec![
                GroupStep::SkipOne { index: 0 },
                GroupStep::SkipOne { index: 1 },
                GroupStep::SkipOne { index: 2 },
            ]
        );
    }

    #[test]
    fn test_resynchronizes_after_stray_row() {
        let items = vec![
            "stray".to_string(),
            "Row: 0 number=4065550100".to_string(),
            " 17 ".to_string(),
            ":ABwwAAAA==".to_string(),
            "Row: 1 number=5551234567".to_string(),
            "18".to_string(),
        ];
        let steps: Vec<_> = VoicemailScanner::new(&items).collect();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0], GroupStep::SkipOne { index: 0 });
        assert!(matches!(steps[1], GroupStep::Commit { index: 1, .. }));
        // Trailing incomplete group is skipped row by row
        assert_eq!(steps[2], GroupStep::SkipOne { index: 4 });
        assert_eq!(steps[3], GroupStep::SkipOne { index: 5 });
    }

    #[test]
    fn test_payload_marker_required() {
        let items = ["Row: foo=bar", "abc", "ABwwBASE64DATA"];
        let steps: Vec<_> = VoicemailScanner::new(&items).collect();
        assert!(steps.iter().all(|s| matches!(s, GroupStep::SkipOne { .. })));
    }

    #[test]
    fn test_voicemail_number_normalized() {
        let record = parse_voicemail("Row: 0 number=+1 406 555 0100, duration=31", ":ABwwXYZ")
            .into_record();
        assert_eq!(record.get("number"), Some("4065550100"));
        assert_eq!(record.get("duration"), Some("31"));
    }
}
