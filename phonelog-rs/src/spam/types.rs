//! Spam types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of record being classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Call,
    Sms,
    Voicemail,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Call, RecordKind::Voicemail, RecordKind::Sms];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Call => "call",
            RecordKind::Sms => "sms",
            RecordKind::Voicemail => "voicemail",
        }
    }

    /// Stem of the per-type data files
    pub fn file_stem(&self) -> &'static str {
        match self {
            RecordKind::Call => "calls",
            RecordKind::Sms => "sms",
            RecordKind::Voicemail => "voicemails",
        }
    }

    /// Enriched records, e.g. `calls.dat`
    pub fn data_file(&self) -> String {
        format!("{}.dat", self.file_stem())
    }

    /// Spam records, e.g. `spam_calls.dat`
    pub fn spam_file(&self) -> String {
        format!("spam_{}.dat", self.file_stem())
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "call" | "calls" => Ok(RecordKind::Call),
            "sms" => Ok(RecordKind::Sms),
            "voicemail" | "voicemails" => Ok(RecordKind::Voicemail),
            other => Err(format!("unknown record type '{}'", other)),
        }
    }
}

/// Rule that decided a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpamReason {
    #[serde(rename = "allowed_number")]
    AllowedNumber,
    #[serde(rename = "area_code_406")]
    AreaCode406,
    #[serde(rename = "in_contacts")]
    InContacts,
    #[serde(rename = "sms_has_name")]
    SmsHasName,
    #[serde(rename = "known_carrier")]
    KnownCarrier,
    #[serde(rename = "voip_type")]
    VoipType,
    #[serde(rename = "not_in_contacts")]
    NotInContacts,
}

impl SpamReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpamReason::AllowedNumber => "allowed_number",
            SpamReason::AreaCode406 => "area_code_406",
            SpamReason::InContacts => "in_contacts",
            SpamReason::SmsHasName => "sms_has_name",
            SpamReason::KnownCarrier => "known_carrier",
            SpamReason::VoipType => "voip_type",
            SpamReason::NotInContacts => "not_in_contacts",
        }
    }

    /// Whether this reason marks a record as spam
    pub fn is_spam(&self) -> bool {
        matches!(
            self,
            SpamReason::KnownCarrier | SpamReason::VoipType | SpamReason::NotInContacts
        )
    }
}

impl fmt::Display for SpamReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier decision
///
/// The spam flag is derived from the reason, so the two cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Classified(SpamReason),
    /// The record has no usable number and is let through
    Unclassified,
}

impl Verdict {
    pub fn is_spam(&self) -> bool {
        match self {
            Verdict::Classified(reason) => reason.is_spam(),
            Verdict::Unclassified => false,
        }
    }

    pub fn reason(&self) -> Option<SpamReason> {
        match self {
            Verdict::Classified(reason) => Some(*reason),
            Verdict::Unclassified => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_spam_flags() {
        assert!(SpamReason::KnownCarrier.is_spam());
        assert!(SpamReason::NotInContacts.is_spam());
        assert!(!SpamReason::SmsHasName.is_spam());
        assert!(!Verdict::Unclassified.is_spam());
        assert_eq!(Verdict::Unclassified.reason(), None);
    }

    #[test]
    fn test_reason_serialization() {
        assert_eq!(
            serde_json::to_string(&SpamReason::AreaCode406).unwrap(),
            "\"area_code_406\""
        );
        assert_eq!(SpamReason::AreaCode406.to_string(), "area_code_406");
    }

    #[test]
    fn test_record_kind_files() {
        assert_eq!(RecordKind::Call.data_file(), "calls.dat");
        assert_eq!(RecordKind::Voicemail.spam_file(), "spam_voicemails.dat");
        assert_eq!("calls".parse::<RecordKind>(), Ok(RecordKind::Call));
        assert!("fax".parse::<RecordKind>().is_err());
    }
}
