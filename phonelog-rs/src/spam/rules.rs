//! Spam rules
//!
//! Rules are evaluated in [`RULES`] order and the first one that matches
//! decides the verdict. When none matches, contact membership decides.

use std::collections::HashSet;

use super::types::{RecordKind, SpamReason};
use crate::enrich::EnrichedRecord;
use crate::utils::PhoneNumber;

/// Number that is never spam
pub const ALLOWED_NUMBER: &str = "7072668159";

/// Area code that is never spam
pub const EXEMPT_AREA_CODE: &str = "406";

/// Carriers known to originate spam, matched as case-insensitive substrings
pub const SPAM_CARRIERS: [&str; 7] = [
    "SINCH (FKA INTELIQUENT/NEUTRAL TANDEM)",
    "BANDWIDTH",
    "O1 COMMUNICATIONS",
    "TELNYX LLC",
    "VOIPSTREET, INC.",
    "FRACTEL, LLC",
    "LUMEN (FKA CENTURYLINK)",
];

/// Carrier type fragments treated as spam, matched case-insensitively
pub const SPAM_CARRIER_TYPES: [&str; 3] = ["voip", "wireless", "mobil"];

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub number: &'a PhoneNumber,
    pub record: &'a EnrichedRecord,
    pub kind: RecordKind,
    pub contacts: &'a HashSet<PhoneNumber>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    AllowedNumber,
    ExemptAreaCode,
    SmsWithName,
    KnownSpamCarrier,
    SpamCarrierType,
}

/// Evaluation order
pub const RULES: [Rule; 5] = [
    Rule::AllowedNumber,
    Rule::ExemptAreaCode,
    Rule::SmsWithName,
    Rule::KnownSpamCarrier,
    Rule::SpamCarrierType,
];

impl Rule {
    /// The reason this rule yields, if it matches
    pub fn evaluate(self, input: &RuleInput<'_>) -> Option<SpamReason> {
        let matched = match self {
            Rule::AllowedNumber => input.number.as_str() == ALLOWED_NUMBER,
            Rule::ExemptAreaCode => input.number.as_str().starts_with(EXEMPT_AREA_CODE),
            Rule::SmsWithName => {
                input.kind == RecordKind::Sms
                    && input.record.name().is_some_and(|name| !name.is_empty())
            }
            Rule::KnownSpamCarrier => input
                .record
                .carrier()
                .is_some_and(is_spam_carrier),
            Rule::SpamCarrierType => input
                .record
                .carrier_type()
                .is_some_and(is_spam_carrier_type),
        };

        matched.then(|| self.reason())
    }

    pub fn reason(self) -> SpamReason {
        match self {
            Rule::AllowedNumber => SpamReason::AllowedNumber,
            Rule::ExemptAreaCode => SpamReason::AreaCode406,
            Rule::SmsWithName => SpamReason::SmsHasName,
            Rule::KnownSpamCarrier => SpamReason::KnownCarrier,
            Rule::SpamCarrierType => SpamReason::VoipType,
        }
    }
}

pub fn is_spam_carrier(carrier: &str) -> bool {
    let carrier = carrier.to_lowercase();
    SPAM_CARRIERS
        .iter()
        .any(|spam| carrier.contains(&spam.to_lowercase()))
}

pub fn is_spam_carrier_type(carrier_type: &str) -> bool {
    let carrier_type = carrier_type.to_lowercase();
    SPAM_CARRIER_TYPES
        .iter()
        .any(|fragment| carrier_type.contains(fragment))
}

/// Run the rules in order, falling back to contact membership
pub fn evaluate(input: &RuleInput<'_>) -> SpamReason {
    RULES
        .iter()
        .find_map(|rule| rule.evaluate(input))
        .unwrap_or_else(|| {
            if input.contacts.contains(input.number) {
                SpamReason::InContacts
            } else {
                SpamReason::NotInContacts
            }
        })
}
