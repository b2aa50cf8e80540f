//! phonelog-rs: Android phone record extraction and spam screening
//!
//! Pulls call log, SMS, voicemail and contacts from a device through
//! `adb shell content query`, enriches records with carrier metadata and
//! flags spam with a fixed, ordered rule set.
//!
//! # Pipeline
//!
//! ```text
//! device rows -> parser -> enrich (carrier cache) -> spam classifier -> report
//! ```
//!
//! # Example
//!
//! ```
//! use phonelog_rs::carrier::{CarrierCache, CarrierInfo};
//! use phonelog_rs::enrich::enrich;
//! use phonelog_rs::parser::parse_lines;
//! use phonelog_rs::spam::{RecordKind, SpamClassifier, SpamReason, Verdict};
//! use phonelog_rs::utils::PhoneNumber;
//! use std::collections::HashSet;
//!
//! let records = parse_lines(&["Row: 0 number=+1 555 123 4567, duration=9"]);
//!
//! let mut cache = CarrierCache::new();
//! cache.record(
//!     PhoneNumber::parse("5551234567").unwrap(),
//!     CarrierInfo::new("BANDWIDTH", "voip"),
//! );
//! let enriched = enrich(records, &cache);
//!
//! let classifier = SpamClassifier::new(HashSet::new());
//! let verdict = classifier.classify(&enriched.records[0], RecordKind::Call);
//! assert_eq!(verdict, Verdict::Classified(SpamReason::KnownCarrier));
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`parser`]: Provider row and voicemail triple parsing
//! - [`carrier`]: Carrier cache and lookup service
//! - [`enrich`]: Carrier enrichment of parsed records
//! - [`spam`]: Rule-based spam classification and statistics
//! - [`contacts`]: Contact store and known numbers
//! - [`device`]: Device content queries
//! - [`pipeline`]: Snapshot processing and field summaries
//! - [`storage`]: File persistence
//! - [`utils`]: Phone number normalization

pub mod carrier;
pub mod config;
pub mod contacts;
pub mod device;
pub mod enrich;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod spam;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{PhoneError, Result};
pub use utils::PhoneNumber;
