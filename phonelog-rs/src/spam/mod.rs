//! Spam classification module
//!
//! Provides rule-based spam screening of calls, SMS and voicemail, with
//! per-type statistics and a printable report.

pub mod classifier;
pub mod report;
pub mod rules;
pub mod stats;
pub mod types;

pub use classifier::{BatchResult, SpamClassifier};
pub use report::Report;
pub use stats::ClassificationStats;
pub use types::*;
