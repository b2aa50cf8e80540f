//! Canned carrier lookup for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::lookup::CarrierLookup;
use super::types::CarrierInfo;
use crate::error::Result;
use crate::utils::PhoneNumber;

/// Lookup answering from a fixed table, counting every call
#[derive(Default)]
pub struct StaticCarrierLookup {
    answers: HashMap<PhoneNumber, CarrierInfo>,
    calls: AtomicUsize,
}

impl StaticCarrierLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an answer; invalid numbers are ignored
    pub fn with(mut self, number: &str, info: CarrierInfo) -> Self {
        if let Some(number) = PhoneNumber::parse(number) {
            self.answers.insert(number, info);
        }
        self
    }

    /// Number of lookups served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CarrierLookup for StaticCarrierLookup {
    async fn lookup(&self, number: &PhoneNumber) -> Result<Option<CarrierInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answers.get(number).cloned())
    }
}
