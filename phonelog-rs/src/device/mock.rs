//! Canned device for testing
//!
//! Answers content queries from a fixed URI table. Unknown URIs fail the
//! way a missing provider does.

use async_trait::async_trait;
use std::collections::HashMap;

use super::DeviceQuery;
use crate::error::{PhoneError, Result};

#[derive(Debug, Clone, Default)]
pub struct StaticDevice {
    rows: HashMap<String, Vec<String>>,
}

impl StaticDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows<I, S>(mut self, uri: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows
            .insert(uri.to_string(), rows.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl DeviceQuery for StaticDevice {
    async fn query(&self, uri: &str) -> Result<Vec<String>> {
        self.rows
            .get(uri)
            .cloned()
            .ok_or_else(|| PhoneError::Query(format!("Provider not available: {}", uri)))
    }
}
