//! Carrier lookup service
//!
//! Fetches carrier metadata over HTTP and feeds it into the cache.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use super::cache::CarrierCache;
use super::types::{CarrierEntry, CarrierInfo, LookupSummary, UNKNOWN};
use crate::error::{PhoneError, Result};
use crate::utils::PhoneNumber;

/// Log a running tally every this many fetches
const PROGRESS_EVERY: usize = 25;

/// Carrier lookup trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarrierLookup: Send + Sync {
    /// Resolve one number, `Ok(None)` when the service has no answer
    async fn lookup(&self, number: &PhoneNumber) -> Result<Option<CarrierInfo>>;
}

/// carrierlookup.com HTTP client
pub struct CarrierLookupClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl CarrierLookupClient {
    pub fn new(base_url: String, api_key: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }
}

/// Lookup response envelope
#[derive(Debug, Deserialize)]
struct LookupEnvelope {
    #[serde(rename = "Response")]
    response: Option<LookupResponse>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    carrier: Option<String>,
    #[serde(alias = "carrier-type")]
    carrier_type: Option<String>,
}

impl LookupEnvelope {
    fn into_info(self) -> Option<CarrierInfo> {
        let response = self.response?;
        let carrier = response.carrier.filter(|c| !c.trim().is_empty())?;
        Some(CarrierInfo {
            carrier,
            carrier_type: response
                .carrier_type
                .unwrap_or_else(|| UNKNOWN.to_string()),
        })
    }
}

#[async_trait]
impl CarrierLookup for CarrierLookupClient {
    async fn lookup(&self, number: &PhoneNumber) -> Result<Option<CarrierInfo>> {
        debug!("Looking up carrier for {}", number);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str()), ("number", number.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PhoneError::Lookup(format!("{} - {}", status, error_text)));
        }

        let envelope: LookupEnvelope = response.json().await?;
        Ok(envelope.into_info())
    }
}

/// Resolve every worklist number missing from the cache
///
/// Each fetched entry is recorded in `cache` and appended to `sink` as one
/// JSON line. Errors and empty answers are logged and counted as failed;
/// those numbers stay in the worklist for a later run. Only a failure to
/// write `sink` aborts the run.
pub async fn refresh_carriers<W: AsyncWrite + Unpin + Send>(
    worklist: &[PhoneNumber],
    cache: &mut CarrierCache,
    lookup: &dyn CarrierLookup,
    sink: &mut W,
) -> Result<LookupSummary> {
    let mut summary = LookupSummary::default();

    for number in worklist {
        if cache.contains(number) {
            info!("Skipped {}", number);
            summary.skipped += 1;
            continue;
        }

        let info = match lookup.lookup(number).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                warn!("No carrier data for {}", number);
                summary.failed += 1;
                continue;
            }
            Err(e) => {
                warn!("Carrier lookup failed for {}: {}", number, e);
                summary.failed += 1;
                continue;
            }
        };

        let mut line = serde_json::to_string(&CarrierEntry::new(number, &info))?;
        line.push('\n');
        sink.write_all(line.as_bytes()).await?;

        *summary.carriers.entry(info.carrier.clone()).or_insert(0) += 1;
        cache.record(number.clone(), info);
        summary.fetched += 1;

        if summary.fetched % PROGRESS_EVERY == 0 {
            info!("Fetched {} carriers so far: {:?}", summary.fetched, summary.carriers);
        }
    }

    sink.flush().await?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use std::path::Path;

    fn number(raw: &str) -> PhoneNumber {
        PhoneNumber::parse(raw).unwrap()
    }

    #[test]
    fn test_envelope_parsing() {
        let body = r#"{"Response": {"carrier": "BANDWIDTH", "carrier_type": "voip"}}"#;
        let envelope: LookupEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(
            envelope.into_info(),
            Some(CarrierInfo::new("BANDWIDTH", "voip"))
        );

        let body = r#"{"Response": {"carrier": "", "carrier_type": null}}"#;
        let envelope: LookupEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.into_info(), None);

        let envelope: LookupEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(envelope.into_info(), None);
    }

    #[tokio::test]
    async fn test_refresh_skips_cached_numbers() {
        let mut cache = CarrierCache::new();
        cache.record(number("4065550100"), CarrierInfo::new("VERIZON", "landline"));

        let mut lookup = MockCarrierLookup::new();
        lookup
            .expect_lookup()
            .with(eq(number("5551234567")))
            .times(1)
            .returning(|_| Ok(Some(CarrierInfo::new("BANDWIDTH", "voip"))));

        let worklist = vec![number("4065550100"), number("5551234567"), number("5551234567")];
        let mut sink = Vec::new();
        let summary = refresh_carriers(&worklist, &mut cache, &lookup, &mut sink)
            .await
            .unwrap();

        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.carriers.get("BANDWIDTH"), Some(&1));
        assert_eq!(cache.len(), 2);

        let written = String::from_utf8(sink).unwrap();
        assert_eq!(written.lines().count(), 1);
        let reloaded = CarrierCache::from_ndjson(&written, Path::new("numbers.dat")).unwrap();
        assert_eq!(
            reloaded.lookup(&number("5551234567")),
            Some(&CarrierInfo::new("BANDWIDTH", "voip"))
        );
    }

    #[tokio::test]
    async fn test_refresh_tolerates_failures() {
        let mut cache = CarrierCache::new();

        let mut lookup = MockCarrierLookup::new();
        lookup
            .expect_lookup()
            .with(eq(number("5550000001")))
            .returning(|_| Err(PhoneError::Lookup("503 - busy".to_string())));
        lookup
            .expect_lookup()
            .with(eq(number("5550000002")))
            .returning(|_| Ok(None));

        let worklist = vec![number("5550000001"), number("5550000002")];
        let mut sink = Vec::new();
        let summary = refresh_carriers(&worklist, &mut cache, &lookup, &mut sink)
            .await
            .unwrap();

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.fetched, 0);
        assert!(cache.is_empty());
        assert!(sink.is_empty());
    }
}
