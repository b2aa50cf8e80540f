//! Device content-provider access
//!
//! Wraps `content query` on the device and collects the raw rows for every
//! record type into a [`PhoneSnapshot`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DeviceConfig;
use crate::error::Result;

pub mod adb;
pub mod mock;

pub use adb::AdbDevice;
pub use mock::StaticDevice;

/// Device query trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceQuery: Send + Sync {
    /// Non-blank output lines of a content query on `uri`
    async fn query(&self, uri: &str) -> Result<Vec<String>>;
}

/// Query a provider, logging a failure and treating it as no rows
pub async fn query_or_empty(device: &dyn DeviceQuery, uri: &str, description: &str) -> Vec<String> {
    match device.query(uri).await {
        Ok(lines) => lines,
        Err(e) => {
            warn!("Error querying {}: {}", description, e);
            Vec::new()
        }
    }
}

/// Raw rows pulled from the device in one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneSnapshot {
    pub calls: Vec<String>,
    #[serde(alias = "voicemails")]
    pub voicemail: Vec<String>,
    pub sms_inbox: Vec<String>,
    pub sms_sent: Vec<String>,
}

impl PhoneSnapshot {
    /// Row counts per section, in snapshot order
    pub fn counts(&self) -> [(&'static str, usize); 4] {
        [
            ("calls", self.calls.len()),
            ("voicemail", self.voicemail.len()),
            ("sms_inbox", self.sms_inbox.len()),
            ("sms_sent", self.sms_sent.len()),
        ]
    }
}

/// Try each voicemail provider until one returns rows
pub async fn query_voicemail(device: &dyn DeviceQuery, uris: &[String]) -> Vec<String> {
    for uri in uris {
        info!("Trying voicemail URI: {}", uri);
        let rows = query_or_empty(device, uri, "voicemail").await;
        if !rows.is_empty() {
            return rows;
        }
    }
    Vec::new()
}

/// Pull calls, voicemail and SMS from the device
pub async fn extract_snapshot(device: &dyn DeviceQuery, config: &DeviceConfig) -> PhoneSnapshot {
    info!("Getting calls...");
    let calls = query_or_empty(device, &config.calls_uri, "calls").await;

    info!("Getting voicemail...");
    let voicemail = query_voicemail(device, &config.voicemail_uris).await;

    info!("Getting SMS inbox...");
    let sms_inbox = query_or_empty(device, &config.sms_inbox_uri, "SMS inbox").await;

    info!("Getting SMS sent...");
    let sms_sent = query_or_empty(device, &config.sms_sent_uri, "SMS sent").await;

    PhoneSnapshot {
        calls,
        voicemail,
        sms_inbox,
        sms_sent,
    }
}
