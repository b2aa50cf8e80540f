//! Contacts
//!
//! Pulls contacts from the device and provides the known-number set used by
//! the spam classifier.

pub mod store;
pub mod types;

pub use store::{known_numbers_from_json, ContactStore};
pub use types::{Contact, IngestOutcome};

use tracing::info;

use crate::config::DeviceConfig;
use crate::device::{query_or_empty, DeviceQuery};

/// Query every contacts provider and merge the rows
pub async fn extract_contacts(device: &dyn DeviceQuery, config: &DeviceConfig) -> ContactStore {
    let mut store = ContactStore::new();

    for uri in &config.contacts_uris {
        let rows = query_or_empty(device, uri, &format!("contacts from {}", uri)).await;
        let mut added = 0;
        for row in &rows {
            if store.ingest_line(row) == IngestOutcome::Added {
                added += 1;
            }
        }
        info!("{}: {} rows, {} new contacts", uri, rows.len(), added);
    }

    store
}
