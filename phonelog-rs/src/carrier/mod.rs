//! Carrier metadata
//!
//! Provides the persisted carrier cache and the lookup service that grows it.

pub mod cache;
pub mod lookup;
pub mod mock;
pub mod types;

pub use cache::CarrierCache;
pub use lookup::{refresh_carriers, CarrierLookup, CarrierLookupClient};
pub use mock::StaticCarrierLookup;
pub use types::*;
