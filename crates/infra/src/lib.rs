//! Infrastructure layer: entity storage, store-backed catalog services, config.

pub mod config;
pub mod merge_service;
pub mod store;
pub mod supplier_lookup;

pub use config::TransferSettings;
pub use merge_service::{MergeError, MergeService};
pub use store::{EntityStore, InMemoryEntityStore, StoreError, StoreMergeGraph};
pub use supplier_lookup::SupplierLookup;
