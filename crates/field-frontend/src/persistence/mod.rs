//! Persistence of field records
//!
//! The editor talks to storage through the [`FieldStore`] trait so the
//! backend (in-process or the field service over HTTP) can be swapped.

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use std::sync::Arc;
use std::time::Duration;

use field_core::{FieldPayload, FieldRecord, PayloadError};
use parking_lot::Mutex;
use thiserror::Error;

use crate::config::{PersistenceConfig, StoreBackend};

/// Error type for persistence operations
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] PayloadError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Storage for field records
pub trait FieldStore {
    /// Fetch every stored field
    fn list_fields(&mut self) -> Result<Vec<FieldRecord>, PersistenceError>;

    /// Store a new field and return the record with its assigned identity
    ///
    /// Implementations must reject payloads that fail
    /// [`FieldPayload::validate`].
    fn create_field(&mut self, payload: &FieldPayload) -> Result<FieldRecord, PersistenceError>;
}

/// Store shared between the dispatcher and whoever owns the session
pub type SharedStore = Arc<Mutex<Box<dyn FieldStore + Send>>>;

/// Wrap a store for sharing
pub fn share_store(store: impl FieldStore + Send + 'static) -> SharedStore {
    Arc::new(Mutex::new(Box::new(store)))
}

/// Open the backend selected in the configuration
pub fn open_store(config: &PersistenceConfig) -> SharedStore {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory field store");
            share_store(MemoryStore::new())
        }
        StoreBackend::Http => {
            tracing::info!("Using field service at {}", config.base_url);
            share_store(HttpStore::new(
                &config.base_url,
                Duration::from_secs(config.timeout_secs),
            ))
        }
    }
}
