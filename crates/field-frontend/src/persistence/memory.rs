//! In-process field store

use field_core::{FieldPayload, FieldRecord};

use super::{FieldStore, PersistenceError};

/// Keeps records in memory and assigns sequential ids
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: Vec<FieldRecord>,
    next_id: i64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FieldStore for MemoryStore {
    fn list_fields(&mut self) -> Result<Vec<FieldRecord>, PersistenceError> {
        Ok(self.records.clone())
    }

    fn create_field(&mut self, payload: &FieldPayload) -> Result<FieldRecord, PersistenceError> {
        payload.validate()?;

        let record = FieldRecord::from_payload(self.next_id, payload.clone(), None);
        self.next_id += 1;
        self.records.push(record.clone());
        tracing::debug!("Stored field {} ({})", record.id, record.name);
        Ok(record)
    }
}
