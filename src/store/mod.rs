// ============================================================================
// Commit Executors
// ============================================================================
//
// The boundary between the unit-of-work core and a transactional data store.
// The core only relies on the contracts below; the store decides how the
// batch is actually applied and how records are looked up afterwards.
//
// ============================================================================

pub mod memory;
pub mod schema;

pub use memory::InMemoryDataStore;
pub use schema::ObjectSchema;

use crate::core::{FieldValue, RecordId, Result};
use crate::transaction::{CommitResult, UnitOfWork};
use async_trait::async_trait;

/// Applies a unit of work atomically
///
/// Implementations must either apply every operation and return a result for
/// every registered reference, or apply nothing and fail with
/// `DataApiError::BatchRejected` carrying the field-level errors.
#[async_trait]
pub trait CommitExecutor: Send + Sync {
    /// Executor name, used in logs
    fn name(&self) -> &'static str;

    /// Commit the batch; the unit of work is consumed
    async fn commit(&self, unit: UnitOfWork) -> Result<CommitResult>;
}

/// Looks up records that a previous commit created
#[async_trait]
pub trait RecordReader: Send + Sync {
    /// Record of `entity_type` with the given id, if any
    async fn find_by_id(&self, entity_type: &str, id: &RecordId) -> Result<Option<StoredRecord>>;
}

/// A record as persisted, with references replaced by real ids
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: RecordId,
    pub entity_type: String,
    pub fields: Vec<(String, FieldValue)>,
}

impl StoredRecord {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }
}
