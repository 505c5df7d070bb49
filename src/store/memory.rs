// ============================================================================
// In-Memory Data Store
// ============================================================================
//
// Transactional commit executor backed by process memory. A batch is fully
// validated before anything is written, and validation plus writes happen
// under one write lock, so a unit of work is either applied as a whole or
// not at all.
//
// ============================================================================

use super::{CommitExecutor, RecordReader, StoredRecord};
use super::schema::{ObjectSchema, derived_key_prefix, standard_objects};
use crate::config::DataApiConfig;
use crate::core::{
    ApiError, DataApiError, FieldValue, RecordId, RecordModificationResult, Result,
};
use crate::record::Record;
use crate::transaction::{CommitResult, UnitOfWork};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{Instrument, Level, event, info_span};

pub const BATCH_ERROR_MESSAGE: &str = "One or more API errors occurred";

pub const STRING_TOO_LONG: &str = "STRING_TOO_LONG";
pub const REQUIRED_FIELD_MISSING: &str = "REQUIRED_FIELD_MISSING";
pub const INVALID_CROSS_REFERENCE_KEY: &str = "INVALID_CROSS_REFERENCE_KEY";
pub const LIMIT_EXCEEDED: &str = "LIMIT_EXCEEDED";

#[derive(Debug, Default)]
struct StoreState {
    records: HashMap<RecordId, StoredRecord>,
    next_sequence: u64,
}

pub struct InMemoryDataStore {
    config: DataApiConfig,
    schemas: HashMap<String, ObjectSchema>,
    state: RwLock<StoreState>,
}

impl Default for InMemoryDataStore {
    fn default() -> Self {
        Self::new(DataApiConfig::default())
    }
}

impl InMemoryDataStore {
    /// Store with the standard object schemas registered
    pub fn new(config: DataApiConfig) -> Self {
        let schemas = standard_objects()
            .into_iter()
            .map(|schema| (schema.name().to_string(), schema))
            .collect();

        Self {
            config,
            schemas,
            state: RwLock::new(StoreState {
                records: HashMap::new(),
                next_sequence: 1,
            }),
        }
    }

    /// Register or replace the schema of an entity type
    pub fn with_schema(mut self, schema: ObjectSchema) -> Self {
        self.schemas.insert(schema.name().to_string(), schema);
        self
    }

    pub fn config(&self) -> &DataApiConfig {
        &self.config
    }

    pub async fn get(&self, id: &RecordId) -> Option<StoredRecord> {
        self.state.read().await.records.get(id).cloned()
    }

    /// Number of stored records of one entity type
    pub async fn count(&self, entity_type: &str) -> usize {
        self.state
            .read()
            .await
            .records
            .values()
            .filter(|record| record.entity_type == entity_type)
            .count()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn key_prefix(&self, entity_type: &str) -> String {
        self.schemas
            .get(entity_type)
            .map(|schema| schema.key_prefix().to_string())
            .unwrap_or_else(|| derived_key_prefix(entity_type))
    }

    fn max_length(&self, entity_type: &str, field: &str) -> usize {
        self.schemas
            .get(entity_type)
            .and_then(|schema| schema.max_length_of(field))
            .unwrap_or(self.config.default_string_max_length)
    }

    fn validate(&self, unit: &UnitOfWork) -> Vec<ApiError> {
        if unit.len() > self.config.max_batch_size {
            return vec![ApiError::new(
                LIMIT_EXCEEDED,
                format!(
                    "Unit of work has {} operations, the limit is {}",
                    unit.len(),
                    self.config.max_batch_size
                ),
                Vec::new(),
            )];
        }

        let mut errors = Vec::new();
        for (position, operation) in unit.operations().iter().enumerate() {
            let record = operation.record();
            self.validate_required(record, &mut errors);

            for (field, value) in record.fields() {
                match value {
                    FieldValue::String(s) => {
                        let max = self.max_length(record.entity_type(), field);
                        if s.chars().count() > max {
                            errors.push(ApiError::new(
                                STRING_TOO_LONG,
                                format!(
                                    "{}: data value too large: {} (max length={})",
                                    field, s, max
                                ),
                                vec![field.clone()],
                            ));
                        }
                    }
                    FieldValue::Reference(reference) => {
                        let resolvable = unit
                            .position_of(reference)
                            .is_some_and(|target| target < position);
                        if !resolvable {
                            errors.push(ApiError::new(
                                INVALID_CROSS_REFERENCE_KEY,
                                format!("{}: invalid reference {}", field, reference),
                                vec![field.clone()],
                            ));
                        }
                    }
                    _ => {}
                }
            }
        }
        errors
    }

    fn validate_required(&self, record: &Record, errors: &mut Vec<ApiError>) {
        let Some(schema) = self.schemas.get(record.entity_type()) else {
            return;
        };

        let missing: Vec<String> = schema
            .required_fields()
            .iter()
            .filter(|field| match record.get(field) {
                None => true,
                Some(FieldValue::String(s)) => s.trim().is_empty(),
                Some(_) => false,
            })
            .cloned()
            .collect();

        if !missing.is_empty() {
            errors.push(ApiError::new(
                REQUIRED_FIELD_MISSING,
                format!("Required fields are missing: [{}]", missing.join(", ")),
                missing,
            ));
        }
    }
}

#[async_trait]
impl CommitExecutor for InMemoryDataStore {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    async fn commit(&self, unit: UnitOfWork) -> Result<CommitResult> {
        let span = info_span!("store.commit", unit = %unit.id(), operations = unit.len());
        self.apply(unit).instrument(span).await
    }
}

#[async_trait]
impl RecordReader for InMemoryDataStore {
    async fn find_by_id(&self, entity_type: &str, id: &RecordId) -> Result<Option<StoredRecord>> {
        let state = self.state.read().await;
        let found = state
            .records
            .get(id)
            .filter(|record| record.entity_type == entity_type)
            .cloned();

        event!(Level::DEBUG, %id, entity_type, found = found.is_some(), "record lookup");
        Ok(found)
    }
}

impl InMemoryDataStore {
    async fn apply(&self, unit: UnitOfWork) -> Result<CommitResult> {
        let mut state = self.state.write().await;

        let errors = self.validate(&unit);
        if !errors.is_empty() {
            event!(Level::WARN, errors = errors.len(), "unit of work rejected");
            return Err(DataApiError::BatchRejected {
                message: BATCH_ERROR_MESSAGE.to_string(),
                errors,
            });
        }

        // Mint ids front to back; validation guarantees every reference
        // points at an id minted earlier in this loop.
        let mut minted: Vec<RecordId> = Vec::with_capacity(unit.len());
        let mut staged: Vec<StoredRecord> = Vec::with_capacity(unit.len());
        for operation in unit.operations() {
            let record = operation.record();
            let id = RecordId::new(format!(
                "{}{:015}",
                self.key_prefix(record.entity_type()),
                state.next_sequence
            ));
            state.next_sequence += 1;

            let fields = record
                .fields()
                .iter()
                .map(|(name, value)| {
                    let value = match value.as_reference().and_then(|r| unit.position_of(r)) {
                        Some(target) => FieldValue::String(minted[target].to_string()),
                        None => value.clone(),
                    };
                    (name.clone(), value)
                })
                .collect();

            minted.push(id.clone());
            staged.push(StoredRecord {
                id,
                entity_type: record.entity_type().to_string(),
                fields,
            });
        }

        let mut results = HashMap::with_capacity(staged.len());
        for (operation, record) in unit.operations().iter().zip(staged) {
            results.insert(
                operation.reference_id().clone(),
                RecordModificationResult::new(record.id.clone()),
            );
            state.records.insert(record.id.clone(), record);
        }

        event!(Level::DEBUG, created = results.len(), "unit of work applied");
        Ok(CommitResult::new(unit.id(), results))
    }
}
