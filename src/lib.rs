// ============================================================================
// Unit of Work Library
// ============================================================================

pub mod config;
pub mod context;
pub mod core;
pub mod prelude;
pub mod recipes;
pub mod record;
pub mod store;
pub mod transaction;

// Re-export main types for convenience
pub use config::DataApiConfig;
pub use context::{Context, InvocationEvent, Org};
pub use crate::core::{
    ApiError, DataApiError, FieldValue, RecordId, RecordModificationResult, ReferenceId, Result,
    UnitOfWorkId,
};
pub use record::{Record, RecordBuilder};
pub use store::{CommitExecutor, InMemoryDataStore, ObjectSchema, RecordReader, StoredRecord};
pub use transaction::{CommitResult, UnitOfWork, UnitOfWorkBuilder, UnitOfWorkState, resolve};

use std::sync::Arc;
use tracing::{Instrument, Level, event, info_span};

// ============================================================================
// Data API facade
// ============================================================================

/// Handle to an org's data store
///
/// Builds records and units of work, commits them through a
/// [`CommitExecutor`] and reads created records back through an optional
/// [`RecordReader`]. Cheap to clone.
///
/// # Examples
///
/// ```
/// use unitofwork::DataApi;
///
/// # #[tokio::main]
/// # async fn main() -> unitofwork::Result<()> {
/// let data_api = DataApi::in_memory();
/// let mut uow = data_api.new_unit_of_work_builder();
///
/// let account = data_api.new_record_builder("Account").with_field("Name", "Acme")?.build()?;
/// let account_ref = uow.register_create(account)?;
///
/// let contact = data_api
///     .new_record_builder("Contact")
///     .with_field("LastName", "Doe")?
///     .with_field("AccountId", &account_ref)?
///     .build()?;
/// let contact_ref = uow.register_create(contact)?;
///
/// let result = data_api.commit_unit_of_work(uow.build()?).await?;
/// println!("account {} contact {}", result.resolve(&account_ref)?, result.resolve(&contact_ref)?);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DataApi {
    executor: Arc<dyn CommitExecutor>,
    reader: Option<Arc<dyn RecordReader>>,
    config: DataApiConfig,
}

impl DataApi {
    /// Write-only Data API; see [`with_reader`](Self::with_reader)
    pub fn new(executor: Arc<dyn CommitExecutor>, config: DataApiConfig) -> Self {
        Self {
            executor,
            reader: None,
            config,
        }
    }

    /// Data API that commits to and reads from the same store
    pub fn from_store<S>(store: Arc<S>, config: DataApiConfig) -> Self
    where
        S: CommitExecutor + RecordReader + 'static,
    {
        Self::new(store.clone(), config).with_reader(store)
    }

    /// Data API over a fresh in-memory store with default configuration
    pub fn in_memory() -> Self {
        let config = DataApiConfig::default();
        let store = InMemoryDataStore::new(config.clone());
        Self::from_store(Arc::new(store), config)
    }

    pub fn with_reader(mut self, reader: Arc<dyn RecordReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn config(&self) -> &DataApiConfig {
        &self.config
    }

    pub fn executor_name(&self) -> &'static str {
        self.executor.name()
    }

    pub fn new_record_builder(&self, entity_type: &str) -> RecordBuilder {
        RecordBuilder::new(entity_type)
    }

    pub fn new_unit_of_work_builder(&self) -> UnitOfWorkBuilder {
        UnitOfWorkBuilder::new()
    }

    /// Commit a unit of work
    ///
    /// Returns a result for every registered reference, or the executor's
    /// error untouched. A result map that misses any registered reference is
    /// refused with `UnresolvedReference`, so no identifier is ever handed
    /// out from an incomplete commit.
    pub async fn commit_unit_of_work(&self, unit: UnitOfWork) -> Result<CommitResult> {
        let span = info_span!(
            "data_api.commit",
            unit = %unit.id(),
            executor = self.executor.name(),
            operations = unit.len()
        );

        async move {
            let expected: Vec<ReferenceId> = unit.reference_ids().cloned().collect();
            let state = unit.state();

            let result = match self.executor.commit(unit).await {
                Ok(result) => result,
                Err(err) => {
                    let failed = state.transition_to(UnitOfWorkState::Failed, "commit")?;
                    event!(
                        Level::ERROR,
                        state = %failed,
                        error = %err,
                        sub_errors = err.api_errors().len(),
                        "unit of work commit failed"
                    );
                    return Err(err);
                }
            };

            if let Err(err) = result.verify_complete(&expected) {
                let failed = state.transition_to(UnitOfWorkState::Failed, "commit")?;
                event!(
                    Level::ERROR,
                    state = %failed,
                    error = %err,
                    "commit executor returned an incomplete result"
                );
                return Err(err);
            }

            let committed = state.transition_to(UnitOfWorkState::Committed, "commit")?;
            event!(
                Level::INFO,
                state = %committed,
                records = result.len(),
                "unit of work committed"
            );
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Create a single record
    pub async fn create(&self, record: Record) -> Result<RecordModificationResult> {
        let mut uow = self.new_unit_of_work_builder();
        let reference_id = uow.register_create(record)?;
        let result = self.commit_unit_of_work(uow.build()?).await?;

        result
            .get(&reference_id)
            .cloned()
            .ok_or_else(|| DataApiError::UnresolvedReference(format!("{:?}", reference_id)))
    }

    /// Read back a record of `entity_type` by id
    ///
    /// # Errors
    /// `Configuration` if this Data API has no [`RecordReader`].
    pub async fn find_by_id(&self, entity_type: &str, id: &RecordId) -> Result<Option<StoredRecord>> {
        let reader = self.reader.as_ref().ok_or_else(|| {
            DataApiError::Configuration("no record reader is configured for this Data API".into())
        })?;

        let span = info_span!("data_api.find_by_id", entity_type, %id);
        reader.find_by_id(entity_type, id).instrument(span).await
    }
}
