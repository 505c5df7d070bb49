// ============================================================================
// Unit of Work Builder
// ============================================================================

use super::{Operation, UnitOfWork, UnitOfWorkState};
use crate::core::{DataApiError, ReferenceId, Result, UnitOfWorkId};
use crate::record::Record;

/// Accumulates create operations and mints their reference handles
///
/// A builder is single-use and meant for one caller: it is not synchronized,
/// and after a successful [`build`](Self::build) it refuses any further
/// registration.
///
/// # Examples
///
/// ```
/// use unitofwork::record::Record;
/// use unitofwork::transaction::UnitOfWorkBuilder;
///
/// # fn main() -> unitofwork::Result<()> {
/// let mut uow = UnitOfWorkBuilder::new();
///
/// let account = Record::builder("Account").with_field("Name", "Acme")?.build()?;
/// let account_ref = uow.register_create(account)?;
///
/// let contact = Record::builder("Contact")
///     .with_field("LastName", "Doe")?
///     .with_field("AccountId", &account_ref)?
///     .build()?;
/// uow.register_create(contact)?;
///
/// let unit = uow.build()?;
/// assert_eq!(unit.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UnitOfWorkBuilder {
    id: UnitOfWorkId,
    state: UnitOfWorkState,
    operations: Vec<Operation>,
}

impl Default for UnitOfWorkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitOfWorkBuilder {
    pub fn new() -> Self {
        Self {
            id: UnitOfWorkId::new(),
            state: UnitOfWorkState::Open,
            operations: Vec::new(),
        }
    }

    pub fn id(&self) -> UnitOfWorkId {
        self.id
    }

    pub fn state(&self) -> UnitOfWorkState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Register a record to be created and get the handle standing in for
    /// its future id
    ///
    /// References inside `record` are not checked here; see [`build`](Self::build).
    ///
    /// # Errors
    /// `IllegalState` once the builder has been built.
    pub fn register_create(&mut self, record: Record) -> Result<ReferenceId> {
        if !self.state.is_open() {
            return Err(DataApiError::IllegalState {
                operation: "register create".to_string(),
                state: self.state.to_string(),
            });
        }

        let reference_id = ReferenceId::new(self.id, self.operations.len());
        self.operations
            .push(Operation::create(reference_id.clone(), record));
        Ok(reference_id)
    }

    /// Freeze the registered operations into a [`UnitOfWork`]
    ///
    /// Every reference used as a field value must have been minted by this
    /// builder for an operation registered before the one using it.
    ///
    /// # Errors
    /// - `AlreadyBuilt` on a second call
    /// - `DanglingReference` naming the first offending field; the builder
    ///   stays open in that case
    pub fn build(&mut self) -> Result<UnitOfWork> {
        if self.state == UnitOfWorkState::Built {
            return Err(DataApiError::AlreadyBuilt(self.id));
        }

        self.validate_references()?;

        self.state = self.state.transition_to(UnitOfWorkState::Built, "build")?;
        let operations = std::mem::take(&mut self.operations);
        Ok(UnitOfWork::new(self.id, operations))
    }

    fn validate_references(&self) -> Result<()> {
        for (position, operation) in self.operations.iter().enumerate() {
            for (field, reference) in operation.record().references() {
                let registered_before =
                    reference.unit_id() == self.id && reference.sequence() < position;

                if !registered_before {
                    return Err(DataApiError::DanglingReference {
                        entity_type: operation.record().entity_type().to_string(),
                        field: field.to_string(),
                        reference: format!("{:?}", reference),
                    });
                }
            }
        }
        Ok(())
    }
}
