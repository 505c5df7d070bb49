use super::UnitOfWorkState;
use crate::core::{ReferenceId, UnitOfWorkId};
use crate::record::Record;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Create => write!(f, "CREATE"),
        }
    }
}

/// One registered operation
#[derive(Debug, Clone)]
pub struct Operation {
    reference_id: ReferenceId,
    kind: OperationKind,
    record: Record,
}

impl Operation {
    pub(crate) fn create(reference_id: ReferenceId, record: Record) -> Self {
        Self {
            reference_id,
            kind: OperationKind::Create,
            record,
        }
    }

    pub fn reference_id(&self) -> &ReferenceId {
        &self.reference_id
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn record(&self) -> &Record {
        &self.record
    }
}

/// Frozen, ordered batch of operations
///
/// Produced once by [`UnitOfWorkBuilder::build`] and consumed by exactly one
/// commit, which is why it is not `Clone`.
///
/// [`UnitOfWorkBuilder::build`]: super::UnitOfWorkBuilder::build
#[derive(Debug)]
pub struct UnitOfWork {
    id: UnitOfWorkId,
    operations: Arc<[Operation]>,
}

impl UnitOfWork {
    pub(crate) fn new(id: UnitOfWorkId, operations: Vec<Operation>) -> Self {
        Self {
            id,
            operations: operations.into(),
        }
    }

    pub fn id(&self) -> UnitOfWorkId {
        self.id
    }

    /// Always `Built`: a unit of work only exists between build and commit
    pub fn state(&self) -> UnitOfWorkState {
        UnitOfWorkState::Built
    }

    /// Operations in registration order
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn reference_ids(&self) -> impl Iterator<Item = &ReferenceId> {
        self.operations.iter().map(Operation::reference_id)
    }

    pub fn contains(&self, reference_id: &ReferenceId) -> bool {
        reference_id.unit_id() == self.id && reference_id.sequence() < self.operations.len()
    }

    /// Position of the operation that minted `reference_id`
    pub fn position_of(&self, reference_id: &ReferenceId) -> Option<usize> {
        self.contains(reference_id).then(|| reference_id.sequence())
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
