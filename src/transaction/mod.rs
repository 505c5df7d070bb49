// ============================================================================
// Unit of Work Module
// ============================================================================
//
// Client-side construction of an atomic batch of create operations.
//
// Records registered in a unit of work may point at each other through
// ReferenceIds before any of them exists. Registration order doubles as
// dependency order: a record may only reference records registered before
// it, so the store can create everything front to back and substitute
// placeholders as it goes.
//
// Lifecycle (State Pattern):
//   Open --build--> Built --commit--> Committed | Failed
//
// ============================================================================

pub mod builder;
pub mod result;
pub mod state;
pub mod unit;

pub use builder::UnitOfWorkBuilder;
pub use result::{CommitResult, resolve};
pub use state::UnitOfWorkState;
pub use unit::{Operation, OperationKind, UnitOfWork};
