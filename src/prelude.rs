//! Everything a function body usually needs, in one import.

pub use crate::{
    CommitExecutor, CommitResult, Context, DataApi, DataApiError, FieldValue, InvocationEvent,
    Record, RecordBuilder, RecordId, RecordReader, ReferenceId, Result, StoredRecord, UnitOfWork,
    UnitOfWorkBuilder,
};
