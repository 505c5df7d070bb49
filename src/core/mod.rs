pub mod error;
pub mod types;
pub mod value;

pub use error::{DataApiError, Result};
pub use types::{ApiError, RecordId, RecordModificationResult, ReferenceId, UnitOfWorkId};
pub use value::FieldValue;
