use super::types::{ApiError, UnitOfWorkId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataApiError {
    #[error("Invalid record draft: {0}")]
    InvalidDraft(String),

    #[error("Field '{field}' of '{entity_type}' references {reference}, which is not registered before it in this unit of work")]
    DanglingReference {
        entity_type: String,
        field: String,
        reference: String,
    },

    #[error("Unit of work {0} has already been built")]
    AlreadyBuilt(UnitOfWorkId),

    #[error("Cannot {operation}: unit of work is {state}")]
    IllegalState { operation: String, state: String },

    #[error("{message}")]
    BatchRejected {
        message: String,
        errors: Vec<ApiError>,
    },

    #[error("Unresolved reference: {0}")]
    UnresolvedReference(String),

    #[error("{0}")]
    InvalidPayload(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, DataApiError>;

impl DataApiError {
    /// Errors detected on the caller's side before any remote I/O happens.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            Self::BatchRejected { .. } | Self::UnresolvedReference(_)
        )
    }

    /// Field-level sub-errors of a rejected batch, empty for any other error.
    pub fn api_errors(&self) -> &[ApiError] {
        match self {
            Self::BatchRejected { errors, .. } => errors,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for DataApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_rejected_keeps_sub_errors() {
        let err = DataApiError::BatchRejected {
            message: "One or more API errors occurred".into(),
            errors: vec![ApiError::new(
                "STRING_TOO_LONG",
                "Last Name: data value too large",
                vec!["LastName".into()],
            )],
        };

        assert_eq!(err.to_string(), "One or more API errors occurred");
        assert_eq!(err.api_errors().len(), 1);
        assert_eq!(err.api_errors()[0].error_code(), "STRING_TOO_LONG");
        assert!(!err.is_local());
    }

    #[test]
    fn test_local_errors() {
        assert!(DataApiError::InvalidDraft("x".into()).is_local());
        assert!(DataApiError::AlreadyBuilt(UnitOfWorkId(1)).is_local());
        assert!(DataApiError::InvalidDraft("x".into()).api_errors().is_empty());
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(DataApiError::from(err), DataApiError::Serialization(_)));
    }
}
