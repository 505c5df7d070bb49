use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global unit-of-work ID counter
static NEXT_UNIT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of one unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitOfWorkId(pub u64);

impl UnitOfWorkId {
    /// Generate a new unique unit-of-work ID
    pub fn new() -> Self {
        UnitOfWorkId(NEXT_UNIT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw ID value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for UnitOfWorkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UnitOfWorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uow_{}", self.0)
    }
}

/// Placeholder for the identifier of a record registered in a unit of work
///
/// A `ReferenceId` is minted by [`UnitOfWorkBuilder::register_create`] and can
/// be used as a field value by records registered after it. It never turns
/// into a real identifier by itself: after a successful commit the durable
/// id is looked up in the [`CommitResult`].
///
/// Equality is identity: two handles are equal only if the same builder
/// minted them for the same registration.
///
/// [`UnitOfWorkBuilder::register_create`]: crate::transaction::UnitOfWorkBuilder::register_create
/// [`CommitResult`]: crate::transaction::CommitResult
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ReferenceId {
    unit: UnitOfWorkId,
    sequence: usize,
}

impl ReferenceId {
    pub(crate) fn new(unit: UnitOfWorkId, sequence: usize) -> Self {
        Self { unit, sequence }
    }

    /// Unit of work that minted this handle
    pub fn unit_id(&self) -> UnitOfWorkId {
        self.unit
    }

    /// Registration position inside the owning unit of work
    pub(crate) fn sequence(&self) -> usize {
        self.sequence
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "referenceId{}", self.sequence)
    }
}

impl fmt::Debug for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.referenceId{}", self.unit, self.sequence)
    }
}

/// Durable identifier assigned by the data store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Outcome of one successful create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordModificationResult {
    id: RecordId,
}

impl RecordModificationResult {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Field-level error reported by the data store when it rejects a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    error_code: String,
    message: String,
    fields: Vec<String>,
}

impl ApiError {
    pub fn new(error_code: &str, message: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            error_code: error_code.to_string(),
            message: message.into(),
            fields,
        }
    }

    pub fn error_code(&self) -> &str {
        &self.error_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_code, self.message)?;
        if !self.fields.is_empty() {
            write!(f, " [{}]", self.fields.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_generation() {
        let id1 = UnitOfWorkId::new();
        let id2 = UnitOfWorkId::new();
        assert!(id2.as_u64() > id1.as_u64());
    }

    #[test]
    fn test_reference_identity() {
        let unit = UnitOfWorkId::new();
        let other = UnitOfWorkId::new();

        assert_eq!(ReferenceId::new(unit, 0), ReferenceId::new(unit, 0));
        assert_ne!(ReferenceId::new(unit, 0), ReferenceId::new(unit, 1));
        // same position, different unit
        assert_ne!(ReferenceId::new(unit, 0), ReferenceId::new(other, 0));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new("STRING_TOO_LONG", "too long", vec!["LastName".into()]);
        assert_eq!(err.to_string(), "STRING_TOO_LONG: too long [LastName]");
    }

    #[test]
    fn test_record_id_serializes_as_string() {
        let id = RecordId::new("0019A00000J28zaQAB");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"0019A00000J28zaQAB\"");
    }
}
