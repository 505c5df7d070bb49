use super::UnitOfWorkState;
use crate::core::{
    DataApiError, RecordId, RecordModificationResult, ReferenceId, Result, UnitOfWorkId,
};
use std::collections::HashMap;

/// Outcome of a successful commit: one result per registered operation
#[derive(Debug, Clone)]
pub struct CommitResult {
    unit_id: UnitOfWorkId,
    results: HashMap<ReferenceId, RecordModificationResult>,
}

impl CommitResult {
    pub fn new(unit_id: UnitOfWorkId, results: HashMap<ReferenceId, RecordModificationResult>) -> Self {
        Self { unit_id, results }
    }

    pub fn unit_id(&self) -> UnitOfWorkId {
        self.unit_id
    }

    /// Always `Committed`: a failed commit yields an error instead
    pub fn state(&self) -> UnitOfWorkState {
        UnitOfWorkState::Committed
    }

    pub fn get(&self, reference_id: &ReferenceId) -> Option<&RecordModificationResult> {
        self.results.get(reference_id)
    }

    /// Durable id of the record registered under `reference_id`
    ///
    /// # Errors
    /// `UnresolvedReference` if the handle is not part of this result.
    pub fn resolve(&self, reference_id: &ReferenceId) -> Result<&RecordId> {
        self.results
            .get(reference_id)
            .map(RecordModificationResult::id)
            .ok_or_else(|| {
                DataApiError::UnresolvedReference(format!(
                    "{:?} has no result in {}",
                    reference_id, self.unit_id
                ))
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ReferenceId, &RecordModificationResult)> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Check that every expected handle, and nothing else, has a result
    pub(crate) fn verify_complete<'a>(
        &self,
        expected: impl IntoIterator<Item = &'a ReferenceId>,
    ) -> Result<()> {
        let mut matched = 0;
        for reference_id in expected {
            if !self.results.contains_key(reference_id) {
                return Err(DataApiError::UnresolvedReference(format!(
                    "commit returned no result for {:?}",
                    reference_id
                )));
            }
            matched += 1;
        }

        if matched != self.results.len() {
            return Err(DataApiError::UnresolvedReference(format!(
                "commit returned {} results for {} operations",
                self.results.len(),
                matched
            )));
        }
        Ok(())
    }
}

/// Free-function form of [`CommitResult::resolve`]
pub fn resolve<'a>(result: &'a CommitResult, reference_id: &ReferenceId) -> Result<&'a RecordId> {
    result.resolve(reference_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_present_and_absent() {
        let unit = UnitOfWorkId::new();
        let a = ReferenceId::new(unit, 0);
        let b = ReferenceId::new(unit, 1);

        let mut results = HashMap::new();
        results.insert(a.clone(), RecordModificationResult::new("id-A"));
        let result = CommitResult::new(unit, results);

        assert_eq!(resolve(&result, &a).unwrap().as_str(), "id-A");
        assert!(matches!(
            result.resolve(&b),
            Err(DataApiError::UnresolvedReference(_))
        ));
    }

    #[test]
    fn test_verify_complete() {
        let unit = UnitOfWorkId::new();
        let a = ReferenceId::new(unit, 0);
        let b = ReferenceId::new(unit, 1);

        let mut results = HashMap::new();
        results.insert(a.clone(), RecordModificationResult::new("id-A"));
        let result = CommitResult::new(unit, results);

        assert!(result.verify_complete([&a]).is_ok());
        assert!(result.verify_complete([&a, &b]).is_err());
        assert!(result.verify_complete([]).is_err());
    }
}
