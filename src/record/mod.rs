// ============================================================================
// Record Drafts
// ============================================================================
//
// A Record describes one entity to be created: an entity type name plus a
// set of uniquely named field values. Records are immutable; they are
// assembled field by field through RecordBuilder and frozen by build().
//
// ============================================================================

pub mod builder;

pub use builder::RecordBuilder;

use crate::core::{FieldValue, ReferenceId};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Immutable draft of one record to be created
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    entity_type: String,
    /// Fields in assignment order, names unique
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Start a draft for the given entity type
    pub fn builder(entity_type: &str) -> RecordBuilder {
        RecordBuilder::new(entity_type)
    }

    pub(crate) fn from_parts(entity_type: String, fields: Vec<(String, FieldValue)>) -> Self {
        Self {
            entity_type,
            fields,
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Fields whose value is a reference to another record of the batch
    pub fn references(&self) -> impl Iterator<Item = (&str, &ReferenceId)> {
        self.fields
            .iter()
            .filter_map(|(field, value)| value.as_reference().map(|r| (field.as_str(), r)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("attributes", &serde_json::json!({ "type": self.entity_type }))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accessors() {
        let record = Record::builder("Account")
            .with_field("Name", "Acme")
            .unwrap()
            .with_field("NumberOfEmployees", 12)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(record.entity_type(), "Account");
        assert_eq!(record.len(), 2);
        assert_eq!(record.string_field("Name"), Some("Acme"));
        assert_eq!(record.get("NumberOfEmployees"), Some(&FieldValue::Integer(12)));
        assert!(record.get("Missing").is_none());
        assert_eq!(record.references().count(), 0);
    }

    #[test]
    fn test_record_serializes_with_attributes() {
        let record = Record::builder("Contact")
            .with_field("LastName", "Doe")
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["attributes"]["type"], "Contact");
        assert_eq!(json["LastName"], "Doe");
    }
}
