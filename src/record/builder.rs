use super::Record;
use crate::core::{DataApiError, FieldValue, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref API_NAME: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
}

fn validate_api_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DataApiError::InvalidDraft(format!("{} name must not be empty", kind)));
    }
    if !API_NAME.is_match(name) {
        return Err(DataApiError::InvalidDraft(format!(
            "{} name '{}' is not a valid API name",
            kind, name
        )));
    }
    Ok(())
}

/// Accumulating builder for a [`Record`]
///
/// Every `with_field` consumes the builder and hands back the next state, so
/// a half-built draft can never reach a unit of work.
///
/// # Examples
///
/// ```
/// use unitofwork::record::RecordBuilder;
///
/// # fn main() -> unitofwork::Result<()> {
/// let contact = RecordBuilder::new("Contact")
///     .with_field("FirstName", "Jane")?
///     .with_field("LastName", "Doe")?
///     .build()?;
///
/// assert_eq!(contact.string_field("LastName"), Some("Doe"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    entity_type: String,
    fields: Vec<(String, FieldValue)>,
}

impl RecordBuilder {
    pub fn new(entity_type: &str) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            fields: Vec::new(),
        }
    }

    /// Set a field
    ///
    /// # Errors
    /// `InvalidDraft` if the name is empty or malformed, the field is already
    /// set, or the value is not well-formed.
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Result<Self> {
        validate_api_name("Field", name)?;

        if self.fields.iter().any(|(field, _)| field == name) {
            return Err(DataApiError::InvalidDraft(format!(
                "Field '{}' is already set on '{}'",
                name, self.entity_type
            )));
        }

        let value = value.into();
        if !value.is_well_formed() {
            return Err(DataApiError::InvalidDraft(format!(
                "Field '{}' has a malformed {} value: {}",
                name,
                value.type_name(),
                value
            )));
        }

        self.fields.push((name.to_string(), value));
        Ok(self)
    }

    /// Set a field only when a value is present
    pub fn with_optional_field<V: Into<FieldValue>>(self, name: &str, value: Option<V>) -> Result<Self> {
        match value {
            Some(value) => self.with_field(name, value),
            None => Ok(self),
        }
    }

    /// Freeze the draft
    pub fn build(self) -> Result<Record> {
        validate_api_name("Entity type", &self.entity_type)?;
        Ok(Record::from_parts(self.entity_type, self.fields))
    }
}
