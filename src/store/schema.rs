use crate::core::{DataApiError, Result};
use lazy_static::lazy_static;
use std::collections::HashMap;

pub const KEY_PREFIX_LEN: usize = 3;

/// Field rules the in-memory store enforces for one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    name: String,
    key_prefix: String,
    required: Vec<String>,
    max_lengths: HashMap<String, usize>,
}

impl ObjectSchema {
    /// Schema for `name` whose ids start with `key_prefix`
    ///
    /// Ids are the prefix followed by a 15 digit sequence, so the prefix must
    /// be exactly three ASCII letters or digits.
    ///
    /// # Errors
    /// `Configuration` for any other prefix.
    pub fn new(name: &str, key_prefix: &str) -> Result<Self> {
        let well_formed = key_prefix.len() == KEY_PREFIX_LEN
            && key_prefix.chars().all(|c| c.is_ascii_alphanumeric());
        if !well_formed {
            return Err(DataApiError::Configuration(format!(
                "key prefix '{}' of '{}' must be {} ASCII letters or digits",
                key_prefix, name, KEY_PREFIX_LEN
            )));
        }
        Ok(Self::standard(name, key_prefix))
    }

    fn standard(name: &str, key_prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            key_prefix: key_prefix.to_string(),
            required: Vec::new(),
            max_lengths: HashMap::new(),
        }
    }

    pub fn required(mut self, field: &str) -> Self {
        self.required.push(field.to_string());
        self
    }

    pub fn max_length(mut self, field: &str, max: usize) -> Self {
        self.max_lengths.insert(field.to_string(), max);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn required_fields(&self) -> &[String] {
        &self.required
    }

    pub fn max_length_of(&self, field: &str) -> Option<usize> {
        self.max_lengths.get(field).copied()
    }
}

lazy_static! {
    static ref STANDARD_OBJECTS: Vec<ObjectSchema> = vec![
        ObjectSchema::standard("Account", "001")
            .required("Name")
            .max_length("Name", 255)
            .max_length("AccountNumber", 40)
            .max_length("Industry", 255)
            .max_length("Type", 255),
        ObjectSchema::standard("Contact", "003")
            .required("LastName")
            .max_length("FirstName", 40)
            .max_length("LastName", 80),
        ObjectSchema::standard("Case", "500")
            .max_length("Subject", 255)
            .max_length("Origin", 255)
            .max_length("Status", 255),
        ObjectSchema::standard("Task", "00T")
            .max_length("Subject", 255)
            .max_length("Priority", 40),
        ObjectSchema::standard("Opportunity", "006")
            .required("Name")
            .max_length("Name", 120),
        ObjectSchema::standard("Lead", "00Q")
            .required("LastName")
            .max_length("LastName", 80),
    ];
}

/// Schemas of the common standard objects
pub fn standard_objects() -> Vec<ObjectSchema> {
    STANDARD_OBJECTS.clone()
}

/// Prefix for entity types without a registered schema
pub(crate) fn derived_key_prefix(entity_type: &str) -> String {
    let initial = entity_type
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase())
        .unwrap_or('a');
    format!("{}0X", initial)
}
