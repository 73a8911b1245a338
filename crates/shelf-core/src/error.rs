//! Error types shared by every layer

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("Not permitted: {message}")]
    Forbidden { message: String },

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Postgres: {0}")]
    Database(String),

    #[error("File storage: {0}")]
    Storage(String),

    #[error("{service} failed: {message}")]
    ExternalService { service: String, message: String },

    #[error("Upload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("{0}")]
    Internal(String),
}

impl ShelfError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ShelfError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ShelfError::Forbidden {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ShelfError::NotFound { .. } => 404,
            ShelfError::Unauthorized { .. } => 401,
            ShelfError::Forbidden { .. } => 403,
            ShelfError::Validation(_) => 400,
            ShelfError::PayloadTooLarge { .. } => 413,
            ShelfError::Storage(_) | ShelfError::ExternalService { .. } => 502,
            ShelfError::Database(_) | ShelfError::Internal(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ShelfError::NotFound { .. } => "not_found",
            ShelfError::Unauthorized { .. } => "unauthorized",
            ShelfError::Forbidden { .. } => "forbidden",
            ShelfError::Validation(_) => "validation_failed",
            ShelfError::Database(_) => "database_error",
            ShelfError::Storage(_) => "storage_error",
            ShelfError::ExternalService { .. } => "external_service_error",
            ShelfError::PayloadTooLarge { .. } => "payload_too_large",
            ShelfError::Internal(_) => "internal_error",
        }
    }
}

/// Form errors keyed by field name, as rendered next to each input
#[derive(Error, Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[error("{}", messages(.base_errors, .errors).join(", "))]
pub struct ValidationErrors {
    #[serde(flatten)]
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors shown above the form
    #[serde(rename = "base", skip_serializing_if = "Vec::is_empty")]
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// One message on one field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    /// Base errors first, then `field: message` in field order
    pub fn full_messages(&self) -> Vec<String> {
        messages(&self.base_errors, &self.errors)
    }
}

fn messages(base: &[String], fields: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    let per_field = fields
        .iter()
        .flat_map(|(field, messages)| messages.iter().map(move |m| format!("{}: {}", field, m)));
    base.iter().cloned().chain(per_field).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_messages_lead_with_base_errors() {
        let mut errors = ValidationErrors::single("username", "Must be at least 4 characters long");
        errors.add("email", "Please enter a valid email.");
        errors.add_base("Something went wrong");

        assert!(errors.has_error("email"));
        assert_eq!(
            errors.full_messages(),
            vec![
                "Something went wrong".to_string(),
                "email: Please enter a valid email.".to_string(),
                "username: Must be at least 4 characters long".to_string(),
            ]
        );
        assert_eq!(
            ShelfError::Validation(errors).to_string(),
            "Invalid input: Something went wrong, email: Please enter a valid email., username: Must be at least 4 characters long"
        );
    }

    #[test]
    fn test_validation_errors_serialize_flat() {
        let errors = ValidationErrors::single("email", "Please enter a valid email.");
        let json = serde_json::to_value(&errors).unwrap();

        assert_eq!(json["email"][0], "Please enter a valid email.");
        assert!(json.get("base").is_none());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ShelfError::not_found("Location", "loc_1").status_code(), 404);
        assert_eq!(ShelfError::Validation(ValidationErrors::new()).status_code(), 400);
        assert_eq!(ShelfError::Storage("boom".into()).status_code(), 502);
    }
}
