//! Settings form and update contract for users

use serde::Deserialize;
use shelf_core::error::ValidationErrors;
use shelf_core::traits::{Id, UserContext};
use validator::Validate;

use crate::base::{schema_errors, Contract, ValidationResult};

/// Settings form as posted: `id`, `email`, `username`, `firstName`, `lastName`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Required"))]
    pub id: String,

    #[serde(default)]
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 4, message = "Must be at least 4 characters long"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(max = 255, message = "Must be at most 255 characters long"))]
    pub first_name: Option<String>,

    #[serde(default)]
    #[validate(length(max = 255, message = "Must be at most 255 characters long"))]
    pub last_name: Option<String>,
}

/// Validated settings payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserPayload {
    pub id: Id,
    /// Lower-cased
    pub email: String,
    pub username: String,
    /// `None` when the field was not posted, `Some(None)` when posted blank
    pub first_name: Option<Option<String>>,
    pub last_name: Option<Option<String>>,
}

impl UpdateUserForm {
    /// Run the schema and normalize the input
    pub fn parse(self) -> Result<UpdateUserPayload, ValidationErrors> {
        let form = self.trimmed();
        form.validate().map_err(|e| schema_errors(&e))?;

        Ok(UpdateUserPayload {
            id: form.id,
            email: form.email.to_lowercase(),
            username: form.username,
            first_name: form.first_name.map(blank_to_none),
            last_name: form.last_name.map(blank_to_none),
        })
    }

    fn trimmed(self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            email: self.email.trim().to_string(),
            username: self.username.trim().to_string(),
            first_name: self.first_name.map(|v| v.trim().to_string()),
            last_name: self.last_name.map(|v| v.trim().to_string()),
        }
    }
}

fn blank_to_none(value: String) -> Option<String> {
    Some(value).filter(|v| !v.is_empty())
}

/// Contract for updating a user's own settings
pub struct UpdateUserContract<'a, U: UserContext> {
    user: &'a U,
}

impl<'a, U: UserContext> UpdateUserContract<'a, U> {
    pub fn new(user: &'a U) -> Self {
        Self { user }
    }

    fn validate_user_allowed_to_edit(&self, target_id: &str, errors: &mut ValidationErrors) {
        if !self.user.is_self(target_id) {
            errors.add_base("You can only edit your own account");
        }
    }
}

impl<'a, U: UserContext> Contract<UpdateUserPayload> for UpdateUserContract<'a, U> {
    fn validate(&self, entity: &UpdateUserPayload) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_user_allowed_to_edit(&entity.id, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockUserContext {
        id: String,
    }

    impl UserContext for MockUserContext {
        fn user_id(&self) -> &str {
            &self.id
        }
        fn email(&self) -> &str {
            "jane@example.com"
        }
    }

    fn form() -> UpdateUserForm {
        UpdateUserForm {
            id: "u_1".into(),
            email: "Jane@Example.COM".into(),
            username: "janedoe".into(),
            first_name: Some(" Jane ".into()),
            last_name: Some("".into()),
        }
    }

    #[test]
    fn test_valid_form_is_normalized() {
        let payload = form().parse().unwrap();

        assert_eq!(payload.email, "jane@example.com");
        assert_eq!(payload.first_name, Some(Some("Jane".to_string())));
        assert_eq!(payload.last_name, Some(None));
    }

    #[test]
    fn test_unposted_name_is_left_alone() {
        let payload = UpdateUserForm {
            first_name: None,
            ..form()
        }
        .parse()
        .unwrap();

        assert_eq!(payload.first_name, None);
    }

    #[test]
    fn test_invalid_email() {
        let errors = UpdateUserForm {
            email: "not-an-email".into(),
            ..form()
        }
        .parse()
        .unwrap_err();

        assert_eq!(
            errors.get("email").unwrap(),
            &vec!["Please enter a valid email.".to_string()]
        );
        assert!(!errors.has_error("username"));
    }

    #[test]
    fn test_short_username() {
        let errors = UpdateUserForm {
            username: "abc".into(),
            ..form()
        }
        .parse()
        .unwrap_err();

        assert_eq!(
            errors.get("username").unwrap(),
            &vec!["Must be at least 4 characters long".to_string()]
        );
    }

    #[test]
    fn test_long_name_reports_form_key() {
        let errors = UpdateUserForm {
            first_name: Some("x".repeat(300)),
            ..form()
        }
        .parse()
        .unwrap_err();

        assert!(errors.has_error("firstName"));
    }

    #[test]
    fn test_missing_id() {
        let errors = UpdateUserForm {
            id: "  ".into(),
            ..form()
        }
        .parse()
        .unwrap_err();

        assert!(errors.has_error("id"));
    }

    #[test]
    fn test_contract_rejects_other_user() {
        let user = MockUserContext { id: "u_2".into() };
        let contract = UpdateUserContract::new(&user);
        let payload = form().parse().unwrap();

        let errors = contract.validate(&payload).unwrap_err();
        assert_eq!(errors.base_errors.len(), 1);
    }

    #[test]
    fn test_contract_allows_self() {
        let user = MockUserContext { id: "u_1".into() };
        let contract = UpdateUserContract::new(&user);
        let payload = form().parse().unwrap();

        assert!(contract.validate(&payload).is_ok());
    }
}
