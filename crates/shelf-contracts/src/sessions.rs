//! Login form schema

use serde::Deserialize;
use shelf_core::error::ValidationErrors;
use validator::Validate;

use crate::base::schema_errors;

/// Login form as posted: `email`, `password`, optional `redirectTo`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub redirect_to: Option<String>,
}

/// Credentials ready for the sign-in provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    /// Lower-cased
    pub email: String,
    pub password: String,
    pub redirect_to: Option<String>,
}

impl LoginForm {
    pub fn parse(self) -> Result<LoginCredentials, ValidationErrors> {
        let form = Self {
            email: self.email.trim().to_lowercase(),
            ..self
        };
        form.validate().map_err(|e| schema_errors(&e))?;

        Ok(LoginCredentials {
            email: form.email,
            password: form.password,
            redirect_to: form.redirect_to,
        })
    }
}
