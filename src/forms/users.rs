use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{Email, TypeConstraintError, USERNAME_MAX_LENGTH, Username};
use crate::domain::user::{UpdateUser, User};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: u64 = 8;

const NAME_MAX_LENGTH: u64 = 150;
const USERNAME_MAX: u64 = USERNAME_MAX_LENGTH as u64;

#[derive(Debug, Error)]
pub enum UserFormError {
    #[error("Form validation failed: {0}")]
    Validation(String),
    #[error("Form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("The two password fields didn't match.")]
    PasswordMismatch,
}

impl From<ValidationErrors> for UserFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for UserFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

#[derive(Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, max = USERNAME_MAX))]
    pub username: String,
    #[validate(length(min = PASSWORD_MIN_LENGTH))]
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationFormPayload {
    pub username: Username,
    pub password: String,
}

impl TryFrom<RegistrationForm> for RegistrationFormPayload {
    type Error = UserFormError;

    fn try_from(value: RegistrationForm) -> Result<Self, Self::Error> {
        value.validate()?;
        if value.password1 != value.password2 {
            return Err(UserFormError::PasswordMismatch);
        }
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password1,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Page to return to after logging in.
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginFormPayload {
    pub username: Username,
    pub password: String,
    pub next: Option<String>,
}

impl TryFrom<LoginForm> for LoginFormPayload {
    type Error = UserFormError;

    fn try_from(value: LoginForm) -> Result<Self, Self::Error> {
        value.validate()?;
        // Only local paths are followed after login.
        let next = value
            .next
            .filter(|next| next.starts_with('/') && !next.starts_with("//"));
        Ok(Self {
            username: Username::new(value.username)?,
            password: value.password,
            next,
        })
    }
}

/// Profile edit form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct UserForm {
    #[serde(default)]
    #[validate(length(max = NAME_MAX_LENGTH))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = NAME_MAX_LENGTH))]
    pub last_name: String,
    #[validate(length(min = 1, max = USERNAME_MAX))]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

impl From<&User> for UserForm {
    fn from(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.to_string(),
            email: user.email.to_string(),
        }
    }
}

impl TryFrom<UserForm> for UpdateUser {
    type Error = UserFormError;

    fn try_from(value: UserForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            username: Username::new(value.username)?,
            first_name: value.first_name.trim().to_string(),
            last_name: value.last_name.trim().to_string(),
            email: Email::new(value.email)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_requires_matching_passwords() {
        let form = RegistrationForm {
            username: "jane".to_string(),
            password1: "correct horse".to_string(),
            password2: "battery staple".to_string(),
        };
        let payload: Result<RegistrationFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(UserFormError::PasswordMismatch)));
    }

    #[test]
    fn registration_rejects_short_password() {
        let form = RegistrationForm {
            username: "jane".to_string(),
            password1: "short".to_string(),
            password2: "short".to_string(),
        };
        let payload: Result<RegistrationFormPayload, _> = form.try_into();
        assert!(payload.is_err());
    }

    #[test]
    fn registration_rejects_bad_username() {
        let form = RegistrationForm {
            username: "jane doe".to_string(),
            password1: "correct horse".to_string(),
            password2: "correct horse".to_string(),
        };
        let payload: Result<RegistrationFormPayload, _> = form.try_into();
        assert!(matches!(payload, Err(UserFormError::TypeConstraint(_))));
    }

    #[test]
    fn login_drops_external_next() {
        let form = LoginForm {
            username: "jane".to_string(),
            password: "secret".to_string(),
            next: Some("//evil.example/".to_string()),
        };
        let payload: LoginFormPayload = form.try_into().unwrap();
        assert_eq!(payload.next, None);
    }

    #[test]
    fn profile_form_normalizes_email() {
        let form = UserForm {
            first_name: " Jane ".to_string(),
            last_name: String::new(),
            username: "jane".to_string(),
            email: "Jane@Example.com".to_string(),
        };
        let update: UpdateUser = form.try_into().unwrap();
        assert_eq!(update.first_name, "Jane");
        assert_eq!(update.email.as_str(), "jane@example.com");
    }

    #[test]
    fn profile_form_allows_empty_email() {
        let form = UserForm {
            username: "jane".to_string(),
            ..Default::default()
        };
        let update: UpdateUser = form.try_into().unwrap();
        assert!(update.email.is_empty());
    }
}
