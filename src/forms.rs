use std::borrow::Cow;

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// Ordered list of field-level validation messages
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(Vec<(&'static str, String)>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First message recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// One message per failing field, in form order.
    ///
    /// A blank field only reports that it is required, and a malformed
    /// email wins over its length.
    fn from_validation(errors: &ValidationErrors, fields: &[&'static str]) -> Self {
        let by_field = errors.field_errors();
        let mut form_errors = Self::new();

        for &field in fields {
            let Some(field_errors) = by_field.get(field) else {
                continue;
            };
            let first = field_errors.iter().min_by_key(|error| match &*error.code {
                "required" => 0,
                "email" => 1,
                _ => 2,
            });
            if let Some(error) = first {
                let message = error.message.as_ref().unwrap_or(&error.code);
                form_errors.add(field, message.to_string());
            }
        }

        form_errors
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required")
            .with_message(Cow::Borrowed("This field is required.")));
    }
    Ok(())
}

// Usernames end up in URL paths and redirect headers
fn username_chars(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Ok(());
    }
    Err(ValidationError::new("username_chars")
        .with_message(Cow::Borrowed("Only letters, digits, '.', '_' and '-' are allowed.")))
}

/// Account registration form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
    #[validate(length(min = 4, max = 20, message = "Field must be between 4 and 20 characters long."))]
    #[validate(custom(function = "not_blank"), custom(function = "username_chars"))]
    pub username: String,

    #[validate(custom(function = "not_blank"))]
    pub password: String,

    #[validate(email(message = "Invalid email address."))]
    #[validate(length(max = 50, message = "Field cannot be longer than 50 characters."))]
    #[validate(custom(function = "not_blank"))]
    pub email: String,

    #[validate(length(max = 30, message = "Field cannot be longer than 30 characters."))]
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,

    #[validate(length(max = 30, message = "Field cannot be longer than 30 characters."))]
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
}

/// Registration input that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl RegisterForm {
    const FIELDS: &'static [&'static str] =
        &["username", "password", "email", "first_name", "last_name"];

    /// Trim the submitted values and check them.
    ///
    /// Passwords are taken verbatim, everything else is trimmed.
    pub fn clean(&self) -> Result<NewUser, FormErrors> {
        let form = Self {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            email: self.email.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        };
        form.validate()
            .map_err(|errors| FormErrors::from_validation(&errors, Self::FIELDS))?;

        Ok(NewUser {
            username: form.username,
            password: form.password,
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
        })
    }
}

/// Login form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(length(min = 4, max = 20, message = "Field must be between 4 and 20 characters long."))]
    #[validate(custom(function = "not_blank"))]
    pub username: String,

    #[validate(custom(function = "not_blank"))]
    pub password: String,
}

/// Validated login credentials
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    const FIELDS: &'static [&'static str] = &["username", "password"];

    pub fn clean(&self) -> Result<Credentials, FormErrors> {
        let form = Self {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        };
        form.validate()
            .map_err(|errors| FormErrors::from_validation(&errors, Self::FIELDS))?;

        Ok(Credentials {
            username: form.username,
            password: form.password,
        })
    }
}

/// Feedback add/edit form as submitted
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct FeedbackForm {
    #[validate(length(max = 100, message = "Field cannot be longer than 100 characters."))]
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    #[validate(custom(function = "not_blank"))]
    pub content: String,
}

/// Validated feedback title and body
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackInput {
    pub title: String,
    pub content: String,
}

impl FeedbackForm {
    const FIELDS: &'static [&'static str] = &["title", "content"];

    pub fn clean(&self) -> Result<FeedbackInput, FormErrors> {
        let form = Self {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
        };
        form.validate()
            .map_err(|errors| FormErrors::from_validation(&errors, Self::FIELDS))?;

        Ok(FeedbackInput {
            title: form.title,
            content: form.content,
        })
    }
}
