use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::UserId;
use crate::text::{too_long, trim_in_place, MAX_EMAIL, MAX_SHORT_TEXT};

/// Public view of a registered user. The password hash never leaves storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub email: String,
    #[serde(rename = "phonenumber")]
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

/// A user together with the stored password hash, as loaded for login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: String,
}

/// Sign-up payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Registration {
    #[serde(rename = "firstname")]
    pub first_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "phonenumber")]
    pub phone_number: String,
}

impl Registration {
    /// Trim names and contact details and normalise the email. Passwords are
    /// taken verbatim.
    pub fn prepare(&mut self) {
        trim_in_place(&mut self.first_name);
        trim_in_place(&mut self.last_name);
        trim_in_place(&mut self.phone_number);
        self.email = normalise_email(&self.email);
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.first_name.is_empty() {
            return Err(UserValidationError::MissingFirstName);
        }
        if self.last_name.is_empty() {
            return Err(UserValidationError::MissingLastName);
        }
        if self.email.is_empty() {
            return Err(UserValidationError::MissingEmail);
        }
        if self.password.is_empty() {
            return Err(UserValidationError::MissingPassword);
        }
        if self.phone_number.is_empty() {
            return Err(UserValidationError::MissingPhoneNumber);
        }
        if too_long(&self.first_name, MAX_SHORT_TEXT)
            || too_long(&self.last_name, MAX_SHORT_TEXT)
            || too_long(&self.phone_number, MAX_SHORT_TEXT)
        {
            return Err(UserValidationError::DetailsTooLong);
        }
        if too_long(&self.email, MAX_EMAIL) {
            return Err(UserValidationError::EmailTooLong);
        }
        if !is_valid_email(&self.email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(())
    }

    pub fn with_password_hash(self, password_hash: String) -> NewUser {
        NewUser {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone_number: self.phone_number,
            password_hash,
        }
    }
}

/// Login payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn prepare(&mut self) {
        self.email = normalise_email(&self.email);
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.email.is_empty() {
            return Err(UserValidationError::MissingEmail);
        }
        if self.password.is_empty() {
            return Err(UserValidationError::MissingPassword);
        }
        Ok(())
    }
}

/// A validated registration with its password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("FirstName is required")]
    MissingFirstName,
    #[error("LastName is required")]
    MissingLastName,
    #[error("Email is required")]
    MissingEmail,
    #[error("Password is required")]
    MissingPassword,
    #[error("Phone Number is required")]
    MissingPhoneNumber,
    #[error("Invalid Email")]
    InvalidEmail,
    #[error("Names and Phone Number must be at most 100 characters")]
    DetailsTooLong,
    #[error("Email must be at most 255 characters")]
    EmailTooLong,
}

fn normalise_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Structural check only: one `@`, a non-empty local part and a dotted domain.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}
