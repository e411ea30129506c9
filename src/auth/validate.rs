use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Minimum password length. Deliberately weak placeholder until the real
/// backend policy is wired in.
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Standard email address shape: local part, `@`, domain with a dot.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Per-field validation failures, with the messages shown inline in the form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Please specify an email.")]
    EmptyEmail,

    #[error("Please specify a valid email")]
    InvalidEmail,

    #[error("Please specify a password.")]
    EmptyPassword,

    #[error("Password must be at least {len} characters.", len = MIN_PASSWORD_LENGTH)]
    PasswordTooShort,
}

/// Outcome of validating both fields. Fields fail independently so the form
/// can show one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub email: Option<FieldError>,
    pub password: Option<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

pub fn validate_email(email: &str) -> Option<FieldError> {
    if email.is_empty() {
        Some(FieldError::EmptyEmail)
    } else if !EMAIL_RE.is_match(email) {
        Some(FieldError::InvalidEmail)
    } else {
        None
    }
}

pub fn validate_password(password: &str) -> Option<FieldError> {
    if password.is_empty() {
        Some(FieldError::EmptyPassword)
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(FieldError::PasswordTooShort)
    } else {
        None
    }
}

/// Deterministic and side-effect-free; the form re-runs this on every edit.
pub fn validate(credentials: &Credentials) -> ValidationReport {
    ValidationReport {
        email: validate_email(&credentials.email),
        password: validate_password(&credentials.password),
    }
}
