//! Field checks applied before anything is written.
//!
//! Every function here is pure: the same input always yields the same
//! verdict. Lengths are counted in characters, not bytes.

use chrono::NaiveDate;
use thiserror::Error;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 100;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const CLIENT_NAME_MAX_LEN: usize = 100;

/// Calendar date format accepted for proceeding and tentative dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A user-correctable input problem with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

pub fn validate_username(username: &str) -> Result<&str, ValidationError> {
    let len = username.chars().count();
    if len < USERNAME_MIN_LEN {
        return Err(ValidationError::new(format!(
            "Username must be at least {USERNAME_MIN_LEN} characters"
        )));
    }
    if len > USERNAME_MAX_LEN {
        return Err(ValidationError::new(format!(
            "Username must be {USERNAME_MAX_LEN} characters or less"
        )));
    }
    Ok(username)
}

pub fn validate_password(password: &str) -> Result<&str, ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::new(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(password)
}

/// Only the upper bound is enforced; an empty client name is accepted.
pub fn validate_client_name(name: &str) -> Result<&str, ValidationError> {
    if name.chars().count() > CLIENT_NAME_MAX_LEN {
        return Err(ValidationError::new("Client name too long"));
    }
    Ok(name)
}

/// Parses a required `YYYY-MM-DD` date. `field` names the input in the error.
pub fn validate_date(input: &str, field: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::new(format!(
            "Invalid {field} date format. Please use YYYY-MM-DD"
        ))
    })
}

/// Absent or blank input means "no date"; anything else must parse.
pub fn validate_optional_date(
    input: Option<&str>,
    field: &str,
) -> Result<Option<NaiveDate>, ValidationError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => validate_date(value, field).map(Some),
    }
}
