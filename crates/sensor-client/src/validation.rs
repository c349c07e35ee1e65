//! Client-side form validation
//!
//! Checks run before any request is sent. They only cover presence, length
//! and the `@` in an email address; the server remains the authority.

use crate::models::{NewSensor, SensorUpdate};

pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_MISSING_AT: &str = "Email must include @.";
pub const USERNAME_REQUIRED: &str = "Username is required.";
pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters.";
pub const USERNAME_TOO_LONG: &str = "Username cannot exceed 50 characters.";
pub const PASSWORD_REQUIRED: &str = "Password is required.";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters.";
pub const NAME_REQUIRED: &str = "Name is required.";
pub const NAME_TOO_LONG: &str = "Name cannot exceed 100 characters.";
pub const MODEL_REQUIRED: &str = "Model is required.";
pub const MODEL_TOO_LONG: &str = "Model cannot exceed 100 characters.";

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 6;
const SENSOR_FIELD_MAX: usize = 100;

/// Which credential form is being validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Login,
    Register,
}

/// Raw credential inputs. Missing fields count as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialFields {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialFields {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            username: None,
            password: Some(password.into()),
        }
    }

    pub fn register(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: Some(email.into()),
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Validate credentials, returning messages in field order. Empty means valid.
pub fn validate(fields: &CredentialFields, mode: FormMode) -> Vec<String> {
    let email = fields.email.as_deref().unwrap_or_default();
    let username = fields.username.as_deref().unwrap_or_default();
    let password = fields.password.as_deref().unwrap_or_default();
    let mut errors = Vec::new();

    if is_blank(email) {
        errors.push(EMAIL_REQUIRED.to_string());
    } else if !email.contains('@') {
        errors.push(EMAIL_MISSING_AT.to_string());
    }

    if mode == FormMode::Register {
        if is_blank(username) {
            errors.push(USERNAME_REQUIRED.to_string());
        } else if char_len(username) < USERNAME_MIN {
            errors.push(USERNAME_TOO_SHORT.to_string());
        } else if char_len(username) > USERNAME_MAX {
            errors.push(USERNAME_TOO_LONG.to_string());
        }
    }

    match mode {
        FormMode::Register => {
            if is_blank(password) {
                errors.push(PASSWORD_REQUIRED.to_string());
            } else if char_len(password) < PASSWORD_MIN {
                errors.push(PASSWORD_TOO_SHORT.to_string());
            }
        }
        FormMode::Login => {
            if is_blank(password) {
                errors.push(PASSWORD_REQUIRED.to_string());
            }
        }
    }

    errors
}

fn check_sensor_field(value: &str, required: &str, too_long: &str, errors: &mut Vec<String>) {
    if is_blank(value) {
        errors.push(required.to_string());
    } else if char_len(value) > SENSOR_FIELD_MAX {
        errors.push(too_long.to_string());
    }
}

/// Validate a sensor before creation, mirroring the server's field limits
pub fn validate_new_sensor(sensor: &NewSensor) -> Vec<String> {
    let mut errors = Vec::new();
    check_sensor_field(&sensor.name, NAME_REQUIRED, NAME_TOO_LONG, &mut errors);
    check_sensor_field(&sensor.model, MODEL_REQUIRED, MODEL_TOO_LONG, &mut errors);
    errors
}

/// Validate the fields an update changes, with the same limits as creation
pub fn validate_sensor_update(update: &SensorUpdate) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(name) = &update.name {
        check_sensor_field(name, NAME_REQUIRED, NAME_TOO_LONG, &mut errors);
    }
    if let Some(model) = &update.model {
        check_sensor_field(model, MODEL_REQUIRED, MODEL_TOO_LONG, &mut errors);
    }
    errors
}
