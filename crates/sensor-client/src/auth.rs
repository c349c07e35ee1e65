//! Login and registration forms

use crate::api::ApiClient;
use crate::error::messages;
use crate::models::{LoginRequest, RegisterRequest};
use crate::session::Session;
use crate::validation::{validate, CredentialFields, FormMode};
use crate::view::Outcome;

/// State of a login or registration form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthForm {
    mode: FormMode,
    pub fields: CredentialFields,
    /// Validation messages, or the single rejection message
    pub errors: Vec<String>,
    pub submitting: bool,
}

impl AuthForm {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            fields: CredentialFields::default(),
            errors: Vec::new(),
            submitting: false,
        }
    }

    pub fn login() -> Self {
        Self::new(FormMode::Login)
    }

    pub fn register() -> Self {
        Self::new(FormMode::Register)
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Take the result of a submission made from a copy of this form,
    /// keeping whatever was typed in the meantime
    pub fn settle(&mut self, submitted: &AuthForm) {
        self.errors = submitted.errors.clone();
        self.submitting = submitted.submitting;
    }

    /// Validate and submit. On success the token is stored in `session`.
    pub async fn submit(&mut self, api: &ApiClient, session: &Session) -> Outcome {
        let errors = validate(&self.fields, self.mode);
        if !errors.is_empty() {
            self.errors = errors.clone();
            self.submitting = false;
            return Outcome::Rejected(errors);
        }

        self.errors.clear();
        self.submitting = true;
        let email = self.fields.email.clone().unwrap_or_default();
        let password = self.fields.password.clone().unwrap_or_default();
        let response = match self.mode {
            FormMode::Login => api.login(&LoginRequest { email, password }).await,
            FormMode::Register => {
                let username = self.fields.username.clone().unwrap_or_default();
                api.register(&RegisterRequest {
                    email,
                    username,
                    password,
                })
                .await
            }
        };
        self.submitting = false;

        let stored = response.and_then(|auth| session.login(auth.token));
        match stored {
            Ok(()) => {
                tracing::debug!("{:?} succeeded", self.mode);
                Outcome::Applied
            }
            Err(e) => {
                tracing::warn!("{:?} failed: {}", self.mode, e);
                self.errors = vec![messages::INVALID_CREDENTIALS.to_string()];
                Outcome::Failed
            }
        }
    }
}
