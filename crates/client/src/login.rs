//! Authentication service request/response shapes.
//!
//! The service issues and signs credentials; this side only validates the
//! form input and takes the returned token.

use serde::{Deserialize, Serialize};

use shopdesk_core::DomainError;

use crate::error::ClientError;

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Both fields are required and the email must look like one.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, ClientError> {
        let email = email.into().trim().to_string();
        let password = password.into();

        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("a valid email is required").into());
        }
        if password.is_empty() {
            return Err(DomainError::validation("password is required").into());
        }

        Ok(Self { email, password })
    }
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}

impl LoginResponse {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
        }
    }

    pub fn token(&self) -> Result<&str, ClientError> {
        self.access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ClientError::MissingToken)
    }
}
