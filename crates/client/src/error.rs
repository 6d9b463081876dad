use thiserror::Error;

use shopdesk_auth::{AuthzError, SessionError};
use shopdesk_core::DomainError;

#[derive(Debug, Error)]
pub enum ClientError {
    /// A resource payload did not have the expected record shape.
    #[error("unexpected payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Admin placed an order without choosing whose it is.
    #[error("select the client this order is for")]
    OwnerRequired,

    /// Logged-in client whose credential carries no id.
    #[error("client not identified; log in again")]
    UnidentifiedClient,

    #[error("login response did not contain an access token")]
    MissingToken,
}
