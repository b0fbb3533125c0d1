use thiserror::Error;

use crate::store::StoreError;

/// Reasons a registration or authentication attempt can fail.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("malformed authorization header")]
    MalformedCredentials,
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),
    #[error("unknown user")]
    UnknownUser,
    #[error("invalid password")]
    BadPassword,
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    ExpiredToken,
    #[error("credential processing failed: {0}")]
    Crypto(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
