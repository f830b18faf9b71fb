use thiserror::Error;

use crate::oauth::OAuthError;
use crate::store::DBError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed arguments. Nothing has been persisted.
    #[error("{0}")]
    Input(String),
    #[error("{0}")]
    NotFound(String),
    /// A remote call failed, returned a non-success status, or had no match.
    #[error("{context}: {message}")]
    Service { context: String, message: String },
    #[error(transparent)]
    Store(#[from] DBError),
    #[error(transparent)]
    Auth(#[from] OAuthError),
}

impl AppError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn service(context: impl Into<String>, message: impl ToString) -> Self {
        Self::Service {
            context: context.into(),
            message: message.to_string(),
        }
    }
}
