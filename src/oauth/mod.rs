//! OAuth2 authorization-code flow for the calendar integration.
//!
//! A token is read from `token.json` when present (and refreshed when it has
//! expired). Otherwise a one-shot listener is bound on the redirect port, the
//! user is sent to the provider's consent page, and the code delivered to the
//! listener is exchanged for a token that is then persisted.

pub mod callback_server;
pub mod client;
pub mod credentials;
pub mod flow;
pub mod token;

use std::path::PathBuf;

use thiserror::Error;

pub use callback_server::CallbackServer;
pub use client::{OAuthClient, TokenExchanger};
pub use credentials::{ClientSecret, load_client_secret};
pub use flow::{BrowserOpener, SystemBrowser, authorize_via_browser, authorized_token};
pub use token::{Token, load_token, save_token};

pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("unable to read client secret file at {path}: {message}")]
    CredentialsUnreadable { path: PathBuf, message: String },
    #[error("unable to parse client secret file to config: {0}")]
    CredentialsInvalid(String),
    #[error("state token mismatch")]
    StateMismatch,
    #[error("unable to retrieve token from web: {0}")]
    Exchange(String),
    #[error("unable to refresh token: {0}")]
    Refresh(String),
    #[error("could not start callback listener on {addr}: {source}")]
    Listener {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("authorization callback closed without a result")]
    CallbackClosed,
    #[error("unable to cache oauth token at {path}: {source}")]
    TokenWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid authorization url: {0}")]
    InvalidUrl(String),
}
