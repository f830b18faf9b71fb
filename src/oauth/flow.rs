use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tokio::net::TcpListener;
use uuid::Uuid;

use super::callback_server::CallbackServer;
use super::client::OAuthClient;
use super::credentials::{ClientSecret, load_client_secret};
use super::token::{Token, load_token, save_token};
use super::OAuthError;
use crate::config::Paths;

pub const REDIRECT_HOST: &str = "localhost";
const BIND_HOST: &str = "127.0.0.1";

pub trait BrowserOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), String>;
}

/// Hands the URL to the platform's default URL handler.
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), String> {
        webbrowser::open(url).map_err(|e| e.to_string())
    }
}

pub fn redirect_uri(port: u16) -> String {
    format!("http://{}:{}", REDIRECT_HOST, port)
}

/// A usable token for the calendar API: the saved one (refreshed when expired)
/// or a fresh one from the browser flow.
pub async fn authorized_token(
    paths: &Paths,
    redirect_port: u16,
    browser: &dyn BrowserOpener,
) -> Result<Token, OAuthError> {
    let secret = load_client_secret(&paths.credentials_file())?;
    let token_path = paths.token_file();

    let token = match load_token(&token_path) {
        Ok(token) => token,
        Err(err) => {
            tracing::debug!(error = %err, "no usable saved token");
            eprintln!("No token found, starting web authentication flow...");
            return authorize_via_browser(&secret, redirect_port, &token_path, browser).await;
        }
    };

    if !token.is_expired(Utc::now()) {
        return Ok(token);
    }
    if !token.can_refresh() {
        eprintln!("Saved token has expired, starting web authentication flow...");
        return authorize_via_browser(&secret, redirect_port, &token_path, browser).await;
    }

    tracing::info!("refreshing expired access token");
    let client = OAuthClient::new(secret, redirect_uri(redirect_port));
    let refreshed = client.refresh(&token).await?;
    save_token(&token_path, &refreshed)?;
    Ok(refreshed)
}

/// Runs one authorization-code exchange through a local redirect listener.
///
/// The listener is bound before the user is sent anywhere, and it is shut down
/// before this returns whichever way the exchange ends. The wait for the
/// redirect has no timeout.
pub async fn authorize_via_browser(
    secret: &ClientSecret,
    port: u16,
    token_path: &Path,
    browser: &dyn BrowserOpener,
) -> Result<Token, OAuthError> {
    let listener = TcpListener::bind((BIND_HOST, port))
        .await
        .map_err(|source| OAuthError::Listener {
            addr: format!("{}:{}", BIND_HOST, port),
            source,
        })?;
    let bound_port = listener
        .local_addr()
        .map_err(|source| OAuthError::Listener {
            addr: format!("{}:{}", BIND_HOST, port),
            source,
        })?
        .port();

    let client = Arc::new(OAuthClient::new(secret.clone(), redirect_uri(bound_port)));
    let state = Uuid::new_v4().simple().to_string();
    let auth_url = client.authorization_url(&state)?;

    let server = CallbackServer::start(listener, state, client)?;

    eprintln!("Your browser should open for authentication automatically.");
    eprintln!("If it doesn't, please visit this link: {}", auth_url);
    if let Err(err) = browser.open(&auth_url) {
        tracing::warn!(error = %err, "could not open browser, open the URL manually");
    }

    let token = server.wait().await?;
    eprintln!("Saving credential file to: {}", token_path.display());
    save_token(token_path, &token)?;
    Ok(token)
}
