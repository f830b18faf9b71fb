use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::client::TokenExchanger;
use super::token::Token;
use super::OAuthError;

pub const SUCCESS_MESSAGE: &str = "Authentication successful! You can close this tab.";

#[derive(Debug, Deserialize)]
struct CallbackParams {
    state: Option<String>,
    code: Option<String>,
    error: Option<String>,
}

type OutcomeSenders = (oneshot::Sender<Token>, oneshot::Sender<OAuthError>);

#[derive(Clone)]
struct CallbackState {
    expected_state: Arc<String>,
    exchanger: Arc<dyn TokenExchanger>,
    // Both senders leave together on the first callback, so only one outcome is ever sent.
    senders: Arc<Mutex<Option<OutcomeSenders>>>,
}

impl CallbackState {
    fn take_senders(&self) -> Option<OutcomeSenders> {
        match self.senders.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

/// Listener for exactly one authorization redirect.
pub struct CallbackServer {
    addr: SocketAddr,
    token_rx: oneshot::Receiver<Token>,
    error_rx: oneshot::Receiver<OAuthError>,
    shutdown_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl CallbackServer {
    pub fn start(
        listener: TcpListener,
        expected_state: String,
        exchanger: Arc<dyn TokenExchanger>,
    ) -> Result<Self, OAuthError> {
        let addr = listener.local_addr().map_err(|source| OAuthError::Listener {
            addr: "callback listener".to_string(),
            source,
        })?;
        let (token_tx, token_rx) = oneshot::channel();
        let (error_tx, error_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let state = CallbackState {
            expected_state: Arc::new(expected_state),
            exchanger,
            senders: Arc::new(Mutex::new(Some((token_tx, error_tx)))),
        };
        let app = Router::new()
            .route("/", get(handle_callback))
            .with_state(state);

        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(err) = served {
                tracing::error!(error = %err, "callback listener stopped");
            }
        });
        tracing::debug!(%addr, "callback listener started");

        Ok(Self {
            addr,
            token_rx,
            error_rx,
            shutdown_tx,
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Waits for the token or the error, whichever arrives first, then stops the
    /// listener and waits for it to release the port before returning.
    pub async fn wait(self) -> Result<Token, OAuthError> {
        let Self {
            addr,
            token_rx,
            error_rx,
            shutdown_tx,
            handle,
        } = self;

        let outcome = tokio::select! {
            Ok(token) = token_rx => Ok(token),
            Ok(err) = error_rx => Err(err),
            else => Err(OAuthError::CallbackClosed),
        };

        let _ = shutdown_tx.send(());
        if let Err(err) = handle.await {
            tracing::warn!(error = %err, "callback listener task did not finish cleanly");
        }
        tracing::debug!(%addr, "callback listener shut down");
        outcome
    }
}

async fn handle_callback(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, &'static str) {
    let Some((token_tx, error_tx)) = state.take_senders() else {
        return (StatusCode::GONE, "Authorization was already handled.");
    };

    if params.state.as_deref() != Some(state.expected_state.as_str()) {
        tracing::warn!("callback state did not match the issued state");
        let _ = error_tx.send(OAuthError::StateMismatch);
        return (StatusCode::BAD_REQUEST, "State token does not match");
    }

    let code = match params.code.filter(|c| !c.is_empty()) {
        Some(code) => code,
        None => {
            let reason = params
                .error
                .unwrap_or_else(|| "no authorization code in callback".to_string());
            let _ = error_tx.send(OAuthError::Exchange(reason));
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to exchange token");
        }
    };

    match state.exchanger.exchange_code(&code).await {
        Ok(token) => {
            let _ = token_tx.send(token);
            (StatusCode::OK, SUCCESS_MESSAGE)
        }
        Err(err) => {
            tracing::warn!(error = %err, "token exchange failed");
            let _ = error_tx.send(err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to exchange token")
        }
    }
}
