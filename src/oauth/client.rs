use async_trait::async_trait;
use chrono::Utc;

use super::token::{Token, TokenResponse};
use super::{CALENDAR_READONLY_SCOPE, ClientSecret, OAuthError};

#[async_trait]
pub trait TokenExchanger: Send + Sync {
    async fn exchange_code(&self, code: &str) -> Result<Token, OAuthError>;
}

pub struct OAuthClient {
    http: reqwest::Client,
    secret: ClientSecret,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(secret: ClientSecret, redirect_uri: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret,
            redirect_uri,
        }
    }

    /// Consent page URL asking for offline access to the read-only calendar scope.
    pub fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
        let url = reqwest::Url::parse_with_params(
            &self.secret.auth_uri,
            &[
                ("access_type", "offline"),
                ("client_id", self.secret.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", CALENDAR_READONLY_SCOPE),
                ("state", state),
            ],
        )
        .map_err(|e| OAuthError::InvalidUrl(e.to_string()))?;
        Ok(url.to_string())
    }

    pub async fn refresh(&self, token: &Token) -> Result<Token, OAuthError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| OAuthError::Refresh("token has no refresh token".to_string()))?;
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
        ];
        let mut refreshed = self
            .request_token(&form)
            .await
            .map_err(OAuthError::Refresh)?;
        // Providers usually omit the refresh token on this grant.
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = token.refresh_token.clone();
        }
        Ok(refreshed)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<Token, String> {
        let response = self
            .http
            .post(&self.secret.token_uri)
            .form(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        let text = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            return Err(format!("token endpoint returned {}: {}", status, text));
        }
        let parsed: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| format!("failed to decode token response: {}", e))?;
        Ok(parsed.into_token(Utc::now()))
    }
}

#[async_trait]
impl TokenExchanger for OAuthClient {
    async fn exchange_code(&self, code: &str) -> Result<Token, OAuthError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.secret.client_id.as_str()),
            ("client_secret", self.secret.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        self.request_token(&form).await.map_err(OAuthError::Exchange)
    }
}
