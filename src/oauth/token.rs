use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::OAuthError;
use crate::store::DBError;

// Tokens are treated as expired slightly early so a request never races the deadline.
const EXPIRY_SKEW_SECONDS: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl Token {
    /// Zero-valued expiries (year 1) written by other OAuth clients mean "never expires".
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) if expiry.year() > 1 => expiry - Duration::seconds(EXPIRY_SKEW_SECONDS) <= now,
            _ => false,
        }
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Token endpoint reply for both the code exchange and refresh grants.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    pub fn into_token(self, now: DateTime<Utc>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(default_token_type),
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| now + Duration::seconds(secs)),
        }
    }
}

pub fn load_token(path: &Path) -> Result<Token, DBError> {
    let content = fs::read_to_string(path).map_err(|source| DBError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DBError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrites the token file, readable and writable by the owner only.
pub fn save_token(path: &Path, token: &Token) -> Result<(), OAuthError> {
    let write_err = |source| OAuthError::TokenWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let body = serde_json::to_vec(token).map_err(|e| write_err(std::io::Error::other(e)))?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(write_err)?;
    // mode() only applies on creation; tighten files left by older runs too.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(write_err)?;
    }
    file.write_all(&body).map_err(write_err)?;
    tracing::debug!(path = %path.display(), "token saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn token(expiry: Option<DateTime<Utc>>) -> Token {
        Token {
            access_token: "ya29.a0".to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            expiry,
        }
    }

    #[test]
    fn expiry_respects_skew_and_zero_values() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
        assert!(!token(None).is_expired(now));
        assert!(!token(Some(now + Duration::minutes(30))).is_expired(now));
        assert!(token(Some(now + Duration::seconds(5))).is_expired(now));
        assert!(token(Some(now - Duration::hours(1))).is_expired(now));

        let zero: Token = serde_json::from_str(
            r#"{"access_token":"x","token_type":"Bearer","expiry":"0001-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(!zero.is_expired(now));
        assert!(!zero.can_refresh());
    }

    #[test]
    fn response_sets_expiry_from_lifetime() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"abc","expires_in":3599,"refresh_token":"r","scope":"s","token_type":"Bearer"}"#,
        )
        .unwrap();
        let token = response.into_token(now);
        assert_eq!(token.expiry, Some(now + Duration::seconds(3599)));
        assert_eq!(token.refresh_token.as_deref(), Some("r"));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let original = token(Some(Utc.with_ymd_and_hms(2026, 2, 10, 13, 0, 0).unwrap()));
        save_token(&path, &original).unwrap();
        assert_eq!(load_token(&path).unwrap(), original);
    }

    #[cfg(unix)]
    #[test]
    fn saved_token_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "stale").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        save_token(&path, &token(None)).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
