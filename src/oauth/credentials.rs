use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::OAuthError;

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Client id and secret issued by the provider for an installed or web application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

pub fn load_client_secret(path: &Path) -> Result<ClientSecret, OAuthError> {
    let content = fs::read_to_string(path).map_err(|e| OAuthError::CredentialsUnreadable {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_client_secret(&content)
}

pub fn parse_client_secret(content: &str) -> Result<ClientSecret, OAuthError> {
    let file: ClientSecretFile =
        serde_json::from_str(content).map_err(|e| OAuthError::CredentialsInvalid(e.to_string()))?;
    file.installed
        .or(file.web)
        .ok_or_else(|| OAuthError::CredentialsInvalid("missing \"installed\" or \"web\" section".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_installed_app_secret() {
        let secret = parse_client_secret(
            r#"{"installed":{"client_id":"id.apps","project_id":"p","auth_uri":"https://accounts.example/auth","token_uri":"https://accounts.example/token","client_secret":"shh","redirect_uris":["http://localhost"]}}"#,
        )
        .unwrap();
        assert_eq!(secret.client_id, "id.apps");
        assert_eq!(secret.client_secret, "shh");
        assert_eq!(secret.token_uri, "https://accounts.example/token");
    }

    #[test]
    fn web_secret_gets_default_endpoints() {
        let secret = parse_client_secret(r#"{"web":{"client_id":"a","client_secret":"b"}}"#).unwrap();
        assert_eq!(secret.auth_uri, DEFAULT_AUTH_URI);
        assert_eq!(secret.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn rejects_files_without_a_client() {
        assert!(matches!(parse_client_secret("{}"), Err(OAuthError::CredentialsInvalid(_))));
        assert!(matches!(parse_client_secret("nope"), Err(OAuthError::CredentialsInvalid(_))));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let err = load_client_secret(&path).unwrap_err();
        assert!(err.to_string().contains("credentials.json"));
    }
}
