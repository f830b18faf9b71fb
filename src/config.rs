use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;

use crate::error::AppError;

pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";
pub const HOME_ENV: &str = "PERSONALCLI_HOME";
pub const TIMEZONE_ENV: &str = "PERSONALCLI_TIMEZONE";
pub const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const WEATHER_BASE_URL_ENV: &str = "OPENWEATHER_BASE_URL";
pub const CALENDAR_BASE_URL_ENV: &str = "CALENDAR_BASE_URL";
pub const REDIRECT_PORT_ENV: &str = "OAUTH_REDIRECT_PORT";

pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_REDIRECT_PORT: u16 = 8080;

/// Values from an optional `KEY=VALUE` file, shadowed by the environment.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(format!("Invalid config line {}: {}", idx + 1, line));
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    /// Loads the file named by `CONFIG_FILE`, or an empty config when unset.
    pub fn from_env() -> Result<Self, AppError> {
        match env::var(CONFIG_FILE_ENV) {
            Ok(path) => Self::from_file(&path)
                .map_err(|e| AppError::input(format!("unable to load config file {}: {}", path, e))),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    pub fn lookup(&self, key: &str) -> Option<String> {
        env::var(key)
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.get(key))
    }
}

/// Locations of every file the CLI reads or writes.
#[derive(Debug, Clone)]
pub struct Paths {
    config_dir: PathBuf,
}

impl Paths {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.config_dir.join("tasks.json")
    }

    pub fn notes_file(&self) -> PathBuf {
        self.config_dir.join("notes.json")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.json")
    }

    pub fn token_file(&self) -> PathBuf {
        self.config_dir.join("token.json")
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub paths: Paths,
    pub weather_api_key: Option<String>,
    pub weather_base_url: String,
    pub calendar_base_url: String,
    pub redirect_port: u16,
    pub timezone: Option<Tz>,
}

impl Settings {
    /// Settings for a given config directory with every other value defaulted.
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            paths: Paths::new(config_dir),
            weather_api_key: None,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
            calendar_base_url: DEFAULT_CALENDAR_BASE_URL.to_string(),
            redirect_port: DEFAULT_REDIRECT_PORT,
            timezone: None,
        }
    }

    pub fn resolve(config: &AppConfig) -> Result<Self, AppError> {
        let config_dir = match config.lookup(HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| AppError::input("could not find home directory"))?
                .join(".config")
                .join("personalcli"),
        };

        let mut settings = Self::with_config_dir(config_dir);
        settings.weather_api_key = config.lookup(WEATHER_API_KEY_ENV);
        if let Some(url) = config.lookup(WEATHER_BASE_URL_ENV) {
            settings.weather_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(url) = config.lookup(CALENDAR_BASE_URL_ENV) {
            settings.calendar_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(port) = config.lookup(REDIRECT_PORT_ENV) {
            settings.redirect_port = port
                .parse()
                .map_err(|_| AppError::input(format!("invalid {}: {}", REDIRECT_PORT_ENV, port)))?;
        }
        if let Some(name) = config.lookup(TIMEZONE_ENV) {
            settings.timezone = Some(
                name.parse::<Tz>()
                    .map_err(|_| AppError::input(format!("invalid timezone: {}", name)))?,
            );
        }
        tracing::debug!(config_dir = %settings.paths.config_dir().display(), "resolved settings");
        Ok(settings)
    }
}
