use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A whole collection, kept in insertion order and rewritten on every save.
pub type DB<T> = Vec<T>;

#[derive(Debug, Error)]
pub enum DBError {
    #[error("unable to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unable to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("no identifiers left: the largest id in use is {0}")]
    IdsExhausted(u32),
}

// A missing file is an empty store, every other read failure is an error.
pub fn load_db<T: DeserializeOwned>(path: &Path) -> Result<DB<T>, DBError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(DBError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&content).map_err(|source| DBError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn save_db<T: Serialize>(path: &Path, db: &[T]) -> Result<(), DBError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| DBError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let body = serde_json::to_string_pretty(db).map_err(|source| DBError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), records = db.len(), "writing store");
    fs::write(path, body).map_err(|source| DBError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Next identifier for a store: one past the largest in use, or 1 when empty.
pub fn next_id<T>(db: &[T], id_of: impl Fn(&T) -> u32) -> Result<u32, DBError> {
    match db.iter().map(id_of).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(DBError::IdsExhausted(max)),
    }
}
