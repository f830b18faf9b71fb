use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{DB, DBError, next_id};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

pub fn create_note(db: &mut DB<Note>, content: &str, now: DateTime<Utc>) -> Result<Note, DBError> {
    let note = Note {
        id: next_id(db, |note| note.id)?,
        content: content.to_string(),
        created_at: now,
    };
    db.push(note.clone());
    Ok(note)
}

/// Notes whose content contains `keyword`, ignoring case.
pub fn find_notes<'a>(db: &'a [Note], keyword: &str) -> Vec<&'a Note> {
    let keyword = keyword.to_lowercase();
    db.iter()
        .filter(|note| note.content.to_lowercase().contains(&keyword))
        .collect()
}
