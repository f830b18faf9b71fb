use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

use crate::config::Paths;
use crate::error::AppError;
use crate::models::note::{self, Note};
use crate::store::{DB, load_db, save_db};

pub const EMPTY_HINT: &str = "You have no notes! Add one with 'personalcli note new \"my note\"'";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct NoteService;

impl NoteService {
    pub fn create(paths: &Paths, words: &[String], now: DateTime<Utc>) -> Result<Note, AppError> {
        let content = words.join(" ").trim().to_string();
        if content.is_empty() {
            return Err(AppError::input("Note content cannot be empty."));
        }
        let path = paths.notes_file();
        let mut db: DB<Note> = load_db(&path)?;
        let note = note::create_note(&mut db, &content, now)?;
        save_db(&path, &db)?;
        tracing::debug!(id = note.id, "note created");
        Ok(note)
    }

    pub fn list(paths: &Paths) -> Result<Vec<Note>, AppError> {
        Ok(load_db(&paths.notes_file())?)
    }

    pub fn find(paths: &Paths, keyword: &str) -> Result<Vec<Note>, AppError> {
        let db: DB<Note> = load_db(&paths.notes_file())?;
        Ok(note::find_notes(&db, keyword).into_iter().cloned().collect())
    }
}

/// Creation time in `timezone`, or the machine's local zone when none is configured.
pub fn format_note_date(created_at: &DateTime<Utc>, timezone: Option<Tz>) -> String {
    match timezone {
        Some(tz) => created_at.with_timezone(&tz).format(DATE_FORMAT).to_string(),
        None => created_at.with_timezone(&Local).format(DATE_FORMAT).to_string(),
    }
}

fn render_note(note: &Note, timezone: Option<Tz>) -> String {
    format!(
        "ID: {} | Date: {}\n{}\n---",
        note.id,
        format_note_date(&note.created_at, timezone),
        note.content
    )
}

pub fn render_notes(notes: &[Note], timezone: Option<Tz>) -> String {
    if notes.is_empty() {
        return EMPTY_HINT.to_string();
    }
    let mut body = String::from("Your notes:");
    for note in notes {
        body.push('\n');
        body.push_str(&render_note(note, timezone));
    }
    body
}

pub fn render_matches(keyword: &str, notes: &[Note], timezone: Option<Tz>) -> String {
    let mut body = format!("Searching for notes with keyword: \"{}\"", keyword.to_lowercase());
    if notes.is_empty() {
        body.push_str("\nNo matching notes found.");
        return body;
    }
    for note in notes {
        body.push('\n');
        body.push_str(&render_note(note, timezone));
    }
    body
}
