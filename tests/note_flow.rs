use chrono::{TimeZone, Utc};
use personalcli::config::Paths;
use personalcli::error::AppError;
use personalcli::models::note::Note;
use personalcli::service::note_service::NoteService;
use personalcli::store::{load_db, save_db};

fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[test]
fn new_joins_words_and_stamps_time() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::new(dir.path());
    let now = Utc.with_ymd_and_hms(2026, 3, 5, 15, 4, 0).unwrap();

    let note = NoteService::create(&paths, &words("pick up   dry cleaning"), now).unwrap();
    assert_eq!(note.id, 1);
    assert_eq!(note.content, "pick up dry cleaning");

    let stored: Vec<Note> = load_db(&paths.notes_file()).unwrap();
    assert_eq!(stored, vec![note]);
}

#[test]
fn find_matches_case_insensitive_substrings() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::new(dir.path());
    let now = Utc::now();
    NoteService::create(&paths, &words("Buy Milk"), now).unwrap();
    NoteService::create(&paths, &words("book flights"), now).unwrap();

    let found = NoteService::find(&paths, "milk").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].content, "Buy Milk");

    assert!(NoteService::find(&paths, "dentist").unwrap().is_empty());
}

#[test]
fn store_round_trip_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::new(dir.path());
    let notes = vec![
        Note {
            id: 2,
            content: "second".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 2, 8, 0, 0).unwrap(),
        },
        Note {
            id: 1,
            content: "first".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
        },
    ];
    save_db(&paths.notes_file(), &notes).unwrap();
    assert_eq!(NoteService::list(&paths).unwrap(), notes);

    let next = NoteService::create(&paths, &words("third"), Utc::now()).unwrap();
    assert_eq!(next.id, 3);
}

#[test]
fn empty_note_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let paths = Paths::new(dir.path());
    let err = NoteService::create(&paths, &[], Utc::now()).unwrap_err();
    assert!(matches!(err, AppError::Input(_)));
}
