#![allow(deprecated)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin;
use predicates::prelude::*;
use tempfile::TempDir;

fn personalcli(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("personalcli"));
    cmd.env("PERSONALCLI_HOME", home.path())
        .env("PERSONALCLI_TIMEZONE", "UTC")
        .env_remove("WEATHER_API_KEY")
        .env_remove("CONFIG_FILE");
    cmd
}

#[test]
fn todo_lifecycle() {
    let home = TempDir::new().unwrap();

    personalcli(&home)
        .args(["todo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You have no tasks!"));

    personalcli(&home)
        .args(["todo", "add", "buy", "milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task: \"buy milk\""));
    personalcli(&home)
        .args(["todo", "add", "call mom"])
        .assert()
        .success();

    personalcli(&home)
        .args(["todo", "done", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked task 1 as completed."));

    personalcli(&home)
        .args(["todo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[✔] 1: buy milk"))
        .stdout(predicate::str::contains("[ ] 2: call mom"));

    personalcli(&home)
        .args(["todo", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All tasks cleared."));
    personalcli(&home)
        .args(["todo", "add", "x"])
        .assert()
        .success();
    personalcli(&home)
        .args(["todo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] 1: x"));
}

#[test]
fn todo_done_errors_exit_non_zero() {
    let home = TempDir::new().unwrap();

    personalcli(&home)
        .args(["todo", "done", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid task ID"));

    personalcli(&home)
        .args(["todo", "done", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task ID not found."));
}

#[test]
fn note_new_list_and_find() {
    let home = TempDir::new().unwrap();

    personalcli(&home)
        .args(["note", "new", "Buy", "Milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created note 1."));
    personalcli(&home)
        .args(["note", "new", "renew passport"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created note 2."));

    personalcli(&home)
        .args(["note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ID: 1 | Date:"))
        .stdout(predicate::str::contains("renew passport"));

    personalcli(&home)
        .args(["note", "find", "MILK"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy Milk"))
        .stdout(predicate::str::contains("passport").not());

    personalcli(&home)
        .args(["note", "find", "dentist"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching notes found."));
}

#[test]
fn weather_without_key_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    personalcli(&home)
        .args(["weather", "-z", "78701"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key not provided"));
}

#[test]
fn weather_without_location_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    personalcli(&home)
        .args(["weather", "--api-key", "k"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please provide a zip code (-z) or a location (-l)."));
}

#[test]
fn calendar_without_credentials_fails() {
    let home = TempDir::new().unwrap();
    personalcli(&home)
        .args(["calendar", "events"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to read client secret file"));
}

#[test]
fn auth_progress_stays_off_stdout() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("credentials.json"),
        r#"{"installed":{"client_id":"id","client_secret":"secret"}}"#,
    )
    .unwrap();
    // Holding the redirect port makes the web flow stop right after it announces itself.
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    personalcli(&home)
        .env("OAUTH_REDIRECT_PORT", port.to_string())
        .args(["calendar", "events"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No token found, starting web authentication flow..."))
        .stderr(predicate::str::contains("could not start callback listener"));
}
