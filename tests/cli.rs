use assert_cmd::Command;
use bookfy::model::{format_date, today};
use predicates::prelude::*;
use std::path::Path;

fn bookfy(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bookfy").unwrap();
    cmd.env("BOOKFY_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

/// Pulls the id out of "<Kind> created (<id>): ...".
fn created_id(stdout: &[u8]) -> i64 {
    let text = String::from_utf8_lossy(stdout);
    let start = text.find('(').expect("no id in output") + 1;
    let end = start + text[start..].find(')').expect("unterminated id");
    text[start..end].parse().expect("id is not a number")
}

fn add_book(home: &Path, title: &str) -> i64 {
    let out = bookfy(home)
        .args(["book", "add", "--title", title])
        .args(["--author", "Frank Herbert", "--genre", "Sci-fi"])
        .args(["--year", "1965", "--description", "Spice and sand"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book created"));
    created_id(&out.get_output().stdout)
}

fn add_user(home: &Path, name: &str) -> i64 {
    let out = bookfy(home)
        .args(["user", "add", "--name", name])
        .args(["--email", "ana@example.com", "--phone", "555-0101"])
        .args(["--cep", "01310-100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("User created"));
    created_id(&out.get_output().stdout)
}

fn add_loan(home: &Path, book: i64, user: i64) -> i64 {
    let out = bookfy(home)
        .args(["loan", "add"])
        .args(["--book", &book.to_string(), "--user", &user.to_string()])
        .args(["--loan-date", "2024-01-01", "--due", "2024-01-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune to Ana"));
    created_id(&out.get_output().stdout)
}

#[test]
fn lend_and_return_a_book() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path();

    let book = add_book(home, "Dune");
    bookfy(home)
        .args(["book", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"));

    let user = add_user(home, "Ana");
    bookfy(home)
        .args(["user", "show", &user.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("01310100"));

    let loan = add_loan(home, book, user);
    bookfy(home)
        .args(["loan", "return", &loan.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loan returned"));

    bookfy(home)
        .args(["loan", "show", &loan.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Devolvido"))
        .stdout(predicate::str::contains(format_date(today())));

    bookfy(home)
        .args(["loan", "list", "--status", "Emprestado"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No loans found."));

    bookfy(home)
        .args(["loan", "return", &loan.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("already returned"));

    assert!(home.join("bookfy_loans.json").exists());
}

#[test]
fn due_date_before_loan_date_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path();
    let book = add_book(home, "Dune");
    let user = add_user(home, "Ana");

    bookfy(home)
        .args(["loan", "add"])
        .args(["--book", &book.to_string(), "--user", &user.to_string()])
        .args(["--loan-date", "2024-01-10", "--due", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "dueDate: Due date cannot be before the loan date",
        ));

    assert!(!home.join("bookfy_loans.json").exists());
}

#[test]
fn missing_fields_are_listed_per_field() {
    let temp = tempfile::tempdir().unwrap();

    bookfy(temp.path())
        .args(["book", "add", "--title", "Dune"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("author: Author is required"))
        .stderr(predicate::str::contains("year: Year is required"));
}

#[test]
fn deleting_a_book_orphans_its_loans() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path();
    let book = add_book(home, "Dune");
    let user = add_user(home, "Ana");
    add_loan(home, book, user);

    bookfy(home)
        .args(["book", "delete", &book.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 loan still references this book"));

    bookfy(home)
        .args(["loan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Book not found"))
        .stdout(predicate::str::contains("Ana"));

    bookfy(home)
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 loan with a missing reference"));
}

#[test]
fn unknown_id_fails() {
    let temp = tempfile::tempdir().unwrap();

    bookfy(temp.path())
        .args(["book", "show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Book not found: 42"));
}

#[test]
fn loan_days_sets_default_due_date() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path();

    bookfy(home)
        .args(["config", "loan-days", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loan-days set to 7"));
    bookfy(home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("loan-days = 7"));

    let book = add_book(home, "Dune");
    let user = add_user(home, "Ana");
    bookfy(home)
        .args(["loan", "add"])
        .args(["--book", &book.to_string(), "--user", &user.to_string()])
        .args(["--loan-date", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("due 2024-03-08"));
}

#[test]
fn damaged_config_falls_back_to_defaults() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path();
    std::fs::write(home.join("config.json"), "{oops").unwrap();

    let book = add_book(home, "Dune");
    let user = add_user(home, "Ana");
    bookfy(home)
        .args(["loan", "add"])
        .args(["--book", &book.to_string(), "--user", &user.to_string()])
        .args(["--due", "2999-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("due 2999-01-01"))
        .stderr(predicate::str::contains("config unreadable, using defaults"));

    // Default loan-days is 14.
    bookfy(home)
        .args(["loan", "add"])
        .args(["--book", &book.to_string(), "--user", &user.to_string()])
        .args(["--loan-date", "2024-03-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("due 2024-03-15"));
}

#[test]
fn corrupt_collection_reads_empty_but_refuses_writes() {
    let temp = tempfile::tempdir().unwrap();
    let home = temp.path();
    let file = home.join("bookfy_books.json");
    std::fs::write(&file, "not json").unwrap();

    bookfy(home)
        .args(["book", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No books found."));

    bookfy(home)
        .args(["book", "add", "--title", "Dune"])
        .args(["--author", "Frank Herbert", "--genre", "Sci-fi"])
        .args(["--year", "1965", "--description", "Spice and sand"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unreadable"));

    assert_eq!(std::fs::read_to_string(&file).unwrap(), "not json");
}

#[test]
fn data_dir_flag_overrides_env() {
    let env_home = tempfile::tempdir().unwrap();
    let flag_home = tempfile::tempdir().unwrap();

    bookfy(env_home.path())
        .args(["--data-dir", flag_home.path().to_str().unwrap()])
        .args(["book", "add", "--title", "Dune"])
        .args(["--author", "Frank Herbert", "--genre", "Sci-fi"])
        .args(["--year", "1965", "--description", "Spice and sand"])
        .assert()
        .success();

    assert!(flag_home.path().join("bookfy_books.json").exists());
    assert!(!env_home.path().join("bookfy_books.json").exists());
}
