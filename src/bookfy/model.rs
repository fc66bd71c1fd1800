//! # Domain Types
//!
//! Books, users and loans as they are stored. Every record carries an integer
//! `id` assigned by the repository on creation; a freshly built record has
//! `id == 0` until it is persisted.
//!
//! Loans keep `book_id` / `user_id` as plain ids. Nothing enforces that the
//! referenced records still exist; see [`crate::lookup`] for how that is
//! handled at display time.
//!
//! ## Loan status on disk
//!
//! In memory a loan status is a [`LoanStatus`], where the returned date only
//! exists on the `Returned` variant. On disk the record stays flat, with the
//! Portuguese status labels the collection has always used:
//!
//! ```json
//! {"id": 1704067200000, "bookId": 1, "userId": 2,
//!  "loanDate": "2024-01-01", "dueDate": "2024-01-15",
//!  "status": "Devolvido", "returnedDate": "2024-01-10"}
//! ```

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type EntityId = i64;

pub const BOOKS_KEY: &str = "@bookfy_books";
pub const USERS_KEY: &str = "@bookfy_users";
pub const LOANS_KEY: &str = "@bookfy_loans";

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Current calendar date (UTC), the value used for "today" defaults.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A record that lives in one named collection.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Storage key of the collection holding this entity.
    const COLLECTION: &'static str;
    /// Human name used in messages ("Book", "User", "Loan").
    const KIND: &'static str;

    fn id(&self) -> EntityId;
    fn set_id(&mut self, id: EntityId);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    pub description: String,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        year: i32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            year,
            description: description.into(),
        }
    }
}

impl Entity for Book {
    const COLLECTION: &'static str = BOOKS_KEY;
    const KIND: &'static str = "Book";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
    // Older collections predate the postal code fields.
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub address: String,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            cep: String::new(),
            address: String::new(),
        }
    }

    pub fn with_address(mut self, cep: impl Into<String>, address: impl Into<String>) -> Self {
        self.cep = cep.into();
        self.address = address.into();
        self
    }
}

impl Entity for User {
    const COLLECTION: &'static str = USERS_KEY;
    const KIND: &'static str = "User";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// The status choices offered when editing a loan, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusKind {
    #[default]
    Active,
    Returned,
    Overdue,
}

impl StatusKind {
    pub const ALL: [StatusKind; 3] = [StatusKind::Active, StatusKind::Returned, StatusKind::Overdue];

    /// The label stored in the `status` field.
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Active => "Emprestado",
            StatusKind::Returned => "Devolvido",
            StatusKind::Overdue => "Atrasado",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusKind {
    type Err = String;

    /// Accepts the stored labels and their English names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emprestado" | "active" => Ok(StatusKind::Active),
            "devolvido" | "returned" => Ok(StatusKind::Returned),
            "atrasado" | "overdue" => Ok(StatusKind::Overdue),
            _ => {
                let expected: Vec<_> = StatusKind::ALL.iter().map(|k| k.label()).collect();
                Err(format!(
                    "Unknown loan status: {} (expected one of {})",
                    s,
                    expected.join(", ")
                ))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoanStatus {
    #[default]
    Active,
    Returned {
        returned_date: NaiveDate,
    },
    /// Set by hand. Never derived from the due date.
    Overdue,
}

impl LoanStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            LoanStatus::Active => StatusKind::Active,
            LoanStatus::Returned { .. } => StatusKind::Returned,
            LoanStatus::Overdue => StatusKind::Overdue,
        }
    }

    pub fn returned_date(&self) -> Option<NaiveDate> {
        match self {
            LoanStatus::Returned { returned_date } => Some(*returned_date),
            _ => None,
        }
    }

    pub fn is_returned(&self) -> bool {
        matches!(self, LoanStatus::Returned { .. })
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LoanRecord", into = "LoanRecord")]
pub struct Loan {
    pub id: EntityId,
    pub book_id: EntityId,
    pub user_id: EntityId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: LoanStatus,
}

impl Loan {
    pub fn new(
        book_id: EntityId,
        user_id: EntityId,
        loan_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: 0,
            book_id,
            user_id,
            loan_date,
            due_date,
            status: LoanStatus::Active,
        }
    }

    pub fn with_status(mut self, status: LoanStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns false, leaving the loan untouched, if it was already returned.
    pub fn mark_returned(&mut self, today: NaiveDate) -> bool {
        if self.status.is_returned() {
            return false;
        }
        self.status = LoanStatus::Returned {
            returned_date: today,
        };
        true
    }

    /// An unreturned loan whose due date is behind `today`.
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        !self.status.is_returned() && today > self.due_date
    }
}

impl Entity for Loan {
    const COLLECTION: &'static str = LOANS_KEY;
    const KIND: &'static str = "Loan";

    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// Flat wire shape of a loan.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoanRecord {
    id: EntityId,
    book_id: EntityId,
    user_id: EntityId,
    loan_date: String,
    due_date: String,
    status: String,
    // Form-saved records may hold "" here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    returned_date: Option<String>,
}

impl TryFrom<LoanRecord> for Loan {
    type Error = String;

    fn try_from(record: LoanRecord) -> Result<Self, Self::Error> {
        let date_field = |name: &str, value: &str| {
            parse_date(value).ok_or_else(|| {
                format!("loan {}: invalid {} {:?}", record.id, name, value)
            })
        };
        let loan_date = date_field("loanDate", &record.loan_date)?;
        let due_date = date_field("dueDate", &record.due_date)?;
        let returned = record
            .returned_date
            .as_deref()
            .filter(|s| !s.trim().is_empty());

        let status = match StatusKind::from_str(&record.status)? {
            StatusKind::Active => LoanStatus::Active,
            StatusKind::Overdue => LoanStatus::Overdue,
            StatusKind::Returned => {
                let raw = returned.ok_or_else(|| {
                    format!("loan {}: status Devolvido without returnedDate", record.id)
                })?;
                LoanStatus::Returned {
                    returned_date: date_field("returnedDate", raw)?,
                }
            }
        };

        Ok(Loan {
            id: record.id,
            book_id: record.book_id,
            user_id: record.user_id,
            loan_date,
            due_date,
            status,
        })
    }
}

impl From<Loan> for LoanRecord {
    fn from(loan: Loan) -> Self {
        LoanRecord {
            id: loan.id,
            book_id: loan.book_id,
            user_id: loan.user_id,
            loan_date: format_date(loan.loan_date),
            due_date: format_date(loan.due_date),
            status: loan.status.kind().label().to_string(),
            returned_date: loan.status.returned_date().map(format_date),
        }
    }
}
