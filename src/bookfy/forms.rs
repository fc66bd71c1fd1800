//! # Forms
//!
//! Raw, unvalidated input for each entity, the way a form screen holds it:
//! every field is text until `validate` turns the whole form into a record.
//!
//! Validation collects every failing field instead of stopping at the first
//! one, so a client can show all messages next to their fields. Nothing is
//! persisted unless validation passes; that is the caller's contract, the
//! commands only touch storage with the value `validate` returned.
//!
//! The loan form also carries the status side effects:
//! - selecting `Devolvido` fills the returned date with today if it is empty
//! - selecting anything else clears it

use crate::model::{
    format_date, parse_date, Book, EntityId, Loan, LoanStatus, StatusKind, User,
};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level validation failures of one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// First message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.push(field, format!("{} is required", label));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: String,
    pub description: String,
}

impl BookForm {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone(),
            year: book.year.to_string(),
            description: book.description.clone(),
        }
    }

    /// Builds an unsaved book (`id == 0`). `today` bounds the year.
    pub fn validate(&self, today: NaiveDate) -> Result<Book, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "title", &self.title, "Title");
        require(&mut errors, "author", &self.author, "Author");
        require(&mut errors, "genre", &self.genre, "Genre");
        require(&mut errors, "description", &self.description, "Description");

        let year = self.year.trim();
        let mut parsed_year = 0;
        if year.is_empty() {
            errors.push("year", "Year is required");
        } else {
            match year.parse::<i32>() {
                Err(_) => errors.push("year", "Year must be a whole number"),
                Ok(y) if y <= 0 => errors.push("year", "Year must be positive"),
                Ok(y) if y > today.year() => errors.push(
                    "year",
                    format!("Year cannot be after the current year ({})", today.year()),
                ),
                Ok(y) => parsed_year = y,
            }
        }

        errors.finish(|| {
            Book::new(
                self.title.trim(),
                self.author.trim(),
                self.genre.trim(),
                parsed_year,
                self.description.trim(),
            )
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cep: String,
    pub address: String,
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            cep: user.cep.clone(),
            address: user.address.clone(),
        }
    }

    /// Postal code digits, if the field holds a complete 8-digit code.
    pub fn cep_digits(&self) -> Option<String> {
        normalize_cep(&self.cep)
    }

    pub fn validate(&self) -> Result<User, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "name", &self.name, "Name");
        if self.email.trim().is_empty() {
            errors.push("email", "Email is required");
        } else if !is_valid_email(self.email.trim()) {
            errors.push("email", "Invalid email");
        }
        require(&mut errors, "phone", &self.phone, "Phone");

        let cep = if self.cep.trim().is_empty() {
            Some(String::new())
        } else {
            normalize_cep(&self.cep)
        };
        if cep.is_none() {
            errors.push("cep", "Postal code must have 8 digits");
        }

        errors.finish(|| {
            User::new(self.name.trim(), self.email.trim(), self.phone.trim())
                .with_address(cep.unwrap_or_default(), self.address.trim())
        })
    }
}

/// Strips the `12.345-678` mask and checks for exactly 8 digits.
pub fn normalize_cep(raw: &str) -> Option<String> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '-' | '.'))
        .collect();
    if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(digits)
    } else {
        None
    }
}

/// A well-formed address whose domain has a TLD (`local@domain.tld`).
pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
        && email
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanForm {
    pub book_id: Option<EntityId>,
    pub user_id: Option<EntityId>,
    pub loan_date: String,
    pub due_date: String,
    pub status: StatusKind,
    pub returned_date: String,
}

impl LoanForm {
    /// A blank form: loan date today, status `Emprestado`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            book_id: None,
            user_id: None,
            loan_date: format_date(today),
            due_date: String::new(),
            status: StatusKind::Active,
            returned_date: String::new(),
        }
    }

    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            book_id: Some(loan.book_id),
            user_id: Some(loan.user_id),
            loan_date: format_date(loan.loan_date),
            due_date: format_date(loan.due_date),
            status: loan.status.kind(),
            returned_date: loan.status.returned_date().map(format_date).unwrap_or_default(),
        }
    }

    pub fn select_status(&mut self, status: StatusKind, today: NaiveDate) {
        self.status = status;
        if status == StatusKind::Returned {
            if self.returned_date.trim().is_empty() {
                self.returned_date = format_date(today);
            }
        } else {
            self.returned_date.clear();
        }
    }

    /// Builds an unsaved loan (`id == 0`).
    pub fn validate(&self) -> Result<Loan, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.book_id.is_none() {
            errors.push("book", "Book is required");
        }
        if self.user_id.is_none() {
            errors.push("user", "User is required");
        }

        let loan_date = parse_required_date(&mut errors, "loanDate", &self.loan_date, "Loan date");
        let due_date = parse_required_date(&mut errors, "dueDate", &self.due_date, "Due date");
        if let (Some(loan), Some(due)) = (loan_date, due_date) {
            if due < loan {
                errors.push("dueDate", "Due date cannot be before the loan date");
            }
        }

        if self.status != StatusKind::Returned && !self.returned_date.trim().is_empty() {
            errors.push("returnedDate", "Returned date is only allowed for returned loans");
        }
        let status = match self.status {
            StatusKind::Active => Some(LoanStatus::Active),
            StatusKind::Overdue => Some(LoanStatus::Overdue),
            StatusKind::Returned => parse_required_date(
                &mut errors,
                "returnedDate",
                &self.returned_date,
                "Returned date",
            )
            .map(|returned_date| LoanStatus::Returned { returned_date }),
        };

        match (self.book_id, self.user_id, loan_date, due_date, status) {
            (Some(book_id), Some(user_id), Some(loan_date), Some(due_date), Some(status))
                if errors.is_empty() =>
            {
                Ok(Loan::new(book_id, user_id, loan_date, due_date).with_status(status))
            }
            _ => Err(errors),
        }
    }
}

fn parse_required_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    label: &str,
) -> Option<NaiveDate> {
    if value.trim().is_empty() {
        errors.push(field, format!("{} is required", label));
        return None;
    }
    let parsed = parse_date(value);
    if parsed.is_none() {
        errors.push(field, format!("{} must be a date as YYYY-MM-DD", label));
    }
    parsed
}
