//! Resolving a loan's book and user ids for display.
//!
//! Loans reference books and users by id only, and deleting a book or user
//! leaves its loans in place. Each row therefore resolves its references on
//! its own, and a reference that no longer resolves shows as a "not found"
//! label instead of failing the listing.

use crate::model::{Loan, EntityId};
use crate::store::backend::StorageBackend;
use crate::store::Library;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefLabel {
    Resolved(String),
    NotFound(EntityId),
}

impl RefLabel {
    pub fn is_missing(&self) -> bool {
        matches!(self, RefLabel::NotFound(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanView {
    pub loan: Loan,
    /// Title of the referenced book.
    pub book: RefLabel,
    /// Name of the referenced user.
    pub user: RefLabel,
    /// Unreturned and behind its due date. The stored status is untouched.
    pub past_due: bool,
}

impl LoanView {
    pub fn book_label(&self) -> &str {
        match &self.book {
            RefLabel::Resolved(title) => title,
            RefLabel::NotFound(_) => "Book not found",
        }
    }

    pub fn user_label(&self) -> &str {
        match &self.user {
            RefLabel::Resolved(name) => name,
            RefLabel::NotFound(_) => "User not found",
        }
    }

    pub fn is_orphaned(&self) -> bool {
        self.book.is_missing() || self.user.is_missing()
    }
}

pub fn resolve_loan<B: StorageBackend>(
    library: &Library<B>,
    loan: Loan,
    today: NaiveDate,
) -> LoanView {
    let book = match library.books().get_by_id(loan.book_id) {
        Some(book) => RefLabel::Resolved(book.title),
        None => RefLabel::NotFound(loan.book_id),
    };
    let user = match library.users().get_by_id(loan.user_id) {
        Some(user) => RefLabel::Resolved(user.name),
        None => RefLabel::NotFound(loan.user_id),
    };
    let past_due = loan.is_past_due(today);
    LoanView {
        loan,
        book,
        user,
        past_due,
    }
}

pub fn resolve_loans<B: StorageBackend>(
    library: &Library<B>,
    loans: Vec<Loan>,
    today: NaiveDate,
) -> Vec<LoanView> {
    loans
        .into_iter()
        .map(|loan| resolve_loan(library, loan, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{parse_date, Book, User};
    use crate::store::mem_backend::MemBackend;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn resolves_titles_and_names() {
        let library = Library::with_backend(MemBackend::new());
        let book = library
            .books()
            .create(Book::new("Dune", "Herbert", "Sci-fi", 1965, "..."))
            .unwrap();
        let user = library
            .users()
            .create(User::new("Ana", "ana@example.com", "555"))
            .unwrap();
        let loan = Loan::new(book.id, user.id, date("2024-01-01"), date("2024-01-15"));

        let view = resolve_loan(&library, loan, date("2024-01-10"));
        assert_eq!(view.book_label(), "Dune");
        assert_eq!(view.user_label(), "Ana");
        assert!(!view.past_due);
        assert!(!view.is_orphaned());
    }

    #[test]
    fn missing_references_fall_back_to_not_found() {
        let library = Library::with_backend(MemBackend::new());
        let loan = Loan::new(11, 22, date("2024-01-01"), date("2024-01-15"));

        let view = resolve_loan(&library, loan, date("2024-02-01"));
        assert_eq!(view.book, RefLabel::NotFound(11));
        assert_eq!(view.book_label(), "Book not found");
        assert_eq!(view.user_label(), "User not found");
        assert!(view.is_orphaned());
        assert!(view.past_due);
    }
}
