use crate::commands::helpers::{fetch, loans_where, plural};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::forms::BookForm;
use crate::model::EntityId;
use crate::store::backend::StorageBackend;
use crate::store::Library;
use chrono::NaiveDate;

/// Field overrides for an edit. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct BookChanges {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub description: Option<String>,
}

impl BookChanges {
    pub fn apply(self, form: &mut BookForm) {
        if let Some(v) = self.title {
            form.title = v;
        }
        if let Some(v) = self.author {
            form.author = v;
        }
        if let Some(v) = self.genre {
            form.genre = v;
        }
        if let Some(v) = self.year {
            form.year = v;
        }
        if let Some(v) = self.description {
            form.description = v;
        }
    }
}

pub fn create<B: StorageBackend>(
    library: &mut Library<B>,
    form: &BookForm,
    today: NaiveDate,
) -> Result<CmdResult> {
    let book = form.validate(today)?;
    let book = library.books().create(book)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Book created ({}): {}",
        book.id, book.title
    )));
    Ok(result.with_books(vec![book]))
}

pub fn list<B: StorageBackend>(library: &Library<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_books(library.books().get_all()))
}

pub fn show<B: StorageBackend>(library: &Library<B>, id: EntityId) -> Result<CmdResult> {
    let book = fetch(&library.books(), id)?;
    Ok(CmdResult::default().with_books(vec![book]))
}

pub fn update<B: StorageBackend>(
    library: &mut Library<B>,
    id: EntityId,
    changes: BookChanges,
    today: NaiveDate,
) -> Result<CmdResult> {
    let stored = fetch(&library.books(), id)?;
    let mut form = BookForm::from_book(&stored);
    changes.apply(&mut form);

    let mut book = form.validate(today)?;
    book.id = id;
    library.books().update(&book)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Book updated ({}): {}",
        id, book.title
    )));
    Ok(result.with_books(vec![book]))
}

/// Removes the book. Loans pointing at it are kept and reported.
pub fn delete<B: StorageBackend>(library: &mut Library<B>, id: EntityId) -> Result<CmdResult> {
    let book = fetch(&library.books(), id)?;
    library.books().remove(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Book deleted ({}): {}",
        id, book.title
    )));

    let orphaned = loans_where(library, |loan| loan.book_id == id).len();
    if orphaned > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} still reference{} this book",
            plural(orphaned, "loan"),
            if orphaned == 1 { "s" } else { "" }
        )));
    }
    Ok(result.with_books(vec![book]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::BookfyError;
    use crate::model::{parse_date, Loan};
    use crate::store::mem_backend::MemBackend;

    fn today() -> NaiveDate {
        parse_date("2024-06-01").unwrap()
    }

    fn dune_form() -> BookForm {
        BookForm {
            title: "Dune".into(),
            author: "Herbert".into(),
            genre: "Sci-fi".into(),
            year: "1965".into(),
            description: "...".into(),
        }
    }

    fn library() -> Library<MemBackend> {
        Library::with_backend(MemBackend::new())
    }

    #[test]
    fn creates_and_lists_book() {
        let mut lib = library();
        let created = create(&mut lib, &dune_form(), today()).unwrap();
        assert_eq!(created.books.len(), 1);
        assert!(created.books[0].id > 0);

        let listed = list(&lib).unwrap();
        assert_eq!(listed.books, created.books);
        assert_eq!(listed.books[0].title, "Dune");
        assert_eq!(listed.books[0].year, 1965);
    }

    #[test]
    fn invalid_form_never_touches_storage() {
        let mut lib = library();
        let mut form = dune_form();
        form.year = "3000".into();

        let err = create(&mut lib, &form, today()).unwrap_err();
        assert!(matches!(err, BookfyError::Validation(_)));
        assert_eq!(lib.backend().write_count(), 0);
    }

    #[test]
    fn update_applies_only_given_fields() {
        let mut lib = library();
        let id = create(&mut lib, &dune_form(), today()).unwrap().books[0].id;

        let changes = BookChanges {
            title: Some("Dune Messiah".into()),
            year: Some("1969".into()),
            ..Default::default()
        };
        update(&mut lib, id, changes, today()).unwrap();

        let book = show(&lib, id).unwrap().books.remove(0);
        assert_eq!(book.title, "Dune Messiah");
        assert_eq!(book.year, 1969);
        assert_eq!(book.author, "Herbert");
        assert_eq!(book.id, id);
    }

    #[test]
    fn update_unknown_book_is_not_found() {
        let mut lib = library();
        let err = update(&mut lib, 99, BookChanges::default(), today()).unwrap_err();
        assert!(matches!(err, BookfyError::NotFound { kind: "Book", id: 99 }));
    }

    #[test]
    fn delete_warns_about_orphaned_loans() {
        let mut lib = library();
        let id = create(&mut lib, &dune_form(), today()).unwrap().books[0].id;
        lib.loans()
            .create(Loan::new(id, 1, today(), today()))
            .unwrap();

        let result = delete(&mut lib, id).unwrap();
        assert!(result.has_level(MessageLevel::Warning));
        assert!(result.messages[1].content.contains("1 loan still references"));
        assert!(show(&lib, id).is_err());
        // Loans are orphaned, not removed
        assert_eq!(lib.loans().get_all().len(), 1);
    }

    #[test]
    fn delete_without_loans_has_no_warning() {
        let mut lib = library();
        let id = create(&mut lib, &dune_form(), today()).unwrap().books[0].id;
        let result = delete(&mut lib, id).unwrap();
        assert!(!result.has_level(MessageLevel::Warning));
    }
}
