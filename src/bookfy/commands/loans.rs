use crate::commands::helpers::fetch;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::forms::LoanForm;
use crate::lookup::{resolve_loan, resolve_loans};
use crate::model::{format_date, EntityId, StatusKind};
use crate::store::backend::StorageBackend;
use crate::store::Library;
use chrono::NaiveDate;

/// Field overrides for an edit. `None` keeps the stored value.
///
/// A status change goes through [`LoanForm::select_status`], so it fills or
/// clears the returned date the same way the form does. An explicit
/// `returned_date` is applied after that; validation rejects it unless the
/// resulting status is `Devolvido`.
#[derive(Debug, Clone, Default)]
pub struct LoanChanges {
    pub book_id: Option<EntityId>,
    pub user_id: Option<EntityId>,
    pub loan_date: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<StatusKind>,
    pub returned_date: Option<String>,
}

impl LoanChanges {
    pub fn apply(self, form: &mut LoanForm, today: NaiveDate) {
        if let Some(v) = self.book_id {
            form.book_id = Some(v);
        }
        if let Some(v) = self.user_id {
            form.user_id = Some(v);
        }
        if let Some(v) = self.loan_date {
            form.loan_date = v;
        }
        if let Some(v) = self.due_date {
            form.due_date = v;
        }
        if let Some(status) = self.status {
            form.select_status(status, today);
        }
        if let Some(v) = self.returned_date {
            form.returned_date = v;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoanFilter {
    pub status: Option<StatusKind>,
}

/// Loans can only point at books and users that exist when the reference is
/// chosen. References already stored are not re-checked.
fn check_references<B: StorageBackend>(
    library: &Library<B>,
    book_id: Option<EntityId>,
    user_id: Option<EntityId>,
) -> Result<()> {
    if let Some(id) = book_id {
        fetch(&library.books(), id)?;
    }
    if let Some(id) = user_id {
        fetch(&library.users(), id)?;
    }
    Ok(())
}

pub fn create<B: StorageBackend>(
    library: &mut Library<B>,
    form: &LoanForm,
    today: NaiveDate,
) -> Result<CmdResult> {
    let loan = form.validate()?;
    check_references(library, Some(loan.book_id), Some(loan.user_id))?;
    let loan = library.loans().create(loan)?;

    let view = resolve_loan(library, loan, today);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Loan created ({}): {} to {}, due {}",
        view.loan.id,
        view.book_label(),
        view.user_label(),
        format_date(view.loan.due_date)
    )));
    Ok(result.with_loans(vec![view]))
}

pub fn list<B: StorageBackend>(
    library: &Library<B>,
    filter: LoanFilter,
    today: NaiveDate,
) -> Result<CmdResult> {
    let loans = library
        .loans()
        .get_all()
        .into_iter()
        .filter(|loan| filter.status.map_or(true, |s| loan.status.kind() == s))
        .collect();
    Ok(CmdResult::default().with_loans(resolve_loans(library, loans, today)))
}

pub fn show<B: StorageBackend>(
    library: &Library<B>,
    id: EntityId,
    today: NaiveDate,
) -> Result<CmdResult> {
    let loan = fetch(&library.loans(), id)?;
    Ok(CmdResult::default().with_loans(vec![resolve_loan(library, loan, today)]))
}

pub fn update<B: StorageBackend>(
    library: &mut Library<B>,
    id: EntityId,
    changes: LoanChanges,
    today: NaiveDate,
) -> Result<CmdResult> {
    let stored = fetch(&library.loans(), id)?;
    let mut form = LoanForm::from_loan(&stored);
    changes.apply(&mut form, today);

    let mut loan = form.validate()?;
    check_references(
        library,
        Some(loan.book_id).filter(|b| *b != stored.book_id),
        Some(loan.user_id).filter(|u| *u != stored.user_id),
    )?;
    loan.id = id;
    library.loans().update(&loan)?;

    let view = resolve_loan(library, loan, today);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Loan updated ({}): {}",
        id, view.loan.status
    )));
    Ok(result.with_loans(vec![view]))
}

/// The "mark as returned" action: status `Devolvido`, returned today.
pub fn mark_returned<B: StorageBackend>(
    library: &mut Library<B>,
    id: EntityId,
    today: NaiveDate,
) -> Result<CmdResult> {
    let mut loan = fetch(&library.loans(), id)?;
    let mut result = CmdResult::default();

    if !loan.mark_returned(today) {
        let when = loan
            .status
            .returned_date()
            .map(format_date)
            .unwrap_or_default();
        result.add_message(CmdMessage::warning(format!(
            "Loan {} was already returned on {}",
            id, when
        )));
    } else {
        library.loans().update(&loan)?;
        result.add_message(CmdMessage::success(format!(
            "Loan returned ({}) on {}",
            id,
            format_date(today)
        )));
    }

    Ok(result.with_loans(vec![resolve_loan(library, loan, today)]))
}

pub fn delete<B: StorageBackend>(
    library: &mut Library<B>,
    id: EntityId,
    today: NaiveDate,
) -> Result<CmdResult> {
    let loan = fetch(&library.loans(), id)?;
    library.loans().remove(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Loan deleted ({})", id)));
    Ok(result.with_loans(vec![resolve_loan(library, loan, today)]))
}
