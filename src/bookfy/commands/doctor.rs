use crate::commands::helpers::plural;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::lookup::resolve_loans;
use crate::store::backend::StorageBackend;
use crate::store::Library;
use chrono::NaiveDate;

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checked_loans: usize,
    pub missing_books: usize,
    pub missing_users: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.missing_books == 0 && self.missing_users == 0
    }
}

/// Lists loans whose book or user no longer exists. Nothing is modified.
pub fn run<B: StorageBackend>(library: &Library<B>, today: NaiveDate) -> Result<CmdResult> {
    let views = resolve_loans(library, library.loans().get_all(), today);

    let report = DoctorReport {
        checked_loans: views.len(),
        missing_books: views.iter().filter(|v| v.book.is_missing()).count(),
        missing_users: views.iter().filter(|v| v.user.is_missing()).count(),
    };
    let orphaned: Vec<_> = views.into_iter().filter(|v| v.is_orphaned()).collect();

    let mut result = CmdResult::default();
    if report.is_clean() {
        result.add_message(CmdMessage::success(format!(
            "Checked {}: all references resolve",
            plural(report.checked_loans, "loan")
        )));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "{} with a missing reference ({} missing book, {} missing user)",
            plural(orphaned.len(), "loan"),
            report.missing_books,
            report.missing_users
        )));
    }
    result.report = Some(report);
    Ok(result.with_loans(orphaned))
}
