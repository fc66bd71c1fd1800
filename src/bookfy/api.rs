//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all bookfy operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Supplies "today"** from the system clock, so commands never read it themselves
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or prompts
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Configuration
//!
//! The facade is handed the configuration once, at construction. Deciding
//! what to do with a missing or unreadable `config.json` is the client's
//! call; the facade only keeps its copy in step with `config` commands.
//!
//! ## Generic Over StorageBackend
//!
//! `BookfyApi<B: StorageBackend>` is generic over the storage backend:
//! - Production: `BookfyApi<FsBackend>`
//! - Testing: `BookfyApi<MemBackend>`

use crate::commands;
use crate::config::BookfyConfig;
use crate::error::Result;
use crate::forms::{BookForm, LoanForm, UserForm};
use crate::model::{format_date, today, EntityId};
use crate::store::backend::StorageBackend;
use crate::store::Library;
use chrono::NaiveDate;

pub use crate::commands::books::BookChanges;
pub use crate::commands::config::ConfigAction;
pub use crate::commands::loans::{LoanChanges, LoanFilter};
pub use crate::commands::users::UserChanges;
pub use crate::commands::{BookfyPaths, CmdMessage, CmdResult, DoctorReport, MessageLevel};

/// The main API facade for bookfy operations.
///
/// All UI clients should interact through this API.
pub struct BookfyApi<B: StorageBackend> {
    library: Library<B>,
    paths: BookfyPaths,
    config: BookfyConfig,
}

impl<B: StorageBackend> BookfyApi<B> {
    pub fn new(backend: B, paths: BookfyPaths, config: BookfyConfig) -> Self {
        Self {
            library: Library::with_backend(backend),
            paths,
            config,
        }
    }

    // Books

    pub fn create_book(&mut self, form: &BookForm) -> Result<CmdResult> {
        commands::books::create(&mut self.library, form, today())
    }

    pub fn list_books(&self) -> Result<CmdResult> {
        commands::books::list(&self.library)
    }

    pub fn show_book(&self, id: EntityId) -> Result<CmdResult> {
        commands::books::show(&self.library, id)
    }

    pub fn update_book(&mut self, id: EntityId, changes: BookChanges) -> Result<CmdResult> {
        commands::books::update(&mut self.library, id, changes, today())
    }

    pub fn delete_book(&mut self, id: EntityId) -> Result<CmdResult> {
        commands::books::delete(&mut self.library, id)
    }

    // Users

    pub fn create_user(&mut self, form: &UserForm) -> Result<CmdResult> {
        commands::users::create(&mut self.library, form)
    }

    pub fn list_users(&self) -> Result<CmdResult> {
        commands::users::list(&self.library)
    }

    pub fn show_user(&self, id: EntityId) -> Result<CmdResult> {
        commands::users::show(&self.library, id)
    }

    pub fn update_user(&mut self, id: EntityId, changes: UserChanges) -> Result<CmdResult> {
        commands::users::update(&mut self.library, id, changes)
    }

    pub fn delete_user(&mut self, id: EntityId) -> Result<CmdResult> {
        commands::users::delete(&mut self.library, id)
    }

    // Loans

    /// A blank loan form starting on `loan_date` (today if `None`), with the
    /// due date prefilled from `loan-days` when that is set.
    pub fn new_loan_form(&self, loan_date: Option<NaiveDate>) -> LoanForm {
        let start = loan_date.unwrap_or_else(today);
        let mut form = LoanForm::new(start);
        if let Some(due) = self.config.default_due_date(start) {
            form.due_date = format_date(due);
        }
        form
    }

    pub fn create_loan(&mut self, form: &LoanForm) -> Result<CmdResult> {
        commands::loans::create(&mut self.library, form, today())
    }

    pub fn list_loans(&self, filter: LoanFilter) -> Result<CmdResult> {
        commands::loans::list(&self.library, filter, today())
    }

    pub fn show_loan(&self, id: EntityId) -> Result<CmdResult> {
        commands::loans::show(&self.library, id, today())
    }

    pub fn update_loan(&mut self, id: EntityId, changes: LoanChanges) -> Result<CmdResult> {
        commands::loans::update(&mut self.library, id, changes, today())
    }

    pub fn return_loan(&mut self, id: EntityId) -> Result<CmdResult> {
        commands::loans::mark_returned(&mut self.library, id, today())
    }

    pub fn delete_loan(&mut self, id: EntityId) -> Result<CmdResult> {
        commands::loans::delete(&mut self.library, id, today())
    }

    // Maintenance

    pub fn doctor(&self) -> Result<CmdResult> {
        commands::doctor::run(&self.library, today())
    }

    pub fn config(&mut self, action: ConfigAction) -> Result<CmdResult> {
        let result = commands::config::run(&self.paths, action)?;
        if let Some(config) = &result.config {
            self.config = config.clone();
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusKind;
    use crate::store::mem_backend::MemBackend;
    use tempfile::{tempdir, TempDir};

    fn make_api() -> (BookfyApi<MemBackend>, TempDir) {
        let temp = tempdir().unwrap();
        let paths = BookfyPaths {
            data_dir: temp.path().to_path_buf(),
        };
        (BookfyApi::new(MemBackend::new(), paths, BookfyConfig::default()), temp)
    }

    fn add_book_and_user(api: &mut BookfyApi<MemBackend>) -> (EntityId, EntityId) {
        let book = BookForm {
            title: "Dom Casmurro".into(),
            author: "Machado de Assis".into(),
            genre: "Romance".into(),
            year: "1899".into(),
            description: "Bentinho e Capitu".into(),
        };
        let user = UserForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "555-0101".into(),
            ..Default::default()
        };
        let book_id = api.create_book(&book).unwrap().books[0].id;
        let user_id = api.create_user(&user).unwrap().users[0].id;
        (book_id, user_id)
    }

    #[test]
    fn new_loan_form_uses_configured_loan_days() {
        let (mut api, _temp) = make_api();
        api.config(ConfigAction::Set("loan-days".into(), "7".into()))
            .unwrap();

        let form = api.new_loan_form(None);
        let expected = today().checked_add_days(chrono::Days::new(7)).unwrap();
        assert_eq!(form.loan_date, format_date(today()));
        assert_eq!(form.due_date, format_date(expected));
    }

    #[test]
    fn new_loan_form_leaves_due_date_blank_when_disabled() {
        let (mut api, _temp) = make_api();
        api.config(ConfigAction::Set("loan-days".into(), "0".into()))
            .unwrap();
        assert_eq!(api.new_loan_form(None).due_date, "");
    }

    #[test]
    fn new_loan_form_uses_injected_config_without_reading_disk() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("config.json"), "{oops").unwrap();
        let paths = BookfyPaths {
            data_dir: temp.path().to_path_buf(),
        };
        let config = BookfyConfig {
            loan_days: 3,
            ..Default::default()
        };
        let api = BookfyApi::new(MemBackend::new(), paths, config);

        let start = crate::model::parse_date("2024-01-30").unwrap();
        assert_eq!(api.new_loan_form(Some(start)).due_date, "2024-02-02");
    }

    #[test]
    fn new_loan_form_counts_from_given_loan_date() {
        let (api, _temp) = make_api();
        let start = crate::model::parse_date("2024-01-25").unwrap();
        let form = api.new_loan_form(Some(start));
        assert_eq!(form.loan_date, "2024-01-25");
        assert_eq!(form.due_date, "2024-02-08");
    }

    #[test]
    fn loan_flow_dispatches_through_commands() {
        let (mut api, _temp) = make_api();
        let (book_id, user_id) = add_book_and_user(&mut api);

        let mut form = api.new_loan_form(None);
        form.book_id = Some(book_id);
        form.user_id = Some(user_id);
        let loan_id = api.create_loan(&form).unwrap().loans[0].loan.id;

        api.return_loan(loan_id).unwrap();
        let shown = api.show_loan(loan_id).unwrap();
        assert_eq!(shown.loans[0].loan.status.returned_date(), Some(today()));

        let active = api
            .list_loans(LoanFilter {
                status: Some(StatusKind::Active),
            })
            .unwrap();
        assert!(active.loans.is_empty());
    }

    #[test]
    fn doctor_sees_loans_orphaned_by_delete() {
        let (mut api, _temp) = make_api();
        let (book_id, user_id) = add_book_and_user(&mut api);
        let mut form = api.new_loan_form(None);
        form.book_id = Some(book_id);
        form.user_id = Some(user_id);
        api.create_loan(&form).unwrap();

        let deleted = api.delete_book(book_id).unwrap();
        assert!(deleted.has_level(MessageLevel::Warning));

        let report = api.doctor().unwrap().report.unwrap();
        assert_eq!(report.missing_books, 1);
        assert_eq!(report.missing_users, 0);
    }
}
