use crate::commands::helpers::{fetch, loans_where, plural};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::forms::UserForm;
use crate::model::EntityId;
use crate::store::backend::StorageBackend;
use crate::store::Library;

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cep: Option<String>,
    pub address: Option<String>,
}

impl UserChanges {
    pub fn apply(self, form: &mut UserForm) {
        if let Some(v) = self.name {
            form.name = v;
        }
        if let Some(v) = self.email {
            form.email = v;
        }
        if let Some(v) = self.phone {
            form.phone = v;
        }
        if let Some(v) = self.cep {
            form.cep = v;
        }
        if let Some(v) = self.address {
            form.address = v;
        }
    }
}

pub fn create<B: StorageBackend>(library: &mut Library<B>, form: &UserForm) -> Result<CmdResult> {
    let user = form.validate()?;
    let user = library.users().create(user)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "User created ({}): {}",
        user.id, user.name
    )));
    Ok(result.with_users(vec![user]))
}

pub fn list<B: StorageBackend>(library: &Library<B>) -> Result<CmdResult> {
    Ok(CmdResult::default().with_users(library.users().get_all()))
}

pub fn show<B: StorageBackend>(library: &Library<B>, id: EntityId) -> Result<CmdResult> {
    let user = fetch(&library.users(), id)?;
    Ok(CmdResult::default().with_users(vec![user]))
}

pub fn update<B: StorageBackend>(
    library: &mut Library<B>,
    id: EntityId,
    changes: UserChanges,
) -> Result<CmdResult> {
    let stored = fetch(&library.users(), id)?;
    let mut form = UserForm::from_user(&stored);
    changes.apply(&mut form);

    let mut user = form.validate()?;
    user.id = id;
    library.users().update(&user)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "User updated ({}): {}",
        id, user.name
    )));
    Ok(result.with_users(vec![user]))
}

/// Removes the user. Loans pointing at them are kept and reported.
pub fn delete<B: StorageBackend>(library: &mut Library<B>, id: EntityId) -> Result<CmdResult> {
    let user = fetch(&library.users(), id)?;
    library.users().remove(id)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "User deleted ({}): {}",
        id, user.name
    )));

    let orphaned = loans_where(library, |loan| loan.user_id == id).len();
    if orphaned > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} still reference{} this user",
            plural(orphaned, "loan"),
            if orphaned == 1 { "s" } else { "" }
        )));
    }
    Ok(result.with_users(vec![user]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::error::BookfyError;
    use crate::model::{parse_date, Loan};
    use crate::store::mem_backend::MemBackend;

    fn ana() -> UserForm {
        UserForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            phone: "555-0101".into(),
            cep: "01310-100".into(),
            address: "Avenida Paulista, 1000".into(),
        }
    }

    #[test]
    fn creates_user_with_normalized_cep() {
        let mut lib = Library::with_backend(MemBackend::new());
        let user = create(&mut lib, &ana()).unwrap().users.remove(0);
        assert!(user.id > 0);
        assert_eq!(user.cep, "01310100");
        assert_eq!(list(&lib).unwrap().users, vec![user]);
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut lib = Library::with_backend(MemBackend::new());
        let mut form = ana();
        form.email = "not-an-email".into();

        match create(&mut lib, &form) {
            Err(BookfyError::Validation(errors)) => {
                assert_eq!(errors.get("email"), Some("Invalid email"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(list(&lib).unwrap().users.is_empty());
    }

    #[test]
    fn update_keeps_untouched_fields() {
        let mut lib = Library::with_backend(MemBackend::new());
        let id = create(&mut lib, &ana()).unwrap().users[0].id;

        let changes = UserChanges {
            phone: Some("555-9999".into()),
            ..Default::default()
        };
        update(&mut lib, id, changes).unwrap();

        let user = show(&lib, id).unwrap().users.remove(0);
        assert_eq!(user.phone, "555-9999");
        assert_eq!(user.email, "ana@example.com");
    }

    #[test]
    fn delete_reports_orphans() {
        let mut lib = Library::with_backend(MemBackend::new());
        let id = create(&mut lib, &ana()).unwrap().users[0].id;
        let day = parse_date("2024-01-01").unwrap();
        lib.loans().create(Loan::new(1, id, day, day)).unwrap();
        lib.loans().create(Loan::new(2, id, day, day)).unwrap();

        let result = delete(&mut lib, id).unwrap();
        assert!(result.has_level(MessageLevel::Warning));
        assert!(result.messages[1].content.contains("2 loans still reference this user"));
        assert!(lib.users().get_by_id(id).is_none());
    }
}
