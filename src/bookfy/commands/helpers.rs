use crate::error::{BookfyError, Result};
use crate::model::{Entity, EntityId, Loan};
use crate::store::backend::StorageBackend;
use crate::store::repository::Repository;
use crate::store::Library;

/// The record with `id`, or `NotFound` naming the entity kind.
pub fn fetch<B: StorageBackend, E: Entity>(repo: &Repository<'_, B, E>, id: EntityId) -> Result<E> {
    repo.get_by_id(id)
        .ok_or_else(|| BookfyError::not_found(E::KIND, id))
}

/// Loans matching `refers`, e.g. those pointing at one book.
pub fn loans_where<B: StorageBackend>(
    library: &Library<B>,
    refers: impl Fn(&Loan) -> bool,
) -> Vec<Loan> {
    library
        .loans()
        .get_all()
        .into_iter()
        .filter(|loan| refers(loan))
        .collect()
}

pub fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}
