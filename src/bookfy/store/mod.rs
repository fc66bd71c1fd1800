//! # Storage Layer
//!
//! Each entity type lives in one named collection of a key-value backend:
//!
//! | Key              | Entity   |
//! |------------------|----------|
//! | `@bookfy_books`  | `Book`   |
//! | `@bookfy_users`  | `User`   |
//! | `@bookfy_loans`  | `Loan`   |
//!
//! A collection is a JSON array of flat records. There is no schema version.
//!
//! ## Pieces
//!
//! - [`backend::StorageBackend`]: the "how" of storage, raw text in and out
//!   per key.
//! - [`fs_backend::FsBackend`]: production, one JSON file per key, atomic writes.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.
//! - [`repository::Repository`]: the "what", typed get/create/update/remove
//!   for one collection.
//! - [`Library`]: owns the backend and hands out the three repositories.
//!
//! ## Read-modify-write
//!
//! Mutations load the full collection, change it, and write it back. Two
//! overlapping cycles on the same collection would lose one update, so the
//! command layer only mutates through `&mut Library`: within a process the
//! borrow checker serializes them. Separate processes sharing a data
//! directory are not coordinated.
//!
//! ## Failure policy
//!
//! - Reads (`get_all`, `get_by_id`) treat an unreadable collection as empty
//!   and log the error.
//! - Writes load strictly and fail with `CorruptCollection` instead.

use crate::model::{Book, Loan, User};
use backend::StorageBackend;
use repository::Repository;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod repository;

pub struct Library<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> Library<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn books(&self) -> Repository<'_, B, Book> {
        Repository::new(&self.backend)
    }

    pub fn users(&self) -> Repository<'_, B, User> {
        Repository::new(&self.backend)
    }

    pub fn loans(&self) -> Repository<'_, B, Loan> {
        Repository::new(&self.backend)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
