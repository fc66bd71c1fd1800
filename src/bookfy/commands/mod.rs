//! # Command Layer
//!
//! This module contains the **core business logic** of bookfy. Each entity
//! gets its own submodule of plain Rust functions over a [`Library`].
//!
//! ## Role and Responsibilities
//!
//! Commands:
//! - Validate form input before any storage call
//! - Run the repository operations
//! - Return structured [`CmdResult`] values with the affected records and messages
//!
//! ## What Commands Do NOT Do
//!
//! - **Any I/O** beyond the storage backend: no stdout, stderr or prompts
//! - **Argument parsing**: that's the CLI layer's job
//! - **Clock reads**: "today" is always a parameter so tests can pin it
//!
//! ## Mutability
//!
//! Commands that write take `&mut Library`, read-only ones take `&Library`.
//! Holding the library mutably for the whole read-modify-write cycle is what
//! keeps two writes to one collection from interleaving.
//!
//! ## Command Modules
//!
//! - [`books`]: Book CRUD
//! - [`users`]: User CRUD
//! - [`loans`]: Loan CRUD and the return action
//! - [`doctor`]: Report loans whose book or user is gone
//! - [`config`]: Show and change configuration
//! - [`helpers`]: Shared lookups
//!
//! [`Library`]: crate::store::Library

use crate::config::BookfyConfig;
use crate::lookup::LoanView;
use crate::model::{Book, User};
use serde::Serialize;
use std::path::PathBuf;

pub mod books;
pub mod config;
pub mod doctor;
pub mod helpers;
pub mod loans;
pub mod users;

pub use doctor::DoctorReport;

#[derive(Debug, Clone)]
pub struct BookfyPaths {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub books: Vec<Book>,
    pub users: Vec<User>,
    pub loans: Vec<LoanView>,
    pub messages: Vec<CmdMessage>,
    pub config: Option<BookfyConfig>,
    pub report: Option<DoctorReport>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_books(mut self, books: Vec<Book>) -> Self {
        self.books = books;
        self
    }

    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    pub fn with_loans(mut self, loans: Vec<LoanView>) -> Self {
        self.loans = loans;
        self
    }

    pub fn with_config(mut self, config: BookfyConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_level(&self, level: MessageLevel) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}
