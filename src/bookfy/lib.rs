//! # Bookfy Architecture
//!
//! Bookfy is a **small library manager**: it keeps books, the users who
//! borrow them, and the loans between the two. The core is a UI-agnostic
//! library; the `bookfy` binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Supplies today's date                                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation (forms.rs) and the loan lifecycle             │
//! │  - Resolving loan references for display (lookup.rs)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Generic Repository over a key-value StorageBackend       │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Diagnostics go through `tracing`; whether anything listens
//! is up to the client.
//!
//! ## References Between Entities
//!
//! A loan stores the ids of its book and user, nothing more. Deleting a book
//! or a user does not touch its loans: they remain listed with a
//! "not found" label, and `doctor` reports them.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each entity
//! - [`store`]: Storage abstraction, backends and the generic repository
//! - [`model`]: Core data types (`Book`, `User`, `Loan`, `LoanStatus`)
//! - [`forms`]: Form input and its validation
//! - [`lookup`]: Book title and user name resolution for loans
//! - [`address`]: Postal code lookup seam for the user form
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod address;
pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod forms;
pub mod lookup;
pub mod model;
pub mod store;
