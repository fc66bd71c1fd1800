use bookfy::model::{EntityId, StatusKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookfy", bin_name = "bookfy", version)]
#[command(about = "Manage a small library: books, users and loans", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the collections and config.json (default: $BOOKFY_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage books
    #[command(subcommand)]
    #[command(alias = "b")]
    Book(BookCommands),

    /// Manage users
    #[command(subcommand)]
    #[command(alias = "u")]
    User(UserCommands),

    /// Manage loans
    #[command(subcommand)]
    #[command(alias = "l")]
    Loan(LoanCommands),

    /// Report loans whose book or user no longer exists
    Doctor,

    /// Get or set configuration
    Config {
        /// Configuration key (loan-days, log-level)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BookCommands {
    /// Register a new book
    #[command(alias = "new")]
    Add {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        /// Publication year
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List all books
    #[command(alias = "ls")]
    List,

    /// Show one book
    #[command(alias = "v")]
    Show { id: EntityId },

    /// Change fields of a book
    #[command(alias = "e")]
    Edit {
        id: EntityId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        year: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a book (its loans are kept)
    #[command(alias = "rm")]
    Delete { id: EntityId },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new user
    #[command(alias = "new")]
    Add {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Postal code, 8 digits (`.` and `-` are ignored)
        #[arg(long)]
        cep: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    /// List all users
    #[command(alias = "ls")]
    List,

    /// Show one user
    #[command(alias = "v")]
    Show { id: EntityId },

    /// Change fields of a user
    #[command(alias = "e")]
    Edit {
        id: EntityId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        cep: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    /// Delete a user (their loans are kept)
    #[command(alias = "rm")]
    Delete { id: EntityId },
}

#[derive(Subcommand, Debug)]
pub enum LoanCommands {
    /// Lend a book to a user
    #[command(alias = "new")]
    Add {
        /// Book id
        #[arg(long)]
        book: Option<EntityId>,
        /// User id
        #[arg(long)]
        user: Option<EntityId>,
        /// Loan date, YYYY-MM-DD (default: today)
        #[arg(long, value_name = "DATE")]
        loan_date: Option<String>,
        /// Due date, YYYY-MM-DD (default: loan date plus loan-days)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
    },

    /// List loans
    #[command(alias = "ls")]
    List {
        /// Only loans with this status (Emprestado, Devolvido, Atrasado)
        #[arg(short, long)]
        status: Option<StatusKind>,
    },

    /// Show one loan
    #[command(alias = "v")]
    Show { id: EntityId },

    /// Change fields of a loan
    #[command(alias = "e")]
    Edit {
        id: EntityId,
        #[arg(long)]
        book: Option<EntityId>,
        #[arg(long)]
        user: Option<EntityId>,
        #[arg(long, value_name = "DATE")]
        loan_date: Option<String>,
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        /// Emprestado, Devolvido or Atrasado
        #[arg(long)]
        status: Option<StatusKind>,
        /// Only allowed with status Devolvido (default: today)
        #[arg(long, value_name = "DATE")]
        returned_date: Option<String>,
    },

    /// Mark a loan as returned today
    #[command(alias = "r")]
    Return { id: EntityId },

    /// Delete a loan
    #[command(alias = "rm")]
    Delete { id: EntityId },
}
