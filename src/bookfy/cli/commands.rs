use super::print::{
    print_books, print_config, print_full_book, print_full_loan, print_full_user, print_loans,
    print_messages, print_users,
};
use super::setup::{BookCommands, Cli, Commands, LoanCommands, UserCommands};
use bookfy::api::{
    BookChanges, BookfyApi, BookfyPaths, CmdResult, ConfigAction, LoanChanges, LoanFilter,
    UserChanges,
};
use bookfy::config::BookfyConfig;
use bookfy::error::{BookfyError, Result};
use bookfy::forms::{BookForm, UserForm};
use bookfy::model::parse_date;
use bookfy::store::fs_backend::FsBackend;
use clap::Parser;
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const HOME_ENV: &str = "BOOKFY_HOME";

struct AppContext {
    api: BookfyApi<FsBackend>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;

    let loaded = BookfyConfig::load(&data_dir);
    init_logging(
        cli.verbose,
        loaded.as_ref().map(|c| c.log_level.as_str()).unwrap_or("warn"),
    );
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, using defaults");
        BookfyConfig::default()
    });
    tracing::debug!(data_dir = %data_dir.display(), "starting");

    let mut ctx = init_context(data_dir, config);

    match cli.command {
        Commands::Book(cmd) => handle_book(&mut ctx, cmd),
        Commands::User(cmd) => handle_user(&mut ctx, cmd),
        Commands::Loan(cmd) => handle_loan(&mut ctx, cmd),
        Commands::Doctor => handle_doctor(&ctx),
        Commands::Config { key, value } => handle_config(&mut ctx, key, value),
    }
}

/// `--data-dir`, then `$BOOKFY_HOME`, then the platform data directory.
fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "bookfy", "bookfy")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BookfyError::Api("Could not determine data directory".into()))
}

/// `-v` wins, then `RUST_LOG`, then the configured `log-level`.
fn init_logging(verbose: bool, configured: &str) {
    let filter = if verbose {
        EnvFilter::new("bookfy=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn init_context(data_dir: PathBuf, config: BookfyConfig) -> AppContext {
    let backend = FsBackend::new(data_dir.clone());
    let paths = BookfyPaths { data_dir };
    AppContext {
        api: BookfyApi::new(backend, paths, config),
    }
}

fn handle_book(ctx: &mut AppContext, cmd: BookCommands) -> Result<()> {
    let result = match cmd {
        BookCommands::Add {
            title,
            author,
            genre,
            year,
            description,
        } => {
            let form = BookForm {
                title: title.unwrap_or_default(),
                author: author.unwrap_or_default(),
                genre: genre.unwrap_or_default(),
                year: year.unwrap_or_default(),
                description: description.unwrap_or_default(),
            };
            ctx.api.create_book(&form)?
        }
        BookCommands::List => {
            let result = ctx.api.list_books()?;
            print_books(&result.books);
            result
        }
        BookCommands::Show { id } => {
            let result = ctx.api.show_book(id)?;
            result.books.iter().for_each(print_full_book);
            result
        }
        BookCommands::Edit {
            id,
            title,
            author,
            genre,
            year,
            description,
        } => ctx.api.update_book(
            id,
            BookChanges {
                title,
                author,
                genre,
                year,
                description,
            },
        )?,
        BookCommands::Delete { id } => ctx.api.delete_book(id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_user(ctx: &mut AppContext, cmd: UserCommands) -> Result<()> {
    let result = match cmd {
        UserCommands::Add {
            name,
            email,
            phone,
            cep,
            address,
        } => {
            let form = UserForm {
                name: name.unwrap_or_default(),
                email: email.unwrap_or_default(),
                phone: phone.unwrap_or_default(),
                cep: cep.unwrap_or_default(),
                address: address.unwrap_or_default(),
            };
            ctx.api.create_user(&form)?
        }
        UserCommands::List => {
            let result = ctx.api.list_users()?;
            print_users(&result.users);
            result
        }
        UserCommands::Show { id } => {
            let result = ctx.api.show_user(id)?;
            result.users.iter().for_each(print_full_user);
            result
        }
        UserCommands::Edit {
            id,
            name,
            email,
            phone,
            cep,
            address,
        } => ctx.api.update_user(
            id,
            UserChanges {
                name,
                email,
                phone,
                cep,
                address,
            },
        )?,
        UserCommands::Delete { id } => ctx.api.delete_user(id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_loan(ctx: &mut AppContext, cmd: LoanCommands) -> Result<()> {
    let result = match cmd {
        LoanCommands::Add {
            book,
            user,
            loan_date,
            due,
        } => {
            let start = loan_date.as_deref().and_then(parse_date);
            let mut form = ctx.api.new_loan_form(start);
            form.book_id = book;
            form.user_id = user;
            // An unparsable date is kept as typed so validation names it.
            if let Some(raw) = loan_date {
                form.loan_date = raw;
            }
            if let Some(raw) = due {
                form.due_date = raw;
            }
            ctx.api.create_loan(&form)?
        }
        LoanCommands::List { status } => {
            let result = ctx.api.list_loans(LoanFilter { status })?;
            print_loans(&result.loans);
            result
        }
        LoanCommands::Show { id } => {
            let result = ctx.api.show_loan(id)?;
            result.loans.iter().for_each(print_full_loan);
            result
        }
        LoanCommands::Edit {
            id,
            book,
            user,
            loan_date,
            due,
            status,
            returned_date,
        } => ctx.api.update_loan(
            id,
            LoanChanges {
                book_id: book,
                user_id: user,
                loan_date,
                due_date: due,
                status,
                returned_date,
            },
        )?,
        LoanCommands::Return { id } => ctx.api.return_loan(id)?,
        LoanCommands::Delete { id } => ctx.api.delete_loan(id)?,
    };
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    if !result.loans.is_empty() {
        print_loans(&result.loans);
        println!();
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result: CmdResult = ctx.api.config(action)?;
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
