use bookfy::api::{CmdMessage, MessageLevel};
use bookfy::config::{BookfyConfig, KEYS};
use bookfy::lookup::LoanView;
use bookfy::model::{format_date, Book, StatusKind, User};
use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 15;
const DATE_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 10;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_books(books: &[Book]) {
    if books.is_empty() {
        println!("No books found.");
        return;
    }

    for book in books {
        let meta = format!("{} · {} · {}", book.author, book.genre, book.year);
        let title_width = LINE_WIDTH.saturating_sub(ID_WIDTH + 2 + meta.width() + 2);
        let title = pad_to_width(&truncate_to_width(&book.title, title_width), title_width);
        println!(
            "{}  {}  {}",
            format!("{:>w$}", book.id, w = ID_WIDTH).yellow(),
            title.bold(),
            meta.dimmed()
        );
    }
}

pub(super) fn print_full_book(book: &Book) {
    println!("{} {}", book.id.to_string().yellow(), book.title.bold());
    println!("--------------------------------");
    println!("Author:      {}", book.author);
    println!("Genre:       {}", book.genre);
    println!("Year:        {}", book.year);
    println!("Description: {}", book.description);
}

pub(super) fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    for user in users {
        let contact = format!("{} · {}", user.email, user.phone);
        let name_width = LINE_WIDTH.saturating_sub(ID_WIDTH + 2 + contact.width() + 2);
        let name = pad_to_width(&truncate_to_width(&user.name, name_width), name_width);
        println!(
            "{}  {}  {}",
            format!("{:>w$}", user.id, w = ID_WIDTH).yellow(),
            name.bold(),
            contact.dimmed()
        );
    }
}

pub(super) fn print_full_user(user: &User) {
    println!("{} {}", user.id.to_string().yellow(), user.name.bold());
    println!("--------------------------------");
    println!("Email:   {}", user.email);
    println!("Phone:   {}", user.phone);
    if !user.cep.is_empty() {
        println!("CEP:     {}", user.cep);
    }
    if !user.address.is_empty() {
        println!("Address: {}", user.address);
    }
}

pub(super) fn print_loans(views: &[LoanView]) {
    if views.is_empty() {
        println!("No loans found.");
        return;
    }

    // id, two dates, status and the gaps between them
    let fixed = ID_WIDTH + 2 + DATE_WIDTH * 2 + 3 + 2 + STATUS_WIDTH + 2;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let book_width = available / 2;
    let user_width = available - book_width;

    for view in views {
        let loan = &view.loan;
        let book = pad_to_width(&truncate_to_width(view.book_label(), book_width), book_width);
        let user = pad_to_width(&truncate_to_width(view.user_label(), user_width), user_width);
        let book = if view.book.is_missing() {
            book.red()
        } else {
            book.normal()
        };
        let user = if view.user.is_missing() {
            user.red()
        } else {
            user.normal()
        };

        let status = format!("{:<w$}", loan.status.kind().label(), w = STATUS_WIDTH);
        let returned = loan
            .status
            .returned_date()
            .map(|d| format!(" {}", format_date(d)))
            .unwrap_or_default();

        println!(
            "{}  {}{}{} → {}  {}{}",
            format!("{:>w$}", loan.id, w = ID_WIDTH).yellow(),
            book,
            user,
            format_date(loan.loan_date).dimmed(),
            format_date(loan.due_date),
            status_colored(view, &status),
            returned.dimmed()
        );
    }
}

pub(super) fn print_full_loan(view: &LoanView) {
    let loan = &view.loan;
    println!(
        "{} {}",
        loan.id.to_string().yellow(),
        status_colored(view, loan.status.kind().label())
    );
    println!("--------------------------------");
    println!("Book:     {} ({})", view.book_label(), loan.book_id);
    println!("User:     {} ({})", view.user_label(), loan.user_id);
    println!("Loaned:   {}", format_date(loan.loan_date));
    println!("Due:      {}", format_date(loan.due_date));
    if let Some(returned) = loan.status.returned_date() {
        println!("Returned: {}", format_date(returned));
    }
    if view.past_due {
        println!("{}", "Past its due date".red());
    }
}

pub(super) fn print_config(config: &BookfyConfig) {
    for key in KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn status_colored(view: &LoanView, text: &str) -> colored::ColoredString {
    match view.loan.status.kind() {
        StatusKind::Returned => text.green(),
        StatusKind::Overdue => text.red(),
        StatusKind::Active if view.past_due => text.yellow(),
        StatusKind::Active => text.normal(),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_to_width("Dune", 10), "Dune");
        assert_eq!(truncate_to_width("Dune", 4), "Dune");
    }

    #[test]
    fn truncate_marks_cut_strings() {
        assert_eq!(truncate_to_width("Grande Sertão: Veredas", 8), "Grande …");
        assert_eq!(truncate_to_width("漢字漢字", 5), "漢字…");
    }

    #[test]
    fn pad_accounts_for_wide_chars() {
        assert_eq!(pad_to_width("漢字", 6).width(), 7);
    }
}
