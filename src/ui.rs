// UI layer: interactive terminal menus built on `dialoguer`.
// The functions here only prompt and print. Every decision about what to
// fetch, validate or show lives in `dashboard` and `view`; this module turns
// their results into terminal output and their errors into one-line alerts.

use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::api::BookshareApi;
use crate::auth::Entry;
use crate::dashboard::{AddBookForm, Dashboard, Startup, Tab};
use crate::error::{Action, ClientError};
use crate::models::{AvailabilityType, Book, Condition, LoginRequest, RegisterRequest};
use crate::session::SessionStore;
use crate::view::{AvailabilityStatus, BadgeKind, BookCard, Grid, RequestList};

/// Drive the client until the user exits. Starts wherever `startup` says:
/// the entry menu without a session, the dashboard with one.
pub fn run<A: BookshareApi, S: SessionStore>(mut startup: Startup<A, S>) -> Result<()> {
    loop {
        let next = match startup {
            Startup::Unauthenticated(entry) => entry_menu(entry)?,
            Startup::Authenticated {
                dashboard,
                load_error,
            } => {
                if let Some(err) = load_error {
                    alert(Action::LoadBooks, &err);
                }
                dashboard_menu(dashboard)?
            }
        };
        match next {
            Some(state) => startup = state,
            None => break,
        }
    }
    Ok(())
}

/// Login / register menu. Returns the next state, or `None` on exit.
fn entry_menu<A: BookshareApi, S: SessionStore>(
    mut entry: Entry<A, S>,
) -> Result<Option<Startup<A, S>>> {
    loop {
        let items = vec!["Login", "Register", "Exit"];
        let selection = Select::new().items(&items).default(0).interact()?;
        let outcome = match selection {
            0 => handle_login(&mut entry)?,
            1 => handle_register(&mut entry)?,
            _ => return Ok(None),
        };
        if let Some(username) = outcome {
            println!("Welcome {}!", username);
            return Ok(Some(entry.enter()));
        }
    }
}

/// Collect credentials and log in. Returns the username on success.
fn handle_login<A: BookshareApi, S: SessionStore>(
    entry: &mut Entry<A, S>,
) -> Result<Option<String>> {
    let email: String = Input::new()
        .with_prompt("Email")
        .allow_empty(true)
        .interact_text()?;
    // `Password` hides input in terminal for passwords.
    let password: String = Password::new()
        .with_prompt("Password")
        .interact()?;

    let req = LoginRequest { email, password };
    match with_spinner("Logging in...", || entry.login(&req)) {
        Ok(session) => Ok(Some(session.user.username)),
        Err(e) => {
            alert(Action::Login, &e);
            Ok(None)
        }
    }
}

fn handle_register<A: BookshareApi, S: SessionStore>(
    entry: &mut Entry<A, S>,
) -> Result<Option<String>> {
    let username: String = Input::new()
        .with_prompt("Username")
        .allow_empty(true)
        .interact_text()?;
    let email: String = Input::new()
        .with_prompt("Email")
        .allow_empty(true)
        .interact_text()?;
    let password: String = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords don't match")
        .interact()?;
    let location: String = Input::new()
        .with_prompt("Location")
        .allow_empty(true)
        .interact_text()?;

    let req = RegisterRequest {
        username,
        email,
        password,
        location,
    };
    match with_spinner("Registering...", || entry.register(&req)) {
        Ok(session) => Ok(Some(session.user.username)),
        Err(e) => {
            alert(Action::Register, &e);
            Ok(None)
        }
    }
}

/// The logged-in menu. Returns the next state after a confirmed logout, or
/// `None` on exit.
fn dashboard_menu<A: BookshareApi, S: SessionStore>(
    mut dashboard: Dashboard<A, S>,
) -> Result<Option<Startup<A, S>>> {
    let user = &dashboard.session().user;
    println!("Logged in as {} ({})", user.username.as_str().bold(), user.location);
    render_grid(&dashboard.browse_view());

    loop {
        let items = vec![
            "Browse books",
            "Search books",
            "Request a book",
            "My books",
            "Add book",
            "Delete a book",
            "Sent requests",
            "Received requests",
            "Logout",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                let loaded = with_spinner("Loading books...", || dashboard.show_tab(Tab::Browse));
                if let Err(e) = loaded {
                    alert(Action::LoadBooks, &e);
                }
                render_grid(&dashboard.browse_view());
            }
            1 => {
                let query: String = Input::new()
                    .with_prompt("Search title or author")
                    .allow_empty(true)
                    .interact_text()?;
                render_grid(&dashboard.filter(&query));
            }
            2 => handle_request(&mut dashboard)?,
            3 => {
                let loaded =
                    with_spinner("Loading your books...", || dashboard.show_tab(Tab::MyBooks));
                if let Err(e) = loaded {
                    alert(Action::LoadMyBooks, &e);
                }
                render_grid(&dashboard.owned_view());
            }
            4 => handle_add_book(&mut dashboard)?,
            5 => handle_delete(&mut dashboard)?,
            6 => match with_spinner("Loading requests...", || dashboard.sent_requests()) {
                Ok(records) => render_requests(&crate::view::request_rows(&records)),
                Err(e) => alert(Action::LoadRequests, &e),
            },
            7 => match with_spinner("Loading requests...", || dashboard.received_requests()) {
                Ok(records) => render_requests(&crate::view::request_rows(&records)),
                Err(e) => alert(Action::LoadRequests, &e),
            },
            8 => {
                let confirmed = Confirm::new()
                    .with_prompt("Are you sure you want to logout?")
                    .default(false)
                    .interact()?;
                match dashboard.logout(confirmed.into()) {
                    Ok(Startup::Authenticated { dashboard: same, .. }) => dashboard = same,
                    Ok(unauthenticated) => return Ok(Some(unauthenticated)),
                    Err((same, e)) => {
                        alert(Action::Logout, &e);
                        dashboard = same;
                    }
                }
            }
            _ => return Ok(None),
        }
    }
}

/// Menu entries for choosing a book, with a trailing "Cancel". `None` when
/// there is nothing to choose from.
fn book_choices(books: &[Book]) -> Option<Vec<String>> {
    if books.is_empty() {
        return None;
    }
    let mut items: Vec<String> = books
        .iter()
        .map(|b| format!("#{} {} by {}", b.id, b.title, b.author))
        .collect();
    items.push("Cancel".into());
    Some(items)
}

/// `None` when the list is empty or the user picked "Cancel".
fn pick_book<'a>(prompt: &str, books: &'a [Book]) -> Result<Option<&'a Book>> {
    let Some(items) = book_choices(books) else {
        return Ok(None);
    };
    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    Ok(books.get(selection))
}

fn handle_request<A: BookshareApi, S: SessionStore>(dashboard: &mut Dashboard<A, S>) -> Result<()> {
    let Some(book_id) = pick_book("Which book?", dashboard.all_books())?.map(|b| b.id) else {
        return Ok(());
    };
    let Some(form) = dashboard.open_request(book_id) else {
        return Ok(());
    };

    println!("{} by {}", form.title.as_str().bold(), form.author);
    if form.options.is_empty() {
        println!("{}", "This book has no rent or sale price yet.".dark_grey());
        dashboard.close_request();
        return Ok(());
    }
    let labels: Vec<&str> = form.options.iter().map(|o| o.label.as_str()).collect();
    let choice = Select::new()
        .with_prompt("Request Type")
        .items(&labels)
        .default(0)
        .interact()?;
    let request_type = form.options[choice].kind;

    loop {
        let message: String = Input::new()
            .with_prompt("Message to Owner")
            .allow_empty(true)
            .interact_text()?;
        match with_spinner("Sending request...", || {
            dashboard.send_request(request_type, &message)
        }) {
            Ok(notice) => {
                success(notice);
                return Ok(());
            }
            Err(e) => alert(Action::SendRequest, &e),
        }
        let retry = Confirm::new()
            .with_prompt("Try again?")
            .default(true)
            .interact()?;
        if !retry {
            dashboard.close_request();
            return Ok(());
        }
    }
}

fn handle_add_book<A: BookshareApi, S: SessionStore>(dashboard: &mut Dashboard<A, S>) -> Result<()> {
    let title: String = Input::new()
        .with_prompt("Title *")
        .allow_empty(true)
        .interact_text()?;
    let author: String = Input::new()
        .with_prompt("Author *")
        .allow_empty(true)
        .interact_text()?;

    let conditions: Vec<&str> = Condition::ALL.iter().map(|c| c.label()).collect();
    let condition = Condition::ALL[Select::new()
        .with_prompt("Condition *")
        .items(&conditions)
        .default(0)
        .interact()?];

    let modes: Vec<&str> = AvailabilityType::ALL.iter().map(|a| a.label()).collect();
    let availability = AvailabilityType::ALL[Select::new()
        .with_prompt("Availability *")
        .items(&modes)
        .default(0)
        .interact()?];

    let rent_price = if availability.wants_rent_price() {
        Input::new()
            .with_prompt("Rent Price (₹)")
            .allow_empty(true)
            .interact_text()?
    } else {
        String::new()
    };
    let sale_price = if availability.wants_sale_price() {
        Input::new()
            .with_prompt("Sale Price (₹)")
            .allow_empty(true)
            .interact_text()?
    } else {
        String::new()
    };
    let description: String = Input::new()
        .with_prompt("Description")
        .allow_empty(true)
        .interact_text()?;

    let form = AddBookForm {
        title,
        author,
        condition,
        availability,
        rent_price,
        sale_price,
        description,
    };
    match with_spinner("Adding book...", || dashboard.add_book(&form)) {
        Ok(notice) => {
            success(notice);
            render_grid(&dashboard.owned_view());
        }
        Err(e) => alert(Action::AddBook, &e),
    }
    Ok(())
}

fn handle_delete<A: BookshareApi, S: SessionStore>(dashboard: &mut Dashboard<A, S>) -> Result<()> {
    if let Err(e) = with_spinner("Loading your books...", || dashboard.load_my_books()) {
        alert(Action::LoadMyBooks, &e);
    }
    if dashboard.my_books().is_empty() {
        println!("{}", crate::view::NO_OWNED_BOOKS.dark_grey());
        return Ok(());
    }
    let Some(book_id) = pick_book("Delete which book?", dashboard.my_books())?.map(|b| b.id) else {
        return Ok(());
    };

    let confirmed = Confirm::new()
        .with_prompt("Are you sure you want to delete this book?")
        .default(false)
        .interact()?;
    match with_spinner("Deleting...", || dashboard.delete_book(book_id, confirmed.into())) {
        Ok(Some(notice)) => {
            success(notice);
            render_grid(&dashboard.owned_view());
        }
        Ok(None) => {}
        Err(e) => alert(Action::DeleteBook, &e),
    }
    Ok(())
}

/// Run `f` with a spinner on screen.
fn with_spinner<T>(message: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = f();
    spinner.finish_and_clear();
    out
}

fn alert(action: Action, err: &ClientError) {
    println!("{}", action.user_message(err).red());
}

fn success(notice: &str) {
    println!("{}", notice.green());
}

fn render_grid(grid: &Grid) {
    match grid {
        Grid::Empty(placeholder) => println!("  {}", placeholder.dark_grey()),
        Grid::Cards(cards) => cards.iter().for_each(render_card),
    }
}

fn render_card(card: &BookCard) {
    match card.status {
        Some(status) => {
            let label = match status {
                AvailabilityStatus::Available => status.label().green(),
                AvailabilityStatus::Rented => status.label().dark_grey(),
            };
            println!("#{} {}  [{}]", card.book_id, card.title.as_str().bold(), label);
            println!("    by {}", card.author);
            println!("    Condition: {}", card.condition);
        }
        None => {
            println!("#{} {}", card.book_id, card.title.as_str().bold());
            println!("    by {}", card.author);
            println!(
                "    📍 {} • 👤 {}",
                card.location,
                card.owner.as_deref().unwrap_or("-")
            );
        }
    }

    let badges: Vec<String> = card
        .badges
        .iter()
        .map(|b| {
            let text = format!("{} {}", b.label, b.amount);
            match b.kind {
                BadgeKind::Rent => text.blue().bold().to_string(),
                BadgeKind::Sale => text.green().bold().to_string(),
            }
        })
        .collect();
    if !badges.is_empty() {
        println!("    {}", badges.join("  "));
    }
    println!("    ({})", card.action.label().dark_grey());
}

fn render_requests(list: &RequestList) {
    match list {
        RequestList::Empty(placeholder) => println!("  {}", placeholder.dark_grey()),
        RequestList::Rows(rows) => {
            for row in rows {
                println!(
                    "#{} {} [{}] {}",
                    row.request_id,
                    row.book.as_str().bold(),
                    row.request_type,
                    row.status
                );
                println!("    with {}", row.counterpart);
                if !row.message.is_empty() {
                    println!("    \"{}\"", row.message);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::book;

    #[test]
    fn empty_shelf_has_no_choices() {
        assert_eq!(book_choices(&[]), None);
    }

    #[test]
    fn cancel_is_the_last_choice_and_picks_nothing() {
        let books = vec![book(3, "Mine", Some(5), None), book(4, "Also mine", None, Some(9))];
        let items = book_choices(&books).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], "#3 Mine by Herbert");
        assert_eq!(items[2], "Cancel");
        assert!(books.get(items.len() - 1).is_none());
    }
}
