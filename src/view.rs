//! View models for the dashboard.
//!
//! Everything here is pure data shaping: which badges a card shows, what an
//! empty grid says, which request types a book can be asked for. The terminal
//! front end in [`crate::ui`] only prints what these functions return.

use crate::models::{Book, BookId, RequestRecord, RequestType};

pub const NO_BOOKS_FOUND: &str = "No books found";
pub const NO_OWNED_BOOKS: &str =
    "No books added yet. Choose \"Add book\" to list your first book!";
pub const NO_REQUESTS: &str = "No requests yet";

/// What a grid of cards renders to.
#[derive(Debug, Clone, PartialEq)]
pub enum Grid {
    /// Nothing to show; display the placeholder instead of an empty grid.
    Empty(&'static str),
    Cards(Vec<BookCard>),
}

impl Grid {
    pub fn cards(&self) -> &[BookCard] {
        match self {
            Grid::Empty(_) => &[],
            Grid::Cards(cards) => cards,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeKind {
    Rent,
    Sale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBadge {
    pub kind: BadgeKind,
    pub label: &'static str,
    pub amount: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Request,
    Delete,
}

impl CardAction {
    pub fn label(self) -> &'static str {
        match self {
            CardAction::Request => "Request Book",
            CardAction::Delete => "Delete Book",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityStatus {
    Available,
    Rented,
}

impl AvailabilityStatus {
    pub fn label(self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "Available",
            AvailabilityStatus::Rented => "Rented",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookCard {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub location: String,
    pub owner: Option<String>,
    pub condition: String,
    pub badges: Vec<PriceBadge>,
    /// Only owned-book cards show availability.
    pub status: Option<AvailabilityStatus>,
    pub action: CardAction,
}

pub fn format_price(amount: i64) -> String {
    format!("₹{amount}")
}

fn badges(book: &Book, sale_label: &'static str) -> Vec<PriceBadge> {
    let rent = book.rent_price.map(|p| PriceBadge {
        kind: BadgeKind::Rent,
        label: "RENT",
        amount: format_price(p),
    });
    let sale = book.sale_price.map(|p| PriceBadge {
        kind: BadgeKind::Sale,
        label: sale_label,
        amount: format_price(p),
    });
    rent.into_iter().chain(sale).collect()
}

/// Marketplace card: prices as rent/buy badges and a request action.
pub fn browse_card(book: &Book) -> BookCard {
    BookCard {
        book_id: book.id,
        title: book.title.clone(),
        author: book.author.clone(),
        location: book.location.clone(),
        owner: book.owner.clone(),
        condition: book.condition.clone(),
        badges: badges(book, "BUY"),
        status: None,
        action: CardAction::Request,
    }
}

/// Owned-book card: availability status and a delete action.
pub fn owned_card(book: &Book) -> BookCard {
    let status = if book.is_available {
        AvailabilityStatus::Available
    } else {
        AvailabilityStatus::Rented
    };
    BookCard {
        book_id: book.id,
        title: book.title.clone(),
        author: book.author.clone(),
        location: book.location.clone(),
        owner: book.owner.clone(),
        condition: book.condition.clone(),
        badges: badges(book, "SALE"),
        status: Some(status),
        action: CardAction::Delete,
    }
}

pub fn browse_grid<'a>(books: impl IntoIterator<Item = &'a Book>) -> Grid {
    grid(books, browse_card, NO_BOOKS_FOUND)
}

pub fn owned_grid<'a>(books: impl IntoIterator<Item = &'a Book>) -> Grid {
    grid(books, owned_card, NO_OWNED_BOOKS)
}

fn grid<'a>(
    books: impl IntoIterator<Item = &'a Book>,
    card: fn(&Book) -> BookCard,
    placeholder: &'static str,
) -> Grid {
    let cards: Vec<BookCard> = books.into_iter().map(card).collect();
    if cards.is_empty() {
        Grid::Empty(placeholder)
    } else {
        Grid::Cards(cards)
    }
}

/// Case-insensitive substring match on title or author. An empty query
/// matches everything.
pub fn filter_books<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    let q = query.to_lowercase();
    books
        .iter()
        .filter(|b| b.title.to_lowercase().contains(&q) || b.author.to_lowercase().contains(&q))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOption {
    pub kind: RequestType,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestForm {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    /// One entry per price the owner set; may be empty.
    pub options: Vec<RequestOption>,
}

pub fn request_form(book: &Book) -> RequestForm {
    let options = RequestType::ALL
        .into_iter()
        .filter_map(|kind| {
            let (name, price) = match kind {
                RequestType::Rent => ("Rent", book.rent_price?),
                RequestType::Buy => ("Buy", book.sale_price?),
            };
            Some(RequestOption {
                kind,
                label: format!("{name} ({})", format_price(price)),
            })
        })
        .collect();

    RequestForm {
        book_id: book.id,
        title: book.title.clone(),
        author: book.author.clone(),
        options,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRow {
    pub request_id: i64,
    pub book: String,
    /// The other party: the owner for sent requests, the requester for
    /// received ones.
    pub counterpart: String,
    pub request_type: RequestType,
    pub status: String,
    pub message: String,
}

pub enum RequestList {
    Empty(&'static str),
    Rows(Vec<RequestRow>),
}

pub fn request_rows(records: &[RequestRecord]) -> RequestList {
    if records.is_empty() {
        return RequestList::Empty(NO_REQUESTS);
    }
    let rows = records
        .iter()
        .map(|r| {
            let (name, email) = match (&r.owner_name, &r.requester_name) {
                (Some(owner), _) => (owner.as_str(), r.owner_email.as_deref()),
                (None, Some(requester)) => (requester.as_str(), r.requester_email.as_deref()),
                (None, None) => ("unknown", None),
            };
            let counterpart = match email {
                Some(email) => format!("{name} <{email}>"),
                None => name.to_string(),
            };
            RequestRow {
                request_id: r.request_id,
                book: format!("{} by {}", r.book_title, r.book_author),
                counterpart,
                request_type: r.request_type,
                status: r.status.clone(),
                message: r.message.clone().unwrap_or_default(),
            }
        })
        .collect();
    RequestList::Rows(rows)
}
