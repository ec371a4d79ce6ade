// Data shapes exchanged with the bookshare backend. Field names follow the
// backend's camelCase JSON; every struct here is plain data.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type BookId = i64;

/// A listed book. The marketplace listing and the owned-books listing return
/// slightly different shapes, so the fields only one of them carries are
/// optional or defaulted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub location: String,
    /// Owner's username. Absent on the owned-books listing.
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub availability_type: Option<String>,
    /// The marketplace listing only returns available books and omits the flag.
    #[serde(default = "listed_books_are_available")]
    pub is_available: bool,
    #[serde(default)]
    pub rent_price: Option<i64>,
    #[serde(default)]
    pub sale_price: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

fn listed_books_are_available() -> bool {
    true
}

impl Book {
    /// Whether the owner offers this book for the given kind of request.
    pub fn offers(&self, kind: RequestType) -> bool {
        match kind {
            RequestType::Rent => self.rent_price.is_some(),
            RequestType::Buy => self.sale_price.is_some(),
        }
    }
}

/// The persisted `currentUser` record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CurrentUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub location: String,
}

/// An authenticated session: who is logged in and the bearer token to use.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user: CurrentUser,
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    Rent,
    Buy,
}

impl RequestType {
    pub const ALL: [RequestType; 2] = [RequestType::Rent, RequestType::Buy];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestType::Rent => "rent",
            RequestType::Buy => "buy",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound rent/buy request. Built right before submission and dropped after.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub book_id: BookId,
    pub request_type: RequestType,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    New,
    #[serde(rename = "Like New")]
    LikeNew,
    Good,
    Fair,
}

impl Condition {
    pub const ALL: [Condition; 4] = [
        Condition::New,
        Condition::LikeNew,
        Condition::Good,
        Condition::Fair,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like New",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
        }
    }
}

/// Which prices the owner means to offer. Only steers which price prompts
/// the add-book form shows; nothing is enforced against it client-side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityType {
    Both,
    Rent,
    Sale,
}

impl AvailabilityType {
    pub const ALL: [AvailabilityType; 3] = [
        AvailabilityType::Both,
        AvailabilityType::Rent,
        AvailabilityType::Sale,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AvailabilityType::Both => "Rent & Sale",
            AvailabilityType::Rent => "Rent Only",
            AvailabilityType::Sale => "Sale Only",
        }
    }

    pub fn wants_rent_price(self) -> bool {
        matches!(self, AvailabilityType::Both | AvailabilityType::Rent)
    }

    pub fn wants_sale_price(self) -> bool {
        matches!(self, AvailabilityType::Both | AvailabilityType::Sale)
    }
}

/// Payload of `POST /books`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub condition: Condition,
    pub availability_type: AvailabilityType,
    pub rent_price: Option<i64>,
    pub sale_price: Option<i64>,
    pub description: String,
    pub location: String,
}

/// A rent/buy request as listed by `/requests/sent` and `/requests/received`.
/// Sent requests carry the owner's contact, received ones the requester's.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    pub request_id: i64,
    pub book_id: BookId,
    pub book_title: String,
    pub book_author: String,
    #[serde(default)]
    pub requester_name: Option<String>,
    #[serde(default)]
    pub requester_email: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    pub request_type: RequestType,
    #[serde(default)]
    pub message: Option<String>,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub location: String,
}

/// Every backend response is `{ success, message?, ...payload }`.
#[derive(Deserialize, Debug)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

#[derive(Deserialize, Debug, Default)]
pub struct BooksPayload {
    #[serde(default)]
    pub books: Vec<Book>,
}

#[derive(Deserialize, Debug, Default)]
pub struct RequestsPayload {
    #[serde(default)]
    pub requests: Vec<RequestRecord>,
}

#[derive(Deserialize, Debug, Default)]
pub struct AuthPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<CurrentUser>,
}

/// Mutating endpoints carry nothing beyond `success`/`message` that the
/// client uses.
#[derive(Deserialize, Debug, Default)]
pub struct Ack {}
