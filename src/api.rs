// API client module: a small blocking HTTP client for the bookshare backend.
// Every endpoint answers with a `{ success, message?, ... }` envelope, which is
// decoded regardless of the HTTP status because the backend reports its own
// failures (bad token, missing book, ...) inside that envelope.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::{
    Ack, AuthPayload, Book, BookId, BookRequest, BooksPayload, Envelope, LoginRequest, NewBook,
    RegisterRequest, RequestRecord, RequestsPayload,
};

/// The backend operations the dashboard relies on. `ApiClient` is the real
/// implementation; tests substitute a recording fake.
pub trait BookshareApi {
    /// Store a token for subsequent authenticated requests.
    fn set_token(&mut self, token: &str);
    fn clear_token(&mut self);

    /// `GET /books`, unauthenticated.
    fn list_books(&self) -> Result<Vec<Book>>;
    /// `GET /books/my`.
    fn my_books(&self) -> Result<Vec<Book>>;
    /// `POST /books`.
    fn add_book(&self, book: &NewBook) -> Result<Option<String>>;
    /// `DELETE /books/{id}`.
    fn delete_book(&self, id: BookId) -> Result<Option<String>>;
    /// `POST /requests`.
    fn send_request(&self, request: &BookRequest) -> Result<Option<String>>;

    fn sent_requests(&self) -> Result<Vec<RequestRecord>>;
    fn received_requests(&self) -> Result<Vec<RequestRecord>>;

    fn login(&self, req: &LoginRequest) -> Result<AuthPayload>;
    fn register(&self, req: &RegisterRequest) -> Result<AuthPayload>;
}

/// Blocking API client: a reqwest client, the base URL of the backend and an
/// optional bearer token for authenticated calls.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(ApiClient {
            client,
            base_url: config.api_url.clone(),
            token: None,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authorization header for the stored token. A token that cannot be
    /// carried in a header is left off, and the backend then rejects the call
    /// as unauthenticated.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(t) = &self.token {
            match HeaderValue::from_str(&format!("Bearer {}", t)) {
                Ok(val) => {
                    headers.insert(AUTHORIZATION, val);
                }
                Err(e) => warn!("stored token is not a valid header value: {e}"),
            }
        }
        headers
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.headers(self.auth_headers())
    }

    /// Send and decode the envelope. `success: false` becomes `Rejected`.
    fn exchange<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<(T, Option<String>)> {
        let res = req.send()?;
        let status = res.status();
        let envelope: Envelope<T> = res.json()?;
        debug!(%status, success = envelope.success, "backend replied");
        if envelope.success {
            Ok((envelope.payload, envelope.message))
        } else {
            Err(ClientError::rejected(envelope.message))
        }
    }
}

impl BookshareApi for ApiClient {
    fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    fn clear_token(&mut self) {
        self.token = None;
    }

    fn list_books(&self) -> Result<Vec<Book>> {
        let req = self.client.get(self.url("/books"));
        let (payload, _) = self.exchange::<BooksPayload>(req)?;
        Ok(payload.books)
    }

    fn my_books(&self) -> Result<Vec<Book>> {
        let req = self.authed(self.client.get(self.url("/books/my")));
        let (payload, _) = self.exchange::<BooksPayload>(req)?;
        Ok(payload.books)
    }

    fn add_book(&self, book: &NewBook) -> Result<Option<String>> {
        let req = self.authed(self.client.post(self.url("/books")).json(book));
        let (_, message) = self.exchange::<Ack>(req)?;
        Ok(message)
    }

    fn delete_book(&self, id: BookId) -> Result<Option<String>> {
        let req = self.authed(self.client.delete(self.url(&format!("/books/{id}"))));
        let (_, message) = self.exchange::<Ack>(req)?;
        Ok(message)
    }

    fn send_request(&self, request: &BookRequest) -> Result<Option<String>> {
        let req = self.authed(self.client.post(self.url("/requests")).json(request));
        let (_, message) = self.exchange::<Ack>(req)?;
        Ok(message)
    }

    fn sent_requests(&self) -> Result<Vec<RequestRecord>> {
        let req = self.authed(self.client.get(self.url("/requests/sent")));
        let (payload, _) = self.exchange::<RequestsPayload>(req)?;
        Ok(payload.requests)
    }

    fn received_requests(&self) -> Result<Vec<RequestRecord>> {
        let req = self.authed(self.client.get(self.url("/requests/received")));
        let (payload, _) = self.exchange::<RequestsPayload>(req)?;
        Ok(payload.requests)
    }

    fn login(&self, req: &LoginRequest) -> Result<AuthPayload> {
        let req = self.client.post(self.url("/login")).json(req);
        let (payload, _) = self.exchange::<AuthPayload>(req)?;
        Ok(payload)
    }

    fn register(&self, req: &RegisterRequest) -> Result<AuthPayload> {
        let req = self.client.post(self.url("/register")).json(req);
        let (payload, _) = self.exchange::<AuthPayload>(req)?;
        Ok(payload)
    }
}
