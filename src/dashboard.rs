//! The dashboard controller.
//!
//! A `Dashboard` only exists for an authenticated session: it is built by
//! [`Startup::restore`] from a saved session and turns back into
//! [`Startup::Unauthenticated`] on a confirmed logout. It owns the two book
//! snapshots (`all_books`, `my_books`), each replaced wholesale whenever it
//! reloads, and the book currently selected for a request.

use tracing::{debug, info, warn};

use crate::api::BookshareApi;
use crate::auth::Entry;
use crate::error::{ClientError, Result};
use crate::models::{
    AvailabilityType, Book, BookId, BookRequest, Condition, NewBook, RequestRecord, RequestType,
    Session,
};
use crate::session::SessionStore;
use crate::view::{self, Grid, RequestForm};

pub const REQUEST_SENT: &str = "Request sent successfully!";
pub const BOOK_ADDED: &str = "Book added successfully!";
pub const BOOK_DELETED: &str = "Book deleted successfully!";

pub const EMPTY_MESSAGE: &str = "Please enter a message";
pub const MISSING_TITLE_OR_AUTHOR: &str = "Please fill in required fields (Title and Author)";
pub const BAD_PRICE: &str = "Prices must be whole numbers";
pub const TYPE_NOT_OFFERED: &str = "This book is not offered for that kind of request";
pub const NOTHING_SELECTED: &str = "Choose a book to request first";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Browse,
    MyBooks,
}

/// The user's answer to an "are you sure?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(yes: bool) -> Self {
        if yes {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

/// Where the client stands: either at the entry menu or on the dashboard.
pub enum Startup<A, S> {
    Unauthenticated(Entry<A, S>),
    Authenticated {
        dashboard: Dashboard<A, S>,
        /// Set when the first listing fetch failed.
        load_error: Option<ClientError>,
    },
}

impl<A: BookshareApi, S: SessionStore> Startup<A, S> {
    /// Resume a saved session. Without one, nothing is fetched and the
    /// client starts at the entry menu.
    pub fn restore(mut api: A, store: S) -> Self {
        let session = match store.load() {
            Ok(Some(session)) => session,
            Ok(None) => return Startup::Unauthenticated(Entry::new(api, store)),
            Err(e) => {
                warn!("could not read saved session: {e}");
                return Startup::Unauthenticated(Entry::new(api, store));
            }
        };

        info!(user = %session.user.username, "resuming saved session");
        api.set_token(&session.token);
        let mut dashboard = Dashboard {
            api,
            store,
            session,
            all_books: Vec::new(),
            my_books: Vec::new(),
            tab: Tab::Browse,
            selected: None,
        };
        let load_error = dashboard.load_books().err();
        Startup::Authenticated {
            dashboard,
            load_error,
        }
    }
}

/// Raw add-book form input. Prices are kept as typed so that blank can mean
/// "not offered".
#[derive(Debug, Clone, PartialEq)]
pub struct AddBookForm {
    pub title: String,
    pub author: String,
    pub condition: Condition,
    pub availability: AvailabilityType,
    pub rent_price: String,
    pub sale_price: String,
    pub description: String,
}

impl AddBookForm {
    /// Validate the form and build the payload, taking the location from the
    /// logged-in user.
    pub fn to_new_book(&self, location: &str) -> Result<NewBook> {
        let title = self.title.trim();
        let author = self.author.trim();
        if title.is_empty() || author.is_empty() {
            return Err(ClientError::Validation(MISSING_TITLE_OR_AUTHOR));
        }
        Ok(NewBook {
            title: title.to_string(),
            author: author.to_string(),
            condition: self.condition,
            availability_type: self.availability,
            rent_price: parse_price(&self.rent_price)?,
            sale_price: parse_price(&self.sale_price)?,
            description: self.description.clone(),
            location: location.to_string(),
        })
    }
}

fn parse_price(input: &str) -> Result<Option<i64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse()
        .map(Some)
        .map_err(|_| ClientError::Validation(BAD_PRICE))
}

pub struct Dashboard<A, S> {
    api: A,
    store: S,
    session: Session,
    all_books: Vec<Book>,
    my_books: Vec<Book>,
    tab: Tab,
    selected: Option<Book>,
}

impl<A: BookshareApi, S: SessionStore> Dashboard<A, S> {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn username(&self) -> &str {
        &self.session.user.username
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn all_books(&self) -> &[Book] {
        &self.all_books
    }

    pub fn my_books(&self) -> &[Book] {
        &self.my_books
    }

    /// Refresh the marketplace snapshot. On failure the previous snapshot is
    /// kept.
    pub fn load_books(&mut self) -> Result<usize> {
        match self.api.list_books() {
            Ok(books) => {
                debug!(count = books.len(), "marketplace listing loaded");
                self.all_books = books;
                Ok(self.all_books.len())
            }
            Err(e) => {
                warn!("error loading books: {e}");
                Err(e)
            }
        }
    }

    /// Refresh the owned-books snapshot. On failure the previous snapshot is
    /// kept.
    pub fn load_my_books(&mut self) -> Result<usize> {
        match self.api.my_books() {
            Ok(books) => {
                debug!(count = books.len(), "owned books loaded");
                self.my_books = books;
                Ok(self.my_books.len())
            }
            Err(e) => {
                warn!("error loading my books: {e}");
                Err(e)
            }
        }
    }

    /// Switch tabs and reload the listing behind the new tab.
    pub fn show_tab(&mut self, tab: Tab) -> Result<usize> {
        self.tab = tab;
        match tab {
            Tab::Browse => self.load_books(),
            Tab::MyBooks => self.load_my_books(),
        }
    }

    pub fn browse_view(&self) -> Grid {
        view::browse_grid(&self.all_books)
    }

    pub fn owned_view(&self) -> Grid {
        view::owned_grid(&self.my_books)
    }

    /// Browse view restricted to books whose title or author contains
    /// `query`. Works on the current snapshot only.
    pub fn filter(&self, query: &str) -> Grid {
        view::browse_grid(view::filter_books(&self.all_books, query))
    }

    /// Select a marketplace book for a request and describe the form for it.
    pub fn open_request(&mut self, book_id: BookId) -> Option<RequestForm> {
        let book = self.all_books.iter().find(|b| b.id == book_id)?.clone();
        let form = view::request_form(&book);
        self.selected = Some(book);
        Some(form)
    }

    pub fn selected(&self) -> Option<&Book> {
        self.selected.as_ref()
    }

    pub fn close_request(&mut self) {
        self.selected = None;
    }

    /// Submit a request for the selected book. The selection is cleared only
    /// once the server accepts it.
    pub fn send_request(&mut self, request_type: RequestType, message: &str) -> Result<&'static str> {
        let book = self
            .selected
            .as_ref()
            .ok_or(ClientError::Validation(NOTHING_SELECTED))?;
        if message.trim().is_empty() {
            return Err(ClientError::Validation(EMPTY_MESSAGE));
        }
        if !book.offers(request_type) {
            return Err(ClientError::Validation(TYPE_NOT_OFFERED));
        }

        let request = BookRequest {
            book_id: book.id,
            request_type,
            message: message.to_string(),
        };
        self.api.send_request(&request)?;
        info!(book_id = request.book_id, %request_type, "request sent");
        self.close_request();
        Ok(REQUEST_SENT)
    }

    /// Add a book owned by the current user, then refresh the owned listing.
    pub fn add_book(&mut self, form: &AddBookForm) -> Result<&'static str> {
        let book = form.to_new_book(&self.session.user.location)?;
        self.api.add_book(&book)?;
        info!(title = %book.title, "book added");
        // The add itself succeeded; a failed refresh only leaves the view stale.
        let _ = self.load_my_books();
        Ok(BOOK_ADDED)
    }

    /// Delete one of the user's books. A declined confirmation sends nothing
    /// and returns `None`.
    pub fn delete_book(
        &mut self,
        book_id: BookId,
        confirmation: Confirmation,
    ) -> Result<Option<&'static str>> {
        if confirmation == Confirmation::Declined {
            return Ok(None);
        }
        self.api.delete_book(book_id)?;
        info!(book_id, "book deleted");
        let _ = self.load_my_books();
        Ok(Some(BOOK_DELETED))
    }

    pub fn sent_requests(&self) -> Result<Vec<RequestRecord>> {
        self.api.sent_requests()
    }

    pub fn received_requests(&self) -> Result<Vec<RequestRecord>> {
        self.api.received_requests()
    }

    /// Leave the dashboard. Declining keeps everything as it was; confirming
    /// forgets the saved session and returns to the entry menu. If the saved
    /// session cannot be removed the dashboard comes back with the error and
    /// stays logged in.
    pub fn logout(
        mut self,
        confirmation: Confirmation,
    ) -> std::result::Result<Startup<A, S>, (Self, ClientError)> {
        if confirmation == Confirmation::Declined {
            return Ok(Startup::Authenticated {
                dashboard: self,
                load_error: None,
            });
        }

        if let Err(e) = self.store.clear() {
            warn!("failed to clear saved session: {e}");
            return Err((self, e));
        }
        let Dashboard { mut api, store, .. } = self;
        api.clear_token();
        info!("logged out");
        Ok(Startup::Unauthenticated(Entry::new(api, store)))
    }
}
