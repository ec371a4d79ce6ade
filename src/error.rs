// Error types for the client library and the user-facing text each one maps
// to. The UI never distinguishes auth, validation and server faults: they all
// end up as one line of text shown to the user.

use thiserror::Error;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never completed or the body was not a valid envelope.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered `success: false`.
    #[error("rejected by server: {}", .message.as_deref().unwrap_or("<no message>"))]
    Rejected { message: Option<String> },

    /// Client-side validation refused the input before any request was made.
    #[error("{0}")]
    Validation(&'static str),

    #[error("session storage failed: {0}")]
    Storage(#[from] std::io::Error),

    #[error("session record is malformed: {0}")]
    SessionFormat(#[from] serde_json::Error),
}

impl ClientError {
    pub fn rejected(message: Option<String>) -> Self {
        ClientError::Rejected { message }
    }
}

/// User actions that can fail, each with its own fallback texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    LoadBooks,
    LoadMyBooks,
    LoadRequests,
    SendRequest,
    AddBook,
    DeleteBook,
    Login,
    Register,
    Logout,
}

impl Action {
    /// Shown when the server says no without saying why.
    pub fn fallback(self) -> &'static str {
        match self {
            Action::LoadBooks => "Failed to load books",
            Action::LoadMyBooks => "Failed to load your books",
            Action::LoadRequests => "Failed to load requests",
            Action::SendRequest => "Failed to send request",
            Action::AddBook => "Failed to add book",
            Action::DeleteBook => "Failed to delete book",
            Action::Login => "Login failed",
            Action::Register => "Registration failed",
            Action::Logout => "Failed to clear the saved session",
        }
    }

    /// Shown when the backend could not be reached or answered garbage.
    pub fn transport_failure(self) -> &'static str {
        match self {
            Action::LoadBooks => "Failed to load books. Make sure backend is running.",
            Action::LoadMyBooks => "Failed to load your books. Make sure backend is running.",
            Action::LoadRequests => "Failed to load requests. Make sure backend is running.",
            Action::SendRequest => "Failed to send request. Please try again.",
            Action::AddBook => "Failed to add book. Please try again.",
            Action::DeleteBook => "Failed to delete book. Please try again.",
            Action::Login => "Login failed. Make sure backend is running.",
            Action::Register => "Registration failed. Make sure backend is running.",
            Action::Logout => "Failed to clear the saved session",
        }
    }

    /// The single line shown to the user when `err` ends this action.
    pub fn user_message(self, err: &ClientError) -> String {
        match err {
            ClientError::Rejected {
                message: Some(message),
            } if !message.is_empty() => message.clone(),
            ClientError::Rejected { .. } => self.fallback().to_string(),
            ClientError::Validation(text) => (*text).to_string(),
            ClientError::Transport(_) => self.transport_failure().to_string(),
            ClientError::Storage(_) | ClientError::SessionFormat(_) => {
                self.fallback().to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = ClientError::rejected(Some("Book not found or unauthorized".into()));
        assert_eq!(
            Action::DeleteBook.user_message(&err),
            "Book not found or unauthorized"
        );
    }

    #[test]
    fn missing_or_empty_message_uses_fallback() {
        for action in [Action::SendRequest, Action::AddBook, Action::DeleteBook] {
            assert_eq!(
                action.user_message(&ClientError::rejected(None)),
                action.fallback()
            );
            assert_eq!(
                action.user_message(&ClientError::rejected(Some(String::new()))),
                action.fallback()
            );
        }
        assert_eq!(
            Action::SendRequest.user_message(&ClientError::rejected(None)),
            "Failed to send request"
        );
    }

    #[test]
    fn validation_text_is_shown_verbatim() {
        let err = ClientError::Validation("Please enter a message");
        assert_eq!(
            Action::SendRequest.user_message(&err),
            "Please enter a message"
        );
    }

    #[test]
    fn malformed_session_maps_to_fallback() {
        let err: ClientError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert_eq!(Action::Login.user_message(&err), "Login failed");
    }
}
