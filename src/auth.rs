// Entry flows for a client without a session: log in or register, persist
// the session the backend hands back, then move on to the dashboard.

use tracing::info;

use crate::api::BookshareApi;
use crate::dashboard::Startup;
use crate::error::{ClientError, Result};
use crate::models::{AuthPayload, LoginRequest, RegisterRequest, Session};
use crate::session::SessionStore;

pub const MISSING_CREDENTIALS: &str = "Email and password are required";
pub const MISSING_REGISTRATION_FIELDS: &str = "All fields are required";

/// The unauthenticated state: holds the API client and the session store
/// until a login or registration succeeds.
pub struct Entry<A, S> {
    api: A,
    store: S,
}

impl<A: BookshareApi, S: SessionStore> Entry<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Entry { api, store }
    }

    /// Log in and persist the returned session.
    pub fn login(&mut self, req: &LoginRequest) -> Result<Session> {
        if req.email.trim().is_empty() || req.password.is_empty() {
            return Err(ClientError::Validation(MISSING_CREDENTIALS));
        }
        let payload = self.api.login(req)?;
        self.persist(payload)
    }

    /// Create an account; the backend logs the new user in straight away.
    pub fn register(&mut self, req: &RegisterRequest) -> Result<Session> {
        let blank = [&req.username, &req.email, &req.location]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank || req.password.is_empty() {
            return Err(ClientError::Validation(MISSING_REGISTRATION_FIELDS));
        }
        let payload = self.api.register(req)?;
        self.persist(payload)
    }

    fn persist(&mut self, payload: AuthPayload) -> Result<Session> {
        let (Some(token), Some(user)) = (payload.token, payload.user) else {
            // success without credentials is as good as a refusal
            return Err(ClientError::rejected(None));
        };
        let session = Session { user, token };
        self.store.save(&session)?;
        info!(user = %session.user.username, "session saved");
        Ok(session)
    }

    /// Re-run the session guard, normally right after a successful login.
    pub fn enter(self) -> Startup<A, S> {
        Startup::restore(self.api, self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::tests::{session, user, Call, FakeApi, MemoryStore, Reply};

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn blank_credentials_make_no_call() {
        let api = FakeApi::default();
        let mut entry = Entry::new(api.clone(), MemoryStore::default());
        let err = entry.login(&login_req(" ", "pw")).unwrap_err();
        assert!(matches!(err, ClientError::Validation(MISSING_CREDENTIALS)));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn login_persists_session_and_enters_dashboard() {
        let api = FakeApi::default();
        api.0.borrow_mut().auth = Some(("tok-123".into(), user()));
        let store = MemoryStore::default();
        let mut entry = Entry::new(api.clone(), store.clone());

        assert_eq!(
            entry.login(&login_req("asha@example.com", "pw")).unwrap(),
            session()
        );
        assert_eq!(store.0.borrow().session, Some(session()));

        match entry.enter() {
            Startup::Authenticated { dashboard, .. } => assert_eq!(dashboard.username(), "asha"),
            Startup::Unauthenticated(_) => panic!("login should lead to the dashboard"),
        }
        assert_eq!(
            api.calls(),
            vec![Call::Login("asha@example.com".into()), Call::ListBooks]
        );
    }

    #[test]
    fn rejected_login_saves_nothing() {
        let api = FakeApi::default();
        api.reply_with(Reply::Rejected(Some("Invalid credentials".into())));
        let store = MemoryStore::default();
        let mut entry = Entry::new(api, store.clone());

        let err = entry.login(&login_req("asha@example.com", "nope")).unwrap_err();
        assert_eq!(
            crate::error::Action::Login.user_message(&err),
            "Invalid credentials"
        );
        assert_eq!(store.0.borrow().session, None);
    }

    #[test]
    fn success_without_token_is_a_failure() {
        let api = FakeApi::default();
        let store = MemoryStore::default();
        let mut entry = Entry::new(api, store.clone());

        let err = entry.login(&login_req("asha@example.com", "pw")).unwrap_err();
        assert!(matches!(err, ClientError::Rejected { message: None }));
        assert_eq!(store.0.borrow().session, None);
    }

    #[test]
    fn register_requires_every_field() {
        let api = FakeApi::default();
        let mut entry = Entry::new(api.clone(), MemoryStore::default());
        let req = RegisterRequest {
            username: "asha".into(),
            email: "asha@example.com".into(),
            password: "pw".into(),
            location: "  ".into(),
        };
        assert!(matches!(
            entry.register(&req),
            Err(ClientError::Validation(MISSING_REGISTRATION_FIELDS))
        ));
        assert!(api.calls().is_empty());
    }
}
