// Persisted session: the bearer token and the `currentUser` record, kept in
// two files so either can go missing independently, just like the two
// storage keys they replace.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{CurrentUser, Session};

const TOKEN_FILE: &str = "auth_token";
const USER_FILE: &str = "current_user.json";

pub trait SessionStore {
    /// The saved session, or `None` when the token or the user record is
    /// missing.
    fn load(&self) -> Result<Option<Session>>;
    fn save(&mut self, session: &Session) -> Result<()>;
    /// Forget the session. Clearing an empty store is not an error.
    fn clear(&mut self) -> Result<()>;
}

/// File-backed store rooted at a per-user directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileSessionStore { dir: dir.into() }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let token = read_optional(&self.token_path())?
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        let user = read_optional(&self.user_path())?;

        let (Some(token), Some(user)) = (token, user) else {
            debug!(dir = %self.dir.display(), "no saved session");
            return Ok(None);
        };

        match serde_json::from_str::<CurrentUser>(&user) {
            Ok(user) => Ok(Some(Session { user, token })),
            Err(e) => {
                warn!("ignoring unreadable saved user record: {e}");
                Ok(None)
            }
        }
    }

    fn save(&mut self, session: &Session) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.token_path(), &session.token)?;
        fs::write(self.user_path(), serde_json::to_string(&session.user)?)?;
        debug!(user = %session.user.username, "session saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        remove_if_present(&self.token_path())?;
        remove_if_present(&self.user_path())?;
        Ok(())
    }
}
