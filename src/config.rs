// Runtime configuration read from the environment (and a `.env` file if the
// binary loaded one).

use std::env;
use std::path::PathBuf;

use tracing::info;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const SESSION_DIR_NAME: &str = ".bookshare";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend, without a trailing slash.
    pub api_url: String,
    /// Directory holding the persisted session.
    pub session_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let api_url = var("BOOKSHARE_API_URL").unwrap_or_else(|| {
            info!("BOOKSHARE_API_URL not set, using default: {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });
        let session_dir = var("BOOKSHARE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(default_session_dir);

        Self::new(api_url, session_dir)
    }

    pub fn new(api_url: impl Into<String>, session_dir: impl Into<PathBuf>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Config {
            api_url,
            session_dir: session_dir.into(),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn default_session_dir() -> PathBuf {
    let dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SESSION_DIR_NAME);
    info!("BOOKSHARE_HOME not set, using default: {}", dir.display());
    dir
}
