// Configuration constants and helpers shared by the client and the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base URL of the eero user API.
pub const DEFAULT_API_URL: &str = "https://api-user.e2ro.com/2.2/";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV_VAR: &str = "EERO_API_URL";

/// Default session file name.
pub const DEFAULT_SESSION_FILENAME: &str = "eero_session.txt";

/// Environment variable overriding the session file path.
pub const SESSION_FILE_ENV_VAR: &str = "SESSION_FILE";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Transport settings for `ApiClient`.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("eero-cli/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Resolve the session file location. A bare default file name is placed
/// next to the running executable (or in the home directory if that
/// cannot be determined); anything else is used as given.
pub fn resolve_session_path(requested: &Path) -> PathBuf {
    if requested != Path::new(DEFAULT_SESSION_FILENAME) {
        return requested.to_path_buf();
    }

    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(DEFAULT_SESSION_FILENAME)
}
