//! Run configuration
//!
//! Everything the pipeline needs from the environment is gathered into an
//! [`AppConfig`] once at startup and passed down explicitly.

use crate::auth::{AppIdentity, SigningKey};
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable holding the GitHub App ID
pub const ENV_APP_ID: &str = "DEMO_GITHUBAPP_APPID";
/// Environment variable holding the PEM private key
pub const ENV_PRIVATE_KEY: &str = "DEMO_GITHUBAPP_PRIVATE_KEY";
/// Environment variable holding a path to the PEM private key
pub const ENV_PRIVATE_KEY_PATH: &str = "DEMO_GITHUBAPP_PRIVATE_KEY_PATH";
/// Environment variable overriding the API base URL (GitHub Enterprise)
pub const ENV_API_URL: &str = "GITHUB_API_URL";

/// Public GitHub REST API
pub const DEFAULT_API_URL: &str = "https://api.github.com";
/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Retries after the first attempt for transport failures
pub const DEFAULT_MAX_RETRIES: u32 = 2;
/// Upper bound on pages followed for one listing
pub const DEFAULT_MAX_PAGES: u32 = 10;

/// Validated configuration for one run
#[derive(Clone)]
pub struct AppConfig {
    /// GitHub App ID (JWT issuer)
    pub app_id: String,
    /// PEM private key text
    pub private_key_pem: String,
    /// REST API base URL
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries for transport failures
    pub max_retries: u32,
    /// Maximum pages to follow per listing
    pub max_pages: u32,
}

impl AppConfig {
    /// Create a config with default transport settings
    pub fn new(app_id: impl Into<String>, private_key_pem: impl Into<String>) -> Result<Self> {
        let app_id = app_id.into().trim().to_string();
        let private_key_pem = private_key_pem.into();

        if app_id.is_empty() {
            return Err(Error::Config(format!("{ENV_APP_ID} is not set")));
        }
        if private_key_pem.trim().is_empty() {
            return Err(Error::Config(format!("{ENV_PRIVATE_KEY} is not set")));
        }

        Ok(Self {
            app_id,
            private_key_pem,
            api_url: parse_api_url(DEFAULT_API_URL)?,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Build a config from optional inputs
    ///
    /// Blank values count as missing. The inline key wins over the key path
    /// when both are set.
    pub fn from_parts(
        app_id: Option<String>,
        private_key: Option<String>,
        private_key_path: Option<PathBuf>,
    ) -> Result<Self> {
        let app_id = app_id
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{ENV_APP_ID} is not set")))?;

        let private_key = match (
            private_key.filter(|v| !v.trim().is_empty()),
            private_key_path.filter(|p| !p.as_os_str().is_empty()),
        ) {
            (Some(pem), _) => pem,
            (None, Some(path)) => read_private_key(&path)?,
            (None, None) => {
                return Err(Error::Config(format!(
                    "{ENV_PRIVATE_KEY} or {ENV_PRIVATE_KEY_PATH} must be set"
                )));
            }
        };

        Self::new(app_id, private_key)
    }

    /// Build a config from a variable lookup (usually the process environment)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::from_parts(
            lookup(ENV_APP_ID),
            lookup(ENV_PRIVATE_KEY),
            lookup(ENV_PRIVATE_KEY_PATH).map(PathBuf::from),
        )?;
        if let Some(api_url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config = config.with_api_url(&api_url)?;
        }
        Ok(config)
    }

    /// Build a config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Point at a different API base URL
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self> {
        self.api_url = parse_api_url(api_url)?;
        Ok(self)
    }

    /// Set the per-request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries for transport failures
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the maximum number of pages followed per listing
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Load the key and bind it to the app ID
    pub fn identity(&self) -> Result<AppIdentity> {
        let key = SigningKey::from_pem(&self.private_key_pem)?;
        AppIdentity::new(self.app_id.clone(), key)
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("app_id", &self.app_id)
            .field("private_key_pem", &"<redacted>")
            .field("api_url", &self.api_url.as_str())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

/// Read a PEM key from disk
pub fn read_private_key(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "failed to read private key from {}: {e}",
            path.display()
        ))
    })
}

/// Parse an API base URL, normalizing it to end with `/` so joins keep any path prefix
fn parse_api_url(raw: &str) -> Result<Url> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| Error::Config(format!("invalid API URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "API URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
