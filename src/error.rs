//! Error types for ghapp
//!
//! One variant per failure kind of the authentication pipeline. Each kind maps
//! to a distinct process exit code (see [`Error::exit_code`]).

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while authenticating as a GitHub App
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration input
    #[error("configuration error: {0}")]
    Config(String),

    /// Private key is not a usable unencrypted RSA PEM key
    #[error("failed to parse private key: {0}")]
    KeyParse(String),

    /// JWT could not be signed
    #[error("failed to sign app token: {0}")]
    Signing(String),

    /// Provider rejected the presented credentials
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// Network-level failure (connect, timeout, server error)
    #[error("transport error: {0}")]
    Transport(String),

    /// Response could not be decoded into the expected shape
    #[error("unexpected response: {0}")]
    Parse(String),

    /// Provider answered with a non-success status other than an auth failure
    #[error("GitHub API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the response body
        message: String,
    },
}

impl Error {
    /// Process exit code for this failure kind
    ///
    /// 1 and 2 are left to generic failures and clap usage errors.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 9,
            Self::KeyParse(_) => 3,
            Self::Signing(_) => 4,
            Self::Auth(_) => 5,
            Self::Transport(_) => 6,
            Self::Parse(_) => 7,
            Self::Api { .. } => 8,
        }
    }

    /// Whether retrying the same request may succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Signing(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
