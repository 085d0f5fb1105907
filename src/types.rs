//! Core types for ghapp

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of an app installation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstallationId(pub u64);

impl fmt::Display for InstallationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for InstallationId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The account (organization, user or enterprise) an app is installed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account login (organization name or username)
    ///
    /// Enterprise accounts have no login and are identified by their slug.
    #[serde(alias = "slug")]
    pub login: String,
    /// Account type as reported by GitHub ("Organization", "User", ...)
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
}

/// One installation of the app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    /// Installation ID
    pub id: InstallationId,
    /// Account the app is installed on
    pub account: Account,
    /// "all" or "selected"
    #[serde(default)]
    pub repository_selection: Option<String>,
    /// "Organization", "User" or "Enterprise"
    #[serde(default)]
    pub target_type: Option<String>,
}

impl Installation {
    /// Login of the installation's account
    pub fn login(&self) -> &str {
        &self.account.login
    }

    /// Kind of account the app is installed on
    ///
    /// Falls back to the account's `type` when the installation carries no
    /// `target_type`, and to "Enterprise" when neither is present.
    pub fn target_kind(&self) -> &str {
        self.target_type
            .as_deref()
            .or(self.account.account_type.as_deref())
            .unwrap_or("Enterprise")
    }

    /// Whether the installation belongs to an organization (and so has
    /// `/orgs/{login}/repos`)
    pub fn is_organization(&self) -> bool {
        self.target_kind() == "Organization"
    }
}

/// Short-lived access token scoped to exactly one installation
///
/// The token remembers which installation it was minted for, so it can only
/// be presented for that installation's resources.
#[derive(Clone)]
pub struct InstallationToken {
    installation_id: InstallationId,
    account_login: String,
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl InstallationToken {
    /// Create a token bound to an installation
    pub fn new(installation: &Installation, token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            installation_id: installation.id,
            account_login: installation.account.login.clone(),
            token,
            expires_at,
        }
    }

    /// Installation this token is scoped to
    pub const fn installation_id(&self) -> InstallationId {
        self.installation_id
    }

    /// Login of the account this token is scoped to
    pub fn account_login(&self) -> &str {
        &self.account_login
    }

    /// Raw secret, for the `Authorization` header only
    pub fn secret(&self) -> &str {
        &self.token
    }

    /// Provider-reported expiration, if any
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl fmt::Debug for InstallationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationToken")
            .field("installation_id", &self.installation_id)
            .field("account_login", &self.account_login)
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Repository visibility
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Visibility {
    /// Visible to everyone
    Public,
    /// Visible to collaborators only
    Private,
    /// Visible to enterprise members
    Internal,
    /// Value not known to this version
    Other(String),
}

impl From<String> for Visibility {
    fn from(value: String) -> Self {
        match value.as_str() {
            "public" => Self::Public,
            "private" => Self::Private,
            "internal" => Self::Internal,
            _ => Self::Other(value),
        }
    }
}

impl From<Visibility> for String {
    fn from(value: Visibility) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
            Self::Internal => write!(f, "internal"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// Display projection of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    /// Repository name
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    /// Repository visibility
    pub visibility: Visibility,
}

/// The authenticated app, as reported by `GET /app`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Numeric app ID
    pub id: u64,
    /// URL-friendly app name
    pub slug: String,
    /// Display name
    pub name: String,
    /// Login of the account owning the app
    pub owner: Option<String>,
}
