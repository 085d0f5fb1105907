//! GitHub App platform service
//!
//! One capability interface for everything the pipeline asks of GitHub, with
//! a single REST-backed implementation.

mod github;
mod pagination;
mod retry;

pub use github::GitHubAppClient;
pub use pagination::{PER_PAGE, parse_next_link};
pub use retry::RetryPolicy;

use crate::auth::AppToken;
use crate::error::Result;
use crate::types::{AppInfo, Installation, InstallationToken, RepositorySummary};
use async_trait::async_trait;

/// Operations a GitHub App performs against the provider
///
/// App-level calls take an [`AppToken`]; repository listing takes the
/// [`InstallationToken`] minted for that one installation.
#[async_trait]
pub trait GitHubAppService: Send + Sync {
    /// Mint a fresh app-level JWT
    fn mint_app_token(&self) -> Result<AppToken>;

    /// Fail with [`Error::Auth`](crate::error::Error::Auth) when the app
    /// token has expired by the service's clock
    fn check_app_token(&self, token: &AppToken) -> Result<()>;

    /// Get the authenticated app (`GET /app`)
    async fn app_info(&self, token: &AppToken) -> Result<AppInfo>;

    /// List installations of the app (`GET /app/installations`)
    ///
    /// Order is whatever the provider returns.
    async fn list_installations(&self, token: &AppToken) -> Result<Vec<Installation>>;

    /// Exchange the app token for an installation access token
    /// (`POST /app/installations/{id}/access_tokens`)
    async fn create_installation_token(
        &self,
        token: &AppToken,
        installation: &Installation,
    ) -> Result<InstallationToken>;

    /// List repositories of the token's organization (`GET /orgs/{org}/repos`)
    async fn list_org_repos(&self, token: &InstallationToken) -> Result<Vec<RepositorySummary>>;
}
