//! GitHub REST implementation of the app service

use crate::auth::{AppIdentity, AppToken, Clock, SystemClock};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::platform::GitHubAppService;
use crate::platform::pagination::{PER_PAGE, next_page, same_origin};
use crate::platform::retry::RetryPolicy;
use crate::types::{AppInfo, Installation, InstallationToken, RepositorySummary, Visibility};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

// Wire types. Only the fields the pipeline reads are declared.

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RepositoryResponse {
    name: String,
    full_name: Option<String>,
    visibility: Option<String>,
    private: Option<bool>,
}

impl From<RepositoryResponse> for RepositorySummary {
    fn from(repo: RepositoryResponse) -> Self {
        // Older GitHub Enterprise servers omit `visibility`; fall back to `private`.
        let visibility = match (repo.visibility, repo.private) {
            (Some(v), _) => Visibility::from(v),
            (None, Some(true)) => Visibility::Private,
            (None, _) => Visibility::Public,
        };
        Self {
            full_name: repo.full_name.unwrap_or_else(|| repo.name.clone()),
            name: repo.name,
            visibility,
        }
    }
}

#[derive(Deserialize)]
struct AppOwner {
    login: String,
}

#[derive(Deserialize)]
struct AppResponse {
    id: u64,
    slug: String,
    name: String,
    owner: Option<AppOwner>,
}

impl From<AppResponse> for AppInfo {
    fn from(app: AppResponse) -> Self {
        Self {
            id: app.id,
            slug: app.slug,
            name: app.name,
            owner: app.owner.map(|o| o.login),
        }
    }
}

/// GitHub App client over the REST API using reqwest
pub struct GitHubAppClient {
    identity: AppIdentity,
    clock: Arc<dyn Clock>,
    http_client: Client,
    api_url: Url,
    retry: RetryPolicy,
    max_pages: u32,
}

impl GitHubAppClient {
    /// Create a client for the configured API host
    pub fn new(identity: AppIdentity, config: &AppConfig) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(concat!("ghapp/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            identity,
            clock: Arc::new(SystemClock),
            http_client,
            api_url: config.api_url.clone(),
            retry: RetryPolicy::new(config.max_retries),
            max_pages: config.max_pages.max(1),
        })
    }

    /// Replace the time source used for minting and expiry checks
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the retry policy
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| Error::Config(format!("invalid endpoint '{path}': {e}")))
    }

    fn app_authorization(&self, token: &AppToken) -> Result<String> {
        self.check_app_token(token)?;
        Ok(format!("Bearer {}", token.as_str()))
    }

    /// Send a request, retrying transport failures per the retry policy
    ///
    /// Only GET is retried. A repeated token exchange POST would mint another
    /// installation token.
    async fn execute(&self, method: Method, url: &Url, authorization: &str) -> Result<Response> {
        let max_retries = if method == Method::GET {
            self.retry.max_retries
        } else {
            0
        };
        let mut attempt = 0;
        loop {
            match self.send_once(method.clone(), url, authorization).await {
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    attempt += 1;
                    warn!(
                        %method,
                        path = url.path(),
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn send_once(&self, method: Method, url: &Url, authorization: &str) -> Result<Response> {
        debug!(%method, path = url.path(), "sending GitHub request");

        let response = self
            .http_client
            .request(method, url.clone())
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request to {} failed: {e}", url.path())))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let rate_limited = is_rate_limited(status, response.headers());
        let message = error_message(response).await;
        debug!(status = status.as_u16(), %message, "GitHub request failed");

        Err(classify_status(status, rate_limited, message))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &Url, authorization: &str) -> Result<T> {
        let response = self.execute(Method::GET, url, authorization).await?;
        parse_json(response).await
    }

    /// GET every page of a list endpoint, following `Link: rel="next"`
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        mut url: Url,
        authorization: &str,
    ) -> Result<Vec<T>> {
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string());

        let mut items = Vec::new();
        let mut pages = 0;
        loop {
            let response = self.execute(Method::GET, &url, authorization).await?;
            let next = next_page(response.headers());
            let page: Vec<T> = parse_json(response).await?;
            pages += 1;
            debug!(page = pages, count = page.len(), "fetched page");
            items.extend(page);

            let Some(next) = next else { break };
            if pages >= self.max_pages {
                warn!(
                    max_pages = self.max_pages,
                    fetched = items.len(),
                    "Stopping pagination at page limit"
                );
                break;
            }

            let next_url = Url::parse(&next)
                .map_err(|e| Error::Parse(format!("invalid next page link '{next}': {e}")))?;
            if !same_origin(&self.api_url, &next_url) {
                return Err(Error::Parse(format!(
                    "next page link points outside the API host: {next}"
                )));
            }
            url = next_url;
        }
        Ok(items)
    }
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && headers
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0"))
}

fn classify_status(status: StatusCode, rate_limited: bool, message: String) -> Error {
    if rate_limited {
        return Error::Transport(format!("rate limited ({status}): {message}"));
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::Auth(format!("{}: {message}", status.as_u16()))
        }
        s if s.is_server_error() => Error::Transport(format!("server error ({s}): {message}")),
        s => Error::Api {
            status: s.as_u16(),
            message,
        },
    }
}

async fn error_message(response: Response) -> String {
    let fallback = response
        .status()
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string();
    match response.text().await {
        Ok(body) => serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| Error::Transport(format!("Failed to read response body: {e}")))?;
    serde_json::from_str(&body).map_err(|e| Error::Parse(format!("Failed to parse response: {e}")))
}

#[async_trait]
impl GitHubAppService for GitHubAppClient {
    fn mint_app_token(&self) -> Result<AppToken> {
        self.identity.mint_token(self.clock.as_ref())
    }

    fn check_app_token(&self, token: &AppToken) -> Result<()> {
        let now = self.clock.now();
        if token.is_expired_at(now) {
            return Err(Error::Auth(format!(
                "app token expired at {} (now {})",
                token.claims().exp,
                now.timestamp()
            )));
        }
        Ok(())
    }

    async fn app_info(&self, token: &AppToken) -> Result<AppInfo> {
        debug!("getting authenticated app");
        let authorization = self.app_authorization(token)?;
        let app: AppResponse = self.get_json(&self.endpoint("app")?, &authorization).await?;
        debug!(app_id = app.id, slug = %app.slug, "got authenticated app");
        Ok(app.into())
    }

    async fn list_installations(&self, token: &AppToken) -> Result<Vec<Installation>> {
        debug!("listing installations");
        let authorization = self.app_authorization(token)?;
        let installations: Vec<Installation> = self
            .get_paginated(self.endpoint("app/installations")?, &authorization)
            .await?;
        debug!(count = installations.len(), "listed installations");
        Ok(installations)
    }

    async fn create_installation_token(
        &self,
        token: &AppToken,
        installation: &Installation,
    ) -> Result<InstallationToken> {
        debug!(installation_id = %installation.id, "creating installation token");
        let authorization = self.app_authorization(token)?;
        let url = self.endpoint(&format!(
            "app/installations/{}/access_tokens",
            installation.id
        ))?;

        let response = self.execute(Method::POST, &url, &authorization).await?;
        let body: AccessTokenResponse = parse_json(response).await?;

        debug!(
            installation_id = %installation.id,
            expires_at = ?body.expires_at,
            "created installation token"
        );
        Ok(InstallationToken::new(installation, body.token, body.expires_at))
    }

    async fn list_org_repos(&self, token: &InstallationToken) -> Result<Vec<RepositorySummary>> {
        let org = token.account_login();
        debug!(installation_id = %token.installation_id(), org, "listing organization repositories");

        let url = self.endpoint(&format!("orgs/{}/repos", urlencoding::encode(org)))?;
        let authorization = format!("Bearer {}", token.secret());
        let repos: Vec<RepositoryResponse> = self.get_paginated(url, &authorization).await?;

        let result: Vec<RepositorySummary> = repos.into_iter().map(Into::into).collect();
        debug!(org, count = result.len(), "listed organization repositories");
        Ok(result)
    }
}
