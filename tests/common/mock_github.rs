//! Mock GitHub App service for testing
//!
//! Behaves like a small simulated provider: app tokens are verified against
//! the app's public key and the mock clock, installation tokens are checked
//! against the installation they were issued for.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ghapp::auth::{AppClaims, AppIdentity, AppToken};
use ghapp::error::{Error, Result};
use ghapp::platform::GitHubAppService;
use ghapp::types::{AppInfo, Installation, InstallationToken, RepositorySummary};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use std::collections::HashMap;
use std::sync::Mutex;

/// One recorded call against the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `app_info`
    AppInfo,
    /// `list_installations`
    ListInstallations,
    /// `create_installation_token` for an installation ID
    CreateToken(u64),
    /// `list_org_repos` with the token's installation ID and org
    ListRepos { installation: u64, org: String },
}

/// Failure kinds the mock can inject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Auth,
    Transport,
    NotFound,
    Parse,
}

impl Failure {
    fn to_error(self, what: &str) -> Error {
        match self {
            Self::Auth => Error::Auth(format!("401: Bad credentials ({what})")),
            Self::Transport => Error::Transport(format!("connection reset ({what})")),
            Self::NotFound => Error::Api {
                status: 404,
                message: format!("Not Found ({what})"),
            },
            Self::Parse => Error::Parse(format!("missing field ({what})")),
        }
    }
}

/// Simple mock GitHub App service
///
/// Features:
/// - JWT verification with the app's public key and a settable clock
/// - Call tracking in order
/// - Per-installation repository responses
/// - Error injection per step
pub struct MockGitHubApp {
    identity: AppIdentity,
    verifier: DecodingKey,
    now: Mutex<DateTime<Utc>>,
    installations: Mutex<Vec<Installation>>,
    repos: Mutex<HashMap<u64, Vec<RepositorySummary>>>,
    calls: Mutex<Vec<Call>>,
    fail_list_installations: Mutex<Option<Failure>>,
    fail_create_token: Mutex<HashMap<u64, Failure>>,
    fail_list_repos: Mutex<HashMap<u64, Failure>>,
}

impl MockGitHubApp {
    /// Create a mock for `identity`, verifying with `public_pem`
    pub fn new(identity: AppIdentity, public_pem: &str) -> Self {
        Self {
            identity,
            verifier: DecodingKey::from_rsa_pem(public_pem.as_bytes()).unwrap(),
            now: Mutex::new(Utc::now()),
            installations: Mutex::new(Vec::new()),
            repos: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_list_installations: Mutex::new(None),
            fail_create_token: Mutex::new(HashMap::new()),
            fail_list_repos: Mutex::new(HashMap::new()),
        }
    }

    // === Setup ===

    /// Set the provider's current time (also used for minting)
    pub fn set_now(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    /// Move the provider's clock forward
    pub fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    /// Set the installations returned by `list_installations`
    pub fn set_installations(&self, installations: Vec<Installation>) {
        *self.installations.lock().unwrap() = installations;
    }

    /// Set the repositories returned for an installation
    pub fn set_repos(&self, installation_id: u64, repos: Vec<RepositorySummary>) {
        self.repos.lock().unwrap().insert(installation_id, repos);
    }

    // === Error injection ===

    /// Make `list_installations` fail
    pub fn fail_list_installations(&self, failure: Failure) {
        *self.fail_list_installations.lock().unwrap() = Some(failure);
    }

    /// Make `create_installation_token` fail for one installation
    pub fn fail_create_token(&self, installation_id: u64, failure: Failure) {
        self.fail_create_token
            .lock()
            .unwrap()
            .insert(installation_id, failure);
    }

    /// Make `list_org_repos` fail for one installation
    pub fn fail_list_repos(&self, installation_id: u64, failure: Failure) {
        self.fail_list_repos
            .lock()
            .unwrap()
            .insert(installation_id, failure);
    }

    // === Inspection ===

    /// All calls in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of token exchanges
    pub fn create_token_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateToken(_)))
            .count()
    }

    /// Number of repository listings
    pub fn list_repos_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListRepos { .. }))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn verify(&self, token: &AppToken) -> Result<AppClaims> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iat", "iss"]);

        let claims = jsonwebtoken::decode::<AppClaims>(token.as_str(), &self.verifier, &validation)
            .map_err(|e| Error::Auth(format!("401: A JSON web token could not be decoded ({e})")))?
            .claims;

        let now = self.now.lock().unwrap().timestamp();
        if claims.exp <= now {
            return Err(Error::Auth(
                "401: 'Expiration time' claim ('exp') is too far in the past".to_string(),
            ));
        }
        if claims.iss != self.identity.app_id() {
            return Err(Error::Auth("401: Integration not found".to_string()));
        }
        Ok(claims)
    }
}

#[async_trait]
impl GitHubAppService for MockGitHubApp {
    fn mint_app_token(&self) -> Result<AppToken> {
        let now = *self.now.lock().unwrap();
        self.identity.mint_token_at(now)
    }

    fn check_app_token(&self, token: &AppToken) -> Result<()> {
        let now = *self.now.lock().unwrap();
        if token.is_expired_at(now) {
            return Err(Error::Auth(format!(
                "app token expired at {}",
                token.claims().exp
            )));
        }
        Ok(())
    }

    async fn app_info(&self, token: &AppToken) -> Result<AppInfo> {
        self.record(Call::AppInfo);
        let claims = self.verify(token)?;
        Ok(AppInfo {
            id: claims.iss.parse().unwrap_or_default(),
            slug: "mock-app".to_string(),
            name: "Mock App".to_string(),
            owner: Some("acme".to_string()),
        })
    }

    async fn list_installations(&self, token: &AppToken) -> Result<Vec<Installation>> {
        self.record(Call::ListInstallations);
        if let Some(failure) = *self.fail_list_installations.lock().unwrap() {
            return Err(failure.to_error("list installations"));
        }
        self.verify(token)?;
        Ok(self.installations.lock().unwrap().clone())
    }

    async fn create_installation_token(
        &self,
        token: &AppToken,
        installation: &Installation,
    ) -> Result<InstallationToken> {
        let id = installation.id.0;
        self.record(Call::CreateToken(id));
        if let Some(failure) = self.fail_create_token.lock().unwrap().get(&id).copied() {
            return Err(failure.to_error("create token"));
        }
        self.verify(token)?;
        Ok(InstallationToken::new(
            installation,
            format!("ghs_mock_{id}"),
            None,
        ))
    }

    async fn list_org_repos(&self, token: &InstallationToken) -> Result<Vec<RepositorySummary>> {
        let id = token.installation_id().0;
        self.record(Call::ListRepos {
            installation: id,
            org: token.account_login().to_string(),
        });
        if let Some(failure) = self.fail_list_repos.lock().unwrap().get(&id).copied() {
            return Err(failure.to_error("list repos"));
        }
        if token.secret() != format!("ghs_mock_{id}") {
            return Err(Error::Auth("401: Bad credentials".to_string()));
        }
        Ok(self
            .repos
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }
}
