//! App-level JWT minting

use crate::auth::key::SigningKey;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Header};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Lifetime of an app token in seconds. GitHub rejects anything longer than 10 minutes.
pub const APP_TOKEN_LIFETIME_SECS: i64 = 600;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Claims GitHub expects in an app JWT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClaims {
    /// App ID (issuer)
    pub iss: String,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expiration, seconds since the epoch
    pub exp: i64,
}

/// Signed app token
#[derive(Clone)]
pub struct AppToken {
    jwt: String,
    claims: AppClaims,
}

impl AppToken {
    /// Compact `header.payload.signature` form
    pub fn as_str(&self) -> &str {
        &self.jwt
    }

    /// Claims the token was signed with
    pub const fn claims(&self) -> &AppClaims {
        &self.claims
    }

    /// Whether the token can no longer be presented at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.claims.exp
    }
}

impl fmt::Debug for AppToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppToken")
            .field("claims", &self.claims)
            .field("jwt", &"<redacted>")
            .finish()
    }
}

/// The app's identity: issuer plus signing key
#[derive(Debug, Clone)]
pub struct AppIdentity {
    app_id: String,
    key: SigningKey,
}

impl AppIdentity {
    /// Bind an app ID to its private key
    pub fn new(app_id: impl Into<String>, key: SigningKey) -> Result<Self> {
        let app_id = app_id.into();
        if app_id.trim().is_empty() {
            return Err(Error::Config("app ID is empty".to_string()));
        }
        Ok(Self { app_id, key })
    }

    /// App ID used as the `iss` claim
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Mint a token issued at the clock's current time
    pub fn mint_token(&self, clock: &dyn Clock) -> Result<AppToken> {
        self.mint_token_at(clock.now())
    }

    /// Mint a token issued at `now`, valid for [`APP_TOKEN_LIFETIME_SECS`]
    pub fn mint_token_at(&self, now: DateTime<Utc>) -> Result<AppToken> {
        let iat = now.timestamp();
        let claims = AppClaims {
            iss: self.app_id.clone(),
            iat,
            exp: iat + APP_TOKEN_LIFETIME_SECS,
        };

        let jwt = jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            self.key.encoding_key(),
        )?;

        debug!(iss = %claims.iss, iat = claims.iat, exp = claims.exp, "minted app token");
        Ok(AppToken { jwt, claims })
    }
}
