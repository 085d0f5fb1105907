//! Authentication as a GitHub App
//!
//! A PEM private key becomes a [`SigningKey`], which together with the app ID
//! forms the [`AppIdentity`] that mints short-lived RS256 [`AppToken`]s.

mod jwt;
mod key;

pub use jwt::{
    APP_TOKEN_LIFETIME_SECS, AppClaims, AppIdentity, AppToken, Clock, FixedClock, SystemClock,
};
pub use key::{SigningKey, normalize_pem};
