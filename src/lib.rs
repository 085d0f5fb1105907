//! ghapp: authenticate as a GitHub App and list installation repositories
//!
//! The flow: load the app's PEM private key, mint an RS256 JWT for the app,
//! list the app's installations, exchange each installation ID for a
//! short-lived installation token, and list the repositories of the
//! installation's organization with it.

pub mod auth;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod types;
