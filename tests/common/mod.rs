//! Shared test helpers

#![allow(dead_code)]

mod mock_github;

pub use mock_github::{Call, Failure, MockGitHubApp};

use ghapp::auth::{AppIdentity, SigningKey};
use ghapp::types::{Account, Installation, InstallationId, RepositorySummary, Visibility};

/// PKCS#1 private key of the test app
pub const APP_KEY: &str = include_str!("../fixtures/app_key.pem");
/// Public half of [`APP_KEY`]
pub const APP_PUBLIC_KEY: &str = include_str!("../fixtures/app_key.pub.pem");
/// An unrelated key pair's private key
pub const OTHER_KEY: &str = include_str!("../fixtures/other_key.pem");
/// An unrelated key pair's public key
pub const OTHER_PUBLIC_KEY: &str = include_str!("../fixtures/other_key.pub.pem");
/// [`APP_KEY`] encrypted with a passphrase
pub const ENCRYPTED_KEY: &str = include_str!("../fixtures/encrypted_key.pem");

/// App ID used throughout the tests
pub const APP_ID: &str = "123456";

/// Identity of the test app
pub fn test_identity() -> AppIdentity {
    AppIdentity::new(APP_ID, SigningKey::from_pem(APP_KEY).unwrap()).unwrap()
}

/// Mock provider for the test app
pub fn mock_app() -> MockGitHubApp {
    MockGitHubApp::new(test_identity(), APP_PUBLIC_KEY)
}

/// Organization installation
pub fn make_installation(id: u64, login: &str) -> Installation {
    Installation {
        id: InstallationId(id),
        account: Account {
            login: login.to_string(),
            account_type: Some("Organization".to_string()),
        },
        repository_selection: Some("all".to_string()),
        target_type: Some("Organization".to_string()),
    }
}

/// Enterprise-level installation (no login, identified by slug)
pub fn make_enterprise_installation(id: u64, slug: &str) -> Installation {
    Installation {
        id: InstallationId(id),
        account: Account {
            login: slug.to_string(),
            account_type: None,
        },
        repository_selection: Some("all".to_string()),
        target_type: Some("Enterprise".to_string()),
    }
}

/// Repository summary under `org`
pub fn make_repo(org: &str, name: &str, visibility: &str) -> RepositorySummary {
    RepositorySummary {
        name: name.to_string(),
        full_name: format!("{org}/{name}"),
        visibility: Visibility::from(visibility.to_string()),
    }
}
