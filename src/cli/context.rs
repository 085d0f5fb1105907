//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by every subcommand.

use clap::Args;
use ghapp::config::{
    AppConfig, DEFAULT_API_URL, DEFAULT_MAX_PAGES, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT,
    ENV_API_URL, ENV_APP_ID, ENV_PRIVATE_KEY, ENV_PRIVATE_KEY_PATH,
};
use ghapp::error::{Error, Result};
use ghapp::platform::{GitHubAppClient, GitHubAppService};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Connection settings, read from flags or the environment
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// GitHub App ID
    #[arg(long, env = ENV_APP_ID, global = true)]
    pub app_id: Option<String>,

    /// PEM private key of the app (prefer the environment variable)
    #[arg(long, env = ENV_PRIVATE_KEY, hide_env_values = true, global = true)]
    pub private_key: Option<String>,

    /// Path to the PEM private key of the app
    #[arg(long, env = ENV_PRIVATE_KEY_PATH, global = true)]
    pub private_key_path: Option<PathBuf>,

    /// GitHub REST API base URL
    #[arg(long, env = ENV_API_URL, default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    pub timeout: u64,

    /// Retries for network failures
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES, global = true)]
    pub max_retries: u32,

    /// Maximum pages to follow per listing
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES, global = true)]
    pub max_pages: u32,
}

impl ConnectionArgs {
    /// Validate the arguments into a run configuration
    pub fn to_config(&self) -> Result<AppConfig> {
        let config = AppConfig::from_parts(
            self.app_id.clone(),
            self.private_key.clone(),
            self.private_key_path.clone(),
        )?;

        if self.timeout == 0 {
            return Err(Error::Config("--timeout must be at least 1 second".to_string()));
        }

        Ok(config
            .with_api_url(&self.api_url)?
            .with_timeout(Duration::from_secs(self.timeout))
            .with_max_retries(self.max_retries)
            .with_max_pages(self.max_pages))
    }
}

/// Shared context for CLI commands that talk to GitHub
pub struct CommandContext {
    /// Validated configuration
    pub config: AppConfig,
    /// GitHub App service
    pub service: Box<dyn GitHubAppService>,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// Loads the configuration, parses the private key, and builds the
    /// service. Fails fast on any missing or malformed input.
    pub fn new(args: &ConnectionArgs) -> Result<Self> {
        let config = args.to_config()?;
        debug!(?config, "loaded configuration");

        let identity = config.identity()?;
        debug!(app_id = identity.app_id(), "loaded signing key");

        let service = GitHubAppClient::new(identity, &config)?;

        Ok(Self {
            config,
            service: Box::new(service),
        })
    }
}
