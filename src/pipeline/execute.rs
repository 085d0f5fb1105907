//! Pipeline execution - effectful operations
//!
//! Mints the app token, enumerates installations, and for each one exchanges
//! a fresh installation token and lists its organization's repositories.

use crate::auth::AppToken;
use crate::error::{Error, Result};
use crate::pipeline::report::{InstallationOutcome, InstallationReport, PipelineReport};
use crate::platform::GitHubAppService;
use crate::types::{Installation, InstallationId, RepositorySummary};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Progress reporting for pipeline execution
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called before an installation is processed
    async fn on_installation(&self, installation: &Installation);

    /// Called once an installation's repositories are listed
    async fn on_repositories(&self, installation: &Installation, repositories: &[RepositorySummary]);

    /// Called when an installation is skipped
    async fn on_skipped(&self, installation: &Installation, reason: &str);
}

/// Progress callback that ignores all events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_installation(&self, _installation: &Installation) {}
    async fn on_repositories(&self, _installation: &Installation, _repositories: &[RepositorySummary]) {}
    async fn on_skipped(&self, _installation: &Installation, _reason: &str) {}
}

/// Options for a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Only process this installation
    pub installation: Option<InstallationId>,
}

/// Whether a per-installation failure should skip the installation
///
/// Auth and API refusals from the provider are scoped to one installation
/// (revoked access, suspended installation). Transport and parse failures
/// abort the run.
const fn skips_installation(error: &Error) -> bool {
    matches!(error, Error::Auth(_) | Error::Api { .. })
}

/// Run the full pipeline (EFFECTFUL)
///
/// The app token is minted once and reused for every installation. Each
/// installation gets its own installation token, dropped after its
/// repositories are listed. Failures before the per-installation loop abort
/// the run, and so does the app token expiring partway through it.
/// Installations on user or enterprise accounts are skipped without a token
/// exchange since they have no organization repositories.
pub async fn run_pipeline(
    service: &dyn GitHubAppService,
    options: &PipelineOptions,
    progress: &dyn ProgressCallback,
) -> Result<PipelineReport> {
    let app_token = service.mint_app_token()?;

    let mut installations = service.list_installations(&app_token).await?;
    if let Some(id) = options.installation {
        installations.retain(|i| i.id == id);
        if installations.is_empty() {
            return Err(Error::Config(format!(
                "installation {id} not found for this app"
            )));
        }
    }
    debug!(count = installations.len(), "processing installations");

    let mut report = PipelineReport::default();

    for installation in installations {
        progress.on_installation(&installation).await;

        if !installation.is_organization() {
            let reason = format!(
                "{} account {} has no organization repositories",
                installation.target_kind(),
                installation.login()
            );
            debug!(installation_id = %installation.id, %reason, "skipping installation");
            progress.on_skipped(&installation, &reason).await;
            report.installations.push(InstallationReport {
                installation,
                outcome: InstallationOutcome::Skipped { reason },
            });
            continue;
        }

        service.check_app_token(&app_token)?;

        let outcome = match list_for_installation(service, &app_token, &installation).await {
            Ok(repositories) => {
                progress.on_repositories(&installation, &repositories).await;
                InstallationOutcome::Listed { repositories }
            }
            Err(e) if skips_installation(&e) => {
                warn!(
                    installation_id = %installation.id,
                    login = installation.login(),
                    error = %e,
                    "Skipping installation"
                );
                let reason = e.to_string();
                progress.on_skipped(&installation, &reason).await;
                InstallationOutcome::Skipped { reason }
            }
            Err(e) => return Err(e),
        };

        report.installations.push(InstallationReport {
            installation,
            outcome,
        });
    }

    Ok(report)
}

async fn list_for_installation(
    service: &dyn GitHubAppService,
    app_token: &AppToken,
    installation: &Installation,
) -> Result<Vec<RepositorySummary>> {
    let token = service
        .create_installation_token(app_token, installation)
        .await?;
    service.list_org_repos(&token).await
}
