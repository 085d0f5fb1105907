//! Repos command - run the full pipeline and list repositories per installation

use crate::cli::context::{CommandContext, ConnectionArgs};
use crate::cli::{CliProgress, print_done};
use anstream::println;
use ghapp::error::Result;
use ghapp::pipeline::{NoopProgress, PipelineOptions, run_pipeline};
use ghapp::types::InstallationId;

/// Options for the repos command
#[derive(Debug, Clone, Default)]
pub struct ReposOptions {
    /// Only process this installation
    pub installation: Option<u64>,
    /// Print the report as JSON instead of text
    pub json: bool,
}

/// Run the repos command
pub async fn run_repos(args: &ConnectionArgs, options: ReposOptions) -> Result<()> {
    let ctx = CommandContext::new(args)?;
    let pipeline_options = PipelineOptions {
        installation: options.installation.map(InstallationId),
    };

    if options.json {
        let report = run_pipeline(ctx.service.as_ref(), &pipeline_options, &NoopProgress).await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let progress = CliProgress::new();
    let report = run_pipeline(ctx.service.as_ref(), &pipeline_options, &progress).await?;

    if report.installations.is_empty() {
        println!("No installations found for app {}", ctx.config.app_id);
        return Ok(());
    }

    print_done(
        report.installations.len(),
        report.repository_count(),
        report.skipped_count(),
    );
    Ok(())
}
