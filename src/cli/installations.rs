//! Installations command - list where the app is installed

use crate::cli::context::{CommandContext, ConnectionArgs};
use crate::cli::style::Stylize;
use anstream::println;
use ghapp::error::Result;

/// Run the installations command
pub async fn run_installations(args: &ConnectionArgs, json: bool) -> Result<()> {
    let ctx = CommandContext::new(args)?;
    let token = ctx.service.mint_app_token()?;
    let installations = ctx.service.list_installations(&token).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&installations)?);
        return Ok(());
    }

    if installations.is_empty() {
        println!("No installations found for app {}", ctx.config.app_id);
        return Ok(());
    }

    for installation in &installations {
        let kind = installation
            .account
            .account_type
            .as_deref()
            .unwrap_or("unknown");
        let selection = installation
            .repository_selection
            .as_deref()
            .unwrap_or("unknown");
        println!(
            "{} {} {}",
            installation.id.accent(),
            installation.login().emphasis(),
            format!("({kind}, repositories: {selection})").muted()
        );
    }
    Ok(())
}
