//! App command - show the authenticated app

use crate::cli::context::{CommandContext, ConnectionArgs};
use crate::cli::style::{Stylize, check};
use anstream::println;
use ghapp::error::Result;

/// Run the app command
pub async fn run_app(args: &ConnectionArgs, json: bool) -> Result<()> {
    let ctx = CommandContext::new(args)?;
    let token = ctx.service.mint_app_token()?;
    let app = ctx.service.app_info(&token).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&app)?);
        return Ok(());
    }

    println!("{} Authenticated as {}", check(), app.name.emphasis());
    println!("{} {}", "App ID:".emphasis(), app.id.accent());
    println!("{} {}", "Slug:".emphasis(), app.slug);
    if let Some(owner) = &app.owner {
        println!("{} {}", "Owner:".emphasis(), owner);
    }
    Ok(())
}
