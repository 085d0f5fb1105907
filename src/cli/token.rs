//! Token command - mint one installation access token
//!
//! Prints only the token so the output can be captured by scripts.

use crate::cli::context::{CommandContext, ConnectionArgs};
use anstream::println;
use ghapp::error::{Error, Result};
use ghapp::types::InstallationId;
use serde_json::json;

/// Run the token command
pub async fn run_token(args: &ConnectionArgs, installation_id: u64, json: bool) -> Result<()> {
    let ctx = CommandContext::new(args)?;
    let app_token = ctx.service.mint_app_token()?;

    let id = InstallationId(installation_id);
    let installation = ctx
        .service
        .list_installations(&app_token)
        .await?
        .into_iter()
        .find(|i| i.id == id)
        .ok_or_else(|| Error::Config(format!("installation {id} not found for this app")))?;

    let token = ctx
        .service
        .create_installation_token(&app_token, &installation)
        .await?;

    if json {
        let value = json!({
            "installation_id": token.installation_id(),
            "account": token.account_login(),
            "token": token.secret(),
            "expires_at": token.expires_at(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", token.secret());
    }
    Ok(())
}
