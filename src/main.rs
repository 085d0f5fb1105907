//! ghapp - authenticate as a GitHub App and list installation repositories

mod cli;

use anstream::eprintln;
use clap::{Parser, Subcommand};
use cli::context::ConnectionArgs;
use cli::repos::ReposOptions;
use cli::style::Stylize;
use ghapp::error::Result;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ghapp")]
#[command(
    author,
    version,
    about = "Authenticate as a GitHub App and list the repositories of its installations",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Enable debug logging (stderr)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List repositories of every installation (default)
    Repos {
        /// Only process this installation ID
        #[arg(long)]
        installation: Option<u64>,

        /// Print a JSON report
        #[arg(long)]
        json: bool,
    },

    /// List the app's installations
    Installations {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Mint an installation access token and print it
    Token {
        /// Installation ID to mint the token for
        #[arg(long)]
        installation: u64,

        /// Print token, scope and expiry as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the authenticated app
    App {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "ghapp=debug" } else { "warn" };
    let filter = if verbose {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => cli::repos::run_repos(&cli.connection, ReposOptions::default()).await,
        Some(Commands::Repos { installation, json }) => {
            cli::repos::run_repos(&cli.connection, ReposOptions { installation, json }).await
        }
        Some(Commands::Installations { json }) => {
            cli::installations::run_installations(&cli.connection, json).await
        }
        Some(Commands::Token { installation, json }) => {
            cli::token::run_token(&cli.connection, installation, json).await
        }
        Some(Commands::App { json }) => cli::app::run_app(&cli.connection, json).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".failure());
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}
