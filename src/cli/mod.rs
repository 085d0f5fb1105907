//! Command-line interface

pub mod app;
pub mod context;
pub mod installations;
pub mod repos;
pub mod style;
pub mod token;

use anstream::println;
use async_trait::async_trait;
use ghapp::pipeline::{ProgressCallback, VisibilitySummary};
use ghapp::types::{Installation, RepositorySummary};
use indicatif::ProgressBar;
use std::sync::Mutex;
use std::time::Duration;
use style::{Stylize, check, spinner_style, warn_mark};

/// Prints pipeline progress as it happens
///
/// Installation headers and repository lines go to stdout; the spinner shown
/// while waiting on GitHub draws on stderr and only when it is a terminal.
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Create a progress printer
    pub const fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(spinner) = slot.take()
        {
            spinner.finish_and_clear();
        }
    }
}

impl Default for CliProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_installation(&self, installation: &Installation) {
        println!(
            "{} {}",
            "Installation ID:".emphasis(),
            installation.id.accent()
        );
        if !installation.is_organization() {
            println!(
                "{} {} ({})",
                "Account:".emphasis(),
                installation.login(),
                installation.target_kind()
            );
            return;
        }
        println!("{} {}", "Organization:".emphasis(), installation.login());
        self.start_spinner(format!("Listing repositories of {}...", installation.login()));
    }

    async fn on_repositories(&self, _installation: &Installation, repositories: &[RepositorySummary]) {
        self.stop_spinner();
        for repo in repositories {
            println!("Repository: {} ({})", repo.name, repo.visibility);
        }
        println!("{}", summary_line(repositories).muted());
        println!();
    }

    async fn on_skipped(&self, _installation: &Installation, reason: &str) {
        self.stop_spinner();
        println!("{} {}", warn_mark(), format!("Skipped: {reason}").warning());
        println!();
    }
}

/// `3 repositories: 1 public, 2 private, 0 internal`
pub fn summary_line(repositories: &[RepositorySummary]) -> String {
    let summary = VisibilitySummary::from_repositories(repositories);
    let noun = if repositories.len() == 1 {
        "repository"
    } else {
        "repositories"
    };
    let mut line = format!(
        "{} {noun}: {} public, {} private, {} internal",
        repositories.len(),
        summary.public,
        summary.private,
        summary.internal
    );
    if summary.other > 0 {
        line.push_str(&format!(", {} other", summary.other));
    }
    line
}

/// Final line after a successful run
pub fn print_done(installations: usize, repositories: usize, skipped: usize) {
    let mut line = format!(
        "{} Done: {installations} installation(s), {repositories} repositories",
        check()
    );
    if skipped > 0 {
        line.push_str(&format!(", {skipped} skipped"));
    }
    println!("{line}");
}
