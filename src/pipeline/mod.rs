//! Authentication pipeline
//!
//! `Start → KeyLoaded → AppTokenMinted → InstallationsListed →
//! {TokenExchanged → ReposListed}* → Done`
//!
//! Key loading happens when the service is built; everything after it runs in
//! [`run_pipeline`].

mod execute;
mod report;

pub use execute::{NoopProgress, PipelineOptions, ProgressCallback, run_pipeline};
pub use report::{InstallationOutcome, InstallationReport, PipelineReport, VisibilitySummary};
