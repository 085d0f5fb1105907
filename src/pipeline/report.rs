//! Pipeline results

use crate::types::{Installation, InstallationId, RepositorySummary, Visibility};
use serde::Serialize;

/// What happened for one installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstallationOutcome {
    /// Token exchanged and repositories listed
    Listed {
        /// Repositories in provider order
        repositories: Vec<RepositorySummary>,
    },
    /// Provider refused this installation; the run moved on
    Skipped {
        /// Error that caused the skip
        reason: String,
    },
}

/// Per-installation section of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallationReport {
    /// The installation
    pub installation: Installation,
    /// Outcome for it
    #[serde(flatten)]
    pub outcome: InstallationOutcome,
}

impl InstallationReport {
    /// Repositories listed, empty when skipped
    pub fn repositories(&self) -> &[RepositorySummary] {
        match &self.outcome {
            InstallationOutcome::Listed { repositories } => repositories,
            InstallationOutcome::Skipped { .. } => &[],
        }
    }

    /// Whether the installation was skipped
    pub const fn is_skipped(&self) -> bool {
        matches!(self.outcome, InstallationOutcome::Skipped { .. })
    }

    /// Repository counts by visibility
    pub fn visibility_summary(&self) -> VisibilitySummary {
        VisibilitySummary::from_repositories(self.repositories())
    }
}

/// Result of a whole run, in enumeration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// One entry per processed installation
    pub installations: Vec<InstallationReport>,
}

impl PipelineReport {
    /// Report for a given installation
    pub fn get(&self, id: InstallationId) -> Option<&InstallationReport> {
        self.installations.iter().find(|r| r.installation.id == id)
    }

    /// Number of installations that were skipped
    pub fn skipped_count(&self) -> usize {
        self.installations.iter().filter(|r| r.is_skipped()).count()
    }

    /// Total repositories across installations
    pub fn repository_count(&self) -> usize {
        self.installations.iter().map(|r| r.repositories().len()).sum()
    }
}

/// Repository counts by visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VisibilitySummary {
    /// Public repositories
    pub public: usize,
    /// Private repositories
    pub private: usize,
    /// Internal repositories
    pub internal: usize,
    /// Repositories with an unrecognized visibility
    pub other: usize,
}

impl VisibilitySummary {
    /// Count a list of repositories
    pub fn from_repositories(repositories: &[RepositorySummary]) -> Self {
        repositories
            .iter()
            .fold(Self::default(), |mut acc, repo| {
                match repo.visibility {
                    Visibility::Public => acc.public += 1,
                    Visibility::Private => acc.private += 1,
                    Visibility::Internal => acc.internal += 1,
                    Visibility::Other(_) => acc.other += 1,
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Account;

    fn repo(name: &str, visibility: Visibility) -> RepositorySummary {
        RepositorySummary {
            name: name.to_string(),
            full_name: format!("acme/{name}"),
            visibility,
        }
    }

    fn installation(id: u64) -> Installation {
        Installation {
            id: InstallationId(id),
            account: Account {
                login: "acme".to_string(),
                account_type: Some("Organization".to_string()),
            },
            repository_selection: Some("all".to_string()),
            target_type: Some("Organization".to_string()),
        }
    }

    #[test]
    fn test_visibility_summary_counts() {
        let summary = VisibilitySummary::from_repositories(&[
            repo("a", Visibility::Public),
            repo("b", Visibility::Private),
            repo("c", Visibility::Private),
            repo("d", Visibility::Internal),
            repo("e", Visibility::Other("weird".into())),
        ]);
        assert_eq!(
            summary,
            VisibilitySummary {
                public: 1,
                private: 2,
                internal: 1,
                other: 1,
            }
        );
    }

    #[test]
    fn test_skipped_report_has_no_repositories() {
        let report = InstallationReport {
            installation: installation(1),
            outcome: InstallationOutcome::Skipped {
                reason: "401".to_string(),
            },
        };
        assert!(report.is_skipped());
        assert!(report.repositories().is_empty());
    }

    #[test]
    fn test_report_serializes_with_status_tag() {
        let report = InstallationReport {
            installation: installation(1),
            outcome: InstallationOutcome::Listed {
                repositories: vec![repo("a", Visibility::Public)],
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "listed");
        assert_eq!(json["installation"]["id"], 1);
        assert_eq!(json["repositories"][0]["visibility"], "public");
    }
}
