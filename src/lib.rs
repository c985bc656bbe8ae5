pub mod error;
pub mod github;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::ListingError;
pub use github::GitHubClient;
pub use models::{default_rules, ContentEntry, EntryKind, RenameRule, RepoLocation};
pub use services::{
    list_repository_files, rename_identifiers, ListingReport, RenameReport, RenamerConfig,
    RepoListerConfig,
};

// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub renamer: RenamerConfig,
    pub repo_lister: RepoListerConfig,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            renamer: RenamerConfig::default(),
            repo_lister: RepoListerConfig::default(),
            log_level: "info".to_string(),
        }
    }
}
