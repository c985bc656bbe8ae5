use crate::error::ListingError;
use crate::github::{GitHubClient, DEFAULT_API_URL};
use crate::models::{join_repo_path, ContentEntry, EntryKind, RepoLocation};
use crate::utils::write_lines;
use anyhow::Result;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_OUTPUT_FILE: &str = "github_raw_links.txt";
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "__pycache__"];

/// Configuration for listing a repository's files
#[derive(Debug, Clone)]
pub struct RepoListerConfig {
    pub location: RepoLocation,
    pub base_path: String,
    pub excluded_dirs: BTreeSet<String>,
    pub output_path: PathBuf,
    pub api_base_url: String,
    pub raw_base_url: String,
}

impl Default for RepoListerConfig {
    fn default() -> Self {
        Self {
            location: RepoLocation::new("KALFANET", "agent-macos", "main"),
            base_path: String::new(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            api_base_url: DEFAULT_API_URL.to_string(),
            raw_base_url: DEFAULT_RAW_URL.to_string(),
        }
    }
}

/// Crawl the repository, then write every raw URL to the output file
pub async fn list_repository_files(config: RepoListerConfig) -> Result<ListingReport> {
    info!(
        "Listing {}/{}@{} starting at {:?}",
        config.location.owner, config.location.repo, config.location.branch, config.base_path
    );

    let client = GitHubClient::new(&config.api_base_url, config.location.clone())?;
    let raw_base_url = config.location.raw_base_url(&config.raw_base_url);

    let report =
        collect_raw_urls(&client, &config.base_path, &raw_base_url, &config.excluded_dirs).await;

    write_url_list(&config.output_path, &report.urls)?;
    info!("Saved {} links to {}", report.urls.len(), config.output_path.display());

    Ok(report)
}

/// Depth-first crawl in listing order.
///
/// Listing failures are logged and recorded; the affected directory counts as empty.
pub async fn collect_raw_urls(
    client: &GitHubClient,
    base_path: &str,
    raw_base_url: &str,
    excluded_dirs: &BTreeSet<String>,
) -> ListingReport {
    let mut report = ListingReport::empty();
    let mut pending: Vec<(String, ContentEntry)> = Vec::new();

    push_listing(client, base_path, &mut pending, &mut report).await;

    while let Some((parent, entry)) = pending.pop() {
        match entry.kind {
            EntryKind::Dir if excluded_dirs.contains(&entry.name) => {
                debug!("Skipping excluded directory {}", entry.path);
                report.excluded_dirs.push(entry.path);
            }
            EntryKind::Dir => {
                let path = join_repo_path(&parent, &entry.name);
                push_listing(client, &path, &mut pending, &mut report).await;
            }
            EntryKind::File => {
                report.urls.push(format!("{}/{}", raw_base_url, entry.path));
            }
            EntryKind::Other => {
                debug!("Ignoring {} (not a file or directory)", entry.path);
            }
        }
    }

    info!(
        "Collected {} files from {} directories ({} listing failures)",
        report.urls.len(),
        report.directories_listed,
        report.failures.len()
    );

    report
}

/// Fetch one listing and queue its entries so they pop in listing order
async fn push_listing(
    client: &GitHubClient,
    path: &str,
    pending: &mut Vec<(String, ContentEntry)>,
    report: &mut ListingReport,
) {
    match client.fetch_directory_contents(path).await {
        Ok(entries) => {
            report.directories_listed += 1;
            pending.extend(
                entries
                    .into_iter()
                    .rev()
                    .map(|entry| (path.to_string(), entry)),
            );
        }
        Err(e) => {
            if e.is_not_found() {
                warn!("Directory {:?} does not exist in the repository, continuing", path);
            } else {
                warn!("{}", e);
            }
            report.failures.push(ListingFailure::new(path, e));
        }
    }
}

/// Write URLs one per line, replacing the file
pub fn write_url_list<P: AsRef<Path>>(path: P, urls: &[String]) -> Result<()> {
    write_lines(path, urls)
}

/// Report structure for a repository crawl
#[derive(Debug, Clone)]
pub struct ListingReport {
    pub urls: Vec<String>,
    pub directories_listed: usize,
    pub excluded_dirs: Vec<String>,
    pub failures: Vec<ListingFailure>,
}

impl ListingReport {
    pub fn empty() -> Self {
        Self {
            urls: Vec::new(),
            directories_listed: 0,
            excluded_dirs: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn not_found_count(&self) -> usize {
        self.failures.iter().filter(|f| f.not_found).count()
    }
}

#[derive(Debug, Clone)]
pub struct ListingFailure {
    pub path: String,
    pub not_found: bool,
    pub error: String,
}

impl ListingFailure {
    fn new(path: &str, error: ListingError) -> Self {
        Self {
            path: path.to_string(),
            not_found: error.is_not_found(),
            error: error.to_string(),
        }
    }
}
