pub mod renamer;
pub mod repo_lister;

pub use renamer::{
    locate_target_files, missing_targets, rename_identifiers, rewrite_file, RenameFailure,
    RenameReport, RenameResult, RenamedFile, RenamerConfig, DEFAULT_TARGET_FILES,
};
pub use repo_lister::{
    collect_raw_urls, list_repository_files, write_url_list, ListingFailure, ListingReport,
    RepoListerConfig, DEFAULT_EXCLUDED_DIRS, DEFAULT_OUTPUT_FILE, DEFAULT_RAW_URL,
};
