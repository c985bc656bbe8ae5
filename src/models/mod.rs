pub mod content_entry;
pub mod rename_rule;
pub mod repo_location;

pub use content_entry::{ContentEntry, EntryKind};
pub use rename_rule::{apply_rules, default_rules, RenameRule};
pub use repo_location::{join_repo_path, RepoLocation};
