use serde::{Deserialize, Serialize};

/// Repository coordinates shared by API and raw-content URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoLocation {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoLocation {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    /// `{raw_base}/{owner}/{repo}/{branch}`
    pub fn raw_base_url(&self, raw_host: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            raw_host.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch
        )
    }
}

/// Join a repository-relative directory and a child name with `/`
pub fn join_repo_path(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_base_url() {
        let location = RepoLocation::new("KALFANET", "agent-macos", "main");
        assert_eq!(
            location.raw_base_url("https://raw.githubusercontent.com/"),
            "https://raw.githubusercontent.com/KALFANET/agent-macos/main"
        );
    }

    #[test]
    fn test_join_repo_path() {
        assert_eq!(join_repo_path("", "src"), "src");
        assert_eq!(join_repo_path("src", "lib"), "src/lib");
        assert_eq!(join_repo_path("src/", "lib"), "src/lib");
    }
}
