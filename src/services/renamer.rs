use crate::models::{apply_rules, RenameRule};
use crate::utils::{list_files_recursive, matches_target, rewrite_text_file};
use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Files the rename pass looks for when none are given.
///
/// A bare name matches a file of that name in any directory. An entry with a
/// directory part, like `models/device.js`, matches files whose trailing path
/// components are the same; a plain filename comparison would never find it.
pub const DEFAULT_TARGET_FILES: &[&str] = &[
    "deviceController.js",
    "deviceRoutes.js",
    "models/device.js",
    "backendClient.js",
    "statusService.js",
    "installService.js",
    "commandService.js",
];

/// Configuration for the identifier rename pass
#[derive(Debug, Clone)]
pub struct RenamerConfig {
    pub root: PathBuf,
    pub targets: Vec<String>,
}

impl Default for RenamerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            targets: DEFAULT_TARGET_FILES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Walk `root` and map each target to the file it names.
///
/// When a target occurs in several directories the one visited last wins.
pub fn locate_target_files<P: AsRef<Path>>(
    root: P,
    targets: &[String],
) -> Result<BTreeMap<String, PathBuf>> {
    let root = root.as_ref();
    let mut found = BTreeMap::new();

    for path in list_files_recursive(root)? {
        let relative = path.strip_prefix(root).unwrap_or(&path);
        for target in targets {
            if matches_target(relative, target) {
                found.insert(target.clone(), path.clone());
            }
        }
    }

    Ok(found)
}

/// Targets absent from `found`, in target-list order
pub fn missing_targets(targets: &[String], found: &BTreeMap<String, PathBuf>) -> Vec<String> {
    let mut seen = HashSet::new();
    targets
        .iter()
        .filter(|target| !found.contains_key(*target))
        .filter(|target| seen.insert(target.as_str()))
        .cloned()
        .collect()
}

/// Apply `rules` to one file in place. Returns whether the text changed.
pub fn rewrite_file<P: AsRef<Path>>(path: P, rules: &[RenameRule]) -> Result<bool> {
    rewrite_text_file(path, |text| apply_rules(text, rules))
}

/// Locate every target under the configured root and rewrite it with `rules`
pub async fn rename_identifiers(
    config: RenamerConfig,
    rules: Vec<RenameRule>,
) -> Result<RenameReport> {
    info!("Starting identifier rename under {:?}", config.root);

    let found = {
        let root = config.root.clone();
        let targets = config.targets.clone();
        tokio::task::spawn_blocking(move || locate_target_files(root, &targets))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))??
    };

    info!("Located {} of {} target files", found.len(), config.targets.len());

    let rules: Arc<[RenameRule]> = rules.into();
    let mut results = Vec::with_capacity(found.len());

    for target in &config.targets {
        let Some(path) = found.get(target) else {
            continue;
        };
        if results.iter().any(|r: &RenameResult| r.target() == target.as_str()) {
            continue;
        }

        let result = process_target(target.clone(), path.clone(), Arc::clone(&rules)).await;
        results.push(result);
    }

    let missing = missing_targets(&config.targets, &found);
    for target in &missing {
        warn!("File {} was not found anywhere under {:?}", target, config.root);
    }

    Ok(create_rename_report(config.root, results, missing))
}

async fn process_target(target: String, path: PathBuf, rules: Arc<[RenameRule]>) -> RenameResult {
    let file_path = path.clone();
    let outcome = tokio::task::spawn_blocking(move || rewrite_file(&file_path, &rules))
        .await
        .unwrap_or_else(|e| Err(anyhow::anyhow!("Task join error: {}", e)));

    match outcome {
        Ok(true) => {
            info!("Applied replacements to {}", path.display());
            RenameResult::Modified { target, path }
        }
        Ok(false) => {
            info!("Applied replacements to {} (no changes)", path.display());
            RenameResult::Unchanged { target, path }
        }
        Err(e) => {
            error!("Failed to rewrite {}: {:#}", path.display(), e);
            RenameResult::Error {
                target,
                path,
                error: format!("{:#}", e),
            }
        }
    }
}

fn create_rename_report(root: PathBuf, results: Vec<RenameResult>, missing: Vec<String>) -> RenameReport {
    let mut report = RenameReport {
        root,
        modified: Vec::new(),
        unchanged: Vec::new(),
        errors: Vec::new(),
        missing,
    };

    for result in results {
        match result {
            RenameResult::Modified { target, path } => {
                report.modified.push(RenamedFile { target, path })
            }
            RenameResult::Unchanged { target, path } => {
                report.unchanged.push(RenamedFile { target, path })
            }
            RenameResult::Error { target, path, error } => {
                report.errors.push(RenameFailure { target, path, error })
            }
        }
    }

    report
}

/// Outcome of rewriting one located target
#[derive(Debug, Clone)]
pub enum RenameResult {
    Modified {
        target: String,
        path: PathBuf,
    },
    Unchanged {
        target: String,
        path: PathBuf,
    },
    Error {
        target: String,
        path: PathBuf,
        error: String,
    },
}

impl RenameResult {
    pub fn target(&self) -> &str {
        match self {
            RenameResult::Modified { target, .. }
            | RenameResult::Unchanged { target, .. }
            | RenameResult::Error { target, .. } => target,
        }
    }
}

/// Report structure for a rename pass
#[derive(Debug, Clone)]
pub struct RenameReport {
    pub root: PathBuf,
    pub modified: Vec<RenamedFile>,
    pub unchanged: Vec<RenamedFile>,
    pub errors: Vec<RenameFailure>,
    pub missing: Vec<String>,
}

impl RenameReport {
    /// Every target that was located, whatever happened to it afterwards
    pub fn found_targets(&self) -> Vec<&str> {
        self.modified
            .iter()
            .chain(&self.unchanged)
            .map(|file| file.target.as_str())
            .chain(self.errors.iter().map(|failure| failure.target.as_str()))
            .collect()
    }

    pub fn total_processed(&self) -> usize {
        self.modified.len() + self.unchanged.len() + self.errors.len()
    }
}

#[derive(Debug, Clone)]
pub struct RenamedFile {
    pub target: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct RenameFailure {
    pub target: String,
    pub path: PathBuf,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_rules;
    use std::fs;

    fn targets(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn write(root: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_locate_target_files_last_visit_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a/deviceRoutes.js", "");
        let later = write(dir.path(), "b/deviceRoutes.js", "");

        let found = locate_target_files(dir.path(), &targets(&["deviceRoutes.js"])).unwrap();
        assert_eq!(found.get("deviceRoutes.js"), Some(&later));
    }

    #[test]
    fn test_locate_target_with_directory_component() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "device.js", "");
        let model = write(dir.path(), "src/models/device.js", "");

        let found = locate_target_files(dir.path(), &targets(&["models/device.js"])).unwrap();
        assert_eq!(found.get("models/device.js"), Some(&model));
    }

    #[test]
    fn test_missing_targets_is_the_complement() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "controllers/deviceController.js", "");
        write(dir.path(), "services/statusService.js", "");

        let all = targets(DEFAULT_TARGET_FILES);
        let found = locate_target_files(dir.path(), &all).unwrap();
        let missing = missing_targets(&all, &found);

        assert_eq!(
            found.keys().cloned().collect::<Vec<_>>(),
            targets(&["deviceController.js", "statusService.js"])
        );
        assert_eq!(
            missing,
            targets(&[
                "deviceRoutes.js",
                "models/device.js",
                "backendClient.js",
                "installService.js",
                "commandService.js",
            ])
        );
    }

    #[test]
    fn test_missing_targets_reports_repeated_names_once() {
        let found = BTreeMap::new();
        let missing = missing_targets(&targets(&["a.js", "b.js", "a.js"]), &found);
        assert_eq!(missing, targets(&["a.js", "b.js"]));
    }

    #[tokio::test]
    async fn test_rename_identifiers_rewrites_found_files() {
        let dir = tempfile::tempdir().unwrap();
        let controller = write(
            dir.path(),
            "controllers/deviceController.js",
            "const id = deviceId;\nconst idKey = 1;\n",
        );
        let routes = write(dir.path(), "routes/deviceRoutes.js", "module.exports = router;\n");
        let untouched = write(dir.path(), "other.js", "const id = deviceId;\n");

        let config = RenamerConfig {
            root: dir.path().to_path_buf(),
            targets: targets(&["deviceController.js", "deviceRoutes.js", "backendClient.js"]),
        };
        let report = rename_identifiers(config, default_rules().unwrap()).await.unwrap();

        assert_eq!(
            fs::read_to_string(&controller).unwrap(),
            "const idKey = idKey;\nconst idKey = 1;\n"
        );
        assert_eq!(fs::read_to_string(&routes).unwrap(), "module.exports = router;\n");
        assert_eq!(fs::read_to_string(&untouched).unwrap(), "const id = deviceId;\n");

        assert_eq!(report.modified.len(), 1);
        assert_eq!(report.modified[0].path, controller);
        assert_eq!(report.unchanged.len(), 1);
        assert_eq!(report.found_targets(), vec!["deviceController.js", "deviceRoutes.js"]);
        assert_eq!(report.missing, targets(&["backendClient.js"]));
    }

    #[tokio::test]
    async fn test_rename_identifiers_continues_after_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("statusService.js");
        fs::write(&broken, [0xff, 0xfe, 0xfd]).unwrap();
        let good = write(dir.path(), "lib/commandService.js", "send(deviceId);\n");

        let config = RenamerConfig {
            root: dir.path().to_path_buf(),
            targets: targets(&["statusService.js", "commandService.js"]),
        };
        let report = rename_identifiers(config, default_rules().unwrap()).await.unwrap();

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].path, broken);
        assert_eq!(fs::read_to_string(&good).unwrap(), "send(idKey);\n");
        assert_eq!(report.total_processed(), 2);
        assert!(report.missing.is_empty());
    }

    #[tokio::test]
    async fn test_rename_identifiers_rejects_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenamerConfig {
            root: dir.path().join("nope"),
            targets: targets(&["deviceController.js"]),
        };
        assert!(rename_identifiers(config, default_rules().unwrap()).await.is_err());
    }
}
