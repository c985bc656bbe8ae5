use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use repo_chores::{
    default_rules, list_repository_files, rename_identifiers, AppConfig, ListingReport,
    RenameReport, RenamerConfig, RepoListerConfig,
};
use std::path::PathBuf;
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    // Initialize configuration from command line arguments
    let config = create_app_config(&matches)?;

    // Load .env before the filter reads RUST_LOG
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    initialize_logging(&config.log_level)?;

    if !dotenv_loaded {
        info!("No .env file found, using system environment variables");
    }

    match matches.subcommand_name() {
        Some("rename") => run_rename(config.renamer).await,
        Some("list-repo") => run_list_repo(config.repo_lister).await,
        other => anyhow::bail!("Unknown command: {:?}", other),
    }
}

fn build_cli() -> Command {
    Command::new("repo-chores")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Identifier rename pass and GitHub raw-link lister")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Set the log level (trace, debug, info, warn, error)")
                .global(true)
                .default_value("info"),
        )
        .subcommand(
            Command::new("rename")
                .about("Rewrite deviceId/id identifiers in the target files found under a root")
                .arg(
                    Arg::new("root")
                        .long("root")
                        .value_name("DIR")
                        .help("Directory to search (default: current directory)"),
                )
                .arg(
                    Arg::new("target")
                        .long("target")
                        .value_name("FILE")
                        .help("Target filename; repeat to replace the built-in list")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("list-repo")
                .about("Write raw-content URLs for every file in a GitHub repository")
                .arg(Arg::new("owner").long("owner").value_name("OWNER"))
                .arg(Arg::new("repo").long("repo").value_name("REPO"))
                .arg(Arg::new("branch").long("branch").value_name("BRANCH"))
                .arg(
                    Arg::new("base-path")
                        .long("base-path")
                        .value_name("PATH")
                        .help("Repository directory to start from (default: root)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_name("FILE")
                        .help("Output file (default: github_raw_links.txt)"),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .value_name("DIR")
                        .help("Directory name to skip; repeat to replace the built-in set")
                        .action(ArgAction::Append),
                )
                .arg(Arg::new("api-url").long("api-url").value_name("URL"))
                .arg(Arg::new("raw-url").long("raw-url").value_name("URL")),
        )
}

/// Build the application configuration: compiled-in defaults, overridden by flags
fn create_app_config(matches: &ArgMatches) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(level) = matches.get_one::<String>("log-level") {
        config.log_level = level.clone();
    }

    match matches.subcommand() {
        Some(("rename", sub)) => apply_rename_args(&mut config.renamer, sub),
        Some(("list-repo", sub)) => apply_list_repo_args(&mut config.repo_lister, sub),
        _ => {}
    }

    Ok(config)
}

fn apply_rename_args(config: &mut RenamerConfig, matches: &ArgMatches) {
    if let Some(root) = matches.get_one::<String>("root") {
        config.root = PathBuf::from(root);
    }
    if let Some(targets) = matches.get_many::<String>("target") {
        config.targets = targets.cloned().collect();
    }
}

fn apply_list_repo_args(config: &mut RepoListerConfig, matches: &ArgMatches) {
    let value = |name: &str| matches.get_one::<String>(name).cloned();

    if let Some(owner) = value("owner") {
        config.location.owner = owner;
    }
    if let Some(repo) = value("repo") {
        config.location.repo = repo;
    }
    if let Some(branch) = value("branch") {
        config.location.branch = branch;
    }
    if let Some(base_path) = value("base-path") {
        config.base_path = base_path;
    }
    if let Some(output) = value("output") {
        config.output_path = PathBuf::from(output);
    }
    if let Some(api_url) = value("api-url") {
        config.api_base_url = api_url;
    }
    if let Some(raw_url) = value("raw-url") {
        config.raw_base_url = raw_url;
    }
    if let Some(excluded) = matches.get_many::<String>("exclude") {
        config.excluded_dirs = excluded.cloned().collect();
    }
}

/// Initialize structured logging with tracing
fn initialize_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("rustls=warn".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}

async fn run_rename(config: RenamerConfig) -> Result<()> {
    info!("Configuration: {:#?}", config);

    let rules = default_rules()?;
    for rule in &rules {
        info!("Rule: {} -> {}", rule.pattern(), rule.replacement());
    }

    let report = rename_identifiers(config, rules).await?;
    print_rename_report(&report);

    Ok(())
}

async fn run_list_repo(config: RepoListerConfig) -> Result<()> {
    info!("Configuration: {:#?}", config);

    let report = list_repository_files(config).await?;
    print_listing_report(&report);

    Ok(())
}

fn print_rename_report(report: &RenameReport) {
    info!("=== RENAME REPORT ===");
    info!("Root: {}", report.root.display());
    info!("Files processed: {}", report.total_processed());
    info!("Modified: {}", report.modified.len());
    info!("Unchanged: {}", report.unchanged.len());
    info!("Errors: {}", report.errors.len());

    for file in &report.modified {
        info!("  modified {} ({})", file.path.display(), file.target);
    }

    if !report.errors.is_empty() {
        error!("Rename errors encountered:");
        for failure in &report.errors {
            error!("  {}: {}", failure.path.display(), failure.error);
        }
    }

    if !report.missing.is_empty() {
        warn!("Targets not found: {}", report.missing.join(", "));
    }
}

fn print_listing_report(report: &ListingReport) {
    info!("=== REPOSITORY LISTING REPORT ===");
    info!("Files collected: {}", report.urls.len());
    info!("Directories listed: {}", report.directories_listed);
    info!("Excluded directories skipped: {}", report.excluded_dirs.len());
    info!("Missing directories: {}", report.not_found_count());

    if !report.failures.is_empty() {
        warn!("Listing failures ({}), results may be incomplete:", report.failures.len());
        for failure in &report.failures {
            warn!("  {:?}: {}", failure.path, failure.error);
        }
    }
}
