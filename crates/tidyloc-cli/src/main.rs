//! `tidyloc` — maintenance CLI for translation catalogs: duplicate analysis,
//! key pruning, and call-site rewriting.

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::anyhow;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use tidyloc_analyze::{build_report, render_text, write_report};
use tidyloc_catalog::Catalog;
use tidyloc_catalog::error::CatalogError;
use tidyloc_rewrite::error::RewriteError;
use tidyloc_rewrite::plan::RewritePlan;
use tidyloc_rewrite::{DEFAULT_EXTENSIONS, DEFAULT_FUNCTION, FileStatus, RewriteEngine};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Default logging target when `RUST_LOG` is not provided.
const DEFAULT_LOG_LEVEL: &str = "info";
/// Duplicate groups shown by `analyze` table output by default.
const DEFAULT_GROUP_LIMIT: usize = 10;

fn main() {
    init_logging();
    let cli = Cli::parse();
    debug!(command = command_label(&cli.command), "dispatching");

    if let Err(err) = run(cli) {
        eprintln!("error: {}", err.display_message());
        process::exit(err.exit_code());
    }
}

fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Analyze(args) => handle_analyze(&args),
        Command::Flatten(args) => handle_flatten(&args),
        Command::Prune(args) => handle_prune(&args),
        Command::Rewrite(args) => handle_rewrite(&args),
    }
}

#[derive(Parser)]
#[command(name = "tidyloc", about = "Maintenance CLI for translation catalogs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report exact duplicate values in a catalog.
    Analyze(AnalyzeArgs),
    /// Print the catalog as flat dotted key/value pairs.
    Flatten(FlattenArgs),
    /// Remove keys and strip shared placeholders from a catalog.
    Prune(PruneArgs),
    /// Rewrite translation call sites in a source tree.
    Rewrite(RewriteArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    #[arg(help = "Path to the translation catalog JSON file")]
    catalog: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    #[arg(long, help = "Write the full JSON report to this file")]
    output: Option<PathBuf>,
    #[arg(
        long,
        default_value_t = DEFAULT_GROUP_LIMIT,
        help = "Maximum duplicate groups shown in table output"
    )]
    limit: usize,
}

#[derive(Args)]
struct FlattenArgs {
    #[arg(help = "Path to the translation catalog JSON file")]
    catalog: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Args)]
struct PruneArgs {
    #[arg(help = "Path to the translation catalog JSON file")]
    catalog: PathBuf,
    #[arg(long, help = "JSON file holding an array of dotted keys to remove")]
    plan: Option<PathBuf>,
    #[arg(long = "key", help = "Dotted key to remove (repeatable)")]
    keys: Vec<String>,
    #[arg(long, help = "Strip {{shared.*}} placeholders and prune emptied leaves")]
    strip_placeholders: bool,
    #[arg(long, help = "Write the result here instead of back in place")]
    output: Option<PathBuf>,
    #[arg(long, help = "Report changes without writing the catalog")]
    dry_run: bool,
}

#[derive(Args)]
struct RewriteArgs {
    #[arg(help = "Source tree to rewrite")]
    root: PathBuf,
    #[arg(long, help = "Rewrite plan JSON file")]
    plan: PathBuf,
    #[arg(
        long,
        default_value = DEFAULT_FUNCTION,
        help = "Translation lookup function name"
    )]
    function: String,
    #[arg(
        long = "ext",
        help = "Source file extension to visit (repeatable; defaults to ts and tsx)"
    )]
    extensions: Vec<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    #[arg(long, help = "Report changes without writing any files")]
    dry_run: bool,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug)]
enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

type CliResult<T> = Result<T, CliError>;

impl CliError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Analyze(_) => "analyze",
        Command::Flatten(_) => "flatten",
        Command::Prune(_) => "prune",
        Command::Rewrite(_) => "rewrite",
    }
}

fn handle_analyze(args: &AnalyzeArgs) -> CliResult<()> {
    let catalog = Catalog::load(&args.catalog).map_err(CliError::failure)?;
    let report = build_report(&catalog);

    if let Some(path) = &args.output {
        write_report(&report, path).map_err(CliError::failure)?;
        println!("wrote report to {}", path.display());
    }

    match args.format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&report)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            print!("{}", render_text(&report, args.limit));
        }
    }
    Ok(())
}

fn handle_flatten(args: &FlattenArgs) -> CliResult<()> {
    let catalog = Catalog::load(&args.catalog).map_err(CliError::failure)?;
    let entries = catalog.flatten();

    match args.format {
        OutputFormat::Table => {
            for (key, value) in &entries {
                println!("{key} = {value}");
            }
        }
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&flattened_to_json(&entries))
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
    }
    Ok(())
}

fn handle_prune(args: &PruneArgs) -> CliResult<()> {
    let keys = collect_prune_keys(args)?;
    if keys.is_empty() && !args.strip_placeholders {
        return Err(CliError::validation(
            "nothing to do: provide --plan, --key, or --strip-placeholders",
        ));
    }

    let mut catalog = Catalog::load(&args.catalog).map_err(CliError::failure)?;

    let mut removed = 0usize;
    let mut absent = 0usize;
    for key in &keys {
        if catalog.remove_path(key).map_err(classify_catalog_error)? {
            removed += 1;
        } else {
            absent += 1;
        }
    }
    if !keys.is_empty() {
        println!("removed {removed} keys ({absent} already absent)");
    }

    if args.strip_placeholders {
        let outcome = catalog
            .strip_shared_placeholders()
            .map_err(CliError::failure)?;
        println!(
            "stripped {} placeholders, pruned {} empty leaves",
            outcome.stripped, outcome.pruned
        );
    }

    if args.dry_run {
        println!("dry run: catalog not written");
        return Ok(());
    }

    let destination = args.output.clone().unwrap_or_else(|| args.catalog.clone());
    catalog.save(&destination).map_err(CliError::failure)?;
    println!("wrote {}", destination.display());
    Ok(())
}

fn handle_rewrite(args: &RewriteArgs) -> CliResult<()> {
    let plan = RewritePlan::load(&args.plan).map_err(classify_rewrite_error)?;
    let engine = RewriteEngine::new(plan, &args.function).map_err(classify_rewrite_error)?;
    let extensions = resolve_extensions(&args.extensions);
    let summary = engine
        .apply_tree(&args.root, &extensions, args.dry_run)
        .map_err(classify_rewrite_error)?;

    match args.format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&summary)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            for outcome in &summary.outcomes {
                match outcome.status {
                    FileStatus::Updated => {
                        println!("{}", outcome.path.display());
                        for change in &outcome.changes {
                            println!("  {} -> {}", change.old_key, change.new_key);
                        }
                    }
                    FileStatus::Skipped => {
                        println!("{} (skipped: unbalanced braces)", outcome.path.display());
                    }
                    FileStatus::Unchanged => {}
                }
            }
            println!("files scanned: {}", summary.files_scanned);
            println!("files updated: {}", summary.files_updated);
            if summary.files_skipped > 0 {
                println!("files skipped: {}", summary.files_skipped);
            }
            println!("total changes: {}", summary.total_changes);
            if args.dry_run {
                println!("dry run: no files were written");
            }
        }
    }
    Ok(())
}

fn collect_prune_keys(args: &PruneArgs) -> CliResult<Vec<String>> {
    let mut keys = Vec::new();
    if let Some(path) = &args.plan {
        let raw = fs::read_to_string(path).map_err(|err| {
            CliError::failure(anyhow!(
                "failed to read prune plan '{}': {err}",
                path.display()
            ))
        })?;
        let listed: Vec<String> = serde_json::from_str(&raw).map_err(|err| {
            CliError::validation(format!(
                "prune plan must be a JSON array of dotted keys: {err}"
            ))
        })?;
        keys.extend(listed);
    }
    keys.extend(args.keys.iter().cloned());

    if keys.iter().any(|key| key.trim().is_empty()) {
        return Err(CliError::validation("prune keys must not be blank"));
    }
    Ok(keys)
}

fn flattened_to_json(entries: &[(String, String)]) -> Value {
    let mut map = Map::new();
    for (key, value) in entries {
        map.insert(key.clone(), Value::String(value.clone()));
    }
    Value::Object(map)
}

fn resolve_extensions(configured: &[String]) -> Vec<String> {
    if configured.is_empty() {
        DEFAULT_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect()
    } else {
        configured
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect()
    }
}

fn classify_catalog_error(err: CatalogError) -> CliError {
    match err {
        CatalogError::InvalidKeyPath { path, reason } => {
            CliError::validation(format!("invalid key path '{path}': {reason}"))
        }
        other => CliError::failure(other),
    }
}

fn classify_rewrite_error(err: RewriteError) -> CliError {
    match err {
        RewriteError::PlanEmpty => CliError::validation("rewrite plan has no mappings"),
        RewriteError::InvalidMapping { key, reason } => {
            CliError::validation(format!("invalid mapping for '{key}': {reason}"))
        }
        RewriteError::InvalidFunction { reason } => {
            CliError::validation(format!("invalid function name: {reason}"))
        }
        RewriteError::RootMissing { path } => {
            CliError::validation(format!("source root '{}' does not exist", path.display()))
        }
        other => CliError::failure(other),
    }
}
