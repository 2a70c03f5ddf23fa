use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use formpurge::{
    config::AppConfig,
    db::DbPool,
    models::PurgeScope,
    observability,
    purge::{
        MAX_PURGE_DAYS, PurgeError, PurgeOverrides, PurgeReport, PurgeService, SystemClock,
        TerminalConfirmer, TracingReporter,
    },
};

/// CLI arguments for the form submission purge tool
#[derive(Parser, Debug)]
#[command(version, about = "Purge old form submissions", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (defaults to ./formpurge.toml, then
    /// ~/.config/formpurge/formpurge.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Delete submissions of a form that are older than its retention period
    #[command(alias = "wfpp")]
    Purge {
        /// Id of the form to purge
        form_id: String,
        /// Which submissions to delete, overriding the form's purge mode
        #[arg(long, value_enum)]
        purge_type: Option<PurgeScope>,
        /// Minimum submission age in days, overriding the form setting (0 = use form setting)
        #[arg(long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_PURGE_DAYS)))]
        purge_days: Option<u32>,
        /// Submissions processed per step (defaults to purge.chunk_size)
        #[arg(long)]
        chunk_size: Option<usize>,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Report what would be deleted without deleting anything
        #[arg(long)]
        dry_run: bool,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run database migrations and exit
    Migrate,
    /// Initialize a new configuration file
    Init {
        /// Path to create the config file (defaults to ~/.config/formpurge/formpurge.toml)
        #[arg(short, long)]
        output: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Default configuration written by `init`.
fn default_config_toml() -> &'static str {
    r#"# Form submission purge configuration

[database]
type = "sqlite"
path = "~/.local/share/formpurge/forms.db"

[purge]
chunk_size = 500
dry_run = false
lock_ttl_secs = 3600
require_confirmation = true

[observability.logging]
level = "info"
format = "compact"
"#
}

/// Get the default config directory path.
fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("formpurge"))
}

/// Get the default config file path.
fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|p| p.join("formpurge.toml"))
}

/// Get the default data directory path.
fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("formpurge"))
}

/// Resolve the config file to load.
fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf, String> {
    if let Some(path) = explicit_path {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()));
        }
        return Ok(path);
    }

    let cwd_config = PathBuf::from("formpurge.toml");
    if cwd_config.exists() {
        return Ok(cwd_config);
    }

    if let Some(default_path) = default_config_path()
        && default_path.exists()
    {
        return Ok(default_path);
    }

    Err("No config file found. Run 'formpurge init' or pass --config.".to_string())
}

/// Load config and install the tracing subscriber. Exits on failure.
fn load_config(explicit_config_path: Option<&str>) -> (PathBuf, AppConfig) {
    let config_path = match resolve_config_path(explicit_config_path) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let config = match AppConfig::from_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!(
                "Failed to load config from {}: {}",
                config_path.display(),
                e
            );
            std::process::exit(1);
        }
    };

    if let Err(e) = observability::init_tracing(&config.observability) {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    if config.database.is_none() {
        eprintln!("Error: Database is not configured.");
        std::process::exit(1);
    }

    (config_path, config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    match args.command {
        Command::Purge {
            form_id,
            purge_type,
            purge_days,
            chunk_size,
            yes,
            dry_run,
            json,
        } => {
            let options = PurgeOptions {
                overrides: PurgeOverrides {
                    scope: purge_type,
                    days: purge_days,
                },
                chunk_size,
                yes,
                dry_run,
                json,
            };
            run_purge(args.config.as_deref(), &form_id, options).await;
        }
        Command::Migrate => {
            run_migrate(args.config.as_deref()).await;
        }
        Command::Init { output, force } => {
            run_init(output, force);
        }
    }
}

/// Per-run command line settings for `purge`.
struct PurgeOptions {
    overrides: PurgeOverrides,
    chunk_size: Option<usize>,
    yes: bool,
    dry_run: bool,
    json: bool,
}

async fn run_purge(explicit_config_path: Option<&str>, form_id: &str, options: PurgeOptions) {
    let (config_path, mut config) = load_config(explicit_config_path);

    if let Some(chunk_size) = options.chunk_size {
        if chunk_size == 0 {
            eprintln!("Error: --chunk-size must be at least 1");
            std::process::exit(1);
        }
        config.purge.chunk_size = chunk_size;
    }
    if options.yes {
        config.purge.require_confirmation = false;
    }
    if options.dry_run {
        config.purge.dry_run = true;
    }

    tracing::debug!(config_file = %config_path.display(), form_id, "Starting purge");

    let db = match DbPool::from_config(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            eprintln!("Error: Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let service = PurgeService::new(&db, Arc::new(SystemClock), config.purge);
    let result = service
        .run(
            form_id,
            &options.overrides,
            &TerminalConfirmer,
            &TracingReporter::new(),
        )
        .await;
    db.close().await;

    match result {
        Ok(report) => print_report(&report, options.json),
        Err(PurgeError::UserAborted) => {
            eprintln!("Aborted.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_report(report: &PurgeReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if report.dry_run {
        println!(
            "Dry run: {} of {} submissions from '{}' would be deleted ({}, older than {} days).",
            report.candidates, report.total_submissions, report.label, report.scope, report.days
        );
        return;
    }

    println!(
        "Deleted {} of {} submissions from '{}' in {} ms.",
        report.deleted, report.candidates, report.label, report.duration_ms
    );
    if report.skipped > 0 {
        println!("{} submissions had already been removed.", report.skipped);
    }
    for failure in &report.failures {
        println!("Failed to delete \"{}\": {}", failure.id, failure.error);
    }
    if report.has_failures() {
        println!("Finished with an error.");
    } else {
        println!("Process finished.");
    }
}

async fn run_migrate(explicit_config_path: Option<&str>) {
    let (config_path, config) = load_config(explicit_config_path);

    tracing::info!(
        config_file = %config_path.display(),
        "Running database migrations"
    );

    match DbPool::from_config(&config.database).await {
        Ok(pool) => {
            let result = pool.run_migrations().await;
            pool.close().await;
            match result {
                Ok(()) => {
                    tracing::info!("Database migrations completed successfully");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Database migrations failed");
                    eprintln!("Error: Database migrations failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            eprintln!("Error: Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    }
}

/// Create a default configuration file.
fn run_init(output: Option<String>, force: bool) {
    let Some(output_path) = output.map(PathBuf::from).or_else(default_config_path) else {
        eprintln!("Could not determine default config path. Please specify one with --output.");
        std::process::exit(1);
    };

    if output_path.exists() && !force {
        eprintln!(
            "Config file already exists: {}\nUse --force to overwrite.",
            output_path.display()
        );
        std::process::exit(1);
    }

    if let Some(parent) = output_path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        eprintln!("Failed to create directory {}: {}", parent.display(), e);
        std::process::exit(1);
    }

    let data_dir = default_data_dir().unwrap_or_else(|| PathBuf::from("."));
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!(
            "Failed to create data directory {}: {}",
            data_dir.display(),
            e
        );
        std::process::exit(1);
    }

    let config_content = default_config_toml().replace(
        "~/.local/share/formpurge/forms.db",
        &data_dir.join("forms.db").to_string_lossy(),
    );

    if let Err(e) = std::fs::write(&output_path, config_content) {
        eprintln!("Failed to write config file: {}", e);
        std::process::exit(1);
    }

    println!("Created config file: {}", output_path.display());
    println!("Database will be stored at: {}", data_dir.display());
    println!();
    println!("To purge a form, run:");
    println!("  formpurge purge <FORM_ID>");
}
