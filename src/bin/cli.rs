//! jobwatch CLI
//!
//! Local execution entry point, meant to be run on a schedule (cron, CI).

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobwatch::{
    error::{AppError, Result},
    models::Config,
    notify::{EmailCredentials, LogNotifier, Notifier, SmtpNotifier},
    pipeline::{self, Scanner},
    storage::{LocalSeenStore, SeenStore},
};

/// jobwatch - Job Postings Watcher
#[derive(Parser, Debug)]
#[command(
    name = "jobwatch",
    version,
    about = "Polls employer career pages and emails new US job postings"
)]
struct Cli {
    /// Path to storage directory containing config and state files
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan all sources, email new postings, and remember them
    Run {
        /// Log the digest instead of emailing it, and do not save state
        #[arg(long)]
        dry_run: bool,
    },

    /// Scan all sources and print matching postings as JSON
    Scan,

    /// List configured sources in registry order
    Sources,

    /// Validate configuration and email settings
    Validate,

    /// Show storage and state info
    Info,

    /// Write the default configuration to the storage directory
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.storage_dir.join("config.toml");

    if let Command::InitConfig { force } = cli.command {
        if config_path.exists() && !force {
            log::warn!(
                "Config already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
            return Ok(());
        }
        std::fs::create_dir_all(&cli.storage_dir)?;
        std::fs::write(&config_path, Config::default().to_toml()?)?;
        log::info!("Default config written to {}", config_path.display());
        return Ok(());
    }

    let config = Config::load_or_default(&config_path);
    let store = LocalSeenStore::in_dir(&cli.storage_dir, &config.storage.seen_file);

    match cli.command {
        Command::Run { dry_run } => {
            config.validate()?;
            let scanner = Scanner::from_config(&config)?;

            let notifier: Box<dyn Notifier> = if dry_run {
                Box::new(LogNotifier)
            } else {
                let credentials = EmailCredentials::from_env()?;
                Box::new(SmtpNotifier::new(&config.notify, credentials)?)
            };

            let summary = pipeline::run_once(
                &scanner,
                &store,
                notifier.as_ref(),
                &config.notify,
                dry_run,
            )
            .await?;

            log::info!(
                "Run finished in {}s: {} scanned, {} new, notified: {}, saved: {}",
                (summary.finished_at - summary.started_at).num_seconds(),
                summary.scanned,
                summary.new_count,
                summary.notified,
                summary.saved
            );
        }

        Command::Scan => {
            config.validate()?;
            let outcome = Scanner::from_config(&config)?.run_scan().await;
            println!("{}", serde_json::to_string_pretty(&outcome.postings)?);
        }

        Command::Sources => {
            for (i, source) in config.sources.iter().enumerate() {
                let queries = source.queries();
                if queries.is_empty() {
                    println!("{:>2}. [{}] {}", i + 1, source.kind(), source.label());
                } else {
                    println!(
                        "{:>2}. [{}] {} ({} queries)",
                        i + 1,
                        source.kind(),
                        source.label(),
                        queries.len()
                    );
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            Scanner::from_config(&config)?;
            log::info!("✓ Config OK ({} sources)", config.sources.len());

            match EmailCredentials::from_env() {
                Ok(credentials) => {
                    SmtpNotifier::new(&config.notify, credentials)?;
                    log::info!("✓ Email settings OK");
                }
                Err(AppError::Config(message)) => log::warn!("Email not configured: {message}"),
                Err(e) => return Err(e),
            }

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!(
                "Config: {}",
                if config_path.exists() {
                    "exists"
                } else {
                    "not found (using defaults)"
                }
            );
            log::info!("Sources: {}", config.sources.len());

            if store.path().exists() {
                let seen = store.load().await;
                log::info!(
                    "Seen-store: {} identities in {}",
                    seen.len(),
                    store.path().display()
                );
            } else {
                log::info!("No seen-store yet.");
            }
        }

        Command::InitConfig { .. } => {}
    }

    Ok(())
}
