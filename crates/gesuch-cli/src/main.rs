use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use gesuch_core::config_file::{self, ConfigFile};
use gesuch_ingest::DocumentPipeline;
use tracing_subscriber::EnvFilter;

mod batch;
mod output;

use batch::Job;
use output::ColorMode;

/// Gesuch extractor - Find sub-projects and budgets in funding applications
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract sub-projects, budgets and metadata from PDF, Word or text files
    Extract {
        /// Documents to process
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// MIME type for all files (default: guessed from each extension)
        #[arg(long)]
        mime: Option<String>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Number of documents processed concurrently
        #[arg(long, default_value_t = 4)]
        workers: usize,

        /// Per-document extraction timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective merged configuration as TOML
    Show {
        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the platform config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Extract {
            files,
            mime,
            json,
            config,
            workers,
            timeout_secs,
            no_color,
        } => {
            extract(
                files,
                mime,
                json,
                config,
                workers,
                timeout_secs,
                no_color,
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Show { config } => {
                let config = resolve_config(config)?;
                print!("{}", config_file::to_toml(&config)?);
                Ok(())
            }
            ConfigAction::Path => match config_file::config_path() {
                Some(path) => {
                    println!("{}", path.display());
                    Ok(())
                }
                None => anyhow::bail!("No platform config directory on this system"),
            },
        },
    }
}

/// Logs go to stderr so JSON on stdout stays clean. `-v` beats `RUST_LOG`.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Resolve configuration: `--config` > `GESUCH_CONFIG` > cascaded files.
///
/// An explicitly named file must exist and parse.
fn resolve_config(explicit: Option<PathBuf>) -> anyhow::Result<ConfigFile> {
    let explicit = explicit.or_else(|| std::env::var("GESUCH_CONFIG").ok().map(PathBuf::from));
    match explicit {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            Ok(config_file::read_config(&path)?)
        }
        None => Ok(config_file::load_config()),
    }
}

#[allow(clippy::too_many_arguments)]
async fn extract(
    files: Vec<PathBuf>,
    mime: Option<String>,
    json: bool,
    config: Option<PathBuf>,
    workers: usize,
    timeout_secs: Option<u64>,
    no_color: bool,
) -> anyhow::Result<()> {
    let config = resolve_config(config)?;
    let pipeline = Arc::new(DocumentPipeline::from_config(&config)?);
    let color = ColorMode(!no_color && !json);

    let jobs: Vec<Job> = files
        .iter()
        .map(|path| Job {
            path: path.clone(),
            mime_type: mime.clone().unwrap_or_else(|| batch::guess_mime(path)),
        })
        .collect();

    let results = batch::run_batch(
        pipeline,
        jobs,
        workers,
        timeout_secs.map(Duration::from_secs),
    )
    .await;

    let mut writer = std::io::stdout().lock();
    if json {
        let rendered = match results.as_slice() {
            [single] => serde_json::to_string_pretty(single)?,
            all => serde_json::to_string_pretty(all)?,
        };
        writeln!(writer, "{}", rendered)?;
    } else {
        for (path, result) in files.iter().zip(&results) {
            output::print_result(&mut writer, path, result, color)?;
        }
        if results.len() > 1 {
            output::print_summary(&mut writer, &results, color)?;
        }
    }
    writer.flush()?;

    let failed = results.iter().filter(|r| !r.success).count();
    if failed > 0 {
        anyhow::bail!("{} of {} documents failed", failed, results.len());
    }
    Ok(())
}
