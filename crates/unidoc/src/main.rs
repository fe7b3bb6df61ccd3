//! Unidoc CLI - Documentation site generator.
//!
//! Provides commands for:
//! - `single-page`: Generate the single page of one unit
//! - `generate`: Generate single pages for every unit
//! - `nav`: Print the sidebar navigation as JSON
//! - `page-params`: Print "edit this page" metadata for a content path
//! - `sync`: Clone or update repositories and link their docs
//! - `hook`: Run a build lifecycle hook

mod commands;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use unidoc_config::{CliSettings, Config};

use commands::{GenerateArgs, HookArgs, NavArgs, PageParamsArgs, SinglePageArgs, SyncArgs};
use error::CliError;
use output::Output;

/// Unidoc - Documentation site generator.
#[derive(Parser)]
#[command(name = "unidoc", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover unidoc.toml).
    #[arg(short, long, global = true, env = "UNIDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Documentation root directory (overrides config).
    #[arg(short, long, global = true)]
    docs_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

impl GlobalArgs {
    /// Load configuration with CLI overrides applied.
    pub(crate) fn load_config(&self, toggle: Option<bool>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            docs_dir: self.docs_dir.clone(),
            toggle,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(
            config = ?config.config_path,
            docs = %config.docs_resolved.root.display(),
            "Configuration loaded"
        );
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the single page of one unit.
    SinglePage(SinglePageArgs),
    /// Generate single pages for every unit.
    Generate(GenerateArgs),
    /// Print sidebar navigation as JSON.
    Nav(NavArgs),
    /// Print page metadata for a content path as JSON.
    PageParams(PageParamsArgs),
    /// Clone or update repositories and link their docs.
    Sync(SyncArgs),
    /// Run a build lifecycle hook.
    Hook(HookArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.global.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::SinglePage(args) => args.execute(&cli.global),
        Commands::Generate(args) => args.execute(&cli.global),
        Commands::Nav(args) => args.execute(&cli.global),
        Commands::PageParams(args) => args.execute(&cli.global),
        Commands::Sync(args) => args.execute(&cli.global),
        Commands::Hook(args) => args.execute(&cli.global),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ CliError::Usage(_)) => {
            output.error(&err.to_string());
            ExitCode::from(err.exit_code())
        }
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::from(err.exit_code())
        }
    }
}
