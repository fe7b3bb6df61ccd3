//! `unidoc nav` command implementation.

use std::path::PathBuf;

use clap::Args;
use unidoc_site::{build_sidebar, write_if_changed};

use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl NavArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let config = global.load_config(None)?;

        let sidebar = build_sidebar(&config);
        let json = serde_json::to_string_pretty(&sidebar)?;

        match self.output {
            Some(path) => {
                if write_if_changed(&path, format!("{json}\n").as_bytes())? {
                    output.success(&format!("Navigation written to {}", path.display()));
                } else {
                    output.info(&format!("{}: up to date", path.display()));
                }
            }
            None => output.data(&json)?,
        }
        Ok(())
    }
}
