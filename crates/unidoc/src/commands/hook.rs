//! `unidoc hook` command implementation.

use clap::{Args, ValueEnum};
use unidoc_site::{BuildHooks, Lifecycle};

use super::print_report;
use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Build lifecycle point.
#[derive(Clone, Copy, ValueEnum)]
enum Stage {
    /// Regenerate every single page.
    BuildStart,
    /// Generate single pages that are still missing.
    BuildEnd,
}

impl From<Stage> for Lifecycle {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::BuildStart => Self::BuildStart,
            Stage::BuildEnd => Self::BuildEnd,
        }
    }
}

/// Arguments for the hook command.
#[derive(Args)]
pub(crate) struct HookArgs {
    /// Lifecycle point to run.
    #[arg(value_enum)]
    stage: Stage,
}

impl HookArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let config = global.load_config(None)?;

        let report = BuildHooks::new(&config).run(self.stage.into());
        print_report(&output, &report);
        Ok(())
    }
}
