//! `unidoc generate` command implementation.

use clap::Args;
use unidoc_site::Generator;

use super::print_report;
use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Only generate units whose single page does not exist yet.
    #[arg(long)]
    missing: bool,

    /// Skip the toggle variant (overrides config).
    #[arg(long)]
    no_toggle: bool,
}

impl GenerateArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let config = global.load_config(self.no_toggle.then_some(false))?;

        output.info(&format!("Docs: {}", config.docs_resolved.root.display()));
        let generator = Generator::new(&config);
        let report = if self.missing {
            generator.generate_missing()
        } else {
            generator.generate_all()
        };

        print_report(&output, &report);
        Ok(())
    }
}
