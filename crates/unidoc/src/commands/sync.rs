//! `unidoc sync` command implementation.

use clap::Args;
use unidoc_site::Manifest;
use unidoc_sync::Syncer;

use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {}

impl SyncArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let config = global.load_config(None)?;
        let manifest = Manifest::load(&config.repositories_resolved.manifest)?;

        if manifest.is_empty() {
            output.warning("Repository manifest is empty, nothing to sync");
            return Ok(());
        }

        output.info(&format!(
            "Syncing {} repositories into {}",
            manifest.repositories().len(),
            config.repositories_resolved.sync_dir.display()
        ));
        let report = Syncer::new(&config).sync(&manifest);

        for (name, error) in &report.failed {
            output.warning(&format!("{name}: {error}"));
        }
        let summary = format!(
            "Synced {} repositories, {} failed",
            report.synced.len(),
            report.failed.len()
        );
        if report.failed.is_empty() {
            output.success(&summary);
        } else {
            output.warning(&summary);
        }
        Ok(())
    }
}
