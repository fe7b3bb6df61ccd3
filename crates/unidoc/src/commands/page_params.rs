//! `unidoc page-params` command implementation.

use std::path::PathBuf;

use clap::Args;
use unidoc_site::{Manifest, PageParams};

use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the page-params command.
#[derive(Args)]
pub(crate) struct PageParamsArgs {
    /// Content path, relative to the docs root or absolute within it.
    path: PathBuf,
}

impl PageParamsArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();
        let config = global.load_config(None)?;
        let manifest = Manifest::load(&config.repositories_resolved.manifest)?;

        let rel_path = self
            .path
            .strip_prefix(&config.docs_resolved.root)
            .unwrap_or(&self.path);
        let params = PageParams::for_path(rel_path, &manifest, &config.repositories_resolved);

        output.data(&serde_json::to_string_pretty(&params)?)?;
        Ok(())
    }
}
