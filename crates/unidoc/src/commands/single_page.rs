//! `unidoc single-page` command implementation.

use std::path::Path;

use clap::Args;
use unidoc_site::{Generator, Outcome, SectionKind, SkipReason, Unit};

use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

const USAGE: &str = "\
Usage: unidoc single-page <section-type> <unit-name>

Arguments:
  <section-type>  products | api
  <unit-name>     unit directory (e.g. 000-autumn) or its name (e.g. autumn)

Without arguments, prints this message.";

/// Arguments for the single-page command.
#[derive(Args)]
pub(crate) struct SinglePageArgs {
    /// Section type: products or api.
    section: Option<String>,

    /// Unit directory or name.
    unit: Option<String>,
}

impl SinglePageArgs {
    pub(crate) fn execute(self, global: &GlobalArgs) -> Result<(), CliError> {
        let output = Output::new();

        let Some((section, name)) = parse_invocation(self.section.as_deref(), self.unit.as_deref())?
        else {
            output.info(USAGE);
            return Ok(());
        };

        let config = global.load_config(None)?;
        let generator = Generator::new(&config);
        let unit = resolve_unit(generator.docs_root(), section, name);

        match generator.generate_unit(&unit)? {
            Outcome::Written(paths) => {
                for path in paths {
                    output.success(&format!("Generated {}", path.display()));
                }
            }
            Outcome::Unchanged => output.info(&format!("{}: up to date", unit.id())),
            Outcome::Skipped(SkipReason::SourceMissing) => {
                output.warning(&format!("{}: source directory not found", unit.id()));
            }
            Outcome::Skipped(reason) => {
                output.warning(&format!("{}: nothing to generate ({reason:?})", unit.id()));
            }
        }
        Ok(())
    }
}

/// Interpret positional arguments.
///
/// `Ok(None)` means no arguments were given and usage should be shown.
fn parse_invocation<'a>(
    section: Option<&str>,
    unit: Option<&'a str>,
) -> Result<Option<(SectionKind, &'a str)>, CliError> {
    match (section, unit) {
        (None, _) => Ok(None),
        (Some(_), None) => Err(CliError::Usage(format!("Missing unit name\n\n{USAGE}"))),
        (Some(section), Some(unit)) => {
            let section = section
                .parse::<SectionKind>()
                .map_err(|e| CliError::Usage(format!("{e}\n\n{USAGE}")))?;
            if unit.trim().is_empty() || unit.contains(['/', '\\']) || unit == "." || unit == ".." {
                return Err(CliError::Usage(format!(
                    "Unit name \"{unit}\" is not a plain directory name\n\n{USAGE}"
                )));
            }
            Ok(Some((section, unit)))
        }
    }
}

/// Match `name` against unit directories, by exact directory name first,
/// then by routable name. Unknown names are used as given.
fn resolve_unit(docs_root: &Path, section: SectionKind, name: &str) -> Unit {
    let units = unidoc_site::discover_units(docs_root, section);
    units
        .iter()
        .find(|unit| unit.dir_name == name)
        .or_else(|| units.iter().find(|unit| unit.name() == name))
        .cloned()
        .unwrap_or_else(|| Unit::new(section, name))
}
