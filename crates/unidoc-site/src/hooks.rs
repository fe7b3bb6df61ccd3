//! Build lifecycle hooks invoked by the host framework.

use std::fmt;

use unidoc_config::Config;

use crate::generate::{Generator, Report};

/// Point in the host framework's build at which a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Before pages are rendered: regenerate every single page.
    BuildStart,
    /// After the build: fill in single pages that are still missing.
    BuildEnd,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BuildStart => "build-start",
            Self::BuildEnd => "build-end",
        })
    }
}

/// Runs generation passes at lifecycle points.
pub struct BuildHooks<'a> {
    generator: Generator<'a>,
}

impl<'a> BuildHooks<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            generator: Generator::new(config),
        }
    }

    pub fn with_generator(generator: Generator<'a>) -> Self {
        Self { generator }
    }

    pub fn run(&self, lifecycle: Lifecycle) -> Report {
        tracing::info!(%lifecycle, "Running build hook");
        match lifecycle {
            Lifecycle::BuildStart => self.generator.generate_all(),
            Lifecycle::BuildEnd => self.generator.generate_missing(),
        }
    }
}
