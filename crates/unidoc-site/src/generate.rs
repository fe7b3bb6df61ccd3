//! Writing single pages to disk, one unit at a time or in bulk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use unidoc_config::{Config, SinglePageConfig};
use unidoc_content::{ContentError, ContentTree};

use crate::single_page::SinglePage;
use crate::unit::{self, SectionKind, Unit};

/// Error raised while generating one unit.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Unit source exists but could not be scanned.
    #[error(transparent)]
    Content(#[from] ContentError),
    /// Front matter could not be serialized.
    #[error("Failed to serialize front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
    /// Output could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a unit produced no output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Unit directory is missing (e.g. a dangling symlink).
    SourceMissing,
    /// Unit holds no markdown document.
    NoDocuments,
    /// Output already exists (generate-missing pass).
    AlreadyGenerated,
}

/// Result of generating one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// At least one output file was (re)written.
    Written(Vec<PathBuf>),
    /// All outputs already held identical bytes.
    Unchanged,
    /// Nothing was generated; previous output is untouched.
    Skipped(SkipReason),
}

/// Per-unit results of a bulk pass.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<(Unit, Result<Outcome, GenerateError>)>,
}

impl Report {
    /// Units whose output was written.
    pub fn written(&self) -> impl Iterator<Item = &Unit> {
        self.results
            .iter()
            .filter(|(_, r)| matches!(r, Ok(Outcome::Written(_))))
            .map(|(unit, _)| unit)
    }

    /// Units that failed, with their errors.
    pub fn failed(&self) -> impl Iterator<Item = (&Unit, &GenerateError)> {
        self.results
            .iter()
            .filter_map(|(unit, r)| r.as_ref().err().map(|e| (unit, e)))
    }

    /// Units skipped for `reason`.
    pub fn skipped(&self, reason: SkipReason) -> impl Iterator<Item = &Unit> {
        self.results
            .iter()
            .filter(move |(_, r)| matches!(r, Ok(Outcome::Skipped(s)) if *s == reason))
            .map(|(unit, _)| unit)
    }
}

/// Generates single pages under a docs root.
pub struct Generator<'a> {
    docs_root: &'a Path,
    config: &'a SinglePageConfig,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self::with_settings(&config.docs_resolved.root, &config.single_page)
    }

    pub fn with_settings(docs_root: &'a Path, config: &'a SinglePageConfig) -> Self {
        Self { docs_root, config }
    }

    pub fn docs_root(&self) -> &Path {
        self.docs_root
    }

    /// All units of every section, in generation order.
    pub fn units(&self) -> Vec<Unit> {
        SectionKind::ALL
            .into_iter()
            .flat_map(|section| unit::discover(self.docs_root, section))
            .collect()
    }

    /// Build a unit's page without writing it.
    pub fn build_page(&self, unit: &Unit) -> Result<Result<SinglePage, SkipReason>, GenerateError> {
        let source = unit.source_dir(self.docs_root);
        let tree = match ContentTree::scan(&source) {
            Ok(tree) => tree,
            Err(ContentError::NotFound(_) | ContentError::NotADirectory(_)) => {
                return Ok(Err(SkipReason::SourceMissing));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(SinglePage::build(unit, &tree, self.config).ok_or(SkipReason::NoDocuments))
    }

    /// Generate one unit: the primary page plus the toggle variant if enabled.
    pub fn generate_unit(&self, unit: &Unit) -> Result<Outcome, GenerateError> {
        let page = match self.build_page(unit)? {
            Ok(page) => page,
            Err(reason) => return Ok(Outcome::Skipped(reason)),
        };
        let content = page.render()?;

        let mut targets = vec![unit.output_path(self.docs_root, self.config)];
        if self.config.toggle {
            targets.push(unit.toggle_path(self.docs_root, self.config));
        }

        let mut written = Vec::new();
        for target in targets {
            if write_if_changed(&target, content.as_bytes())? {
                written.push(target);
            }
        }

        Ok(if written.is_empty() {
            Outcome::Unchanged
        } else {
            Outcome::Written(written)
        })
    }

    /// Generate every unit. Failures are logged and do not stop the pass.
    pub fn generate_all(&self) -> Report {
        self.run(|unit| self.generate_unit(unit))
    }

    /// Generate only units whose primary output does not exist yet.
    pub fn generate_missing(&self) -> Report {
        self.run(|unit| {
            if unit.output_path(self.docs_root, self.config).exists() {
                return Ok(Outcome::Skipped(SkipReason::AlreadyGenerated));
            }
            self.generate_unit(unit)
        })
    }

    fn run(&self, generate: impl Fn(&Unit) -> Result<Outcome, GenerateError>) -> Report {
        let mut report = Report::default();
        for unit in self.units() {
            let result = generate(&unit);
            log_result(&unit, &result);
            report.results.push((unit, result));
        }
        report
    }
}

fn log_result(unit: &Unit, result: &Result<Outcome, GenerateError>) {
    let id = unit.id();
    match result {
        Ok(Outcome::Written(paths)) => {
            for path in paths {
                tracing::info!(unit = %id, path = %path.display(), "Generated single page");
            }
        }
        Ok(Outcome::Unchanged) => tracing::debug!(unit = %id, "Single page unchanged"),
        Ok(Outcome::Skipped(SkipReason::SourceMissing)) => {
            tracing::warn!(unit = %id, "Unit source missing, skipping");
        }
        Ok(Outcome::Skipped(SkipReason::NoDocuments)) => {
            tracing::info!(unit = %id, "Unit has no markdown documents, skipping");
        }
        Ok(Outcome::Skipped(SkipReason::AlreadyGenerated)) => {
            tracing::debug!(unit = %id, "Single page already exists");
        }
        Err(e) => tracing::warn!(unit = %id, error = %e, "Failed to generate single page"),
    }
}

/// Write `content` unless `path` already holds identical bytes.
///
/// Returns `true` when the file was written.
pub fn write_if_changed(path: &Path, content: &[u8]) -> Result<bool, GenerateError> {
    if fs::read(path).is_ok_and(|existing| existing == content) {
        return Ok(false);
    }
    let write_error = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, content).map_err(write_error)?;
    Ok(true)
}
