//! Navigation trees and single-page aggregation for Unidoc.
//!
//! This crate provides:
//! - [`navigation::build_items`]: sidebar trees from directory structure
//! - [`aggregate::flatten`] and [`SinglePage`]: one document per unit
//! - [`Generator`]: writing single pages, per unit or in bulk
//! - [`BuildHooks`]: passes run at build lifecycle points
//! - [`PageParams`]: "edit this page" metadata from the [`Manifest`]
//!
//! # Quick Start
//!
//! ```no_run
//! use unidoc_config::Config;
//! use unidoc_site::{BuildHooks, Lifecycle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None, None)?;
//! let report = BuildHooks::new(&config).run(Lifecycle::BuildStart);
//! for (unit, error) in report.failed() {
//!     eprintln!("{}: {error}", unit.id());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
mod anchors;
mod generate;
mod hooks;
mod manifest;
pub mod markdown;
pub mod navigation;
mod page_params;
mod sidebar;
mod single_page;
mod unit;

pub use generate::{GenerateError, Generator, Outcome, Report, SkipReason, write_if_changed};
pub use hooks::{BuildHooks, Lifecycle};
pub use manifest::{Manifest, ManifestError, Repository};
pub use navigation::NavigationItem;
pub use page_params::PageParams;
pub use sidebar::{Sidebar, build_sidebar};
pub use single_page::SinglePage;
pub use unit::{SectionKind, Unit, UnknownSection, discover as discover_units};
