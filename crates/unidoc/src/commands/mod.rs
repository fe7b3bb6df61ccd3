//! CLI command implementations.

pub(crate) mod generate;
pub(crate) mod hook;
pub(crate) mod nav;
pub(crate) mod page_params;
pub(crate) mod single_page;
pub(crate) mod sync;

pub(crate) use generate::GenerateArgs;
pub(crate) use hook::HookArgs;
pub(crate) use nav::NavArgs;
pub(crate) use page_params::PageParamsArgs;
pub(crate) use single_page::SinglePageArgs;
pub(crate) use sync::SyncArgs;

use unidoc_site::{Report, SkipReason};

use crate::output::Output;

/// Print the outcome of a bulk generation pass.
pub(crate) fn print_report(output: &Output, report: &Report) {
    for unit in report.skipped(SkipReason::SourceMissing) {
        output.warning(&format!("{}: source missing, skipped", unit.id()));
    }
    let mut failed = 0;
    for (unit, error) in report.failed() {
        output.warning(&format!("{}: {error}", unit.id()));
        failed += 1;
    }

    let written = report.written().count();
    let summary = format!("Generated {written} single page(s), {failed} failed");
    if failed == 0 {
        output.success(&summary);
    } else {
        output.warning(&summary);
    }
}
