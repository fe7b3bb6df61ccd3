//! Site-wide sidebar payload for the host framework.

use std::collections::BTreeMap;

use unidoc_config::Config;

use crate::generate::Generator;
use crate::navigation::{self, NavigationItem};

/// Sidebars keyed by the URL prefix they apply to.
pub type Sidebar = BTreeMap<String, Vec<NavigationItem>>;

/// Build every configured sidebar plus one anchor sidebar per single page.
///
/// Single-page sidebars are keyed by the page URL; units that cannot be
/// scanned or hold no documents are left out.
pub fn build_sidebar(config: &Config) -> Sidebar {
    let docs_root = &config.docs_resolved.root;
    let mut sidebar = Sidebar::new();

    for group in &config.sidebar {
        let items = navigation::build_items(docs_root, &group.sections, group.collapsed);
        sidebar.insert(group.prefix.clone(), items);
    }

    let generator = Generator::new(config);
    for unit in generator.units() {
        match generator.build_page(&unit) {
            Ok(Ok(page)) => {
                sidebar.insert(unit.page_url(&config.single_page), page.navigation);
            }
            Ok(Err(reason)) => {
                tracing::debug!(unit = %unit.id(), ?reason, "No single-page sidebar");
            }
            Err(e) => {
                tracing::warn!(unit = %unit.id(), error = %e, "Failed to build single-page sidebar");
            }
        }
    }

    sidebar
}
