//! Configuration management for Unidoc.
//!
//! Parses `unidoc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `repositories.git_host`
//! - `repositories.edit_link`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the documentation root directory.
    pub docs_dir: Option<PathBuf>,
    /// Override generation of the toggle variant.
    pub toggle: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "unidoc.toml";

/// Default `git_host` for repository synchronization.
const DEFAULT_GIT_HOST: &str = "https://github.com";

/// Default "edit this page" link template.
const DEFAULT_EDIT_LINK: &str = "https://github.com/{organization}/{repository}/edit/main/docs/{path}";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation tree configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Single-page generation settings.
    pub single_page: SinglePageConfig,
    /// Sidebar groups, one per URL prefix.
    pub sidebar: Vec<SidebarConfig>,
    /// Repository manifest and synchronization (raw strings from TOML).
    repositories: RepositoriesConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved repositories configuration (set after loading).
    #[serde(skip)]
    pub repositories_resolved: RepositoriesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    root: Option<String>,
}

/// Resolved documentation tree configuration.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Root of the documentation tree served by the host framework.
    pub root: PathBuf,
}

/// Single-page generation settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SinglePageConfig {
    /// File name of the primary single-page output.
    pub file_name: String,
    /// Also write the toggle variant.
    pub toggle: bool,
    /// Directory (under the docs root) holding toggle variants.
    pub toggle_dir: String,
    /// Subdirectory names visited first, in this order, when flattening a unit.
    pub section_priority: Vec<String>,
    /// Levels every aggregated heading is shifted down by.
    pub heading_offset: u8,
    /// Whether subdirectory groups in a single page's sidebar start collapsed.
    pub collapsed: bool,
}

impl Default for SinglePageConfig {
    fn default() -> Self {
        Self {
            file_name: "single-page.md".to_owned(),
            toggle: true,
            toggle_dir: "single".to_owned(),
            section_priority: [
                "getting-started",
                "installation",
                "guides",
                "framework-elements",
                "concepts",
                "tutorials",
                "examples",
                "reference",
                "api",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            heading_offset: 1,
            collapsed: true,
        }
    }
}

/// One sidebar, attached to pages under `prefix`.
#[derive(Debug, Deserialize)]
pub struct SidebarConfig {
    /// URL prefix the sidebar is shown under (e.g. `/autumn/`).
    pub prefix: String,
    /// Whether nested groups start collapsed.
    #[serde(default = "default_collapsed")]
    pub collapsed: bool,
    /// Top-level entries, in display order.
    #[serde(default)]
    pub sections: Vec<SidebarSection>,
}

/// A top-level sidebar entry backed by a content subdirectory.
#[derive(Debug, Clone, Deserialize)]
pub struct SidebarSection {
    /// Display label.
    pub label: String,
    /// Subdirectory relative to the docs root.
    pub dir: String,
}

fn default_collapsed() -> bool {
    true
}

/// Raw repositories configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RepositoriesConfigRaw {
    manifest: Option<String>,
    sync_dir: Option<String>,
    git_host: Option<String>,
    edit_link: Option<String>,
}

/// Resolved repositories configuration with absolute paths.
#[derive(Debug)]
pub struct RepositoriesConfig {
    /// Path to `repositories.json`.
    pub manifest: PathBuf,
    /// Directory holding cloned repositories.
    pub sync_dir: PathBuf,
    /// Base URL repositories are cloned from.
    pub git_host: String,
    /// "Edit this page" link template with `{organization}`, `{repository}`
    /// and `{path}` placeholders.
    pub edit_link: String,
}

impl Default for RepositoriesConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("repositories.json"),
            sync_dir: PathBuf::from("sync"),
            git_host: DEFAULT_GIT_HOST.to_owned(),
            edit_link: DEFAULT_EDIT_LINK.to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`repositories.git_host`").
        field: String,
        /// Error message (e.g., "${`GIT_TOKEN`} not set").
        message: String,
    },
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `unidoc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(docs_dir) = &settings.docs_dir {
            self.docs_resolved.root.clone_from(docs_dir);
        }
        if let Some(toggle) = settings.toggle {
            self.single_page.toggle = toggle;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    pub fn default_with_base(base: &Path) -> Self {
        let defaults = RepositoriesConfig::default();
        Self {
            docs: DocsConfigRaw::default(),
            single_page: SinglePageConfig::default(),
            sidebar: Vec::new(),
            repositories: RepositoriesConfigRaw::default(),
            docs_resolved: DocsConfig {
                root: base.join("docs"),
            },
            repositories_resolved: RepositoriesConfig {
                manifest: base.join(defaults.manifest),
                sync_dir: base.join(defaults.sync_dir),
                ..defaults
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_single_page()?;
        self.validate_sidebar()?;
        require_http_url(&self.repositories_resolved.git_host, "repositories.git_host")?;
        Ok(())
    }

    fn validate_single_page(&self) -> Result<(), ConfigError> {
        const MAX_HEADING_OFFSET: u8 = 5;

        let single_page = &self.single_page;
        if !Path::new(&single_page.file_name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        {
            return Err(ConfigError::Validation(
                "single_page.file_name must name a .md file".to_owned(),
            ));
        }
        if single_page.toggle_dir.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "single_page.toggle_dir cannot be empty".to_owned(),
            ));
        }
        if single_page.section_priority.iter().any(String::is_empty) {
            return Err(ConfigError::Validation(
                "single_page.section_priority cannot contain empty names".to_owned(),
            ));
        }
        if single_page.heading_offset > MAX_HEADING_OFFSET {
            return Err(ConfigError::Validation(format!(
                "single_page.heading_offset cannot exceed {MAX_HEADING_OFFSET}"
            )));
        }
        Ok(())
    }

    fn validate_sidebar(&self) -> Result<(), ConfigError> {
        for sidebar in &self.sidebar {
            if !sidebar.prefix.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "sidebar prefix \"{}\" must start with /",
                    sidebar.prefix
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variables and resolve relative paths against the
    /// config file's directory.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            root: resolve(self.docs.root.as_deref(), "docs"),
        };

        let git_host = self
            .repositories
            .git_host
            .as_deref()
            .unwrap_or(DEFAULT_GIT_HOST);
        let edit_link = self
            .repositories
            .edit_link
            .as_deref()
            .unwrap_or(DEFAULT_EDIT_LINK);

        self.repositories_resolved = RepositoriesConfig {
            manifest: resolve(self.repositories.manifest.as_deref(), "repositories.json"),
            sync_dir: resolve(self.repositories.sync_dir.as_deref(), "sync"),
            git_host: expand::expand_env(git_host, "repositories.git_host")?
                .trim_end_matches('/')
                .to_owned(),
            edit_link: expand::expand_env(edit_link, "repositories.edit_link")?,
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.root, PathBuf::from("/test/docs"));
        assert_eq!(
            config.repositories_resolved.manifest,
            PathBuf::from("/test/repositories.json")
        );
        assert_eq!(
            config.repositories_resolved.sync_dir,
            PathBuf::from("/test/sync")
        );
        assert_eq!(config.repositories_resolved.git_host, "https://github.com");
        assert_eq!(config.single_page.file_name, "single-page.md");
        assert!(config.single_page.toggle);
        assert_eq!(config.single_page.heading_offset, 1);
        assert_eq!(config.single_page.section_priority[0], "getting-started");
        assert!(config.sidebar.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.single_page.toggle_dir, "single");
        assert!(config.sidebar.is_empty());
    }

    #[test]
    fn test_parse_single_page_config() {
        let toml = r#"
[single_page]
file_name = "all.md"
toggle = false
section_priority = ["intro", "reference"]
heading_offset = 2
collapsed = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.single_page.file_name, "all.md");
        assert!(!config.single_page.toggle);
        assert_eq!(config.single_page.toggle_dir, "single");
        assert_eq!(
            config.single_page.section_priority,
            vec!["intro".to_owned(), "reference".to_owned()]
        );
        assert_eq!(config.single_page.heading_offset, 2);
        assert!(!config.single_page.collapsed);
    }

    #[test]
    fn test_parse_sidebar_config() {
        let toml = r#"
[[sidebar]]
prefix = "/autumn/"

[[sidebar.sections]]
label = "Getting started"
dir = "products/000-autumn/getting-started"

[[sidebar.sections]]
label = "Reference"
dir = "products/000-autumn/reference"

[[sidebar]]
prefix = "/api/"
collapsed = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sidebar.len(), 2);
        assert_eq!(config.sidebar[0].prefix, "/autumn/");
        assert!(config.sidebar[0].collapsed);
        assert_eq!(config.sidebar[0].sections.len(), 2);
        assert_eq!(config.sidebar[0].sections[1].label, "Reference");
        assert_eq!(
            config.sidebar[0].sections[1].dir,
            "products/000-autumn/reference"
        );
        assert!(!config.sidebar[1].collapsed);
        assert!(config.sidebar[1].sections.is_empty());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
root = "site/docs"

[repositories]
manifest = "meta/repos.json"
sync_dir = ".sync"
git_host = "https://git.example.com/"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();

        assert_eq!(config.docs_resolved.root, PathBuf::from("/project/site/docs"));
        assert_eq!(
            config.repositories_resolved.manifest,
            PathBuf::from("/project/meta/repos.json")
        );
        assert_eq!(
            config.repositories_resolved.sync_dir,
            PathBuf::from("/project/.sync")
        );
        assert_eq!(config.repositories_resolved.git_host, "https://git.example.com");
        assert_eq!(config.repositories_resolved.edit_link, DEFAULT_EDIT_LINK);
    }

    #[test]
    fn test_resolve_expands_env_vars() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("UNIDOC_TEST_HOST", "git.internal");
        }
        let toml = r#"
[repositories]
git_host = "https://${UNIDOC_TEST_HOST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve(Path::new("/project")).unwrap();
        assert_eq!(config.repositories_resolved.git_host, "https://git.internal");
        unsafe {
            std::env::remove_var("UNIDOC_TEST_HOST");
        }
    }

    #[test]
    fn test_resolve_missing_env_var_fails() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("UNIDOC_TEST_NO_SUCH_VAR");
        }
        let toml = r#"
[repositories]
edit_link = "https://${UNIDOC_TEST_NO_SUCH_VAR}/{path}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.resolve(Path::new("/project")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.apply_cli_settings(&CliSettings {
            docs_dir: Some(PathBuf::from("/elsewhere/docs")),
            toggle: Some(false),
        });
        assert_eq!(config.docs_resolved.root, PathBuf::from("/elsewhere/docs"));
        assert!(!config.single_page.toggle);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.docs_resolved.root, PathBuf::from("/project/docs"));
        assert!(config.single_page.toggle);
    }

    fn assert_validation_error(config: &Config, expected: &str) {
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(
            err.to_string().contains(expected),
            "expected {expected:?} in {err}"
        );
    }

    #[test]
    fn test_validate_file_name_must_be_markdown() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.single_page.file_name = "single-page.html".to_owned();
        assert_validation_error(&config, "single_page.file_name");
    }

    #[test]
    fn test_validate_heading_offset_limit() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.single_page.heading_offset = 6;
        assert_validation_error(&config, "heading_offset");
    }

    #[test]
    fn test_validate_empty_priority_entry() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.single_page.section_priority.push(String::new());
        assert_validation_error(&config, "section_priority");
    }

    #[test]
    fn test_validate_sidebar_prefix() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.sidebar.push(SidebarConfig {
            prefix: "autumn/".to_owned(),
            collapsed: true,
            sections: Vec::new(),
        });
        assert_validation_error(&config, "must start with /");
    }

    #[test]
    fn test_validate_git_host_scheme() {
        let mut config = Config::default_with_base(Path::new("/project"));
        config.repositories_resolved.git_host = "git@github.com".to_owned();
        assert_validation_error(&config, "repositories.git_host");
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/unidoc.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[docs]\nroot = \"content\"\n").unwrap();

        let settings = CliSettings {
            toggle: Some(false),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.docs_resolved.root, temp_dir.path().join("content"));
        assert_eq!(
            config.repositories_resolved.manifest,
            temp_dir.path().join("repositories.json")
        );
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert!(!config.single_page.toggle);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[single_page]\nheading_offset = 9\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
