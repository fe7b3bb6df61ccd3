//! Environment variable expansion for configuration strings.
//!
//! Only the braced forms are recognized:
//! - `${VAR}` - value of VAR, error if unset
//! - `${VAR:-default}` - value of VAR, or `default` when unset

use crate::ConfigError;

/// Expand `${VAR}` references in `value`.
///
/// `field` names the configuration key and is only used in the error.
/// Strings without `${` are returned as-is, so bare `$` in URLs survives.
/// Unset variables without a default leave their reference in place, which
/// is reported as an error for the first such reference.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let expanded = shellexpand::env_with_context_no_errors(value, |var| std::env::var(var).ok())
        .into_owned();

    match unresolved_var(&expanded) {
        Some(name) => Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{name}}} not set"),
        }),
        None => Ok(expanded),
    }
}

/// Name of the first `${NAME}` reference still present after expansion.
fn unresolved_var(expanded: &str) -> Option<&str> {
    let start = expanded.find("${")? + 2;
    let len = expanded[start..].find('}')?;
    let name = &expanded[start..start + len];
    (!name.is_empty()).then_some(name)
}
