//! Configuration validation

use super::*;
use crate::files::pattern::FilePattern;
use anyhow::{Context, Result};
use std::collections::HashSet;
use tracing::warn;

/// Validate a complete parameter plan
pub fn validate_plan(plan: &PlanConfig) -> Result<()> {
    let mut seen = HashSet::new();

    for (index, provider) in plan.parameters.iter().enumerate() {
        if !seen.insert(provider.name()) {
            anyhow::bail!(
                "parameter '{}' (entry {}) is declared more than once",
                provider.name(),
                index
            );
        }
        validate_provider(provider)?;
    }

    Ok(())
}

/// Validate a single provider description
pub fn validate_provider(provider: &ProviderConfig) -> Result<()> {
    if provider.name().trim().is_empty() {
        anyhow::bail!("{} provider has an empty parameter name", provider.kind());
    }

    match provider {
        ProviderConfig::List(list) => validate_list(list),
        ProviderConfig::Range(range) => validate_range(&range.name, range.start, range.end),
        ProviderConfig::FileSet(set) => validate_file_set(set),
        ProviderConfig::Username(username) => validate_username(username),
        ProviderConfig::Custom(custom) => validate_custom(custom),
    }
}

fn validate_list(list: &ListConfig) -> Result<()> {
    if list.values.is_empty() {
        anyhow::bail!("list provider '{}' has no values", list.name);
    }
    Ok(())
}

fn validate_range(name: &str, start: i64, end: i64) -> Result<()> {
    if start > end {
        anyhow::bail!(
            "range provider '{}' has start {} greater than end {}",
            name,
            start,
            end
        );
    }
    Ok(())
}

/// Validate a file set
///
/// Percentages that do not add up to 100 are accepted: the dispersion treats
/// each percentage as a per-slot ceiling.
fn validate_file_set(set: &FileSetConfig) -> Result<()> {
    if set.folders.is_empty() {
        anyhow::bail!("file-set provider '{}' has no folders", set.name);
    }

    let mut total: u32 = 0;
    for (index, folder) in set.folders.iter().enumerate() {
        if folder.percentage > HUNDRED_PERCENT {
            anyhow::bail!(
                "file-set provider '{}' folder {} ({}) has percentage {} > 100",
                set.name,
                index,
                folder.path.display(),
                folder.percentage
            );
        }
        total += u32::from(folder.percentage);

        let pattern = FilePattern::parse(&folder.pattern).with_context(|| {
            format!(
                "file-set provider '{}' folder {} ({})",
                set.name,
                index,
                folder.path.display()
            )
        })?;

        if pattern.has_placeholders() && pattern.placeholders().iter().any(|p| *p == set.name) {
            anyhow::bail!(
                "file-set provider '{}' folder {} pattern references its own parameter",
                set.name,
                index
            );
        }
    }

    if total != u32::from(HUNDRED_PERCENT) {
        warn!(
            parameter = %set.name,
            total,
            "folder percentages do not sum to 100; dispersion will approximate the declared shares"
        );
    }

    Ok(())
}

fn validate_username(username: &UsernameConfig) -> Result<()> {
    match (&username.values, username.start) {
        (Some(values), _) => {
            if values.is_empty() {
                anyhow::bail!("username provider has an empty list of values");
            }
        }
        (None, Some(start)) => {
            validate_range(USERNAME_PARAMETER, start, username.end.unwrap_or(DEFAULT_RANGE_END))?;
        }
        (None, None) => {
            anyhow::bail!("username provider needs either `values` or a `start` for its range");
        }
    }
    Ok(())
}

fn validate_custom(custom: &CustomConfig) -> Result<()> {
    if custom.provider.trim().is_empty() {
        anyhow::bail!("custom provider '{}' does not name a registered provider", custom.name);
    }
    Ok(())
}

/// Check that a username provider can give every caller a distinct name
pub fn validate_usernames_for_callers(username: &UsernameConfig, callers: u64) -> Result<()> {
    let available = username.available();
    if available < callers {
        anyhow::bail!(
            "username provider offers only {} distinct user names while {} callers are configured",
            available,
            callers
        );
    }
    Ok(())
}
