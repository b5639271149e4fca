use anyhow::{Context, Result};
use std::path::Path;

use super::Config;

const HEADER: &str = "\
# leadrank configuration
#
# qualifier: keyword lists, weights and tier thresholds used to score leads.
#   Keywords match as accent- and case-insensitive substrings.
# outreach: message template and phone rules for the `outreach` command.
#   Placeholders: {name} {business_type} {location} {score} {tier}
# contact_cooldown: how long a contacted lead stays out of rankings (e.g. 30d).
";

/// Write the built-in defaults to `path` so they can be edited.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    let config = Config {
        contact_cooldown: Some("30d".to_string()),
        ..Default::default()
    };
    let yaml = serde_saphyr::to_string(&config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    std::fs::write(path, format!("{}\n{}", HEADER, yaml))
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}
