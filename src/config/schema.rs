use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::outreach::OutreachConfig;
use crate::qualify::{validate_qualifier, QualifierConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub qualifier: QualifierConfig,

    pub outreach: OutreachConfig,

    /// How long a contacted lead stays out of the ranking, e.g. "30d".
    /// Absent means forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_cooldown: Option<String>,

    /// Contacted ledger location (defaults to ~/.config/leadrank/contacted.json)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacted_file: Option<String>,
}

impl Config {
    /// Parsed `contact_cooldown`
    pub fn cooldown(&self) -> Result<Option<Duration>> {
        self.contact_cooldown
            .as_deref()
            .map(|s| {
                humantime::parse_duration(s.trim())
                    .with_context(|| format!("Invalid contact_cooldown '{}'", s))
            })
            .transpose()
    }
}

/// Validate the whole config at startup, collecting every error.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = validate_qualifier(&config.qualifier).err().unwrap_or_default();

    if let Some(ref cooldown) = config.contact_cooldown {
        if let Err(e) = humantime::parse_duration(cooldown.trim()) {
            errors.push(format!("contact_cooldown: invalid '{}' - {}", cooldown, e));
        }
    }

    if config.outreach.template.trim().is_empty() {
        errors.push("outreach.template: must not be empty".to_string());
    }

    let phone = &config.outreach.phone;
    if phone.country_code.is_empty() || !phone.country_code.chars().all(|c| c.is_ascii_digit()) {
        errors.push(format!(
            "outreach.phone.country_code: '{}' must be digits only",
            phone.country_code
        ));
    }
    if phone.national_digits == 0 {
        errors.push("outreach.phone.national_digits: must be at least 1".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
