use serde::{Deserialize, Serialize};

use crate::leads::PriorityTier;

pub const DEFAULT_TEMPLATE: &str = "Hola {name}, vimos que su {business_type} en {location} \
podría atraer más clientes con una presencia digital más fuerte. \
¿Le interesa una asesoría gratuita de 15 minutos?";

/// Outreach configuration.
///
/// Example YAML:
/// ```yaml
/// outreach:
///   template: "Hola {name}, ..."
///   min_tier: HIGH
///   phone: { country_code: "52", national_digits: 10 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutreachConfig {
    /// Message template; see `template::render` for placeholders
    pub template: String,

    /// Leads below this tier are not contacted
    pub min_tier: PriorityTier,

    pub phone: PhoneConfig,

    /// Rendered for `{business_type}` when the lead has none
    pub fallback_business_type: String,
}

impl Default for OutreachConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            min_tier: PriorityTier::Medium,
            phone: PhoneConfig::default(),
            fallback_business_type: "negocio".to_string(),
        }
    }
}

/// Phone normalization rules for the target country.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PhoneConfig {
    /// Country calling code without `+`
    pub country_code: String,

    /// Digits in a national number
    pub national_digits: usize,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            country_code: "52".to_string(),
            national_digits: 10,
        }
    }
}
