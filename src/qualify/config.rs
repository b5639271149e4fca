use serde::{Deserialize, Serialize};

/// Lead qualification configuration.
///
/// Every field is optional in YAML; omitted fields take the defaults below,
/// which reproduce the agency's original keyword lists and weights.
///
/// Example YAML:
/// ```yaml
/// qualifier:
///   high_priority_keywords: ["hotel", "clinica", "abogado"]
///   preferred_location_keywords: ["cancun", "tulum"]
///   home_market: ["cancun"]
///   top_n: 25
///   thresholds: { high: 90, medium: 60 }
///   weights:
///     no_website: 40
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct QualifierConfig {
    /// Hospitality, health, legal and real-estate terms
    pub high_priority_keywords: Vec<String>,

    /// Retail and automotive terms, only checked when no high-priority term matched
    pub medium_priority_keywords: Vec<String>,

    /// Locations the agency prefers to work in
    pub preferred_location_keywords: Vec<String>,

    /// Names of the home market, matched against the business name
    pub home_market: Vec<String>,

    /// Number of leads kept after ranking
    pub top_n: usize,

    pub thresholds: TierThresholds,

    pub weights: RuleWeights,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for QualifierConfig {
    fn default() -> Self {
        Self {
            high_priority_keywords: strings(&[
                "hotel",
                "hostal",
                "restaurante",
                "restaurant",
                "clinica",
                "clinic",
                "dental",
                "dentista",
                "medico",
                "doctor",
                "hospital",
                "spa",
                "abogado",
                "lawyer",
                "notaria",
                "inmobiliaria",
                "real estate",
                "bienes raices",
            ]),
            medium_priority_keywords: strings(&[
                "tienda",
                "store",
                "retail",
                "boutique",
                "automotriz",
                "autos",
                "taller",
                "refaccionaria",
                "gimnasio",
                "gym",
                "salon",
                "estetica",
            ]),
            preferred_location_keywords: strings(&[
                "cancun",
                "playa del carmen",
                "tulum",
                "puerto morelos",
                "cozumel",
                "merida",
            ]),
            home_market: strings(&["cancun"]),
            top_n: 50,
            thresholds: TierThresholds::default(),
            weights: RuleWeights::default(),
        }
    }
}

/// Score thresholds for the HIGH and MEDIUM tiers (inclusive).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TierThresholds {
    pub high: u32,
    pub medium: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high: 80,
            medium: 60,
        }
    }
}

/// Points added by each rule when it matches.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RuleWeights {
    pub high_priority: u32,
    pub medium_priority: u32,
    pub preferred_location: u32,
    pub no_website: u32,
    pub basic_website: u32,
    pub has_website: u32,
    pub has_phone: u32,
    pub has_email: u32,
    pub local_market: u32,
}

impl Default for RuleWeights {
    fn default() -> Self {
        Self {
            high_priority: 40,
            medium_priority: 25,
            preferred_location: 30,
            no_website: 35,
            basic_website: 25,
            has_website: 10,
            has_phone: 15,
            has_email: 15,
            local_market: 10,
        }
    }
}
