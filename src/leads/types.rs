use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw lead as it comes out of a spreadsheet row.
///
/// Every field is a plain string; absent values are the empty string, never
/// an `Option`, so rules can match without special cases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadRecord {
    pub business_name: String,
    pub business_type: String,
    pub location: String,
    pub website: String,
    pub phone: String,
    pub email: String,
}

impl LeadRecord {
    /// True when every field is blank
    pub fn is_blank(&self) -> bool {
        [
            &self.business_name,
            &self.business_type,
            &self.location,
            &self.website,
            &self.phone,
            &self.email,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }

    /// Name used when displaying the lead; falls back to the phone number
    pub fn display_name(&self) -> &str {
        if !self.business_name.trim().is_empty() {
            &self.business_name
        } else if !self.phone.trim().is_empty() {
            &self.phone
        } else {
            "(unnamed)"
        }
    }
}

/// Coarse triage bucket derived from the score thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityTier {
    Low,
    Medium,
    High,
}

impl PriorityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::High => "HIGH",
            PriorityTier::Medium => "MEDIUM",
            PriorityTier::Low => "LOW",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scored, tiered lead. Built once by the qualifier and never mutated;
/// re-scoring produces a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualifiedLead {
    record: LeadRecord,
    score: u32,
    reasons: Vec<String>,
    tier: PriorityTier,
}

impl QualifiedLead {
    pub(crate) fn new(
        record: LeadRecord,
        score: u32,
        reasons: Vec<String>,
        tier: PriorityTier,
    ) -> Self {
        Self {
            record,
            score,
            reasons,
            tier,
        }
    }

    pub fn record(&self) -> &LeadRecord {
        &self.record
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Reasons in rule-evaluation order
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn tier(&self) -> PriorityTier {
        self.tier
    }

    /// Reasons flattened for a single spreadsheet cell
    pub fn joined_reasons(&self) -> String {
        self.reasons.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_record_defaults_to_empty_strings() {
        let record: LeadRecord = serde_json::from_str(r#"{"business_name": "Spa Luna"}"#).unwrap();
        assert_eq!(record.business_name, "Spa Luna");
        assert_eq!(record.phone, "");
        assert_eq!(record.email, "");
    }

    #[test]
    fn test_is_blank() {
        assert!(LeadRecord::default().is_blank());
        let record = LeadRecord {
            location: "  ".to_string(),
            ..Default::default()
        };
        assert!(record.is_blank());
        let record = LeadRecord {
            email: "a@b.mx".to_string(),
            ..Default::default()
        };
        assert!(!record.is_blank());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut record = LeadRecord::default();
        assert_eq!(record.display_name(), "(unnamed)");
        record.phone = "998 123 4567".to_string();
        assert_eq!(record.display_name(), "998 123 4567");
        record.business_name = "Taller Norte".to_string();
        assert_eq!(record.display_name(), "Taller Norte");
    }

    #[test]
    fn test_tier_ordering_and_display() {
        assert!(PriorityTier::High > PriorityTier::Medium);
        assert!(PriorityTier::Medium > PriorityTier::Low);
        assert_eq!(PriorityTier::High.to_string(), "HIGH");
        assert_eq!(serde_json::to_string(&PriorityTier::Medium).unwrap(), "\"MEDIUM\"");
    }

    #[test]
    fn test_joined_reasons() {
        let lead = QualifiedLead::new(
            LeadRecord::default(),
            50,
            vec!["Has email".to_string(), "Has phone number".to_string()],
            PriorityTier::Low,
        );
        assert_eq!(lead.joined_reasons(), "Has email; Has phone number");
    }
}
