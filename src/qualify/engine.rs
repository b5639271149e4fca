use super::config::{QualifierConfig, RuleWeights, TierThresholds};
use super::matching::{fold, KeywordSet};
use crate::leads::types::{LeadRecord, PriorityTier, QualifiedLead};

pub const REASON_HIGH_PRIORITY: &str = "High priority business type";
pub const REASON_MEDIUM_PRIORITY: &str = "Medium priority business type";
pub const REASON_PREFERRED_LOCATION: &str = "Preferred location";
pub const REASON_NO_WEBSITE: &str = "No website - high need";
pub const REASON_BASIC_WEBSITE: &str = "Basic website - improvement needed";
pub const REASON_HAS_WEBSITE: &str = "Has website - may need optimization";
pub const REASON_HAS_PHONE: &str = "Has phone number";
pub const REASON_HAS_EMAIL: &str = "Has email";
pub const REASON_LOCAL_MARKET: &str = "Local business in target market";

// Website shorter than this (in chars) counts as missing
const MIN_WEBSITE_LEN: usize = 5;
// Website shorter than this counts as a bare placeholder site
const BASIC_WEBSITE_LEN: usize = 20;
const MIN_PHONE_LEN: usize = 5;

/// Points and justification for one record, reasons in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub points: u32,
    pub reasons: Vec<String>,
}

impl Score {
    fn add(&mut self, points: u32, reason: &str) {
        self.points = self.points.saturating_add(points);
        self.reasons.push(reason.to_string());
    }
}

/// Rule-based lead scorer and ranker.
///
/// Keyword sets are folded once at construction. Scoring is pure: no I/O and
/// no shared state, so one qualifier can be used from several threads.
#[derive(Debug, Clone)]
pub struct LeadQualifier {
    high: KeywordSet,
    medium: KeywordSet,
    locations: KeywordSet,
    home_market: KeywordSet,
    weights: RuleWeights,
    thresholds: TierThresholds,
    top_n: usize,
}

impl Default for LeadQualifier {
    fn default() -> Self {
        Self::new(&QualifierConfig::default())
    }
}

impl LeadQualifier {
    pub fn new(config: &QualifierConfig) -> Self {
        Self {
            high: KeywordSet::new(&config.high_priority_keywords),
            medium: KeywordSet::new(&config.medium_priority_keywords),
            locations: KeywordSet::new(&config.preferred_location_keywords),
            home_market: KeywordSet::new(&config.home_market),
            weights: config.weights,
            thresholds: config.thresholds,
            top_n: config.top_n,
        }
    }

    /// Replace the number of leads kept by `rank`
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn score(&self, record: &LeadRecord) -> Score {
        let w = &self.weights;
        let mut score = Score {
            points: 0,
            reasons: Vec::new(),
        };

        let name = fold(&record.business_name);
        let kind = fold(&record.business_type);

        // Business type: high and medium are mutually exclusive, high wins
        if self.high.matches_any(&[&kind, &name]) {
            score.add(w.high_priority, REASON_HIGH_PRIORITY);
        } else if self.medium.matches_any(&[&kind, &name]) {
            score.add(w.medium_priority, REASON_MEDIUM_PRIORITY);
        }

        if self.locations.matches_any(&[&fold(&record.location)]) {
            score.add(w.preferred_location, REASON_PREFERRED_LOCATION);
        }

        let website_len = record.website.trim().chars().count();
        if website_len < MIN_WEBSITE_LEN {
            score.add(w.no_website, REASON_NO_WEBSITE);
        } else if website_len < BASIC_WEBSITE_LEN {
            score.add(w.basic_website, REASON_BASIC_WEBSITE);
        } else {
            score.add(w.has_website, REASON_HAS_WEBSITE);
        }

        if record.phone.trim().chars().count() > MIN_PHONE_LEN {
            score.add(w.has_phone, REASON_HAS_PHONE);
        }
        if record.email.contains('@') {
            score.add(w.has_email, REASON_HAS_EMAIL);
        }

        if self.home_market.matches_any(&[&name]) {
            score.add(w.local_market, REASON_LOCAL_MARKET);
        }

        score
    }

    pub fn tier_for(&self, points: u32) -> PriorityTier {
        if points >= self.thresholds.high {
            PriorityTier::High
        } else if points >= self.thresholds.medium {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    /// Score and tier a single record without ranking it
    pub fn qualify(&self, record: &LeadRecord) -> QualifiedLead {
        let score = self.score(record);
        let tier = self.tier_for(score.points);
        QualifiedLead::new(record.clone(), score.points, score.reasons, tier)
    }

    /// Score every record, sort by score descending, keep the first `top_n`
    /// and attach a tier. Equal scores keep their input order.
    pub fn rank(&self, records: &[LeadRecord]) -> Vec<QualifiedLead> {
        let mut scored: Vec<(&LeadRecord, Score)> = records
            .iter()
            .map(|record| {
                let score = self.score(record);
                tracing::debug!(
                    lead = record.display_name(),
                    score = score.points,
                    "scored lead"
                );
                (record, score)
            })
            .collect();

        // sort_by is stable, which preserves input order among ties
        scored.sort_by(|a, b| b.1.points.cmp(&a.1.points));
        scored.truncate(self.top_n);

        let ranked: Vec<QualifiedLead> = scored
            .into_iter()
            .map(|(record, score)| {
                let tier = self.tier_for(score.points);
                QualifiedLead::new(record.clone(), score.points, score.reasons, tier)
            })
            .collect();

        tracing::info!(
            input = records.len(),
            kept = ranked.len(),
            top_n = self.top_n,
            "ranked leads"
        );
        ranked
    }
}
