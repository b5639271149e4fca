use super::config::QualifierConfig;
use super::matching::fold;

/// Validate qualifier configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_qualifier(config: &QualifierConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.top_n == 0 {
        errors.push("qualifier.top_n: must be at least 1".to_string());
    }

    if config.thresholds.high < config.thresholds.medium {
        errors.push(format!(
            "qualifier.thresholds: high ({}) must not be below medium ({})",
            config.thresholds.high, config.thresholds.medium
        ));
    }

    if max_points(config).is_none() {
        errors.push("qualifier.weights: sum of weights exceeds the maximum score".to_string());
    }

    let keyword_lists = [
        ("high_priority_keywords", &config.high_priority_keywords),
        ("medium_priority_keywords", &config.medium_priority_keywords),
        ("preferred_location_keywords", &config.preferred_location_keywords),
        ("home_market", &config.home_market),
    ];
    for (field, keywords) in keyword_lists {
        for (i, keyword) in keywords.iter().enumerate() {
            if fold(keyword.trim()).is_empty() {
                errors.push(format!("qualifier.{}[{}]: keyword is empty", field, i));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Highest score any lead can reach; `None` when it does not fit in a `u32`.
/// Only one business-type rule and one website rule can fire per lead.
fn max_points(config: &QualifierConfig) -> Option<u32> {
    let w = &config.weights;
    let business = w.high_priority.max(w.medium_priority);
    let website = w.no_website.max(w.basic_website).max(w.has_website);
    [w.preferred_location, website, w.has_phone, w.has_email, w.local_market]
        .into_iter()
        .try_fold(business, |total, points| total.checked_add(points))
}
