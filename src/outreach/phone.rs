use super::config::PhoneConfig;

/// Normalize a free-text phone number to international digits without `+`.
///
/// Accepted shapes, with the default Mexican config (`52`, 10 digits):
/// - national: `998 123 4567` -> `529981234567`
/// - international: `+52 998 123 4567`, `0052...` -> `529981234567`
/// - legacy mobile prefix: `521 998 123 4567` -> `529981234567`
///
/// Returns `None` for anything else.
pub fn normalize_phone(raw: &str, config: &PhoneConfig) -> Option<String> {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if let Some(rest) = digits.strip_prefix("00") {
        digits = rest.to_string();
    }

    let cc = config.country_code.as_str();
    let national = config.national_digits;
    if cc.is_empty() || national == 0 {
        return None;
    }

    if digits.len() == national {
        return Some(format!("{}{}", cc, digits));
    }

    if let Some(rest) = digits.strip_prefix(cc) {
        if rest.len() == national {
            return Some(digits);
        }
        if let Some(mobile) = rest.strip_prefix('1') {
            if mobile.len() == national {
                return Some(format!("{}{}", cc, mobile));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mx() -> PhoneConfig {
        PhoneConfig::default()
    }

    #[test]
    fn test_national_number_gets_country_code() {
        assert_eq!(
            normalize_phone("998 123 4567", &mx()),
            Some("529981234567".to_string())
        );
        assert_eq!(
            normalize_phone("(998) 123-45-67", &mx()),
            Some("529981234567".to_string())
        );
    }

    #[test]
    fn test_international_forms() {
        assert_eq!(
            normalize_phone("+52 998 123 4567", &mx()),
            Some("529981234567".to_string())
        );
        assert_eq!(
            normalize_phone("0052 998 123 4567", &mx()),
            Some("529981234567".to_string())
        );
    }

    #[test]
    fn test_legacy_mobile_prefix_dropped() {
        assert_eq!(
            normalize_phone("+521 998 123 4567", &mx()),
            Some("529981234567".to_string())
        );
    }

    #[test]
    fn test_rejects_short_and_foreign_numbers() {
        assert_eq!(normalize_phone("", &mx()), None);
        assert_eq!(normalize_phone("123-456", &mx()), None);
        assert_eq!(normalize_phone("+44 20 7946 0958", &mx()), None);
    }

    #[test]
    fn test_other_country_config() {
        let us = PhoneConfig {
            country_code: "1".to_string(),
            national_digits: 10,
        };
        assert_eq!(
            normalize_phone("(305) 555-0100", &us),
            Some("13055550100".to_string())
        );
        assert_eq!(
            normalize_phone("+1 305 555 0100", &us),
            Some("13055550100".to_string())
        );
    }
}
