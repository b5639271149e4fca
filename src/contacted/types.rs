use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::leads::LeadRecord;
use crate::outreach::{normalize_phone, PhoneConfig};
use crate::qualify::fold;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactedState {
    pub version: u32,
    #[serde(default)]
    pub contacted: HashMap<String, ContactedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactedEntry {
    pub contacted_at: DateTime<Utc>,
    /// Dispatcher backend that delivered the message
    pub channel: String,
    #[serde(default)]
    pub business_name: String,
}

impl ContactedEntry {
    /// Format how long ago the lead was contacted: "3d ago", "2w ago"
    pub fn format_age(&self) -> String {
        let age = Utc::now() - self.contacted_at;
        let days = age.num_days();
        let weeks = days / 7;

        if weeks >= 1 {
            format!("{}w ago", weeks)
        } else if days >= 1 {
            format!("{}d ago", days)
        } else if age.num_hours() >= 1 {
            format!("{}h ago", age.num_hours())
        } else {
            "just now".to_string()
        }
    }

    /// True while the entry is younger than `cooldown`; `None` never expires
    fn is_active(&self, cooldown: Option<Duration>, now: DateTime<Utc>) -> bool {
        match cooldown {
            None => true,
            Some(cooldown) => match chrono::Duration::from_std(cooldown) {
                Ok(cooldown) => self
                    .contacted_at
                    .checked_add_signed(cooldown)
                    .map_or(true, |until| now < until),
                // Cooldown too large to represent: treat as forever
                Err(_) => true,
            },
        }
    }
}

/// Ledger key for a lead: the normalized phone number when there is one,
/// otherwise the folded business name. Blank leads have no key.
pub fn lead_key(record: &LeadRecord, phone: &PhoneConfig) -> Option<String> {
    if let Some(number) = normalize_phone(&record.phone, phone) {
        return Some(number);
    }
    let name = fold(record.business_name.trim());
    if name.is_empty() {
        None
    } else {
        Some(format!("name:{}", name))
    }
}

impl Default for ContactedState {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactedState {
    /// Create a new empty ledger with version 1
    pub fn new() -> Self {
        Self {
            version: 1,
            contacted: HashMap::new(),
        }
    }

    /// Check if a key was contacted within the cooldown
    pub fn is_contacted(&self, key: &str, cooldown: Option<Duration>) -> bool {
        self.contacted
            .get(key)
            .map(|entry| entry.is_active(cooldown, Utc::now()))
            .unwrap_or(false)
    }

    /// Record a contact, replacing any earlier entry for the key
    pub fn mark(&mut self, key: String, channel: &str, business_name: &str) {
        let entry = ContactedEntry {
            contacted_at: Utc::now(),
            channel: channel.to_string(),
            business_name: business_name.to_string(),
        };
        self.contacted.insert(key, entry);
    }

    /// Remove a key from the ledger
    /// Returns true if the key was present
    pub fn forget(&mut self, key: &str) -> bool {
        self.contacted.remove(key).is_some()
    }

    /// Drop entries older than the cooldown. Returns how many were removed.
    pub fn prune(&mut self, cooldown: Option<Duration>) -> usize {
        let now = Utc::now();
        let before = self.contacted.len();
        self.contacted
            .retain(|_key, entry| entry.is_active(cooldown, now));
        before - self.contacted.len()
    }

    /// Entries sorted by most recent contact first
    pub fn entries(&self) -> Vec<(&String, &ContactedEntry)> {
        let mut entries: Vec<_> = self.contacted.iter().collect();
        entries.sort_by(|a, b| b.1.contacted_at.cmp(&a.1.contacted_at));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(n: u64) -> Duration {
        Duration::from_secs(n * 24 * 3600)
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = ContactedState::new();
        assert_eq!(state.version, 1);
        assert!(state.contacted.is_empty());
    }

    #[test]
    fn test_mark_and_is_contacted() {
        let mut state = ContactedState::new();
        state.mark("529981234567".to_string(), "outbox", "Hotel Caribe");
        assert!(state.is_contacted("529981234567", None));
        assert!(state.is_contacted("529981234567", Some(days(30))));
        assert!(!state.is_contacted("529990000000", None));
    }

    #[test]
    fn test_cooldown_expiry() {
        let mut state = ContactedState::new();
        state.contacted.insert(
            "old".to_string(),
            ContactedEntry {
                contacted_at: Utc::now() - chrono::Duration::days(45),
                channel: "outbox".to_string(),
                business_name: String::new(),
            },
        );
        assert!(!state.is_contacted("old", Some(days(30))));
        assert!(state.is_contacted("old", Some(days(60))));
        // No cooldown: contacted forever
        assert!(state.is_contacted("old", None));
    }

    #[test]
    fn test_cooldown_past_calendar_range_never_expires() {
        let cooldown = humantime::parse_duration("1000000years").unwrap();
        let mut state = ContactedState::new();
        state.mark("529981234567".to_string(), "outbox", "Hotel Caribe");
        assert!(state.is_contacted("529981234567", Some(cooldown)));
        assert_eq!(state.prune(Some(cooldown)), 0);
    }

    #[test]
    fn test_forget() {
        let mut state = ContactedState::new();
        state.mark("k".to_string(), "outbox", "");
        assert!(state.forget("k"));
        assert!(!state.forget("k"));
        assert!(!state.is_contacted("k", None));
    }

    #[test]
    fn test_prune_removes_expired_only() {
        let mut state = ContactedState::new();
        state.mark("fresh".to_string(), "outbox", "");
        state.contacted.insert(
            "stale".to_string(),
            ContactedEntry {
                contacted_at: Utc::now() - chrono::Duration::days(10),
                channel: "outbox".to_string(),
                business_name: String::new(),
            },
        );

        assert_eq!(state.prune(None), 0);
        assert_eq!(state.prune(Some(days(7))), 1);
        assert!(state.contacted.contains_key("fresh"));
        assert!(!state.contacted.contains_key("stale"));
    }

    #[test]
    fn test_entries_most_recent_first() {
        let mut state = ContactedState::new();
        state.contacted.insert(
            "older".to_string(),
            ContactedEntry {
                contacted_at: Utc::now() - chrono::Duration::days(3),
                channel: "outbox".to_string(),
                business_name: String::new(),
            },
        );
        state.mark("newer".to_string(), "outbox", "");
        let entries = state.entries();
        assert_eq!(entries[0].0, "newer");
        assert_eq!(entries[1].0, "older");
    }

    #[test]
    fn test_format_age() {
        let entry = ContactedEntry {
            contacted_at: Utc::now() - chrono::Duration::days(15),
            channel: "outbox".to_string(),
            business_name: String::new(),
        };
        assert_eq!(entry.format_age(), "2w ago");

        let entry = ContactedEntry {
            contacted_at: Utc::now() - chrono::Duration::minutes(5),
            ..entry
        };
        assert_eq!(entry.format_age(), "just now");
    }

    #[test]
    fn test_lead_key_prefers_phone() {
        let phone = PhoneConfig::default();
        let record = LeadRecord {
            business_name: "Hotel Caribe".to_string(),
            phone: "(998) 123 4567".to_string(),
            ..Default::default()
        };
        assert_eq!(lead_key(&record, &phone), Some("529981234567".to_string()));

        let record = LeadRecord {
            business_name: "Clínica  Sol".to_string(),
            phone: "n/a".to_string(),
            ..Default::default()
        };
        assert_eq!(lead_key(&record, &phone), Some("name:clinica  sol".to_string()));

        assert_eq!(lead_key(&LeadRecord::default(), &phone), None);
    }
}
