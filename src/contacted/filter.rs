use std::time::Duration;

use super::types::{lead_key, ContactedState};
use crate::leads::LeadRecord;
use crate::outreach::PhoneConfig;

/// Drop leads contacted within the cooldown, keeping input order
pub fn filter_uncontacted(
    records: Vec<LeadRecord>,
    state: &ContactedState,
    phone: &PhoneConfig,
    cooldown: Option<Duration>,
) -> Vec<LeadRecord> {
    records
        .into_iter()
        .filter(|record| match lead_key(record, phone) {
            Some(key) => !state.is_contacted(&key, cooldown),
            None => true,
        })
        .collect()
}
