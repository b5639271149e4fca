use anyhow::Result;
use std::collections::HashSet;

use super::config::OutreachConfig;
use super::dispatch::{DeliveryResult, DeliveryStatus, Dispatcher};
use super::phone::normalize_phone;
use super::template::render;
use crate::leads::QualifiedLead;

/// A rendered message ready to dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct OutreachMessage<'a> {
    pub lead: &'a QualifiedLead,
    pub recipient: String,
    pub text: String,
}

/// Messages to send plus the leads left out and why
#[derive(Debug, Default)]
pub struct OutreachPlan<'a> {
    pub messages: Vec<OutreachMessage<'a>>,
    pub skipped: Vec<(&'a QualifiedLead, &'static str)>,
}

/// Build messages for ranked leads at or above `min_tier` with a usable phone.
/// Ranking order is kept and each normalized number is messaged at most once.
pub fn plan_outreach<'a>(
    leads: &'a [QualifiedLead],
    config: &OutreachConfig,
) -> OutreachPlan<'a> {
    let mut plan = OutreachPlan::default();
    let mut recipients = HashSet::new();

    for lead in leads {
        if lead.tier() < config.min_tier {
            plan.skipped.push((lead, "below minimum tier"));
            continue;
        }
        let Some(recipient) = normalize_phone(&lead.record().phone, &config.phone) else {
            tracing::warn!(
                lead = lead.record().display_name(),
                phone = %lead.record().phone,
                "no usable phone number"
            );
            plan.skipped.push((lead, "no usable phone number"));
            continue;
        };
        if !recipients.insert(recipient.clone()) {
            tracing::debug!(lead = lead.record().display_name(), %recipient, "duplicate recipient");
            plan.skipped.push((lead, "duplicate recipient"));
            continue;
        }
        let text = render(&config.template, lead, &config.fallback_business_type);
        plan.messages.push(OutreachMessage {
            lead,
            recipient,
            text,
        });
    }

    plan
}

/// Send every planned message. A failing send is reported as `Failed` and
/// the rest of the plan still goes out.
pub fn dispatch_all(
    messages: &[OutreachMessage<'_>],
    dispatcher: &mut dyn Dispatcher,
) -> Vec<DeliveryResult> {
    messages
        .iter()
        .map(|message| {
            let result: Result<DeliveryResult> =
                dispatcher.send(&message.recipient, &message.text);
            match result {
                Ok(delivery) => {
                    tracing::debug!(
                        backend = dispatcher.backend(),
                        recipient = %delivery.recipient,
                        status = ?delivery.status,
                        "dispatched"
                    );
                    delivery
                }
                Err(e) => {
                    tracing::warn!(recipient = %message.recipient, error = %e, "dispatch failed");
                    DeliveryResult {
                        recipient: message.recipient.clone(),
                        status: DeliveryStatus::Failed,
                        detail: Some(e.to_string()),
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leads::{LeadRecord, PriorityTier};
    use crate::outreach::dispatch::DryRunDispatcher;
    use crate::qualify::LeadQualifier;

    fn ranked() -> Vec<QualifiedLead> {
        let records = vec![
            // 135, HIGH
            LeadRecord {
                business_name: "Hotel Caribe".to_string(),
                location: "Cancún".to_string(),
                phone: "998 123 4567".to_string(),
                email: "info@hotelcaribe.com".to_string(),
                ..Default::default()
            },
            // 40 + 35 + 15 = 90, HIGH, but the phone is unusable
            LeadRecord {
                business_name: "Spa Luna".to_string(),
                phone: "123-4567".to_string(),
                ..Default::default()
            },
            // 25 + 35 + 15 = 75, MEDIUM
            LeadRecord {
                business_name: "Taller Ruiz".to_string(),
                phone: "+52 999 555 0101".to_string(),
                ..Default::default()
            },
            // 35 + 15 = 50, LOW
            LeadRecord {
                business_name: "Abarrotes".to_string(),
                phone: "9841112222".to_string(),
                ..Default::default()
            },
        ];
        LeadQualifier::default().rank(&records)
    }

    #[test]
    fn test_plan_filters_by_tier_and_phone() {
        let leads = ranked();
        assert_eq!(leads[1].record().business_name, "Spa Luna");
        assert_eq!(leads[2].tier(), PriorityTier::Medium);

        let plan = plan_outreach(&leads, &OutreachConfig::default());
        let recipients: Vec<_> = plan.messages.iter().map(|m| m.recipient.as_str()).collect();
        assert_eq!(recipients, vec!["529981234567", "529995550101"]);
        assert_eq!(plan.skipped.len(), 2);
        assert_eq!(plan.skipped[0].1, "no usable phone number");
        assert_eq!(plan.skipped[1].1, "below minimum tier");
    }

    #[test]
    fn test_plan_skips_repeated_number_in_other_format() {
        let records = vec![
            LeadRecord {
                business_name: "Hotel Caribe".to_string(),
                phone: "998 123 4567".to_string(),
                ..Default::default()
            },
            LeadRecord {
                business_name: "Hotel Caribe Centro".to_string(),
                phone: "+52 998 123 4567".to_string(),
                ..Default::default()
            },
        ];
        let leads = LeadQualifier::default().rank(&records);
        let plan = plan_outreach(&leads, &OutreachConfig::default());

        let recipients: Vec<_> = plan.messages.iter().map(|m| m.recipient.as_str()).collect();
        assert_eq!(recipients, vec!["529981234567"]);
        assert_eq!(plan.messages[0].lead.record().business_name, "Hotel Caribe");
        assert_eq!(plan.skipped.len(), 1);
        assert_eq!(plan.skipped[0].0.record().business_name, "Hotel Caribe Centro");
        assert_eq!(plan.skipped[0].1, "duplicate recipient");
    }

    #[test]
    fn test_plan_min_tier_high() {
        let leads = ranked();
        let config = OutreachConfig {
            min_tier: PriorityTier::High,
            ..Default::default()
        };
        let plan = plan_outreach(&leads, &config);
        assert_eq!(plan.messages.len(), 1);
        assert_eq!(plan.messages[0].lead.record().business_name, "Hotel Caribe");
    }

    #[test]
    fn test_plan_renders_template() {
        let leads = ranked();
        let config = OutreachConfig {
            template: "Hola {name}".to_string(),
            ..Default::default()
        };
        let plan = plan_outreach(&leads, &config);
        assert_eq!(plan.messages[0].text, "Hola Hotel Caribe");
    }

    #[test]
    fn test_dispatch_all_with_dry_run() {
        let leads = ranked();
        let plan = plan_outreach(&leads, &OutreachConfig::default());
        let results = dispatch_all(&plan.messages, &mut DryRunDispatcher);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == DeliveryStatus::Sent));
        assert_eq!(results[1].recipient, "529995550101");
    }

    struct FailingDispatcher;

    impl Dispatcher for FailingDispatcher {
        fn backend(&self) -> &'static str {
            "failing"
        }

        fn send(&mut self, _recipient: &str, _text: &str) -> Result<DeliveryResult> {
            anyhow::bail!("channel unavailable")
        }
    }

    #[test]
    fn test_dispatch_all_reports_failures() {
        let leads = ranked();
        let plan = plan_outreach(&leads, &OutreachConfig::default());
        let results = dispatch_all(&plan.messages, &mut FailingDispatcher);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == DeliveryStatus::Failed));
        assert_eq!(results[0].detail.as_deref(), Some("channel unavailable"));
    }
}
