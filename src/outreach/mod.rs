pub mod config;
pub mod dispatch;
pub mod phone;
pub mod plan;
pub mod template;

pub use config::{OutreachConfig, PhoneConfig};
pub use dispatch::{
    read_outbox, DeliveryResult, DeliveryStatus, Dispatcher, DryRunDispatcher, OutboxDispatcher,
    OutboxEntry,
};
pub use phone::normalize_phone;
pub use plan::{dispatch_all, plan_outreach, OutreachMessage, OutreachPlan};
pub use template::render;
