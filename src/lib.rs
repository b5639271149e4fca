pub mod config;
pub mod contacted;
pub mod leads;
pub mod logging;
pub mod output;
pub mod outreach;
pub mod qualify;

pub use leads::{LeadRecord, PriorityTier, QualifiedLead};
pub use qualify::{LeadQualifier, QualifierConfig};
