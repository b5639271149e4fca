pub mod config;
pub mod engine;
pub mod matching;
pub mod validation;

pub use config::*;
pub use engine::{LeadQualifier, Score};
pub use matching::{fold, KeywordSet};
pub use validation::validate_qualifier;
