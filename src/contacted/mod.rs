pub mod filter;
pub mod storage;
pub mod types;

pub use filter::filter_uncontacted;
pub use storage::{get_contacted_path, load_contacted_state, save_contacted_state};
pub use types::{lead_key, ContactedEntry, ContactedState};
