pub mod admin;
pub mod health;

pub use admin::{execute_merge_handler, find_duplicates_handler, merge_preview_handler};
pub use health::health_handler;
