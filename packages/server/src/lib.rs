// Fairgrounds Directory - API Core
//
// Backend for the event/venue/vendor/promoter directory. The interesting
// subsystem is duplicate detection and entity merging (domains/dedup);
// ordinary CRUD and page rendering live elsewhere.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
