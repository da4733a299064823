//! Duplicate detection and entity merging.
//!
//! Pipeline: candidate projection -> comparison strings -> token-set
//! similarity -> pair finding, then merge preview/execution over an
//! explicitly planned, atomically applied unit of work.

pub mod candidates;
pub mod comparison;
pub mod entity;
pub mod error;
pub mod finder;
pub mod plan;
pub mod planner;
pub mod preview;
pub mod service;
pub mod similarity;

pub use candidates::DuplicateCandidate;
pub use entity::CatalogEntity;
pub use error::DedupError;
pub use finder::DuplicatePair;
pub use plan::{MergePlan, MergeWrite, TransferCounts};
pub use preview::{MergePreview, MergeResult};
pub use service::{DedupService, DEFAULT_SIMILARITY_THRESHOLD};
