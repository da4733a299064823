pub mod entity_ids;
pub mod id;
pub mod types;

pub use entity_ids::*;
pub use types::EntityKind;
