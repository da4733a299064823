pub mod dedup;
pub mod events;
pub mod favorites;
pub mod promoters;
pub mod vendors;
pub mod venues;
