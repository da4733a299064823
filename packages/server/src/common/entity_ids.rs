//! Typed ID definitions for all directory entities.
//!
//! Type aliases over [`Id`] give compile-time safety for ID usage; the merge
//! planner in particular moves venue/event/vendor/promoter keys around and
//! must never confuse them.

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Venue entities.
pub struct Venue;

/// Marker type for Event entities.
pub struct Event;

/// Marker type for Vendor entities.
pub struct Vendor;

/// Marker type for Promoter entities.
pub struct Promoter;

/// Marker type for User accounts (referenced by favorites and profiles).
pub struct User;

/// Marker type for EventVendor rows (event participation join records).
pub struct EventVendor;

/// Marker type for Favorite rows.
pub struct Favorite;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Venue entities.
pub type VenueId = Id<Venue>;

/// Typed ID for Event entities.
pub type EventId = Id<Event>;

/// Typed ID for Vendor entities.
pub type VendorId = Id<Vendor>;

/// Typed ID for Promoter entities.
pub type PromoterId = Id<Promoter>;

/// Typed ID for User accounts.
pub type UserId = Id<User>;

/// Typed ID for EventVendor join rows.
pub type EventVendorId = Id<EventVendor>;

/// Typed ID for Favorite rows.
pub type FavoriteId = Id<Favorite>;
