//! Tagged union over the four mergeable record types.

use serde::Serialize;
use uuid::Uuid;

use crate::common::{EntityKind, UserId};
use crate::domains::events::models::Event;
use crate::domains::promoters::models::Promoter;
use crate::domains::vendors::models::Vendor;
use crate::domains::venues::models::Venue;

/// One directory record of any mergeable kind, with an explicit kind tag in
/// its serialized form.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CatalogEntity {
    Venue(Venue),
    Event(Event),
    Vendor(Vendor),
    Promoter(Promoter),
}

impl CatalogEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Venue(_) => EntityKind::Venue,
            Self::Event(_) => EntityKind::Event,
            Self::Vendor(_) => EntityKind::Vendor,
            Self::Promoter(_) => EntityKind::Promoter,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Venue(v) => v.id.into_uuid(),
            Self::Event(e) => e.id.into_uuid(),
            Self::Vendor(v) => v.id.into_uuid(),
            Self::Promoter(p) => p.id.into_uuid(),
        }
    }

    /// Human-facing name field for this kind.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Venue(v) => &v.name,
            Self::Event(e) => &e.name,
            Self::Vendor(v) => &v.business_name,
            Self::Promoter(p) => &p.company_name,
        }
    }

    /// Linked user account, for the kinds that have one.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Vendor(v) => v.user_id,
            Self::Promoter(p) => p.user_id,
            Self::Venue(_) | Self::Event(_) => None,
        }
    }

    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Self::Event(e) => Some(e),
            _ => None,
        }
    }
}
