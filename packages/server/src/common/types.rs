//! Shared value types for the directory.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of mergeable (and favoritable) entity kinds.
///
/// Appears in three places with two spellings:
/// - API `type` parameter: plural route keys (`venues`, `events`, ...)
/// - `favorites.favoritable_kind` column and log fields: singular tags
///   (`venue`, `event`, ...)
///
/// The favorite association is polymorphic (kind tag + id, no foreign key),
/// so the tag must stay a real discriminant rather than loose strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Venue,
    Event,
    Vendor,
    Promoter,
}

impl EntityKind {
    /// All kinds, in a stable order.
    pub const ALL: [EntityKind; 4] = [Self::Venue, Self::Event, Self::Vendor, Self::Promoter];

    /// Singular tag used as the favoritable-kind discriminant in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Event => "event",
            Self::Vendor => "vendor",
            Self::Promoter => "promoter",
        }
    }

    /// Plural key used in the API `type` parameter.
    pub fn route_key(&self) -> &'static str {
        match self {
            Self::Venue => "venues",
            Self::Event => "events",
            Self::Vendor => "vendors",
            Self::Promoter => "promoters",
        }
    }

    /// Parse the API `type` parameter. Only the four plural route keys are
    /// accepted; anything else is a caller error.
    pub fn parse_route_key(s: &str) -> Option<Self> {
        match s {
            "venues" => Some(Self::Venue),
            "events" => Some(Self::Event),
            "vendors" => Some(Self::Vendor),
            "promoters" => Some(Self::Promoter),
            _ => None,
        }
    }

    /// Parse the singular database tag.
    pub fn parse_tag(s: &str) -> Option<Self> {
        match s {
            "venue" => Some(Self::Venue),
            "event" => Some(Self::Event),
            "vendor" => Some(Self::Vendor),
            "promoter" => Some(Self::Promoter),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// sqlx support - stored as TEXT, decoded back into the tagged union
// ============================================================================

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef, Postgres};
use sqlx::{Decode, Encode, Type};

impl Type<Postgres> for EntityKind {
    fn type_info() -> PgTypeInfo {
        <&str as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <&str as Type<Postgres>>::compatible(ty)
    }
}

impl Encode<'_, Postgres> for EntityKind {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl Decode<'_, Postgres> for EntityKind {
    fn decode(value: PgValueRef<'_>) -> Result<Self, BoxDynError> {
        let tag = <&str as Decode<Postgres>>::decode(value)?;
        Self::parse_tag(tag).ok_or_else(|| format!("unknown entity kind tag: {tag}").into())
    }
}
