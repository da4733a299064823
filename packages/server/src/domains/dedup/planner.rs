//! Merge planning.
//!
//! One generic algorithm covers all four kinds, parameterized by a small
//! per-kind descriptor instead of four hand-duplicated routines. The
//! planner is pure: given both records and their loaded dependents it
//! produces the ordered write list, the transfer counts, and the advisory
//! warnings. The preview and the executor both run this exact code, so the
//! preview can never drift from what the merge would actually do.

use std::collections::HashSet;

use uuid::Uuid;

use crate::common::{EntityKind, EventVendorId, FavoriteId};
use crate::domains::events::models::{Event, EventVendor};
use crate::domains::favorites::models::Favorite;

use super::entity::CatalogEntity;
use super::plan::{MergePlan, MergeWrite, TransferCounts};

/// Which side of the event/vendor join table a merge repoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinSide {
    Vendor,
    Event,
}

impl JoinSide {
    /// The counterpart entity named in overlap warnings.
    fn counterpart_noun(&self) -> &'static str {
        match self {
            Self::Vendor => "event",
            Self::Event => "vendor",
        }
    }
}

/// Per-kind merge shape: which dependents exist and how they move.
#[derive(Debug, Clone, Copy)]
struct MergeDescriptor {
    /// Venue/Promoter merges repoint the events they own.
    repoints_owned_events: bool,
    /// Vendor/Event merges reconcile the participation join table.
    join_side: Option<JoinSide>,
    /// Event merges add the duplicate's view counter onto the primary.
    adds_view_counter: bool,
}

impl MergeDescriptor {
    fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Venue | EntityKind::Promoter => Self {
                repoints_owned_events: true,
                join_side: None,
                adds_view_counter: false,
            },
            EntityKind::Vendor => Self {
                repoints_owned_events: false,
                join_side: Some(JoinSide::Vendor),
                adds_view_counter: false,
            },
            EntityKind::Event => Self {
                repoints_owned_events: false,
                join_side: Some(JoinSide::Event),
                adds_view_counter: true,
            },
        }
    }
}

/// Everything the planner needs, loaded up front by the service.
#[derive(Debug, Clone)]
pub struct MergeInputs {
    pub primary: CatalogEntity,
    pub duplicate: CatalogEntity,
    /// Events owned by the duplicate (venue/promoter merges; empty otherwise).
    pub duplicate_owned_events: Vec<Event>,
    /// Participation rows on each side (vendor/event merges; empty otherwise).
    pub primary_participations: Vec<EventVendor>,
    pub duplicate_participations: Vec<EventVendor>,
    /// Favorites pointing at each record.
    pub primary_favorites: Vec<Favorite>,
    pub duplicate_favorites: Vec<Favorite>,
}

/// A planned merge: the unit of work plus everything the preview reports.
#[derive(Debug, Clone)]
pub struct PlannedMerge {
    pub plan: MergePlan,
    pub transfer: TransferCounts,
    /// Overlap conflicts: participation rows linked to both records. These
    /// are resolved by discarding the duplicate's copy; they never block.
    pub conflicts: i64,
    pub warnings: Vec<String>,
}

/// Plan the merge of `duplicate` into `primary`. Both must be of `kind`.
pub fn plan_merge(kind: EntityKind, inputs: &MergeInputs) -> PlannedMerge {
    debug_assert_eq!(inputs.primary.kind(), kind);
    debug_assert_eq!(inputs.duplicate.kind(), kind);

    let descriptor = MergeDescriptor::for_kind(kind);
    let primary_id = inputs.primary.id();
    let duplicate_id = inputs.duplicate.id();

    let mut writes = Vec::new();
    let mut warnings = Vec::new();
    let mut transfer = TransferCounts::default();
    let mut conflicts = 0i64;

    // Owned events: plain foreign-key repoint, no uniqueness concerns.
    if descriptor.repoints_owned_events {
        transfer.events = Some(inputs.duplicate_owned_events.len() as i64);
        writes.push(match kind {
            EntityKind::Venue => MergeWrite::RepointEventVenues {
                from: typed(duplicate_id),
                to: typed(primary_id),
            },
            EntityKind::Promoter => MergeWrite::RepointEventPromoters {
                from: typed(duplicate_id),
                to: typed(primary_id),
            },
            _ => unreachable!("only venue/promoter merges repoint owned events"),
        });
    }

    // Participation rows: a counterpart linked to both records would break
    // the (event, vendor) uniqueness on repoint, so the duplicate's copy is
    // discarded first and only the remainder moves.
    if let Some(side) = descriptor.join_side {
        let primary_counterparts: HashSet<Uuid> = inputs
            .primary_participations
            .iter()
            .map(|row| counterpart_id(row, side))
            .collect();

        let (colliding, transferable): (Vec<&EventVendor>, Vec<&EventVendor>) = inputs
            .duplicate_participations
            .iter()
            .partition(|row| primary_counterparts.contains(&counterpart_id(row, side)));

        conflicts = colliding.len() as i64;
        transfer.event_vendors = Some(transferable.len() as i64);

        if !colliding.is_empty() {
            let ids: Vec<EventVendorId> = colliding.iter().map(|row| row.id).collect();
            writes.push(MergeWrite::DeleteEventVendors { ids });
            warnings.push(format!(
                "{} {}(s) are linked to both records; the duplicate's participation row(s) will be discarded",
                conflicts,
                side.counterpart_noun(),
            ));
        }

        writes.push(match side {
            JoinSide::Vendor => MergeWrite::RepointEventVendorsByVendor {
                from: typed(duplicate_id),
                to: typed(primary_id),
            },
            JoinSide::Event => MergeWrite::RepointEventVendorsByEvent {
                from: typed(duplicate_id),
                to: typed(primary_id),
            },
        });
    }

    // View counters are additive measures of independent observation; the
    // merged record has been seen as many times as both were.
    if descriptor.adds_view_counter {
        if let (Some(primary), Some(duplicate)) =
            (inputs.primary.as_event(), inputs.duplicate.as_event())
        {
            writes.push(MergeWrite::AddEventViews {
                event: primary.id,
                views: duplicate.view_count,
            });
        }
    }

    // Favorites: a user already favoriting the primary keeps exactly one
    // favorite; the duplicate's row is dropped, never duplicated.
    let primary_fans: HashSet<_> = inputs
        .primary_favorites
        .iter()
        .map(|f| f.user_id)
        .collect();

    let (dropped, transferable): (Vec<&Favorite>, Vec<&Favorite>) = inputs
        .duplicate_favorites
        .iter()
        .partition(|f| primary_fans.contains(&f.user_id));

    transfer.favorites = transferable.len() as i64;

    if !dropped.is_empty() {
        let ids: Vec<FavoriteId> = dropped.iter().map(|f| f.id).collect();
        writes.push(MergeWrite::DeleteFavorites { ids });
    }
    writes.push(MergeWrite::RepointFavorites {
        kind,
        from: duplicate_id,
        to: primary_id,
    });

    push_advisory_warnings(kind, inputs, &mut warnings);

    // The duplicate goes last, after every dependent has been reconciled.
    writes.push(MergeWrite::DeleteEntity {
        kind,
        id: duplicate_id,
    });

    PlannedMerge {
        plan: MergePlan {
            kind,
            primary_id,
            duplicate_id,
            writes,
        },
        transfer,
        conflicts,
        warnings,
    }
}

fn counterpart_id(row: &EventVendor, side: JoinSide) -> Uuid {
    match side {
        JoinSide::Vendor => row.event_id.into_uuid(),
        JoinSide::Event => row.vendor_id.into_uuid(),
    }
}

/// Non-blocking warnings about discarded associations.
fn push_advisory_warnings(kind: EntityKind, inputs: &MergeInputs, warnings: &mut Vec<String>) {
    match kind {
        EntityKind::Vendor | EntityKind::Promoter => {
            // Catalog data merges; user-account identity never does.
            if let (Some(primary_user), Some(duplicate_user)) =
                (inputs.primary.user_id(), inputs.duplicate.user_id())
            {
                if primary_user != duplicate_user {
                    warnings.push(
                        "records are linked to different user accounts; only catalog data is merged"
                            .to_string(),
                    );
                }
            }
        }
        EntityKind::Event => {
            if let (Some(primary), Some(duplicate)) =
                (inputs.primary.as_event(), inputs.duplicate.as_event())
            {
                if primary.venue_id != duplicate.venue_id {
                    warnings.push(
                        "records name different venues; the duplicate's venue association will be discarded"
                            .to_string(),
                    );
                }
                if primary.promoter_id != duplicate.promoter_id {
                    warnings.push(
                        "records name different promoters; the duplicate's promoter association will be discarded"
                            .to_string(),
                    );
                }
            }
        }
        EntityKind::Venue => {}
    }
}

fn typed<T>(id: Uuid) -> crate::common::Id<T> {
    crate::common::Id::from_uuid(id)
}
