//! Candidate projection for duplicate scoring.
//!
//! Each kind's records are projected down to an id, a display name, and a
//! precomputed comparison string before pair-finding runs. Event comparison
//! strings pull in the referenced venue and promoter names.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::domains::events::models::Event;
use crate::domains::promoters::models::Promoter;
use crate::domains::vendors::models::Vendor;
use crate::domains::venues::models::Venue;

use super::comparison::{
    event_comparison_string, promoter_comparison_string, vendor_comparison_string,
    venue_comparison_string,
};

/// A record reduced to what pair-finding and the operator UI need.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCandidate {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub comparison_string: String,
}

pub fn venue_candidates(venues: &[Venue]) -> Vec<DuplicateCandidate> {
    venues
        .iter()
        .map(|venue| DuplicateCandidate {
            id: venue.id.into_uuid(),
            name: venue.name.clone(),
            comparison_string: venue_comparison_string(venue),
        })
        .collect()
}

pub fn event_candidates(
    events: &[Event],
    venues: &[Venue],
    promoters: &[Promoter],
) -> Vec<DuplicateCandidate> {
    let venue_names: HashMap<_, _> = venues.iter().map(|v| (v.id, v.name.as_str())).collect();
    let promoter_names: HashMap<_, _> = promoters
        .iter()
        .map(|p| (p.id, p.company_name.as_str()))
        .collect();

    events
        .iter()
        .map(|event| DuplicateCandidate {
            id: event.id.into_uuid(),
            name: event.name.clone(),
            comparison_string: event_comparison_string(
                event,
                venue_names.get(&event.venue_id).copied(),
                promoter_names.get(&event.promoter_id).copied(),
            ),
        })
        .collect()
}

pub fn vendor_candidates(vendors: &[Vendor]) -> Vec<DuplicateCandidate> {
    vendors
        .iter()
        .map(|vendor| DuplicateCandidate {
            id: vendor.id.into_uuid(),
            name: vendor.business_name.clone(),
            comparison_string: vendor_comparison_string(vendor),
        })
        .collect()
}

pub fn promoter_candidates(promoters: &[Promoter]) -> Vec<DuplicateCandidate> {
    promoters
        .iter()
        .map(|promoter| DuplicateCandidate {
            id: promoter.id.into_uuid(),
            name: promoter.company_name.clone(),
            comparison_string: promoter_comparison_string(promoter),
        })
        .collect()
}
