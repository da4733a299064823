//! Comparison-string construction for duplicate scoring.
//!
//! Each entity kind projects its salient fields into one normalized string.
//! The projection is pure and stable: the same record always yields the
//! same string, so callers may cache or re-run it freely.

use unicode_normalization::UnicodeNormalization;

use crate::domains::events::models::Event;
use crate::domains::promoters::models::Promoter;
use crate::domains::vendors::models::Vendor;
use crate::domains::venues::models::Venue;

/// How much of an event description participates in scoring. Descriptions
/// can be arbitrarily long; a bounded prefix keeps pairwise scoring cheap.
pub const DESCRIPTION_PREFIX_CHARS: usize = 200;

/// Normalize a field for comparison: lowercase, strip diacritics, drop
/// punctuation, collapse whitespace runs to single spaces, trim.
pub fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut space_pending = false;

    // NFD decomposition splits accented characters into base + combining
    // marks; dropping the marks strips the diacritics.
    for ch in input.nfd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            if space_pending && !out.is_empty() {
                out.push(' ');
            }
            space_pending = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            // Whitespace and punctuation both act as token separators
            space_pending = true;
        }
    }

    out
}

fn is_combining_mark(ch: char) -> bool {
    unicode_normalization::char::canonical_combining_class(ch) != 0
}

/// Join already-normalized parts, skipping blanks.
fn join_parts(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comparison string for a venue: name, address, city, state.
pub fn venue_comparison_string(venue: &Venue) -> String {
    join_parts(&[
        normalize(&venue.name),
        normalize(venue.address.as_deref().unwrap_or("")),
        normalize(venue.city.as_deref().unwrap_or("")),
        normalize(venue.state.as_deref().unwrap_or("")),
    ])
}

/// Comparison string for an event: name, bounded description prefix, venue
/// name, promoter company name. The venue/promoter names come from the
/// referenced records, so the caller passes them in.
pub fn event_comparison_string(
    event: &Event,
    venue_name: Option<&str>,
    promoter_name: Option<&str>,
) -> String {
    let description: String = event
        .description
        .as_deref()
        .unwrap_or("")
        .chars()
        .take(DESCRIPTION_PREFIX_CHARS)
        .collect();

    join_parts(&[
        normalize(&event.name),
        normalize(&description),
        normalize(venue_name.unwrap_or("")),
        normalize(promoter_name.unwrap_or("")),
    ])
}

/// Comparison string for a vendor: business name, vendor type.
pub fn vendor_comparison_string(vendor: &Vendor) -> String {
    join_parts(&[
        normalize(&vendor.business_name),
        normalize(vendor.vendor_type.as_deref().unwrap_or("")),
    ])
}

/// Comparison string for a promoter: company name.
pub fn promoter_comparison_string(promoter: &Promoter) -> String {
    normalize(&promoter.company_name)
}
