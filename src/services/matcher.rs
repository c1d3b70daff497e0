//! Approximate matching against the authorization list
//!
//! Plates are fixed-format and bounded, and the dominant real-world OCR
//! error is a single misread glyph, so matching uses Hamming distance
//! with a small tolerance rather than a fuzzy similarity ratio. Strings
//! of different length never match - the matcher does not align them.

use crate::domain::types::{CanonicalPlate, PlateRecord};
use tracing::debug;

/// A positive match outcome
#[derive(Debug, Clone, PartialEq)]
pub struct PlateMatch {
    pub record: PlateRecord,
    pub distance: u32,
}

/// Count of differing character positions between two equal-length
/// strings. Returns None when lengths differ (no match possible).
pub fn hamming_distance(a: &str, b: &str) -> Option<u32> {
    if a.chars().count() != b.chars().count() {
        return None;
    }
    Some(a.chars().zip(b.chars()).filter(|(x, y)| x != y).count() as u32)
}

/// Find the first active record within `tolerance` of the candidate.
///
/// First-found-wins in record iteration order: when two active records are
/// both within tolerance, the earlier one in storage order is selected,
/// even if a later one is strictly closer. This order dependence is
/// deliberate and must not be silently strengthened to closest-wins.
pub fn find_match(
    candidate: &CanonicalPlate,
    records: &[PlateRecord],
    tolerance: u32,
) -> Option<PlateMatch> {
    for record in records {
        if !record.active {
            continue;
        }
        let Some(distance) = hamming_distance(candidate.as_str(), &record.code) else {
            continue;
        };
        debug!(candidate = %candidate, code = %record.code, distance = %distance, "plate_checked");
        if distance <= tolerance {
            return Some(PlateMatch { record: record.clone(), distance });
        }
    }
    None
}
