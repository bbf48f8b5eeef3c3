//! Core types for the intersection simulation
//!
//! Identifiers are small `Copy` newtypes so they can be freely passed between
//! worker threads and used as sort keys.

use std::fmt;

/// A wrapper type for intersection IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntersectionId(pub usize);

/// A wrapper type for street indices within one intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreetId(pub usize);

/// Identity of one vehicle: the street it queued on and its position in the
/// initial fill of that queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId {
    pub street: StreetId,
    pub seq: usize,
}

impl VehicleId {
    pub fn new(street: StreetId, seq: usize) -> Self {
        Self { street, seq }
    }
}

impl fmt::Display for IntersectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for StreetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.street.0, self.seq)
    }
}

/// Compass names used when an intersection has exactly four approaches
pub const COMPASS_LABELS: [&str; 4] = ["North", "East", "South", "West"];

/// Human-readable name for a street
///
/// Four-street intersections use compass names; any other layout numbers its
/// streets from 1.
pub fn street_label(street: StreetId, street_count: usize) -> String {
    if street_count == COMPASS_LABELS.len() {
        COMPASS_LABELS[street.0].to_string()
    } else {
        format!("Street {}", street.0 + 1)
    }
}
