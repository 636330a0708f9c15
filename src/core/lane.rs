//! Referenz auf eine einzelne Lane eines Segments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// ID eines Segments im Straßennetz.
pub type SegmentId = u32;
/// Abgeleitete, stabile Lane-ID.
pub type LaneId = u64;

/// Identifiziert eine Lane über Segment-ID und Index im Lane-Array.
///
/// Zwei Referenzen sind gleich, wenn Segment und Index übereinstimmen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LaneRef {
    segment_id: SegmentId,
    lane_index: usize,
}

impl LaneRef {
    /// Erstellt eine neue Lane-Referenz.
    ///
    /// Der Index wird hier nicht gegen die Topologie geprüft; das übernimmt
    /// der `LaneGeometrySource` beim ersten Zugriff.
    pub fn new(segment_id: SegmentId, lane_index: usize) -> Self {
        Self {
            segment_id,
            lane_index,
        }
    }

    /// Segment, zu dem die Lane gehört.
    pub fn segment_id(&self) -> SegmentId {
        self.segment_id
    }

    /// Index im Lane-Array des Segments.
    pub fn lane_index(&self) -> usize {
        self.lane_index
    }

    /// Stabile Lane-ID: `(segment_id << 32) | lane_index`.
    pub fn lane_id(&self) -> LaneId {
        ((self.segment_id as u64) << 32) | (self.lane_index as u64 & 0xFFFF_FFFF)
    }
}

impl PartialEq for LaneRef {
    fn eq(&self, other: &Self) -> bool {
        self.segment_id == other.segment_id && self.lane_index == other.lane_index
    }
}

impl Eq for LaneRef {}

impl Hash for LaneRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.segment_id.hash(state);
        self.lane_index.hash(state);
    }
}

impl fmt::Display for LaneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lane {} (Segment {})", self.lane_index, self.segment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lane_ref_equality_by_segment_and_index() {
        assert_eq!(LaneRef::new(5, 0), LaneRef::new(5, 0));
        assert_ne!(LaneRef::new(5, 0), LaneRef::new(5, 1));
        assert_ne!(LaneRef::new(5, 0), LaneRef::new(6, 0));
    }

    #[test]
    fn test_lane_id_is_stable_and_unique() {
        let a = LaneRef::new(5, 2);
        let b = LaneRef::new(2, 5);
        assert_eq!(a.lane_id(), LaneRef::new(5, 2).lane_id());
        assert_ne!(a.lane_id(), b.lane_id());
        assert_eq!(a.lane_id(), (5u64 << 32) | 2);
    }

    #[test]
    fn test_lane_ref_hash_matches_equality() {
        let mut set = HashSet::new();
        set.insert(LaneRef::new(1, 0));
        set.insert(LaneRef::new(1, 0));
        set.insert(LaneRef::new(1, 1));
        assert_eq!(set.len(), 2);
    }
}
