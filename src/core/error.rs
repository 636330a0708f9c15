//! Fehlertypen der Lane-Geometrie.
//!
//! Vorbedingungs-Verletzungen (falscher Lane-Index, unbekanntes Segment) werden
//! immer an den Aufrufer propagiert. Nur `MissingNode` gilt als transiente
//! Inkonsistenz der Topologie (z.B. Node mitten im Umbau).

use thiserror::Error;

use super::lane::SegmentId;

/// Fehler beim Zugriff auf die Lane-Geometrie.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LaneError {
    /// Segment existiert in der Topologie nicht
    #[error("Segment {0} existiert nicht")]
    UnknownSegment(SegmentId),

    /// Lane-Index liegt ausserhalb des Lane-Arrays des Segments
    #[error("Lane-Index {lane_index} ausserhalb des Bereichs (Segment {segment_id} hat {lane_count} Lanes)")]
    LaneIndexOutOfRange {
        /// Betroffenes Segment
        segment_id: SegmentId,
        /// Angefragter Index
        lane_index: usize,
        /// Anzahl der Lanes im Segment
        lane_count: usize,
    },

    /// Kontrollpunkt-Index ausserhalb 0..4
    #[error("Kontrollpunkt-Index {0} ausserhalb 0..4")]
    ControlPointOutOfRange(usize),

    /// End-Node eines Segments fehlt (Topologie wird gerade umgebaut)
    #[error("Node {node_id} von Segment {segment_id} fehlt")]
    MissingNode {
        /// Betroffenes Segment
        segment_id: SegmentId,
        /// Fehlender Node
        node_id: u32,
    },
}

impl LaneError {
    /// True fuer Fehler, die beim naechsten Recompute von selbst verschwinden.
    pub fn is_transient(&self) -> bool {
        matches!(self, LaneError::MissingNode { .. })
    }
}
