//! Persistierbarer Datensatz einer angepassten Lane.

use super::curve::Curve;
use super::customization::LaneCustomization;
use super::lane::{LaneRef, SegmentId};
use serde::{Deserialize, Serialize};

/// Gespeicherte Werte einer Lane-Anpassung.
///
/// Die Basis-Kurve wird nie gespeichert; sie wird beim Laden immer aus der
/// Topologie neu berechnet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneRecord {
    pub segment_id: SegmentId,
    pub lane_index: usize,
    pub lateral_shift: f32,
    pub vertical_shift: f32,
    /// Offsets pro Kontrollpunkt
    pub delta_points: Curve,
}

impl LaneRecord {
    /// Erstellt den Datensatz aus einer Anpassung.
    pub fn from_customization(customization: &LaneCustomization) -> Self {
        let lane = customization.lane();
        Self {
            segment_id: lane.segment_id(),
            lane_index: lane.lane_index(),
            lateral_shift: customization.lateral_shift,
            vertical_shift: customization.vertical_shift,
            delta_points: *customization.delta_points(),
        }
    }

    pub fn lane(&self) -> LaneRef {
        LaneRef::new(self.segment_id, self.lane_index)
    }

    /// Überträgt die gespeicherten Werte auf eine Anpassung.
    pub fn apply_to(&self, customization: &mut LaneCustomization) {
        customization.lateral_shift = self.lateral_shift;
        customization.vertical_shift = self.vertical_shift;
        customization.set_delta_points(self.delta_points);
    }
}
