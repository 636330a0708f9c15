//! Schnittstelle zur Netz-Topologie (Lieferant der Basis-Geometrie).
//!
//! Der Editor besitzt keine eigene Topologie. Alles, was er über Segmente,
//! Nodes und die lebenden Lane-Kurven wissen muss, kommt über
//! [`LaneGeometrySource`]. `core::network::LaneNetwork` ist die
//! In-Memory-Referenzimplementierung.

use super::curve::Curve;
use super::error::LaneError;
use super::lane::{LaneRef, SegmentId};
use crate::shared::curve_geometry::{calculate_middle_points, normalized_lane_position};
use glam::Vec3;

/// Eckpunkt einer Segment-Kante an einem Ende.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SegmentCorner {
    /// Weltposition der Ecke
    pub position: Vec3,
    /// Richtung vom Node in das Segment hinein
    pub direction: Vec3,
}

/// Aktuelle Eckgeometrie eines Segments.
///
/// Links/rechts ist jeweils aus Sicht des betreffenden End-Nodes in das
/// Segment hinein gemeint. Am Ende liegt die linke Ecke daher auf der rechten
/// Seite der Fahrtrichtung.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SegmentGeometry {
    pub start_left: SegmentCorner,
    pub start_right: SegmentCorner,
    pub end_left: SegmentCorner,
    pub end_right: SegmentCorner,
    /// Halbe Segmentbreite
    pub half_width: f32,
    /// Segment ist invertiert (Lane-Positionen gespiegelt)
    pub inverted: bool,
    /// Glättung am Start-Ende
    pub smooth_start: bool,
    /// Glättung am End-Ende
    pub smooth_end: bool,
}

impl SegmentGeometry {
    /// Prozedurale Basis-Kurve einer Lane mit lateraler Position und Höhe.
    ///
    /// Interpoliert Endpunkte und Tangenten zwischen linker und rechter Kante,
    /// hebt die Endpunkte um `height` an und leitet die inneren Punkte über
    /// die Mittelpunkt-Regel ab.
    pub fn lane_curve(&self, position: f32, height: f32) -> Curve {
        let t = normalized_lane_position(position, self.half_width, self.inverted);

        let mut a = self.start_left.position.lerp(self.start_right.position, t);
        let mut d = self.end_right.position.lerp(self.end_left.position, t);
        let dir_a = self
            .start_left
            .direction
            .lerp(self.start_right.direction, t)
            .normalize_or_zero();
        let dir_d = self
            .end_right
            .direction
            .lerp(self.end_left.direction, t)
            .normalize_or_zero();
        a.y += height;
        d.y += height;

        let (b, c) = calculate_middle_points(a, dir_a, d, dir_d, self.smooth_start, self.smooth_end);
        Curve::new(a, b, c, d)
    }
}

/// Standard-Offsets einer Lane aus dem Lane-Katalog.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LaneDefaults {
    /// Laterale Position relativ zur Segment-Mittellinie
    pub lateral: f32,
    /// Vertikaler Offset
    pub vertical: f32,
}

/// Lieferant der Netz-Topologie und Besitzer der lebenden Lane-Kurven.
///
/// Alle Lese-Methoden liefern `LaneError` bei Vorbedingungs-Verletzungen
/// (unbekanntes Segment, Lane-Index ausserhalb) oder bei transienter
/// Inkonsistenz (`LaneError::MissingNode`).
pub trait LaneGeometrySource {
    /// Eckgeometrie, Halbbreite, Invert- und Glättungs-Flags eines Segments.
    fn segment_geometry(&self, segment_id: SegmentId) -> Result<SegmentGeometry, LaneError>;

    /// Anzahl der Lanes im Lane-Array des Segments.
    fn lane_count(&self, segment_id: SegmentId) -> Result<usize, LaneError>;

    /// Standard-Offsets der Lane.
    fn lane_defaults(&self, lane: &LaneRef) -> Result<LaneDefaults, LaneError>;

    /// "Middle"-Flags der beiden End-Nodes (Start, Ende).
    fn end_node_middle_flags(&self, segment_id: SegmentId) -> Result<(bool, bool), LaneError>;

    /// Aktuelle lebende Kurve der Lane.
    fn lane_curve(&self, lane: &LaneRef) -> Result<Curve, LaneError>;

    /// Aktuelle Bogenlänge der Lane.
    fn lane_length(&self, lane: &LaneRef) -> Result<f32, LaneError>;

    /// Schreibt die lebende Kurve samt Bogenlänge zurück.
    fn set_lane_curve(&mut self, lane: &LaneRef, curve: Curve, length: f32) -> Result<(), LaneError>;

    /// Setzt die durchschnittliche Lane-Länge des Segments.
    fn set_average_length(&mut self, segment_id: SegmentId, length: f32) -> Result<(), LaneError>;

    /// Fordert ein Neu-Rendern (Topologie-Update) des Segments an.
    fn queue_segment_update(&mut self, segment_id: SegmentId);

    /// Prüft den Lane-Index gegen das Lane-Array.
    fn check_lane(&self, lane: &LaneRef) -> Result<(), LaneError> {
        let lane_count = self.lane_count(lane.segment_id())?;
        if lane.lane_index() < lane_count {
            Ok(())
        } else {
            Err(LaneError::LaneIndexOutOfRange {
                segment_id: lane.segment_id(),
                lane_index: lane.lane_index(),
                lane_count,
            })
        }
    }

    /// Alle Lanes eines Segments in Index-Reihenfolge.
    fn segment_lanes(&self, segment_id: SegmentId) -> Result<Vec<LaneRef>, LaneError> {
        let count = self.lane_count(segment_id)?;
        Ok((0..count).map(|i| LaneRef::new(segment_id, i)).collect())
    }
}

/// Mittlere Lane-Länge; 0 für Segmente ohne Lanes.
pub fn average_lane_length(lengths: &[f32]) -> f32 {
    if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<f32>() / lengths.len() as f32
    }
}

/// Berechnet die durchschnittliche Lane-Länge eines Segments neu und schreibt sie zurück.
pub fn refresh_average_length<S>(source: &mut S, segment_id: SegmentId) -> Result<f32, LaneError>
where
    S: LaneGeometrySource + ?Sized,
{
    let lengths = source
        .segment_lanes(segment_id)?
        .iter()
        .map(|lane| source.lane_length(lane))
        .collect::<Result<Vec<_>, _>>()?;
    let average = average_lane_length(&lengths);
    source.set_average_length(segment_id, average)?;
    Ok(average)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Gerades Segment entlang +X, Breite 10, von x=0 bis x=20.
    fn straight_geometry(inverted: bool) -> SegmentGeometry {
        SegmentGeometry {
            // Blick vom Start nach +X: links = +Z
            start_left: SegmentCorner {
                position: Vec3::new(0.0, 0.0, 5.0),
                direction: Vec3::X,
            },
            start_right: SegmentCorner {
                position: Vec3::new(0.0, 0.0, -5.0),
                direction: Vec3::X,
            },
            // Blick vom Ende nach -X: links = -Z
            end_left: SegmentCorner {
                position: Vec3::new(20.0, 0.0, -5.0),
                direction: -Vec3::X,
            },
            end_right: SegmentCorner {
                position: Vec3::new(20.0, 0.0, 5.0),
                direction: -Vec3::X,
            },
            half_width: 5.0,
            inverted,
            smooth_start: false,
            smooth_end: false,
        }
    }

    #[test]
    fn test_centerline_lane_curve() {
        let curve = straight_geometry(false).lane_curve(0.0, 0.0);
        assert!(curve.a.abs_diff_eq(Vec3::new(0.0, 0.0, 0.0), 1e-5));
        assert!(curve.d.abs_diff_eq(Vec3::new(20.0, 0.0, 0.0), 1e-5));
        assert_relative_eq!(curve.b.x, 3.0, epsilon = 1e-4);
        assert_relative_eq!(curve.c.x, 17.0, epsilon = 1e-4);
    }

    #[test]
    fn test_lane_curve_stays_on_one_side() {
        // Position 3 → 80 % Richtung rechte Kante (−Z) an beiden Enden
        let curve = straight_geometry(false).lane_curve(3.0, 0.5);
        assert_relative_eq!(curve.a.z, -3.0, epsilon = 1e-5);
        assert_relative_eq!(curve.d.z, -3.0, epsilon = 1e-5);
        assert_relative_eq!(curve.a.y, 0.5, epsilon = 1e-6);
        assert_relative_eq!(curve.d.y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_inverted_segment_flips_lane_side() {
        let normal = straight_geometry(false).lane_curve(3.0, 0.0);
        let inverted = straight_geometry(true).lane_curve(3.0, 0.0);
        assert_relative_eq!(normal.a.z, -inverted.a.z, epsilon = 1e-5);
        assert_relative_eq!(normal.d.z, -inverted.d.z, epsilon = 1e-5);
    }

    #[test]
    fn test_average_lane_length() {
        assert_relative_eq!(average_lane_length(&[10.0, 20.0, 30.0]), 20.0);
        assert_eq!(average_lane_length(&[]), 0.0);
    }
}
