//! Benutzer-Anpassung einer Lane: persistentes Delta über prozeduraler Basis-Kurve.
//!
//! Die zusammengesetzte Kurve ist immer `cached_base + delta_points`. Die
//! beiden Schichten werden nie destruktiv verschmolzen:
//! - `cached_base` wird ausschließlich aus der Topologie neu berechnet
//!   (`recompute_base`) oder aus der frisch berechneten Host-Kurve verschoben
//!   (`apply_shift`)
//! - `delta_points` wird ausschließlich vom Edit-Protokoll geschrieben

use super::curve::{Curve, CONTROL_POINT_COUNT};
use super::error::LaneError;
use super::lane::LaneRef;
use super::source::{refresh_average_length, LaneGeometrySource};
use glam::Vec3;

/// Welcher Recompute-Pfad für eine Lane läuft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeMode {
    /// Vollständiger Neuaufbau aus der Segment-Topologie
    Full,
    /// Verschiebung der vom Host frisch berechneten Kurve
    Incremental,
}

impl RecomputeMode {
    /// Lanes mit Kontrollpunkt-Deltas brauchen den vollen Pfad.
    pub fn for_customization(customization: &LaneCustomization) -> Self {
        if customization.delta_points.is_default() {
            RecomputeMode::Incremental
        } else {
            RecomputeMode::Full
        }
    }
}

/// Persistente Anpassung einer einzelnen Lane.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneCustomization {
    lane: LaneRef,
    /// Seitliche Verschiebung gegenüber der Standard-Position
    pub lateral_shift: f32,
    /// Vertikale Verschiebung gegenüber dem Standard-Offset
    pub vertical_shift: f32,
    delta_points: Curve,
    cached_base: Curve,
}

impl LaneCustomization {
    /// Erstellt eine Anpassung ohne Delta mit gegebener Basis-Kurve.
    pub fn new(lane: LaneRef, base: Curve) -> Self {
        Self {
            lane,
            lateral_shift: 0.0,
            vertical_shift: 0.0,
            delta_points: Curve::ZERO,
            cached_base: base,
        }
    }

    /// Erstellt eine Anpassung, deren Basis die aktuelle Host-Kurve der Lane ist.
    pub fn from_source<S>(lane: LaneRef, source: &S) -> Result<Self, LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        source.check_lane(&lane)?;
        Ok(Self::new(lane, source.lane_curve(&lane)?))
    }

    pub fn lane(&self) -> &LaneRef {
        &self.lane
    }

    /// Persistente Offsets pro Kontrollpunkt.
    pub fn delta_points(&self) -> &Curve {
        &self.delta_points
    }

    /// Setzt alle Offsets auf einmal (z.B. beim Laden).
    pub fn set_delta_points(&mut self, delta_points: Curve) {
        self.delta_points = delta_points;
    }

    /// Zuletzt berechnete prozedurale Basis-Kurve.
    pub fn cached_base(&self) -> &Curve {
        &self.cached_base
    }

    /// Basis + Delta.
    pub fn composed_curve(&self) -> Curve {
        self.cached_base + self.delta_points
    }

    /// Laterale Position: Standard-Position der Lane + Verschiebung.
    pub fn position<S>(&self, source: &S) -> Result<f32, LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        Ok(source.lane_defaults(&self.lane)?.lateral + self.lateral_shift)
    }

    /// Setzt die absolute laterale Position (speichert die Differenz als Verschiebung).
    pub fn set_position<S>(&mut self, source: &S, position: f32) -> Result<(), LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        self.lateral_shift = position - source.lane_defaults(&self.lane)?.lateral;
        Ok(())
    }

    /// Höhe: Standard-Offset der Lane + vertikale Verschiebung.
    pub fn height<S>(&self, source: &S) -> Result<f32, LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        Ok(source.lane_defaults(&self.lane)?.vertical + self.vertical_shift)
    }

    /// Setzt die absolute Höhe (speichert die Differenz als Verschiebung).
    pub fn set_height<S>(&mut self, source: &S, height: f32) -> Result<(), LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        self.vertical_shift = height - source.lane_defaults(&self.lane)?.vertical;
        Ok(())
    }

    /// Zusammengesetzter Kontrollpunkt `index`.
    pub fn control_point(&self, index: usize) -> Result<Vec3, LaneError> {
        check_control_point_index(index)?;
        Ok(self.composed_curve().control_point(index))
    }

    /// Setzt Kontrollpunkt `index` auf eine Weltposition (nur Delta, kein Host-Update).
    ///
    /// Das Delta ist immer relativ zur aktuellen Basis.
    pub fn set_control_point(&mut self, index: usize, position: Vec3) -> Result<(), LaneError> {
        check_control_point_index(index)?;
        *self.delta_points.control_point_mut(index) = position - self.cached_base.control_point(index);
        Ok(())
    }

    /// Setzt Kontrollpunkt `index`, schreibt ihn in die lebende Host-Kurve und
    /// fordert ein Neu-Rendern des Segments an.
    pub fn update_control_point<S>(
        &mut self,
        index: usize,
        position: Vec3,
        source: &mut S,
    ) -> Result<(), LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        check_control_point_index(index)?;
        let live = source.lane_curve(&self.lane)?.with_control_point(index, position);
        self.set_control_point(index, position)?;

        source.set_lane_curve(&self.lane, live, live.length())?;
        source.queue_segment_update(self.lane.segment_id());
        Ok(())
    }

    /// True wenn weder Verschiebung noch Kontrollpunkt-Deltas gesetzt sind.
    pub fn is_default(&self) -> bool {
        self.lateral_shift == 0.0 && self.vertical_shift == 0.0 && self.delta_points.is_default()
    }

    /// Setzt alle persistenten Werte zurück. Die Basis bleibt erhalten.
    pub fn reset(&mut self) {
        self.lateral_shift = 0.0;
        self.vertical_shift = 0.0;
        self.delta_points = Curve::ZERO;
    }

    /// Voller Pfad: baut die Basis-Kurve aus der Segment-Topologie neu auf.
    ///
    /// Schreibt Basis + Delta als lebende Kurve zurück, aktualisiert die
    /// Bogenlänge und die durchschnittliche Lane-Länge des Segments.
    pub fn recompute_base<S>(&mut self, source: &mut S) -> Result<Curve, LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        let segment_id = self.lane.segment_id();
        source.check_lane(&self.lane)?;

        let geometry = source.segment_geometry(segment_id)?;
        let defaults = source.lane_defaults(&self.lane)?;
        let position = defaults.lateral + self.lateral_shift;
        let height = defaults.vertical + self.vertical_shift;

        self.cached_base = geometry.lane_curve(position, height);
        let composed = self.composed_curve();
        source.set_lane_curve(&self.lane, composed, composed.length())?;
        refresh_average_length(source, segment_id)?;

        log::debug!(
            "{}: Basis neu berechnet (Position {:.3}, Höhe {:.3})",
            self.lane,
            position,
            height
        );
        Ok(composed)
    }

    /// Inkrementeller Pfad: verschiebt die vom Host frisch berechnete Kurve.
    ///
    /// Fehler werden geloggt und verschluckt; die Lane behält ihre letzte
    /// gültige Kurve. Hat die Lane Kontrollpunkt-Deltas, läuft stattdessen
    /// der volle Pfad. Gibt zurück, ob die Kurve aktualisiert wurde.
    pub fn apply_shift<S>(&mut self, source: &mut S) -> bool
    where
        S: LaneGeometrySource + ?Sized,
    {
        let result = if self.delta_points.is_default() {
            self.try_apply_shift(source)
        } else {
            log::debug!("{}: Kontrollpunkt-Deltas vorhanden, voller Pfad", self.lane);
            self.recompute_base(source).map(|_| ())
        };

        match result {
            Ok(()) => true,
            Err(err) if err.is_transient() => {
                log::warn!("{}: Verschiebung übersprungen (Topologie inkonsistent): {}", self.lane, err);
                false
            }
            Err(err) => {
                log::error!("{}: Verschiebung fehlgeschlagen: {}", self.lane, err);
                false
            }
        }
    }

    fn try_apply_shift<S>(&mut self, source: &mut S) -> Result<(), LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        let (smooth_start, smooth_end) = source.end_node_middle_flags(self.lane.segment_id())?;
        let host_curve = source.lane_curve(&self.lane)?;
        let shifted = host_curve.shift(
            self.lateral_shift,
            self.vertical_shift,
            smooth_start,
            smooth_end,
        );

        source.set_lane_curve(&self.lane, shifted, shifted.length())?;
        self.cached_base = shifted;
        Ok(())
    }

    /// Führt den gewählten Recompute-Pfad aus.
    ///
    /// Der inkrementelle Pfad liefert nie einen Fehler (siehe `apply_shift`).
    pub fn recompute<S>(&mut self, mode: RecomputeMode, source: &mut S) -> Result<(), LaneError>
    where
        S: LaneGeometrySource + ?Sized,
    {
        match mode {
            RecomputeMode::Full => self.recompute_base(source).map(|_| ()),
            RecomputeMode::Incremental => {
                self.apply_shift(source);
                Ok(())
            }
        }
    }
}

fn check_control_point_index(index: usize) -> Result<(), LaneError> {
    if index < CONTROL_POINT_COUNT {
        Ok(())
    } else {
        Err(LaneError::ControlPointOutOfRange(index))
    }
}
