//! Kubische Lane-Kurve mit vier Kontrollpunkten (Start, CP1, CP2, Ende).

use crate::shared::curve_geometry::{
    approx_length, calculate_middle_points, cubic_bezier, normalize_xz, right_normal_xz,
};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Anzahl der Kontrollpunkte einer Lane-Kurve.
pub const CONTROL_POINT_COUNT: usize = 4;

/// Standard-Stützstellen für die Bogenlängen-Approximation.
pub const DEFAULT_LENGTH_SAMPLES: usize = 64;

/// Kubische Bézier-Kurve in Weltkoordinaten.
///
/// Wird sowohl für absolute Kurven (Basis, zusammengesetzte Kurve) als auch
/// für relative Offsets (Delta pro Kontrollpunkt) verwendet. Die
/// Default-Kurve ist die Null-Kurve.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Curve {
    /// Startpunkt
    pub a: Vec3,
    /// Erster innerer Kontrollpunkt
    pub b: Vec3,
    /// Zweiter innerer Kontrollpunkt
    pub c: Vec3,
    /// Endpunkt
    pub d: Vec3,
}

impl Curve {
    /// Null-Kurve (kein Offset).
    pub const ZERO: Self = Self {
        a: Vec3::ZERO,
        b: Vec3::ZERO,
        c: Vec3::ZERO,
        d: Vec3::ZERO,
    };

    /// Erstellt eine Kurve aus vier Kontrollpunkten.
    pub fn new(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> Self {
        Self { a, b, c, d }
    }

    /// Erstellt eine Kurve aus einem Kontrollpunkt-Array.
    pub fn from_points(points: [Vec3; CONTROL_POINT_COUNT]) -> Self {
        let [a, b, c, d] = points;
        Self { a, b, c, d }
    }

    /// Alle Kontrollpunkte in Reihenfolge a, b, c, d.
    pub fn points(&self) -> [Vec3; CONTROL_POINT_COUNT] {
        [self.a, self.b, self.c, self.d]
    }

    /// Gibt Kontrollpunkt `index` zurück.
    ///
    /// # Panics
    /// Bei `index >= 4`.
    pub fn control_point(&self, index: usize) -> Vec3 {
        self.points()[index]
    }

    /// Mutabler Zugriff auf Kontrollpunkt `index`.
    ///
    /// # Panics
    /// Bei `index >= 4`.
    pub fn control_point_mut(&mut self, index: usize) -> &mut Vec3 {
        match index {
            0 => &mut self.a,
            1 => &mut self.b,
            2 => &mut self.c,
            3 => &mut self.d,
            _ => panic!("Kontrollpunkt-Index {index} ausserhalb 0..{CONTROL_POINT_COUNT}"),
        }
    }

    /// Kopie mit ersetztem Kontrollpunkt `index`.
    pub fn with_control_point(mut self, index: usize, position: Vec3) -> Self {
        *self.control_point_mut(index) = position;
        self
    }

    /// True wenn alle Kontrollpunkte exakt null sind.
    pub fn is_default(&self) -> bool {
        *self == Self::ZERO
    }

    /// Punkt auf der Kurve bei Parameter `t` ∈ [0, 1].
    pub fn position(&self, t: f32) -> Vec3 {
        cubic_bezier(self.a, self.b, self.c, self.d, t)
    }

    /// Approximierte Bogenlänge mit `samples` Polylinien-Segmenten.
    pub fn length_with_samples(&self, samples: usize) -> f32 {
        approx_length(|t| self.position(t), samples)
    }

    /// Approximierte Bogenlänge (Standard-Auflösung).
    pub fn length(&self) -> f32 {
        self.length_with_samples(DEFAULT_LENGTH_SAMPLES)
    }

    /// Boden-Richtung am Start (in die Kurve hinein).
    ///
    /// Fällt bei degenerierter Tangente (b == a) auf die Sehne zurück.
    pub fn start_direction(&self) -> Vec3 {
        let (dir, len) = normalize_xz(self.b - self.a);
        if len > f32::EPSILON {
            dir
        } else {
            normalize_xz(self.d - self.a).0
        }
    }

    /// Boden-Richtung am Ende (vom Ende in die Kurve hinein).
    pub fn end_direction(&self) -> Vec3 {
        let (dir, len) = normalize_xz(self.c - self.d);
        if len > f32::EPSILON {
            dir
        } else {
            normalize_xz(self.a - self.d).0
        }
    }

    /// Verschiebt die Kurve seitlich und vertikal.
    ///
    /// Die Endpunkte wandern um `lateral` entlang der rechten Boden-Normalen
    /// der Fahrtrichtung und um `vertical` entlang Y. Die inneren Punkte werden
    /// aus den neuen Endpunkten und den alten Tangenten neu abgeleitet.
    ///
    /// Setzt eine gültige Ausgangskurve voraus; zweimal angewendet addieren
    /// sich die Verschiebungen. Ohne Verschiebung bleibt die Kurve unverändert.
    pub fn shift(&self, lateral: f32, vertical: f32, smooth_start: bool, smooth_end: bool) -> Self {
        if lateral == 0.0 && vertical == 0.0 {
            return *self;
        }

        let dir_a = self.start_direction();
        let dir_d = self.end_direction();
        // dir_d zeigt rückwärts, daher ist die rechte Seite der Fahrtrichtung gespiegelt
        let normal_a = right_normal_xz(dir_a);
        let normal_d = -right_normal_xz(dir_d);

        let a = self.a + normal_a * lateral + Vec3::Y * vertical;
        let d = self.d + normal_d * lateral + Vec3::Y * vertical;
        let (b, c) = calculate_middle_points(a, dir_a, d, dir_d, smooth_start, smooth_end);
        Self { a, b, c, d }
    }
}

impl Add for Curve {
    type Output = Curve;

    fn add(self, other: Curve) -> Curve {
        Curve {
            a: self.a + other.a,
            b: self.b + other.b,
            c: self.c + other.c,
            d: self.d + other.d,
        }
    }
}

impl Sub for Curve {
    type Output = Curve;

    fn sub(self, other: Curve) -> Curve {
        Curve {
            a: self.a - other.a,
            b: self.b - other.b,
            c: self.c - other.c,
            d: self.d - other.d,
        }
    }
}

#[cfg(test)]
mod tests;
