//! Reine Geometrie-Funktionen für kubische Lane-Kurven.
//!
//! Layer-neutral: wird von `core::curve`, `core::customization` und der
//! Referenz-Topologie (`core::network`) gemeinsam genutzt.
//!
//! Konvention: Y ist die Hochachse, XZ die Bodenebene.

use glam::{Vec2, Vec3};

/// Faktor für den Abstand der Mittelpunkte bei geglättetem Ende.
pub const SMOOTH_MIDDLE_FACTOR: f32 = 0.276;
/// Faktor für den Abstand der Mittelpunkte bei ungeglättetem Ende (nur gerade Kurven).
pub const SHARP_MIDDLE_FACTOR: f32 = 0.15;
/// Schwelle für "parallel" bei Richtungsvergleichen (Skalarprodukt).
const STRAIGHT_DOT_THRESHOLD: f32 = 0.999;

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
pub fn cubic_bezier(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

/// Approximierte Kurvenlänge über Polylinien-Segmente.
pub fn approx_length(positions_fn: impl Fn(f32) -> Vec3, samples: usize) -> f32 {
    let samples = samples.max(1);
    let mut length = 0.0;
    let mut prev = positions_fn(0.0);
    for i in 1..=samples {
        let t = i as f32 / samples as f32;
        let p = positions_fn(t);
        length += prev.distance(p);
        prev = p;
    }
    length
}

/// Projiziert auf die Bodenebene.
pub fn xz(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Normiert einen Vektor in der Bodenebene (Y = 0) und liefert die Länge mit.
///
/// Für Nullvektoren wird `(Vec3::ZERO, 0.0)` zurückgegeben.
pub fn normalize_xz(v: Vec3) -> (Vec3, f32) {
    let flat = Vec3::new(v.x, 0.0, v.z);
    let length = flat.length();
    if length < f32::EPSILON {
        (Vec3::ZERO, 0.0)
    } else {
        (flat / length, length)
    }
}

/// Rechte Normale einer Fahrtrichtung in der Bodenebene.
pub fn right_normal_xz(direction: Vec3) -> Vec3 {
    Vec3::new(direction.z, 0.0, -direction.x)
}

/// Linke Normale einer Fahrtrichtung in der Bodenebene.
pub fn left_normal_xz(direction: Vec3) -> Vec3 {
    -right_normal_xz(direction)
}

/// Prüft ob die beiden Tangenten eine gerade Kurve beschreiben.
///
/// Beide Richtungen zeigen in die Kurve hinein: die Start-Richtung entlang der
/// Sehne, die End-Richtung entgegen der Sehne. Gibt zusätzlich die
/// Boden-Distanz zwischen Start und Ende zurück.
pub fn is_straight(start: Vec3, start_dir: Vec3, end: Vec3, end_dir: Vec3) -> (bool, f32) {
    let (chord, distance) = normalize_xz(end - start);
    let start_dot = start_dir.x * chord.x + start_dir.z * chord.z;
    let end_dot = end_dir.x * chord.x + end_dir.z * chord.z;
    (
        start_dot > STRAIGHT_DOT_THRESHOLD && end_dot < -STRAIGHT_DOT_THRESHOLD,
        distance,
    )
}

/// Schnittpunkt zweier Geraden in der Bodenebene.
///
/// Löst `a1 + (a2 - a1)·u = b1 + (b2 - b1)·v`. Gibt `None` bei parallelen Geraden.
pub fn intersect_lines_xz(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> Option<(f32, f32)> {
    let da = a2 - a1;
    let db = b2 - b1;
    let det = da.perp_dot(db);
    if det.abs() < 1e-6 {
        return None;
    }
    let diff = b1 - a1;
    let u = diff.perp_dot(db) / det;
    let v = diff.perp_dot(da) / det;
    Some((u, v))
}

fn middle_factor(smooth: bool) -> f32 {
    if smooth {
        SMOOTH_MIDDLE_FACTOR
    } else {
        SHARP_MIDDLE_FACTOR
    }
}

/// Berechnet die inneren Kontrollpunkte (b, c) aus Endpunkten und Tangenten.
///
/// - `start_dir` zeigt vom Start in die Kurve, `end_dir` vom Ende in die Kurve
/// - `smooth_start`/`smooth_end` steuern den Tangenten-Abstand je Ende
///
/// Gerade Kurven: Abstand `distance * 0.276` (geglättet) bzw. `distance * 0.15`.
/// Gekrümmte Kurven: Abstand bis zum Tangenten-Schnittpunkt, begrenzt auf
/// `(u + v) * Faktor`. Ohne Schnittpunkt: `distance * 0.276` an beiden Enden.
pub fn calculate_middle_points(
    start: Vec3,
    start_dir: Vec3,
    end: Vec3,
    end_dir: Vec3,
    smooth_start: bool,
    smooth_end: bool,
) -> (Vec3, Vec3) {
    let (straight, distance) = is_straight(start, start_dir, end, end_dir);
    if straight {
        return (
            start + start_dir * (distance * middle_factor(smooth_start)),
            end + end_dir * (distance * middle_factor(smooth_end)),
        );
    }

    let dir_dot = start_dir.x * end_dir.x + start_dir.z * end_dir.z;
    let intersection = if dir_dot >= -STRAIGHT_DOT_THRESHOLD {
        intersect_lines_xz(
            xz(start),
            xz(start + start_dir),
            xz(end),
            xz(end + end_dir),
        )
    } else {
        None
    };

    match intersection {
        Some((u, v)) => {
            let min = distance * 0.1;
            let u = u.clamp(min, distance.max(min));
            let v = v.clamp(min, distance.max(min));
            let sum = u + v;
            (
                start + start_dir * u.min(sum * middle_factor(smooth_start)),
                end + end_dir * v.min(sum * middle_factor(smooth_end)),
            )
        }
        None => (
            start + start_dir * (distance * SMOOTH_MIDDLE_FACTOR),
            end + end_dir * (distance * SMOOTH_MIDDLE_FACTOR),
        ),
    }
}

/// Bildet die laterale Lane-Position auf den Anteil zwischen linker und rechter Kante ab.
///
/// `position / (half_width * 2) + 0.5`, bei invertiertem Segment gespiegelt.
pub fn normalized_lane_position(position: f32, half_width: f32, inverted: bool) -> f32 {
    let normalized = position / (half_width * 2.0) + 0.5;
    if inverted {
        1.0 - normalized
    } else {
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cubic_bezier_endpoints() {
        let p0 = Vec3::new(0.0, 0.0, 0.0);
        let p1 = Vec3::new(3.0, 1.0, 10.0);
        let p2 = Vec3::new(7.0, 1.0, 10.0);
        let p3 = Vec3::new(10.0, 0.0, 0.0);

        assert!((cubic_bezier(p0, p1, p2, p3, 0.0) - p0).length() < 0.001);
        assert!((cubic_bezier(p0, p1, p2, p3, 1.0) - p3).length() < 0.001);
    }

    #[test]
    fn test_approx_length_straight_line() {
        let start = Vec3::ZERO;
        let end = Vec3::new(30.0, 0.0, 40.0);
        let length = approx_length(|t| start.lerp(end, t), 16);
        assert_relative_eq!(length, 50.0, epsilon = 1e-3);
    }

    #[test]
    fn test_straight_middle_points_respect_smoothing() {
        let start = Vec3::ZERO;
        let end = Vec3::new(20.0, 0.0, 0.0);

        let (b, c) = calculate_middle_points(start, Vec3::X, end, -Vec3::X, false, true);
        assert_relative_eq!(b.x, 20.0 * SHARP_MIDDLE_FACTOR, epsilon = 1e-4);
        assert_relative_eq!(c.x, 20.0 - 20.0 * SMOOTH_MIDDLE_FACTOR, epsilon = 1e-4);
        assert_eq!(b.z, 0.0);
        assert_eq!(c.z, 0.0);
    }

    #[test]
    fn test_curved_middle_points_stay_on_tangents() {
        // Viertelkreis-artige Kurve: Start nach +X, Ende kommt von +Z
        let start = Vec3::ZERO;
        let end = Vec3::new(10.0, 0.0, 10.0);
        let start_dir = Vec3::X;
        let end_dir = -Vec3::Z;

        let (b, c) = calculate_middle_points(start, start_dir, end, end_dir, true, true);
        assert_relative_eq!(b.z, 0.0, epsilon = 1e-5);
        assert!(b.x > 0.0 && b.x <= 10.0);
        assert_relative_eq!(c.x, 10.0, epsilon = 1e-5);
        assert!(c.z < 10.0 && c.z >= 0.0);
    }

    #[test]
    fn test_intersect_lines_parallel_is_none() {
        let hit = intersect_lines_xz(
            Vec2::ZERO,
            Vec2::X,
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_intersect_lines_parameters() {
        let (u, v) = intersect_lines_xz(
            Vec2::ZERO,
            Vec2::X,
            Vec2::new(4.0, 3.0),
            Vec2::new(4.0, 2.0),
        )
        .expect("Schnittpunkt erwartet");
        assert_relative_eq!(u, 4.0, epsilon = 1e-5);
        assert_relative_eq!(v, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_normalized_position_centerline_and_invert() {
        assert_relative_eq!(normalized_lane_position(0.0, 5.0, false), 0.5);
        assert_relative_eq!(normalized_lane_position(0.0, 5.0, true), 0.5);
        assert_relative_eq!(normalized_lane_position(3.0, 5.0, false), 0.8, epsilon = 1e-6);
        assert_relative_eq!(normalized_lane_position(3.0, 5.0, true), 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_normals_are_mirrored() {
        let dir = Vec3::Z;
        assert_eq!(right_normal_xz(dir), Vec3::X);
        assert_eq!(left_normal_xz(dir), -Vec3::X);
    }
}
