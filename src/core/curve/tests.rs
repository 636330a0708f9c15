use super::*;
use crate::shared::curve_geometry::{SHARP_MIDDLE_FACTOR, SMOOTH_MIDDLE_FACTOR};
use approx::assert_relative_eq;

fn sample_curve() -> Curve {
    Curve::new(
        Vec3::new(0.0, 1.0, 0.0),
        Vec3::new(4.0, 1.5, 2.0),
        Vec3::new(9.0, 2.0, 3.0),
        Vec3::new(12.0, 2.0, 0.0),
    )
}

/// Gerade Kurve entlang +X, wie sie die Topologie mit der Mittelpunkt-Regel erzeugt.
fn straight_curve(length: f32, smooth: bool) -> Curve {
    let a = Vec3::ZERO;
    let d = Vec3::new(length, 0.0, 0.0);
    let (b, c) = calculate_middle_points(a, Vec3::X, d, -Vec3::X, smooth, smooth);
    Curve::new(a, b, c, d)
}

#[test]
fn test_default_curve_is_zero() {
    assert!(Curve::default().is_default());
    assert!(Curve::ZERO.is_default());
    assert!(!Curve::ZERO.with_control_point(2, Vec3::new(0.0, 0.001, 0.0)).is_default());
}

#[test]
fn test_control_point_access_in_order() {
    let curve = sample_curve();
    assert_eq!(curve.control_point(0), curve.a);
    assert_eq!(curve.control_point(1), curve.b);
    assert_eq!(curve.control_point(2), curve.c);
    assert_eq!(curve.control_point(3), curve.d);
}

#[test]
fn test_with_control_point_only_touches_one_point() {
    let curve = sample_curve();
    let moved = curve.with_control_point(1, Vec3::new(5.0, 2.0, 0.0));
    assert_eq!(moved.b, Vec3::new(5.0, 2.0, 0.0));
    assert_eq!(moved.a, curve.a);
    assert_eq!(moved.c, curve.c);
    assert_eq!(moved.d, curve.d);
}

#[test]
#[should_panic]
fn test_control_point_out_of_range_panics() {
    let mut curve = sample_curve();
    let _ = curve.control_point_mut(4);
}

#[test]
fn test_add_then_subtract_recovers_delta() {
    let base = sample_curve();
    let delta = Curve::new(
        Vec3::new(0.5, 0.0, -0.25),
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::ZERO,
        Vec3::new(-1.0, 0.0, 3.0),
    );

    let composed = base + delta;
    for i in 0..CONTROL_POINT_COUNT {
        let recovered = composed.control_point(i) - base.control_point(i);
        assert!(
            recovered.abs_diff_eq(delta.control_point(i), 1e-5),
            "Kontrollpunkt {} weicht ab: {:?}",
            i,
            recovered
        );
    }
    assert!((composed - base).points().iter().zip(delta.points()).all(|(r, d)| r.abs_diff_eq(d, 1e-5)));
}

#[test]
fn test_adding_zero_curve_is_exact() {
    let base = sample_curve();
    assert_eq!(base + Curve::ZERO, base);
}

#[test]
fn test_position_hits_endpoints() {
    let curve = sample_curve();
    assert!(curve.position(0.0).abs_diff_eq(curve.a, 1e-5));
    assert!(curve.position(1.0).abs_diff_eq(curve.d, 1e-5));
}

#[test]
fn test_length_of_straight_curve() {
    let curve = straight_curve(25.0, true);
    assert_relative_eq!(curve.length(), 25.0, epsilon = 1e-3);
}

#[test]
fn test_zero_shift_keeps_curve() {
    for curve in [sample_curve(), straight_curve(15.0, false)] {
        let shifted = curve.shift(0.0, 0.0, true, false);
        for i in 0..CONTROL_POINT_COUNT {
            assert!(shifted.control_point(i).abs_diff_eq(curve.control_point(i), 1e-5));
        }
    }
}

#[test]
fn test_lateral_shift_moves_endpoints_to_the_right() {
    // Fahrtrichtung +X → rechte Seite ist -Z
    let curve = straight_curve(15.0, false);
    let shifted = curve.shift(2.0, 0.0, false, false);

    assert!(shifted.a.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-5));
    assert!(shifted.d.abs_diff_eq(Vec3::new(15.0, 0.0, -2.0), 1e-5));
    assert_relative_eq!(shifted.b.x, 15.0 * SHARP_MIDDLE_FACTOR, epsilon = 1e-4);
    assert_relative_eq!(shifted.c.x, 15.0 - 15.0 * SHARP_MIDDLE_FACTOR, epsilon = 1e-4);
    assert_relative_eq!(shifted.b.z, -2.0, epsilon = 1e-5);
    assert_relative_eq!(shifted.c.z, -2.0, epsilon = 1e-5);
}

#[test]
fn test_vertical_shift_raises_whole_curve() {
    let curve = straight_curve(10.0, true);
    let shifted = curve.shift(0.0, 1.5, true, true);

    assert_relative_eq!(shifted.a.y, 1.5, epsilon = 1e-6);
    assert_relative_eq!(shifted.d.y, 1.5, epsilon = 1e-6);
    assert_relative_eq!(shifted.b.x, 10.0 * SMOOTH_MIDDLE_FACTOR, epsilon = 1e-4);
}

#[test]
fn test_shift_twice_accumulates() {
    let curve = straight_curve(15.0, false);
    let twice = curve.shift(1.0, 0.0, false, false).shift(1.0, 0.0, false, false);
    assert!(twice.a.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), 1e-5));
}
