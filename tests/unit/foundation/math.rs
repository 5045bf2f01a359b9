use super::*;

#[test]
fn map_range_hits_endpoints_and_extrapolates() {
    assert_eq!(map_range(0.0, 0.0, 1.0, -15.0, 15.0), -15.0);
    assert_eq!(map_range(1.0, 0.0, 1.0, -15.0, 15.0), 15.0);
    assert_eq!(map_range(0.5, 0.0, 1.0, -15.0, 15.0), 0.0);
    // Breath dips below zero; the map is not clamped.
    assert!((map_range(-0.4, 0.0, 1.0, -15.0, 15.0) - (-27.0)).abs() < 1e-12);
}

#[test]
fn map_range_zero_span_is_finite() {
    let v = map_range(3.0, 2.0, 2.0, 0.0, 12.0);
    assert!(v.is_finite());
    assert_eq!(v, 12.0);
}

#[test]
fn lerp_blends() {
    assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
    assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
    assert!((lerp(180.0, 360.0, 0.02) - 183.6).abs() < 1e-9);
}

#[test]
fn ring_angle_spans_open_turn() {
    assert_eq!(ring_angle(0, 4), 0.0);
    assert!((ring_angle(2, 4) - std::f64::consts::PI).abs() < 1e-12);
    assert!(ring_angle(3, 4) < std::f64::consts::TAU);
}

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(128, 255), 128);
}
