use super::*;
use crate::animation::noise::{ConstantNoise, NoiseField};

fn frame(f: u64, breath: f64) -> LayerFrame {
    LayerFrame {
        frame: f,
        breath,
        hue: 180.0,
        sat: 60.0,
    }
}

fn still_style(points: u32) -> LayerStyle {
    LayerStyle {
        point_count: points,
        shape: ShapeParams {
            ripple_amplitude: 0.0,
            ..ShapeParams::default()
        },
        ..LayerStyle::default()
    }
}

#[test]
fn alpha_base_follows_linear_map() {
    let count = 60;
    assert!((alpha_base(count, count, 12.0) - 12.0).abs() < 1e-12);
    assert!((alpha_base(0, count, 12.0)).abs() < 1e-12);
    assert!((alpha_base(1, count, 12.0) - 12.0 / 60.0).abs() < 1e-12);
    for i in 1..count {
        assert!(alpha_base(i, count, 12.0) < alpha_base(i + 1, count, 12.0));
    }

    let outer = Layer::new(count, count, 96.0, LayerStyle::default()).unwrap();
    assert!((outer.alpha_base() - 12.0).abs() < 1e-12);
}

#[test]
fn single_layer_four_points_is_a_square() {
    let layer = Layer::new(1, 1, 100.0, still_style(4)).unwrap();
    let contour = layer.contour(&ConstantNoise(0.5), &frame(37, 0.5));
    let r = 102.0; // base + index * spacing, breath 0.5 adds nothing
    assert!((layer.radius(0.5) - r).abs() < 1e-12);

    let expected = [
        Point::new(r, 0.0),
        Point::new(0.0, r),
        Point::new(-r, 0.0),
        Point::new(0.0, -r),
    ];
    assert_eq!(contour.vertices.len(), 4);
    for (got, want) in contour.vertices.iter().zip(expected) {
        assert!((got.x - want.x).abs() < 1e-9, "{got:?} vs {want:?}");
        assert!((got.y - want.y).abs() < 1e-9, "{got:?} vs {want:?}");
    }
    for k in 0..4 {
        let a = contour.vertices[k];
        let b = contour.vertices[(k + 1) % 4];
        assert!((a.distance(b) - r * std::f64::consts::SQRT_2).abs() < 1e-9);
    }
}

#[test]
fn radius_envelope_applies_separation_below_last_two_layers() {
    let style = LayerStyle::default();
    let count = 10;
    let deep = Layer::new(3, count, 50.0, style).unwrap();
    let raw = 50.0 + 2.0 * 3.0;
    let expected = raw + (raw + 7.0 * 0.5 - raw) * 0.08;
    assert!((deep.radius(0.5) - expected).abs() < 1e-12);

    // index == count - 1 and index == count skip the correction.
    let near_outer = Layer::new(9, count, 50.0, style).unwrap();
    assert!((near_outer.radius(0.5) - 68.0).abs() < 1e-12);
    let outer = Layer::new(10, count, 50.0, style).unwrap();
    assert!((outer.radius(1.0) - (50.0 + 15.0 + 20.0)).abs() < 1e-12);
    assert!((outer.radius(-0.4) - (50.0 - 27.0 + 20.0)).abs() < 1e-12);
}

#[test]
fn deformation_damps_toward_high_indices() {
    let style = LayerStyle::default();
    let outer = Layer::new(60, 60, 50.0, style).unwrap();
    let inner = Layer::new(1, 60, 50.0, style).unwrap();
    assert!((outer.deformation_scale() - 0.6).abs() < 1e-12);
    assert!((inner.deformation_scale() - (1.0 - 0.4 / 60.0)).abs() < 1e-12);
}

#[test]
fn fill_bands_hue_by_index_and_wraps() {
    let style = LayerStyle {
        hue_shift: 25.0,
        ..LayerStyle::default()
    };
    let layer = Layer::new(10, 60, 50.0, style).unwrap();
    let mut f = frame(0, 0.5);
    f.hue = 350.0;
    let fill = layer.fill(&f);
    assert!((fill.h - (350.0 + 30.0 + 25.0 - 360.0)).abs() < 1e-9);
    assert_eq!(fill.s, 60.0);
    assert_eq!(fill.b, 100.0);
    let shimmer = 0.8 + 0.2 * (10.0f64 * 0.3).sin();
    assert!((fill.a - layer.alpha_base() * shimmer).abs() < 1e-12);
}

#[test]
fn shimmer_stays_within_band() {
    let layer = Layer::new(30, 60, 50.0, LayerStyle::default()).unwrap();
    for f in (0..20_000).step_by(97) {
        let a = layer.alpha(f);
        assert!(a >= layer.alpha_base() * 0.6 - 1e-12);
        assert!(a <= layer.alpha_base() + 1e-12);
    }
}

#[test]
fn deformation_is_bounded_by_amplitudes() {
    let field = NoiseField::new(11);
    let layer = Layer::new(20, 60, 120.0, LayerStyle::default()).unwrap();
    let f = frame(500, 0.8);
    let r = layer.radius(f.breath);
    let max_offset = (10.0 + 5.0 + 2.0) * layer.deformation_scale();
    for v in layer.contour(&field, &f).vertices {
        let d = v.to_vec2().hypot();
        assert!((d - r).abs() <= max_offset + 1e-9);
    }
}

#[test]
fn contour_into_reuses_buffer() {
    let layer = Layer::new(2, 4, 40.0, LayerStyle::default()).unwrap();
    let mut buf = vec![Point::ORIGIN; 999];
    layer.contour_into(&NoiseField::new(1), &frame(1, 0.3), &mut buf);
    assert_eq!(buf.len(), DEFAULT_POINT_COUNT as usize);
}

#[test]
fn rejects_degenerate_layers() {
    let style = LayerStyle::default();
    assert!(Layer::new(1, 0, 10.0, style).is_err());
    assert!(Layer::new(0, 3, 10.0, style).is_err());
    assert!(Layer::new(4, 3, 10.0, style).is_err());
    assert!(Layer::new(1, 3, 10.0, still_style(2)).is_err());
    assert!(Layer::new(1, 3, f64::NAN, style).is_err());
}
