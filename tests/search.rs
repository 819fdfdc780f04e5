use proptest::prelude::*;
use voronoi_viz::search::{scan_nearest, scan_nearest_within, voronoi, INTERIOR_SENTINEL};
use voronoi_viz::{cell_center, find_closest, interior_distance, smin, CoordinateMapper, FieldPoint, LatticeCoord, ScreenPoint};

fn screen_800x600() -> CoordinateMapper {
    CoordinateMapper::new(800.0, 600.0, 7.7).unwrap()
}

#[test]
fn smin_limits() {
    // Far apart: the smaller value, untouched.
    assert_eq!(smin(0.2, 5.0, 1.0), 0.2);
    assert_eq!(smin(5.0, 0.2, 1.0), 0.2);
    // Zero width is the hard minimum.
    assert_eq!(smin(0.3, 0.7, 0.0), 0.3);
    assert_eq!(smin(0.7, 0.3, 0.0), 0.3);
    // Equal inputs dip below by a quarter of the half-width.
    for (a, t) in [(0.5, 1.0), (2.0, 0.25), (-1.0, 0.1)] {
        assert!((smin(a, a, t) - (a - t / 8.0)).abs() < 1e-12);
    }
}

#[test]
fn smin_never_exceeds_either_input() {
    for &(a, b) in &[(0.1, 0.2), (0.4, 0.35), (1.0, 1.0), (3.0, -1.0)] {
        for &t in &[0.01, 0.1, 0.5, 1.0, 2.0] {
            let m = smin(a, b, t);
            assert!(m <= a.min(b) + 1e-12, "smin({a}, {b}, {t}) = {m}");
        }
    }
}

#[test]
fn screen_center_resolves_like_an_explicit_scan() {
    let m = screen_800x600();
    for t in [0.0, 0.027, 1.0] {
        let sample = find_closest(&m, m.center(), t);
        let uv = m.to_field(m.center());
        // The winner beats every cell of the 3x3 block around the query.
        for di in -1..=1 {
            for dj in -1..=1 {
                let c = cell_center(LatticeCoord::containing(uv), (di, dj), t);
                assert!(sample.distance_squared <= (c - uv).length_squared());
            }
        }
        assert_eq!(sample.hash, sample.lattice.hash1());
        assert!((0.0..1.0).contains(&sample.hash));
    }
}

#[test]
fn screen_center_at_rest_is_nearest_to_cell_below_left() {
    // Origin sits on a lattice corner; cell (0,0) rests at (0.5, 0.5), the
    // point of cell (-1,-1) is closer at t = 0.
    let m = screen_800x600();
    let sample = find_closest(&m, m.center(), 0.0);
    assert_eq!(sample.lattice, LatticeCoord::new(-1, -1));
}

#[test]
fn returned_screen_position_maps_back_to_the_center() {
    let m = screen_800x600();
    let sample = find_closest(&m, ScreenPoint::new(123.0, 456.0), 2.5);
    let back = m.to_field(sample.screen);
    assert!((back - sample.center).length() < 1e-9);
    assert_eq!(LatticeCoord::containing(sample.center), sample.lattice);
}

#[test]
fn non_finite_queries_fall_back_to_the_origin() {
    let m = screen_800x600();
    let bad = find_closest(&m, ScreenPoint::new(f64::NAN, 10.0), 0.0);
    let origin = find_closest(&m, m.center(), 0.0);
    assert_eq!(bad.lattice, origin.lattice);
    assert!(bad.distance_squared.is_finite());
}

#[test]
fn non_finite_field_points_fall_back_to_the_origin() {
    let origin = voronoi(FieldPoint::ZERO, 1.0, 0.5);
    for uv in [
        FieldPoint::new(f64::NAN, 0.3),
        FieldPoint::new(f64::INFINITY, 0.3),
        FieldPoint::new(0.3, f64::NEG_INFINITY),
    ] {
        let sample = voronoi(uv, 1.0, 0.5);
        assert!(sample.nearest.distance_squared.is_finite());
        assert!(sample.interior_distance.is_finite());
        assert_eq!(sample, origin);
        assert_eq!(interior_distance(uv, 1.0, 0.5), origin.interior_distance);
        assert_eq!(scan_nearest(uv, 1.0), scan_nearest(FieldPoint::ZERO, 1.0));
    }
}

#[test]
fn interior_distance_is_positive_inside_a_cell() {
    let t = 0.4;
    let uv = FieldPoint::new(2.3, -1.7);
    let nearest = scan_nearest(uv, t);
    let center = cell_center(nearest.base, (nearest.offset.i, nearest.offset.j), t);
    // Sharp blend at the cell's own point: half the distance to the nearest
    // neighbour, so strictly positive and well below the sentinel.
    let d = interior_distance(center, t, 0.01);
    assert!(d > 0.0 && d < 1.0, "{d}");
}

#[test]
fn wider_blend_lowers_interior_distance() {
    let uv = FieldPoint::new(0.37, 4.81);
    let sharp = interior_distance(uv, 1.0, 0.01);
    let soft = interior_distance(uv, 1.0, 1.0);
    assert!(soft < sharp);
    assert!(sharp < INTERIOR_SENTINEL);
    // Sign of the width does not matter.
    assert_eq!(interior_distance(uv, 1.0, -1.0), soft);
}

#[test]
fn voronoi_reports_the_nearest_scan() {
    let uv = FieldPoint::new(-3.2, 0.9);
    let sample = voronoi(uv, 0.8, 0.5);
    assert_eq!(sample.nearest, scan_nearest(uv, 0.8));
}

proptest! {
    #[test]
    fn three_by_three_agrees_with_wide_scan_within_unit_distance(
        u in -1000.0_f64..1000.0,
        v in -1000.0_f64..1000.0,
        t in 0.0_f64..1000.0,
    ) {
        let uv = FieldPoint::new(u, v);
        let near = scan_nearest(uv, t);
        let wide = scan_nearest_within(uv, t, 3);
        prop_assert!(near.distance_squared >= wide.distance_squared);
        if near.distance_squared <= 1.0 {
            prop_assert_eq!(near.lattice(), wide.lattice());
            prop_assert_eq!(near.distance_squared, wide.distance_squared);
        } else {
            // Rare; the miss is always small.
            prop_assert!(near.distance_squared.sqrt() - wide.distance_squared.sqrt() < 0.1);
        }
    }

    #[test]
    fn nearest_is_deterministic(u in -50.0_f64..50.0, v in -50.0_f64..50.0, t in 0.0_f64..100.0) {
        let m = screen_800x600();
        let p = m.to_screen(FieldPoint::new(u, v));
        let a = find_closest(&m, p, t);
        let b = find_closest(&m, p, t);
        prop_assert_eq!(a, b);
    }
}
