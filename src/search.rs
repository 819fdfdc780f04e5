//! Closest-cell search and the smooth interior-distance metric.

use crate::field::{animated_offset, cell_center, stable_hash, FieldPoint, LatticeCoord};
use crate::mapper::{CoordinateMapper, ScreenPoint};

/// Interior-distance accumulator start; larger than any distance in a 5x5
/// neighbourhood.
pub const INTERIOR_SENTINEL: f64 = 8.0;
/// Neighbours closer than this (squared) to the winner count as the winner.
pub const DEGENERATE_EPSILON: f64 = 1e-5;

/// Winner of a neighbourhood scan around one query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    /// Cell containing the query point.
    pub base: LatticeCoord,
    /// Winning cell relative to `base`.
    pub offset: LatticeCoord,
    /// Query point -> winning center.
    pub dir: FieldPoint,
    pub distance_squared: f64,
}

impl Nearest {
    pub fn lattice(&self) -> LatticeCoord {
        self.base.offset(self.offset.i, self.offset.j)
    }
}

/// One closest-cell query result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSample {
    pub lattice: LatticeCoord,
    pub center: FieldPoint,
    pub screen: ScreenPoint,
    /// Squared field-space distance from the query to `center`.
    pub distance_squared: f64,
    /// `hash1(lattice)`, in `[0, 1)`.
    pub hash: f64,
}

impl CellSample {
    pub fn from_lattice(
        mapper: &CoordinateMapper,
        lattice: LatticeCoord,
        query: FieldPoint,
        t: f64,
    ) -> Self {
        let center = cell_center(lattice, (0, 0), t);
        Self {
            lattice,
            center,
            screen: mapper.to_screen(center),
            distance_squared: (center - query).length_squared(),
            hash: stable_hash(lattice),
        }
    }
}

/// Non-finite queries sample the field origin instead.
fn finite_query(uv: FieldPoint) -> FieldPoint {
    if uv.is_finite() {
        uv
    } else {
        log::debug!("non-finite query {:?}, sampling field origin", uv);
        FieldPoint::ZERO
    }
}

/// Center of `base + offset`, relative to `base`'s origin.
fn local_center(base: LatticeCoord, offset: LatticeCoord, t: f64) -> FieldPoint {
    let cell = base.offset(offset.i, offset.j);
    animated_offset(cell, t) + offset.origin()
}

/// Nearest cell center among the `(2r+1)^2` cells around `uv`.
///
/// Scans `dx` then `dy` from `-r` to `r`; equal distances keep the first hit.
pub fn scan_nearest_within(uv: FieldPoint, t: f64, radius: i32) -> Nearest {
    let uv = finite_query(uv);
    let base = LatticeCoord::containing(uv);
    let local = uv - base.origin();

    let mut best = Nearest {
        base,
        offset: LatticeCoord::default(),
        dir: FieldPoint::ZERO,
        distance_squared: f64::INFINITY,
    };
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            let offset = LatticeCoord::new(dx, dy);
            let dir = local_center(base, offset, t) - local;
            let dst = dir.length_squared();
            if dst < best.distance_squared {
                best.offset = offset;
                best.dir = dir;
                best.distance_squared = dst;
            }
        }
    }
    best
}

/// The 3x3 scan the shader performs.
///
/// Jitter keeps every point at least 1.01 from anything two cells away, so
/// the result is the true nearest whenever it lies within distance 1. Past
/// that a wider scan can occasionally find a closer point; the shader has
/// the same blind spot, which keeps CPU and GPU in agreement.
pub fn scan_nearest(uv: FieldPoint, t: f64) -> Nearest {
    scan_nearest_within(uv, t, 1)
}

/// Closest animated cell to a screen position.
pub fn find_closest(mapper: &CoordinateMapper, screen: ScreenPoint, t: f64) -> CellSample {
    let uv = finite_query(mapper.to_field(screen));
    let nearest = scan_nearest(uv, t);
    let lattice = nearest.lattice();
    let center = cell_center(nearest.base, (nearest.offset.i, nearest.offset.j), t);
    CellSample {
        lattice,
        center,
        screen: mapper.to_screen(center),
        distance_squared: nearest.distance_squared,
        hash: stable_hash(lattice),
    }
}

/// Smooth minimum with blend width `t`.
///
/// `c = clamp(0.5 + (a-b)/t, 0, 1)`, result `(1-c)(a - t c/2) + c b`.
/// `t == 0` is the hard minimum.
pub fn smin(a: f64, b: f64, t: f64) -> f64 {
    if t == 0.0 {
        return a.min(b);
    }
    let c = (0.5 + (a - b) / t).clamp(0.0, 1.0);
    (1.0 - c) * (a - 0.5 * t * c) + c * b
}

/// Everything the fragment shader's `voronoi()` returns for one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoronoiSample {
    pub nearest: Nearest,
    /// Smooth distance to the boundary of the nearest cell.
    pub interior_distance: f64,
}

/// Nearest cell plus interior distance at field point `uv`.
///
/// `smooth` is the smooth-minimum width; its sign is ignored. Values below
/// about 0.01 make the blend numerically hard.
pub fn voronoi(uv: FieldPoint, t: f64, smooth: f64) -> VoronoiSample {
    let uv = finite_query(uv);
    let nearest = scan_nearest(uv, t);
    let local = uv - nearest.base.origin();
    let width = smooth.abs();

    let mut midst = INTERIOR_SENTINEL;
    for dx in -2..=2 {
        for dy in -2..=2 {
            let offset = nearest.offset.offset(dx, dy);
            let dir = local_center(nearest.base, offset, t) - local;
            if (nearest.dir - dir).length_squared() <= DEGENERATE_EPSILON {
                continue;
            }
            let idst = ((nearest.dir + dir) * 0.5).dot((dir - nearest.dir).normalize());
            midst = smin(midst, idst, width);
        }
    }

    VoronoiSample {
        nearest,
        interior_distance: midst,
    }
}

pub fn interior_distance(uv: FieldPoint, t: f64, smooth: f64) -> f64 {
    voronoi(uv, t, smooth).interior_distance
}
