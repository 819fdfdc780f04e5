//! Jittered-grid point field.
//!
//! Every lattice cell `(i, j)` owns one representative point that wanders
//! inside the cell over time. The hashes and the jitter formula here are the
//! single source of truth for both the CPU path and the GLSL program built in
//! [`crate::style::shader`], so overlay marks land on the points the GPU draws.

use std::f64::consts::TAU;
use std::ops::{Add, Div, Mul, Sub};

/// Weights of the dot product fed to `sin` in [`hash1`].
pub const HASH_DOT: (f64, f64) = (1234.5678, 567.8901);
/// Gain applied to the sine before taking the fractional part.
pub const HASH_GAIN: f64 = 12345.67;
/// Rest position of a cell point, in cell units.
pub const JITTER_CENTER: f64 = 0.5;
/// Swing of a cell point around its rest position. Keeps points inside
/// `[0.01, 0.99]` of the unit cell.
pub const JITTER_AMPLITUDE: f64 = 0.49;

// Largest f64 strictly below 1.0.
const ONE_BELOW: f64 = 1.0 - f64::EPSILON / 2.0;

/// Integer id of one unit cell of the lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LatticeCoord {
    pub i: i32,
    pub j: i32,
}

impl LatticeCoord {
    pub const fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }

    /// Cell containing `p`, i.e. `floor(p)`. Non-finite components land in
    /// cell 0 on that axis.
    pub fn containing(p: FieldPoint) -> Self {
        Self {
            i: floor_to_cell(p.u),
            j: floor_to_cell(p.v),
        }
    }

    pub const fn offset(self, di: i32, dj: i32) -> Self {
        Self {
            i: self.i.wrapping_add(di),
            j: self.j.wrapping_add(dj),
        }
    }

    /// Lower-left corner of the cell in field space.
    pub fn origin(self) -> FieldPoint {
        FieldPoint::new(self.i as f64, self.j as f64)
    }

    pub fn hash1(self) -> f64 {
        hash1(self.i as f64, self.j as f64)
    }

    pub fn hash2(self) -> (f64, f64) {
        hash2(self.i as f64, self.j as f64)
    }

    pub fn hash3(self) -> (f64, f64, f64) {
        hash3(self.i as f64, self.j as f64)
    }
}

impl From<(i32, i32)> for LatticeCoord {
    fn from((i, j): (i32, i32)) -> Self {
        Self::new(i, j)
    }
}

fn floor_to_cell(x: f64) -> i32 {
    // `as` saturates and maps NaN to 0.
    x.floor() as i32
}

/// A position in field (UV) space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldPoint {
    pub u: f64,
    pub v: f64,
}

impl FieldPoint {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.u * other.u + self.v * other.v
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector along `self`. Zero-length input yields NaN components, as
    /// GLSL `normalize` does; callers filter degenerate vectors first.
    pub fn normalize(self) -> Self {
        self / self.length()
    }

    pub fn is_finite(self) -> bool {
        self.u.is_finite() && self.v.is_finite()
    }
}

impl Add for FieldPoint {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.u + rhs.u, self.v + rhs.v)
    }
}

impl Sub for FieldPoint {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.u - rhs.u, self.v - rhs.v)
    }
}

impl Mul<f64> for FieldPoint {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.u * rhs, self.v * rhs)
    }
}

impl Div<f64> for FieldPoint {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self::new(self.u / rhs, self.v / rhs)
    }
}

/// `x - floor(x)`, kept strictly below 1.
///
/// For tiny negative `x` the subtraction rounds up to exactly 1.0.
pub fn fract(x: f64) -> f64 {
    (x - x.floor()).min(ONE_BELOW)
}

/// Scalar hash in `[0, 1)`: `fract(sin(u*1234.5678 + v*567.8901) * 12345.67)`.
///
/// Non-finite input propagates to non-finite output.
pub fn hash1(u: f64, v: f64) -> f64 {
    fract((u * HASH_DOT.0 + v * HASH_DOT.1).sin() * HASH_GAIN)
}

/// Two chained hashes, each in `[0, 1)`.
pub fn hash2(u: f64, v: f64) -> (f64, f64) {
    let x = hash1(u, v);
    (x, hash1(u + x, v + x))
}

/// Three chained hashes; the shader's `Colorful` mode paints with these.
pub fn hash3(u: f64, v: f64) -> (f64, f64, f64) {
    let (x, y) = hash2(u, v);
    (x, y, hash1(u + x, v + y))
}

/// Animated coordinate of one axis for hash `h` at clock `t`.
pub fn jitter(h: f64, t: f64) -> f64 {
    JITTER_CENTER + JITTER_AMPLITUDE * (t + h * TAU).sin()
}

/// Position of `cell`'s point inside its own unit cell at time `t`.
pub fn animated_offset(cell: LatticeCoord, t: f64) -> FieldPoint {
    let (hx, hy) = cell.hash2();
    FieldPoint::new(jitter(hx, t), jitter(hy, t))
}

/// Field-space center of the cell at `base + (di, dj)` at time `t`.
pub fn cell_center(base: LatticeCoord, (di, dj): (i32, i32), t: f64) -> FieldPoint {
    let cell = base.offset(di, dj);
    cell.origin() + animated_offset(cell, t)
}

/// `hash1` of the cell, or a position-derived value in `[0, 1)` if the hash
/// came out non-finite, so every cell resolves to a usable value.
pub fn stable_hash(cell: LatticeCoord) -> f64 {
    let h = cell.hash1();
    if h.is_finite() {
        h
    } else {
        log::debug!("non-finite hash for {:?}, using positional fallback", cell);
        (cell.i as f64 * 0.1 + cell.j as f64 * 0.1).rem_euclid(1.0)
    }
}
