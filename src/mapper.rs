//! Screen pixels <-> field space.
//!
//! Forward: `u = (x/w - 0.5) * (w/h) * scale`, `v = (y/h - 0.5) * scale`.
//! The fragment shader applies the same transform to its (top-down) pixel
//! coordinate, so anything mapped back through [`CoordinateMapper::to_screen`]
//! lines up with what the GPU draws.

use crate::error::{Error, Result};
use crate::field::FieldPoint;

/// A position in screen pixels, origin top-left, y down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateMapper {
    width: f64,
    height: f64,
    scale: f64,
}

impl CoordinateMapper {
    pub fn new(width: f64, height: f64, scale: f64) -> Result<Self> {
        check_screen(width, height)?;
        check_scale(scale)?;
        Ok(Self {
            width,
            height,
            scale,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        check_screen(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn with_scale(self, scale: f64) -> Result<Self> {
        check_scale(scale)?;
        Ok(Self { scale, ..self })
    }

    /// Screen pixel -> field space.
    pub fn to_field(&self, p: ScreenPoint) -> FieldPoint {
        FieldPoint::new(
            (p.x / self.width - 0.5) * self.aspect_ratio() * self.scale,
            (p.y / self.height - 0.5) * self.scale,
        )
    }

    /// Field space -> screen pixel. Exact algebraic inverse of [`Self::to_field`].
    pub fn to_screen(&self, f: FieldPoint) -> ScreenPoint {
        ScreenPoint::new(
            (f.u / self.scale / self.aspect_ratio() + 0.5) * self.width,
            (f.v / self.scale + 0.5) * self.height,
        )
    }

    /// Aspect-corrected coordinates before scaling: the space in which the
    /// shader measures its centred disk.
    pub fn to_normalized(&self, f: FieldPoint) -> FieldPoint {
        f / self.scale
    }
}

fn check_screen(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidScreen { width, height })
    }
}

fn check_scale(scale: f64) -> Result<()> {
    if scale.is_finite() && scale != 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidScale(scale))
    }
}
