//! Enumerating the cells visible in a region.
//!
//! Two strategies:
//! - [`enumerate_disk`] walks lattice ids directly and is exact, but only for
//!   a disk centred on the screen.
//! - [`enumerate_grid`] samples a pixel rectangle every `step` pixels and
//!   keeps each cell found. Cells whose area falls between samples are
//!   missed; that is the price of handling arbitrary rectangles cheaply.
//!
//! Both return each [`LatticeCoord`] at most once.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::field::{FieldPoint, LatticeCoord};
use crate::mapper::{CoordinateMapper, ScreenPoint};
use crate::search::{find_closest, CellSample};

/// Disk radius (in normalized, pre-scale units) the shader variant shows.
pub const DEFAULT_DISK_RADIUS: f64 = 0.35;
const DISK_MARGIN: i32 = 2;

/// Axis-aligned pixel rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn screen(mapper: &CoordinateMapper) -> Self {
        Self::new(0.0, 0.0, mapper.width(), mapper.height())
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Region {
    /// Disk centred on the screen, radius in normalized units.
    Disk { radius: f64 },
    /// Rectangle sampled every `step` pixels.
    Grid { rect: PixelRect, step: f64 },
}

impl Region {
    /// Screen position the region is centred on.
    pub fn center(&self, mapper: &CoordinateMapper) -> ScreenPoint {
        match self {
            Region::Disk { .. } => mapper.center(),
            Region::Grid { rect, .. } => rect.center(),
        }
    }
}

pub fn enumerate_cells(mapper: &CoordinateMapper, region: Region, t: f64) -> Result<Vec<CellSample>> {
    match region {
        Region::Disk { radius } => Ok(enumerate_disk(mapper, radius, t)),
        Region::Grid { rect, step } => enumerate_grid(mapper, rect, step, t),
    }
}

/// Every cell whose animated center lies within `radius` (normalized units)
/// of the screen center.
pub fn enumerate_disk(mapper: &CoordinateMapper, radius: f64, t: f64) -> Vec<CellSample> {
    if !radius.is_finite() || radius < 0.0 {
        return Vec::new();
    }
    let range = (radius * mapper.scale().abs() * 2.0).ceil() as i32 + DISK_MARGIN;

    let mut cells = IndexMap::new();
    for i in -range..=range {
        for j in -range..=range {
            let lattice = LatticeCoord::new(i, j);
            let sample = CellSample::from_lattice(mapper, lattice, FieldPoint::ZERO, t);
            if mapper.to_normalized(sample.center).length() <= radius {
                cells.entry(lattice).or_insert(sample);
            }
        }
    }
    cells.into_values().collect()
}

/// Cells found by sampling the centers of `step`-sized tiles of `rect`.
/// The first sample to hit a cell is the one kept.
pub fn enumerate_grid(
    mapper: &CoordinateMapper,
    rect: PixelRect,
    step: f64,
    t: f64,
) -> Result<Vec<CellSample>> {
    if !step.is_finite() || step <= 0.0 {
        return Err(Error::InvalidGridStep(step));
    }
    let finite = [rect.x, rect.y, rect.width, rect.height].iter().all(|c| c.is_finite());
    if !finite || rect.width < 0.0 || rect.height < 0.0 {
        return Err(Error::InvalidParameter {
            name: "rect",
            reason: format!("{:?} is not a finite, non-negative rectangle", rect),
        });
    }
    // A step below the precision of the coordinates would never advance.
    if rect.x + step == rect.x || rect.y + step == rect.y {
        return Err(Error::InvalidGridStep(step));
    }

    let mut cells: IndexMap<LatticeCoord, CellSample> = IndexMap::new();
    let mut x = rect.x;
    while x < rect.x + rect.width {
        let mut y = rect.y;
        while y < rect.y + rect.height {
            let sample = find_closest(mapper, ScreenPoint::new(x + step * 0.5, y + step * 0.5), t);
            cells.entry(sample.lattice).or_insert(sample);
            y += step;
        }
        x += step;
    }
    Ok(cells.into_values().collect())
}

/// The `k` cells whose screen position is nearest `origin`, nearest first.
pub fn nearest_to(mut cells: Vec<CellSample>, origin: ScreenPoint, k: usize) -> Vec<CellSample> {
    cells.sort_by(|a, b| {
        a.screen
            .distance_to(origin)
            .total_cmp(&b.screen.distance_to(origin))
    });
    cells.truncate(k);
    cells
}
