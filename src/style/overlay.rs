//! Text and dot marks placed on cell centers.

use crate::mapper::{CoordinateMapper, ScreenPoint};
use crate::params::{RenderParameters, Rgb};
use crate::region::{enumerate_disk, nearest_to};
use crate::search::CellSample;

/// Gap between a cell point and its label, in pixels.
const LABEL_GAP: f64 = 5.0;
/// Baseline drop for labels aligned on their baseline, as a share of text size.
const BASELINE_DROP: f64 = 0.35;
/// Gap between a scaled dot's rim and its label.
const SIDE_GAP: f64 = 3.0;
const TEXT_MIN_RATIO: f64 = 0.8;
const TEXT_MAX_RATIO: f64 = 1.6;

pub const MIN_SIZE_FACTOR: f64 = 0.5;
pub const MAX_SIZE_FACTOR: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    LeftBaseline,
    LeftMiddle,
    Center,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextMark {
    pub anchor: ScreenPoint,
    pub text: String,
    pub size: f64,
    pub color: Rgb,
    pub align: TextAlign,
    /// Draw with the system emoji font instead of the label font.
    pub emoji: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotMark {
    pub center: ScreenPoint,
    pub diameter: f64,
    pub color: Rgb,
}

/// Cells of the parameter disk nearest the screen center, nearest first.
pub fn overlay_cells(mapper: &CoordinateMapper, params: &RenderParameters, t: f64) -> Vec<CellSample> {
    let cells = enumerate_disk(mapper, params.region_radius, t);
    nearest_to(cells, mapper.center(), params.overlay_cells)
}

/// Labels right of each point, sitting on a baseline just below it.
pub fn baseline_labels(cells: &[CellSample], params: &RenderParameters) -> Vec<TextMark> {
    cells
        .iter()
        .map(|cell| TextMark {
            anchor: ScreenPoint::new(
                cell.screen.x + LABEL_GAP,
                cell.screen.y + params.text_size * BASELINE_DROP,
            ),
            text: params.label.clone(),
            size: params.text_size,
            color: Rgb::BLACK,
            align: TextAlign::LeftBaseline,
            emoji: false,
        })
        .collect()
}

/// Relative size of a cell's marks from its polygon area: `sqrt(area / mean)`
/// clamped to `[MIN_SIZE_FACTOR, MAX_SIZE_FACTOR]`. Cells without an area
/// count as average.
pub fn size_factors(areas: &[f64]) -> Vec<f64> {
    let mean = areas.iter().filter(|a| a.is_finite()).sum::<f64>() / areas.len() as f64;
    if !mean.is_finite() || mean <= 0.0 {
        return vec![1.0; areas.len()];
    }
    areas
        .iter()
        .map(|&area| {
            let area = if area.is_finite() && area > 0.0 { area } else { mean };
            (area / mean).sqrt().clamp(MIN_SIZE_FACTOR, MAX_SIZE_FACTOR)
        })
        .collect()
}

/// Dots scaled by each cell's size factor.
pub fn dots(cells: &[CellSample], factors: &[f64], params: &RenderParameters) -> Vec<DotMark> {
    cells
        .iter()
        .zip(factors)
        .map(|(cell, factor)| DotMark {
            center: cell.screen,
            diameter: params.dot_size * factor,
            color: params.point_color,
        })
        .collect()
}

/// Labels right of each scaled dot, vertically centred on it. Text grows
/// with the dot, within `[0.8, 1.6]` of `TextSize`.
pub fn side_labels(cells: &[CellSample], factors: &[f64], params: &RenderParameters) -> Vec<TextMark> {
    cells
        .iter()
        .zip(factors)
        .map(|(cell, factor)| {
            let radius = params.dot_size * factor * 0.5;
            TextMark {
                anchor: ScreenPoint::new(cell.screen.x + radius + SIDE_GAP, cell.screen.y),
                text: params.label.clone(),
                size: (params.text_size * factor)
                    .clamp(params.text_size * TEXT_MIN_RATIO, params.text_size * TEXT_MAX_RATIO),
                color: Rgb::BLACK,
                align: TextAlign::LeftMiddle,
                emoji: false,
            }
        })
        .collect()
}
