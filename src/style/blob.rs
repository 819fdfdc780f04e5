//! CPU variant: cell polygons drawn as softened blobs, with dots and labels.
//!
//! Polygon construction is delegated to `voronoice`; this module only feeds
//! it the animated cell centers and styles the result.

use voronoice::{BoundingBox, ClipBehavior, Point, VoronoiBuilder};

use super::overlay::{dots, overlay_cells, side_labels, size_factors, DotMark, TextMark};
use super::FrameContext;
use crate::error::Result;
use crate::field::LatticeCoord;
use crate::mapper::{CoordinateMapper, ScreenPoint};
use crate::params::{RenderMode, RenderParameters, Rgb};
use crate::search::{interior_distance, CellSample};

/// Pixels each outline vertex moves toward its site per unit of `Smin`.
const SOFTEN_PER_SMOOTH: f64 = 3.0 * 0.15;
/// Radial frequency of the contour shading, per pixel.
const CONTOUR_FREQUENCY: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct BlobCell {
    pub lattice: LatticeCoord,
    pub site: ScreenPoint,
    /// Closed outline, clockwise or counter-clockwise as produced.
    pub outline: Vec<ScreenPoint>,
    /// Area of the cell before softening, in square pixels.
    pub area: f64,
    pub fill: Rgb,
    pub stroke: Option<Rgb>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlobFrame {
    pub cells: Vec<BlobCell>,
    pub dots: Vec<DotMark>,
    pub labels: Vec<TextMark>,
}

pub fn render(ctx: &FrameContext<'_>) -> Result<BlobFrame> {
    let params = ctx.params;
    let mapper = CoordinateMapper::new(ctx.width, ctx.height, params.scale)?;
    let t = params.time_at(ctx.frame);

    let samples: Vec<CellSample> = overlay_cells(&mapper, params, t)
        .into_iter()
        .filter(|c| on_screen(c.screen, ctx.width, ctx.height))
        .collect();
    let sites: Vec<ScreenPoint> = samples.iter().map(|c| c.screen).collect();

    let outlines = cell_outlines(&sites, ctx.width, ctx.height).unwrap_or_else(|| {
        log::warn!("no cell polygons for {} sites", sites.len());
        vec![Vec::new(); sites.len()]
    });

    let areas: Vec<f64> = outlines.iter().map(|o| polygon_area(o)).collect();
    let factors = size_factors(&areas);

    let cells = samples
        .iter()
        .zip(outlines)
        .zip(&areas)
        .map(|((sample, outline), &area)| BlobCell {
            lattice: sample.lattice,
            site: sample.screen,
            outline: soften(&outline, sample.screen, params.smooth.abs() * SOFTEN_PER_SMOOTH),
            area,
            fill: fill_for(params, sample, &mapper, t),
            stroke: params.edge.then_some(params.edge_color),
        })
        .collect();

    let (dots, labels) = if params.point {
        (
            dots(&samples, &factors, params),
            side_labels(&samples, &factors, params),
        )
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(BlobFrame {
        cells,
        dots,
        labels,
    })
}

fn on_screen(p: ScreenPoint, width: f64, height: f64) -> bool {
    (0.0..=width).contains(&p.x) && (0.0..=height).contains(&p.y)
}

/// Voronoi cells of `sites` clipped to the canvas, in site order.
/// `None` when the sites do not triangulate (fewer than three, collinear).
pub fn cell_outlines(sites: &[ScreenPoint], width: f64, height: f64) -> Option<Vec<Vec<ScreenPoint>>> {
    let diagram = VoronoiBuilder::default()
        .set_sites(sites.iter().map(|s| Point { x: s.x, y: s.y }).collect())
        .set_bounding_box(BoundingBox::new(
            Point {
                x: width * 0.5,
                y: height * 0.5,
            },
            width,
            height,
        ))
        .set_clip_behavior(ClipBehavior::Clip)
        .build()?;

    if diagram.sites().len() != sites.len() {
        return None;
    }
    Some(
        (0..sites.len())
            .map(|i| {
                diagram
                    .cell(i)
                    .iter_vertices()
                    .map(|p| ScreenPoint::new(p.x, p.y))
                    .collect()
            })
            .collect(),
    )
}

/// Shoelace area of a closed outline; zero for anything under three vertices.
pub fn polygon_area(outline: &[ScreenPoint]) -> f64 {
    if outline.len() < 3 {
        return 0.0;
    }
    let twice: f64 = outline
        .iter()
        .zip(outline.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum();
    twice.abs() * 0.5
}

/// Pulls every vertex `amount` pixels toward `site`.
pub fn soften(outline: &[ScreenPoint], site: ScreenPoint, amount: f64) -> Vec<ScreenPoint> {
    if outline.len() < 3 {
        return outline.to_vec();
    }
    outline
        .iter()
        .map(|&p| {
            let (dx, dy) = (site.x - p.x, site.y - p.y);
            let len = (dx * dx + dy * dy).sqrt();
            if len > 0.0 {
                ScreenPoint::new(p.x + dx / len * amount, p.y + dy / len * amount)
            } else {
                p
            }
        })
        .collect()
}

fn fill_for(params: &RenderParameters, cell: &CellSample, mapper: &CoordinateMapper, t: f64) -> Rgb {
    let from_center = cell.screen.distance_to(mapper.center());
    if params.contour {
        return Rgb::gray(0.5 + 0.5 * (from_center * CONTOUR_FREQUENCY).cos());
    }
    match params.mode {
        RenderMode::Fill => params.fill_color,
        RenderMode::Grayscale => Rgb::gray(cell.hash),
        RenderMode::Colorful => {
            let (h0, h1) = cell.lattice.hash2();
            Rgb::new(h0 as f32, h1 as f32, ((h0 + h1) * 0.5) as f32)
        }
        RenderMode::Distances => {
            Rgb::gray(from_center / (mapper.width().min(mapper.height()) * 0.5))
        }
        RenderMode::InteriorDistances => {
            Rgb::gray(interior_distance(cell.center, t, params.smooth_coefficient()))
        }
    }
}
