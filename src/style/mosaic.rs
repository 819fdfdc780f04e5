//! Pixel-mosaic variant.
//!
//! The canvas is tiled at the smallest grid size, each tile coloured and
//! labelled by the cell nearest its center. Cells may instead claim a larger
//! tile size (picked from their hash); larger tiles are then laid over the
//! small ones they cover.

use std::collections::HashSet;

use super::overlay::{TextAlign, TextMark};
use super::FrameContext;
use crate::error::Result;
use crate::field::LatticeCoord;
use crate::label::{is_emoji, SectionClock};
use crate::mapper::{CoordinateMapper, ScreenPoint};
use crate::params::{MosaicConfig, Rgb};
use crate::search::find_closest;

/// Tiles at least this large prefer emoji labels.
const EMPHASIS_SIZE: u32 = 80;

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub x: f64,
    pub y: f64,
    pub size: u32,
    pub color: Rgb,
    pub label: TextMark,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MosaicFrame {
    /// Paint order: smaller tiles first.
    pub tiles: Vec<Tile>,
    pub section: usize,
}

#[derive(Clone, Debug)]
pub struct MosaicStyle {
    config: MosaicConfig,
    sections: SectionClock,
}

impl MosaicStyle {
    pub fn new(config: MosaicConfig) -> Result<Self> {
        config.validate()?;
        let sections = SectionClock::new(config.section_duration_ms, config.labels.len());
        Ok(Self { config, sections })
    }

    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    pub fn section(&self) -> usize {
        self.sections.current()
    }

    /// Tile size a cell claims: `grid_sizes[floor(hash * n)]`.
    pub fn tile_size_for(&self, cell: LatticeCoord) -> u32 {
        let sizes = &self.config.grid_sizes;
        let h = cell.hash1();
        let index = if h.is_finite() {
            ((h * sizes.len() as f64).floor() as usize).min(sizes.len() - 1)
        } else {
            0
        };
        sizes[index]
    }

    fn smallest(&self) -> u32 {
        self.config.grid_sizes.iter().copied().min().unwrap_or(1)
    }

    pub fn render(&mut self, ctx: &FrameContext<'_>) -> Result<MosaicFrame> {
        self.sections.advance(ctx.now_ms);
        let mapper = CoordinateMapper::new(ctx.width, ctx.height, self.config.scale)?;
        let t = ctx.frame as f64 * self.config.speed;
        let min = self.smallest();

        // Base layer: every position at the smallest size, no gaps.
        let mut tiles = Vec::new();
        for (x, y) in tile_origins(ctx.width, ctx.height, min) {
            let hash = find_closest(&mapper, tile_centre(x, y, min), t).hash;
            tiles.push(self.tile(x, y, min, hash));
        }

        // Larger sizes, biggest first; a cell only paints the size it claims.
        let mut larger: Vec<u32> = self.config.grid_sizes.iter().copied().filter(|&s| s != min).collect();
        larger.sort_unstable_by(|a, b| b.cmp(a));
        larger.dedup();

        let mut covered: HashSet<(u64, u64)> = HashSet::new();
        for size in larger {
            for (x, y) in tile_origins(ctx.width, ctx.height, size) {
                let sample = find_closest(&mapper, tile_centre(x, y, size), t);
                if self.tile_size_for(sample.lattice) != size {
                    continue;
                }
                let per_side = size / min;
                for ox in 0..per_side {
                    for oy in 0..per_side {
                        covered.insert(key(x + (ox * min) as f64, y + (oy * min) as f64));
                    }
                }
                tiles.push(self.tile(x, y, size, sample.hash));
            }
        }

        tiles.retain(|tile| tile.size != min || !covered.contains(&key(tile.x, tile.y)));
        tiles.sort_by_key(|tile| tile.size);

        Ok(MosaicFrame {
            tiles,
            section: self.sections.current(),
        })
    }

    fn tile(&self, x: f64, y: f64, size: u32, hash: f64) -> Tile {
        let color = self.config.palette[palette_index(hash)];
        let text = self
            .config
            .labels
            .resolve(hash, self.sections.current(), size >= EMPHASIS_SIZE);

        Tile {
            x,
            y,
            size,
            color,
            label: TextMark {
                anchor: tile_centre(x, y, size),
                text: text.to_owned(),
                size: label_size(size),
                color: Rgb::BLACK,
                align: TextAlign::Center,
                emoji: is_emoji(text),
            },
        }
    }
}

fn tile_origins(width: f64, height: f64, size: u32) -> impl Iterator<Item = (f64, f64)> {
    let step = size as f64;
    let cols = (width / step).ceil() as u64;
    let rows = (height / step).ceil() as u64;
    (0..cols).flat_map(move |c| (0..rows).map(move |r| (c as f64 * step, r as f64 * step)))
}

fn tile_centre(x: f64, y: f64, size: u32) -> ScreenPoint {
    let half = size as f64 * 0.5;
    ScreenPoint::new(x + half, y + half)
}

fn key(x: f64, y: f64) -> (u64, u64) {
    (x.round() as u64, y.round() as u64)
}

/// `floor(|hash| * 4) % 4`.
pub fn palette_index(hash: f64) -> usize {
    let h = if hash.is_finite() { hash.abs() } else { 0.5 };
    (h * 4.0).floor() as usize % 4
}

/// Label text size for a tile edge length.
pub fn label_size(tile: u32) -> f64 {
    let ratio = match tile {
        80.. => 0.65,
        40.. => 0.5,
        _ => 0.4,
    };
    (tile as f64 * ratio).clamp(8.0, 60.0)
}
