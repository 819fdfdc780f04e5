//! Render configuration and JSON presets.
//!
//! Field names serialize in the PascalCase the parameter panel uses
//! (`Mode`, `FillColor`, `Smin`, ...), so stored panel presets load as-is.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::label::LabelTable;
use crate::region::DEFAULT_DISK_RADIUS;

/// Smallest smooth-minimum width handed to the field math.
pub const MIN_SMOOTH: f64 = 0.01;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderMode {
    #[default]
    Fill,
    Distances,
    #[serde(alias = "Interior_Distances")]
    InteriorDistances,
    Grayscale,
    Colorful,
}

impl RenderMode {
    pub const ALL: [RenderMode; 5] = [
        RenderMode::Fill,
        RenderMode::Distances,
        RenderMode::InteriorDistances,
        RenderMode::Grayscale,
        RenderMode::Colorful,
    ];

    /// Name of the boolean shader uniform selecting this mode.
    pub fn uniform_name(self) -> &'static str {
        match self {
            RenderMode::Fill => "Fill",
            RenderMode::Distances => "Distances",
            RenderMode::InteriorDistances => "InteriorDistances",
            RenderMode::Grayscale => "Grayscale",
            RenderMode::Colorful => "Colorful",
        }
    }
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Interior_Distances" => Ok(RenderMode::InteriorDistances),
            _ => RenderMode::ALL
                .into_iter()
                .find(|m| m.uniform_name() == s)
                .ok_or_else(|| Error::UnknownMode(s.to_owned())),
        }
    }
}

/// Linear RGB, each channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn gray(level: f64) -> Self {
        let l = level.clamp(0.0, 1.0) as f32;
        Self::new(l, l, l)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// `rgb(r, g, b)` with 0-255 channels, for 2D canvas styles.
    pub fn to_css(self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("rgb({}, {}, {})", c(self.r), c(self.g), c(self.b))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct RenderParameters {
    pub mode: RenderMode,
    pub fill_color: Rgb,
    pub contour: bool,
    pub edge: bool,
    pub edge_color: Rgb,
    pub point: bool,
    pub point_color: Rgb,
    /// Animation clock advance per frame.
    pub speed: f64,
    /// Lattice cells per screen height.
    pub scale: f64,
    #[serde(rename = "Smin")]
    pub smooth: f64,
    pub dot_size: f64,
    pub text_size: f64,
    /// Text drawn next to each overlay cell.
    pub label: String,
    pub overlay_cells: usize,
    pub region_radius: f64,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            mode: RenderMode::Fill,
            fill_color: Rgb::WHITE,
            contour: false,
            edge: true,
            edge_color: Rgb::from_u8(121, 76, 212),
            point: true,
            point_color: Rgb::BLACK,
            speed: 0.027,
            scale: 7.7,
            smooth: 1.0,
            dot_size: 6.0,
            text_size: 24.0,
            label: "cciD".to_owned(),
            overlay_cells: 30,
            region_radius: DEFAULT_DISK_RADIUS,
        }
    }
}

impl RenderParameters {
    /// `|Smin|`, clamped away from zero.
    pub fn smooth_coefficient(&self) -> f64 {
        let s = self.smooth.abs();
        if s.is_finite() {
            s.max(MIN_SMOOTH)
        } else {
            MIN_SMOOTH
        }
    }

    /// Animation clock for a frame number.
    pub fn time_at(&self, frame: u64) -> f64 {
        frame as f64 * self.speed
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(invalid("Scale", format!("must be positive, got {}", self.scale)));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(invalid("Speed", format!("must be non-negative, got {}", self.speed)));
        }
        if !self.smooth.is_finite() {
            return Err(invalid("Smin", format!("must be finite, got {}", self.smooth)));
        }
        if !self.dot_size.is_finite() || self.dot_size <= 0.0 {
            return Err(invalid("DotSize", format!("must be positive, got {}", self.dot_size)));
        }
        if !self.text_size.is_finite() || self.text_size <= 0.0 {
            return Err(invalid("TextSize", format!("must be positive, got {}", self.text_size)));
        }
        if !self.region_radius.is_finite() || self.region_radius < 0.0 {
            return Err(invalid(
                "RegionRadius",
                format!("must be non-negative, got {}", self.region_radius),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Settings of the pixel-mosaic style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MosaicConfig {
    pub speed: f64,
    pub scale: f64,
    pub palette: [Rgb; 4],
    /// Tile edge lengths in pixels. The smallest one tiles the whole canvas.
    pub grid_sizes: Vec<u32>,
    pub section_duration_ms: f64,
    pub labels: LabelTable,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            speed: 0.06,
            scale: 6.0,
            palette: [
                Rgb::from_u8(0xA7, 0x6F, 0xFF),
                Rgb::from_u8(0xF6, 0xFF, 0x43),
                Rgb::from_u8(0x4E, 0xFF, 0x66),
                Rgb::from_u8(0x33, 0xFF, 0xEC),
            ],
            grid_sizes: vec![80, 40, 20],
            section_duration_ms: 3000.0,
            labels: LabelTable::default(),
        }
    }
}

impl MosaicConfig {
    /// Single tile size, single label section: the plain mosaic.
    pub fn uniform(tile: u32, glyphs: &[&str]) -> Self {
        Self {
            grid_sizes: vec![tile],
            labels: LabelTable::single(glyphs),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_sizes.is_empty() || self.grid_sizes.contains(&0) {
            return Err(invalid("GridSizes", "needs at least one non-zero size".to_owned()));
        }
        let min = self.grid_sizes.iter().copied().min().unwrap_or(1);
        if let Some(size) = self.grid_sizes.iter().find(|&&s| s % min != 0) {
            return Err(invalid(
                "GridSizes",
                format!("{} is not a multiple of the smallest size {}", size, min),
            ));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(invalid("Scale", format!("must be positive, got {}", self.scale)));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(invalid("Speed", format!("must be non-negative, got {}", self.speed)));
        }
        if !self.section_duration_ms.is_finite() || self.section_duration_ms <= 0.0 {
            return Err(invalid(
                "SectionDurationMs",
                format!("must be positive, got {}", self.section_duration_ms),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> Error {
    Error::InvalidParameter { name, reason }
}
