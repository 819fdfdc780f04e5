//! Render styles. One field, three ways to put it on screen.

pub mod blob;
pub mod mosaic;
pub mod overlay;
pub mod shader;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::{MosaicConfig, RenderParameters};

use self::blob::BlobFrame;
use self::mosaic::{MosaicFrame, MosaicStyle};
use self::shader::ShaderFrame;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    /// Fragment shader with label overlay.
    #[default]
    Shader,
    /// CPU polygons drawn as soft blobs.
    Blob,
    /// Multi-resolution colored tiles with glyphs.
    Mosaic,
}

impl FromStr for StyleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shader" => Ok(StyleKind::Shader),
            "blob" => Ok(StyleKind::Blob),
            "mosaic" => Ok(StyleKind::Mosaic),
            _ => Err(Error::UnknownStyle(s.to_owned())),
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StyleKind::Shader => "shader",
            StyleKind::Blob => "blob",
            StyleKind::Mosaic => "mosaic",
        })
    }
}

/// Inputs of one frame, shared by all styles.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'a> {
    pub width: f64,
    pub height: f64,
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Host timestamp in milliseconds.
    pub now_ms: f64,
    pub params: &'a RenderParameters,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutput {
    Shader(ShaderFrame),
    Blob(BlobFrame),
    Mosaic(MosaicFrame),
}

/// The active style and whatever state it carries between frames.
#[derive(Clone, Debug)]
pub enum RenderStyle {
    Shader,
    Blob,
    Mosaic(MosaicStyle),
}

impl RenderStyle {
    pub fn new(kind: StyleKind, mosaic: &MosaicConfig) -> Result<Self> {
        Ok(match kind {
            StyleKind::Shader => RenderStyle::Shader,
            StyleKind::Blob => RenderStyle::Blob,
            StyleKind::Mosaic => RenderStyle::Mosaic(MosaicStyle::new(mosaic.clone())?),
        })
    }

    pub fn kind(&self) -> StyleKind {
        match self {
            RenderStyle::Shader => StyleKind::Shader,
            RenderStyle::Blob => StyleKind::Blob,
            RenderStyle::Mosaic(_) => StyleKind::Mosaic,
        }
    }

    pub fn render(&mut self, ctx: &FrameContext<'_>) -> Result<FrameOutput> {
        match self {
            RenderStyle::Shader => shader::render(ctx).map(FrameOutput::Shader),
            RenderStyle::Blob => blob::render(ctx).map(FrameOutput::Blob),
            RenderStyle::Mosaic(style) => style.render(ctx).map(FrameOutput::Mosaic),
        }
    }
}
