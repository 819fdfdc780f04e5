//! Per-canvas animation state driven by the host's frame callback.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::{MosaicConfig, RenderParameters};
use crate::recorder::{FrameRecorder, DEFAULT_PREFIX};
use crate::style::{FrameContext, FrameOutput, RenderStyle, StyleKind};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SessionConfig {
    pub style: StyleKind,
    pub params: RenderParameters,
    pub mosaic: MosaicConfig,
    /// File name prefix for recorded frames; the style name when unset.
    pub record_prefix: Option<String>,
}

/// One rendered frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub index: u64,
    /// Animation clock the frame was rendered at.
    pub time: f64,
    pub output: FrameOutput,
    /// File name to save this frame under, while recording.
    pub export: Option<String>,
}

#[derive(Debug)]
pub struct VoronoiSession {
    config: SessionConfig,
    style: RenderStyle,
    recorder: FrameRecorder,
    width: f64,
    height: f64,
    frame: u64,
}

impl VoronoiSession {
    pub fn init(config: SessionConfig, width: f64, height: f64) -> Result<Self> {
        config.params.validate()?;
        check_size(width, height)?;
        let style = RenderStyle::new(config.style, &config.mosaic)?;
        let prefix = config
            .record_prefix
            .clone()
            .unwrap_or_else(|| prefix_for(config.style));
        log::info!("{} session {}x{}", config.style, width, height);
        Ok(Self {
            config,
            style,
            recorder: FrameRecorder::new(prefix),
            width,
            height,
            frame: 0,
        })
    }

    pub fn params(&self) -> &RenderParameters {
        &self.config.params
    }

    /// For UI changes between frames.
    pub fn params_mut(&mut self) -> &mut RenderParameters {
        &mut self.config.params
    }

    pub fn style(&self) -> StyleKind {
        self.style.kind()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn recorder(&self) -> &FrameRecorder {
        &self.recorder
    }

    pub fn set_style(&mut self, kind: StyleKind) -> Result<()> {
        if kind == self.style.kind() {
            return Ok(());
        }
        self.style = RenderStyle::new(kind, &self.config.mosaic)?;
        self.config.style = kind;
        if self.config.record_prefix.is_none() {
            self.recorder = FrameRecorder::new(prefix_for(kind));
        }
        log::info!("style -> {}", kind);
        Ok(())
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        check_size(width, height)?;
        self.width = width;
        self.height = height;
        log::info!("resize {}x{}", width, height);
        Ok(())
    }

    /// Key presses the session reacts to: `r` toggles recording.
    /// Returns true if the key was used.
    pub fn handle_key(&mut self, key: &str) -> bool {
        match key {
            "r" | "R" => {
                self.recorder.toggle();
                true
            }
            _ => false,
        }
    }

    /// Advances one frame and renders it.
    pub fn tick(&mut self, now_ms: f64) -> Result<Frame> {
        self.config.params.validate()?;
        self.frame += 1;
        let ctx = FrameContext {
            width: self.width,
            height: self.height,
            frame: self.frame,
            now_ms,
            params: &self.config.params,
        };
        let time = match &self.style {
            RenderStyle::Mosaic(style) => self.frame as f64 * style.config().speed,
            _ => self.config.params.time_at(self.frame),
        };
        let output = self.style.render(&ctx)?;
        Ok(Frame {
            index: self.frame,
            time,
            output,
            export: self.recorder.next_file_name(),
        })
    }
}

fn prefix_for(kind: StyleKind) -> String {
    match kind {
        StyleKind::Shader => DEFAULT_PREFIX.to_owned(),
        other => other.to_string(),
    }
}

fn check_size(width: f64, height: f64) -> Result<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidScreen { width, height })
    }
}
