use thiserror::Error;

/// Errors raised while configuring or hosting the field renderer.
///
/// The field math itself is infallible; only geometry, configuration and
/// shader compilation report errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid screen size {width}x{height}")]
    InvalidScreen { width: f64, height: f64 },

    #[error("invalid field scale {0}")]
    InvalidScale(f64),

    #[error("grid step must be positive, got {0}")]
    InvalidGridStep(f64),

    #[error("invalid render parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("unknown render mode `{0}`")]
    UnknownMode(String),

    #[error("unknown render style `{0}`")]
    UnknownStyle(String),

    #[error("preset: {0}")]
    Preset(#[from] serde_json::Error),

    #[error("shader: {0}")]
    Shader(String),
}

pub type Result<T> = std::result::Result<T, Error>;
