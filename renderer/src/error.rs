//! Error types for the terrain renderer
//!
//! Everything that can go wrong is caught when a component is built.
//! Once a `HeightField`, `FrameBuffer` or `ColumnRaycaster` exists, sampling
//! and rendering always succeed.

use core::fmt;

/// Renderer error type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderError {
    /// Framebuffer with a zero dimension
    EmptyFrameBuffer { width: usize, height: usize },
    /// Heightfield with a zero dimension
    EmptyHeightField { width: usize, height: usize },
    /// Cell data does not match the declared dimensions
    DataLength { expected: usize, actual: usize },
    /// Rejected configuration value
    InvalidConfig(&'static str),
    /// No terrain has been attached yet
    TerrainNotReady,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFrameBuffer { width, height } => {
                write!(f, "framebuffer must not be empty (got {}x{})", width, height)
            }
            Self::EmptyHeightField { width, height } => {
                write!(f, "heightfield must not be empty (got {}x{})", width, height)
            }
            Self::DataLength { expected, actual } => {
                write!(f, "heightfield data length mismatch: expected {} bytes, got {}", expected, actual)
            }
            Self::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
            Self::TerrainNotReady => write!(f, "terrain data is not loaded"),
        }
    }
}

impl core::error::Error for RenderError {}

/// Result type for renderer operations
pub type RenderResult<T> = Result<T, RenderError>;
