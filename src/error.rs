use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the canvas, the rasterizer and the paint controller
#[derive(Debug, Error)]
pub enum PaintError {
    /// Canvas created with a zero-sized side
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    /// Pixel read outside the canvas
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },

    /// Snapshot restored onto a canvas of a different size
    #[error("Snapshot is {found:?} but canvas is {expected:?}")]
    DimensionMismatch {
        expected: [usize; 2],
        found: [usize; 2],
    },

    #[error("No tool at index {0}")]
    UnknownTool(usize),

    #[error("No palette color at index {0}")]
    UnknownPaletteIndex(usize),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors that can occur while writing the canvas to disk
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Export requested before any canvas exists
    #[error("No canvas to export")]
    NoCanvas,
}

/// Errors that can occur while loading the paint configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type PaintResult<T> = Result<T, PaintError>;
