#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod input;
pub mod palette;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod tools;
pub mod util;

pub use app::PaintApp;
pub use canvas::{PixelCanvas, PixelPos, Snapshot};
pub use config::PaintConfig;
pub use controller::{FrameSink, PaintCommand, PaintController, PaintEvent};
pub use error::{ExportError, PaintError};
pub use raster::FillOutcome;
pub use renderer::TextureSink;
pub use tools::{Tool, ToolKind};
