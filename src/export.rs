use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use image::error::{ImageError, ParameterError, ParameterErrorKind};
use image::{ImageFormat, RgbaImage};

use crate::canvas::Snapshot;
use crate::error::ExportError;

pub const EXPORT_PREFIX: &str = "PaintDrawing";

/// `PaintDrawing_<YYYYMMDD_HHmmss>.png`
pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("{}_{}.png", EXPORT_PREFIX, now.format("%Y%m%d_%H%M%S"))
}

/// Encode a snapshot as an RGBA PNG
pub fn encode_png(snapshot: &Snapshot) -> Result<Vec<u8>, ExportError> {
    let width = u32::try_from(snapshot.width()).map_err(|_| dimension_error())?;
    let height = u32::try_from(snapshot.height()).map_err(|_| dimension_error())?;
    let image = RgbaImage::from_raw(width, height, snapshot.to_rgba8()).ok_or_else(dimension_error)?;

    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

fn dimension_error() -> ExportError {
    ExportError::Encode(ImageError::Parameter(ParameterError::from_kind(
        ParameterErrorKind::DimensionMismatch,
    )))
}

/// Write `snapshot` to `<dir>/PaintDrawing_<timestamp>.png` and return the path.
///
/// Takes an immutable snapshot, so the live canvas can keep changing.
pub fn export_png(snapshot: &Snapshot, dir: &Path, now: DateTime<Local>) -> Result<PathBuf, ExportError> {
    let bytes = encode_png(snapshot)?;
    let path = dir.join(export_file_name(now));

    fs::create_dir_all(dir).map_err(|source| ExportError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    fs::write(&path, bytes).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;

    log::info!("Image saved to {}", path.display());
    Ok(path)
}
