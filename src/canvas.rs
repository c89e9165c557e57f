use egui::{Color32, ColorImage, Pos2};

use crate::error::{PaintError, PaintResult};

/// Largest per-channel difference at which two colors still count as equal.
///
/// Matches a `< 0.01` threshold on unit-range channels.
pub const COLOR_TOLERANCE: u8 = 2;

/// Per-channel tolerant color comparison
pub fn colors_match(a: Color32, b: Color32) -> bool {
    a.to_array()
        .iter()
        .zip(b.to_array().iter())
        .all(|(ca, cb)| ca.abs_diff(*cb) <= COLOR_TOLERANCE)
}

/// Integer pixel coordinate on a canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<Pos2> for PixelPos {
    /// Truncates toward zero, the same way a pointer position is snapped to a cell.
    fn from(pos: Pos2) -> Self {
        Self::new(pos.x as i32, pos.y as i32)
    }
}

/// An independent copy of a canvas buffer.
///
/// Used as the pre-stroke backup and as the immutable input to export.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    width: usize,
    height: usize,
    pixels: Vec<Color32>,
}

impl Snapshot {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    /// Raw unmultiplied RGBA bytes, row-major
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| c.to_srgba_unmultiplied())
            .collect()
    }
}

/// Fixed-size RGBA pixel buffer that every tool draws into
#[derive(Debug, Clone, PartialEq)]
pub struct PixelCanvas {
    width: usize,
    height: usize,
    background: Color32,
    pixels: Vec<Color32>,
}

impl PixelCanvas {
    /// Allocate a canvas filled with `background`
    pub fn new(width: usize, height: usize, background: Color32) -> PaintResult<Self> {
        if width == 0 || height == 0 {
            return Err(PaintError::InvalidDimension { width, height });
        }
        log::debug!("Creating {}x{} canvas", width, height);
        Ok(Self {
            width,
            height,
            background,
            pixels: vec![background; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    /// The color the canvas was created with; also what the eraser paints
    pub fn background(&self) -> Color32 {
        self.background
    }

    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.contains(x, y)
            .then(|| y as usize * self.width + x as usize)
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> PaintResult<Color32> {
        self.index(x, y)
            .map(|i| self.pixels[i])
            .ok_or(PaintError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
    }

    /// Write one pixel. Coordinates outside the canvas are ignored, since
    /// brush stamps routinely reach past the edges.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }

    /// Replace the buffer with the contents of `snapshot`
    pub fn restore(&mut self, snapshot: &Snapshot) -> PaintResult<()> {
        if snapshot.size() != self.size() {
            return Err(PaintError::DimensionMismatch {
                expected: self.size(),
                found: snapshot.size(),
            });
        }
        self.pixels.copy_from_slice(&snapshot.pixels);
        Ok(())
    }

    pub fn clear(&mut self, color: Color32) {
        self.pixels.fill(color);
    }

    /// Copy of the buffer in the form the display expects
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage {
            size: self.size(),
            pixels: self.pixels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            PixelCanvas::new(0, 10, Color32::WHITE),
            Err(PaintError::InvalidDimension { width: 0, height: 10 })
        ));
        assert!(PixelCanvas::new(10, 0, Color32::WHITE).is_err());
    }

    #[test]
    fn test_new_canvas_is_uniform() {
        let canvas = PixelCanvas::new(4, 3, Color32::WHITE).unwrap();
        assert_eq!(canvas.pixels().len(), 12);
        assert!(canvas.pixels().iter().all(|&c| c == Color32::WHITE));
    }

    #[test]
    fn test_set_then_get() {
        let mut canvas = PixelCanvas::new(8, 8, Color32::WHITE).unwrap();
        let color = Color32::from_rgb(12, 34, 56);
        canvas.set_pixel(3, 5, color);
        assert_eq!(canvas.get_pixel(3, 5).unwrap(), color);
        assert_eq!(canvas.get_pixel(5, 3).unwrap(), Color32::WHITE);
    }

    #[test]
    fn test_out_of_bounds_read_and_write() {
        let mut canvas = PixelCanvas::new(8, 8, Color32::WHITE).unwrap();
        assert!(matches!(
            canvas.get_pixel(8, 0),
            Err(PaintError::OutOfBounds { x: 8, y: 0, .. })
        ));
        assert!(canvas.get_pixel(-1, 2).is_err());

        let before = canvas.clone();
        canvas.set_pixel(-1, 0, Color32::RED);
        canvas.set_pixel(0, 8, Color32::RED);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut canvas = PixelCanvas::new(6, 6, Color32::WHITE).unwrap();
        canvas.set_pixel(1, 1, Color32::BLUE);
        let snapshot = canvas.snapshot();

        canvas.set_pixel(2, 2, Color32::RED);
        canvas.clear(Color32::BLACK);
        canvas.restore(&snapshot).unwrap();

        assert_eq!(canvas.pixels(), snapshot.pixels());
        assert_eq!(canvas.get_pixel(1, 1).unwrap(), Color32::BLUE);
    }

    #[test]
    fn test_restore_size_mismatch() {
        let mut canvas = PixelCanvas::new(6, 6, Color32::WHITE).unwrap();
        let other = PixelCanvas::new(6, 7, Color32::WHITE).unwrap().snapshot();
        assert!(matches!(
            canvas.restore(&other),
            Err(PaintError::DimensionMismatch { expected: [6, 6], found: [6, 7] })
        ));
    }

    #[test]
    fn test_colors_match_tolerance() {
        let base = Color32::from_rgb(100, 100, 100);
        assert!(colors_match(base, Color32::from_rgb(102, 98, 100)));
        assert!(!colors_match(base, Color32::from_rgb(103, 100, 100)));
    }

    #[test]
    fn test_pixel_pos_truncates() {
        assert_eq!(PixelPos::from(Pos2::new(3.9, 7.2)), PixelPos::new(3, 7));
    }
}
