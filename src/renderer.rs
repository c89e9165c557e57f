use egui::{Color32, ColorImage, Context, Painter, Rect, TextureHandle, TextureOptions, pos2};

use crate::controller::FrameSink;

const CANVAS_TEXTURE_NAME: &str = "paint_canvas";

/// Output sink that uploads every applied canvas into an egui texture
pub struct TextureSink {
    ctx: Context,
    texture: Option<TextureHandle>,
    /// Number of applies received so far
    presents: u64,
}

impl TextureSink {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            texture: None,
            presents: 0,
        }
    }

    pub fn presents(&self) -> u64 {
        self.presents
    }

    pub fn texture(&self) -> Option<&TextureHandle> {
        self.texture.as_ref()
    }

    /// Draw the last presented canvas into `rect`
    pub fn render(&self, painter: &Painter, rect: Rect) {
        match &self.texture {
            Some(texture) => {
                painter.image(
                    texture.id(),
                    rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.rect_filled(rect, 0.0, Color32::from_gray(40));
            }
        }
    }
}

impl FrameSink for TextureSink {
    fn present(&mut self, image: ColorImage) {
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => {
                self.texture = Some(self.ctx.load_texture(CANVAS_TEXTURE_NAME, image, TextureOptions::NEAREST));
            }
        }
        self.presents += 1;
        self.ctx.request_repaint();
    }
}

impl std::fmt::Debug for TextureSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureSink")
            .field("texture", &self.texture.as_ref().map(|t| t.size()))
            .field("presents", &self.presents)
            .finish()
    }
}

/// Largest rect inside `available` with the canvas aspect ratio, centred
pub fn fit_canvas_rect(available: Rect, canvas_size: [usize; 2]) -> Rect {
    let [width, height] = canvas_size;
    if width == 0 || height == 0 || available.width() <= 0.0 || available.height() <= 0.0 {
        return Rect::from_center_size(available.center(), egui::Vec2::ZERO);
    }
    let scale = (available.width() / width as f32).min(available.height() / height as f32);
    let size = egui::vec2(width as f32 * scale, height as f32 * scale);
    Rect::from_center_size(available.center(), size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelCanvas;

    #[test]
    fn test_sink_uploads_texture() {
        let ctx = Context::default();
        let mut sink = TextureSink::new(ctx);
        assert!(sink.texture().is_none());

        let canvas = PixelCanvas::new(4, 2, Color32::WHITE).unwrap();
        sink.present(canvas.to_color_image());
        sink.present(canvas.to_color_image());

        assert_eq!(sink.presents(), 2);
        assert_eq!(sink.texture().map(|t| t.size()), Some([4, 2]));
    }

    #[test]
    fn test_fit_keeps_aspect() {
        let available = Rect::from_min_size(pos2(0.0, 0.0), egui::vec2(400.0, 100.0));
        let rect = fit_canvas_rect(available, [200, 100]);
        assert_eq!(rect.size(), egui::vec2(200.0, 100.0));
        assert_eq!(rect.center(), available.center());
    }
}
