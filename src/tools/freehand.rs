use egui::Color32;

use super::{Tool, ToolContext, ToolResponse};
use crate::canvas::PixelPos;
use crate::error::PaintResult;
use crate::raster::{self, Dab};

/// The three tools that paint along the pointer path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreehandKind {
    Pencil,
    Brush,
    Eraser,
}

impl FreehandKind {
    /// Each tool scales the brush size differently: the pencil uses half of
    /// it, the brush all of it and the eraser twice as much.
    pub fn dab(self, brush_size: i32) -> Dab {
        match self {
            Self::Pencil => Dab::pencil(brush_size),
            Self::Brush => Dab::circle(brush_size),
            Self::Eraser => Dab::circle(brush_size.saturating_mul(2)),
        }
    }
}

/// Pencil, brush and eraser.
///
/// A stroke starts with a single dab on pointer-down; every following sample
/// is joined to the previous one with a Bresenham walk so fast motion leaves
/// no gaps. Pixels are only marked dirty while the stroke runs; the final
/// apply happens on release.
#[derive(Debug, Clone)]
pub struct FreehandTool {
    kind: FreehandKind,
    // Last sample of the stroke in progress
    last_pos: Option<PixelPos>,
}

impl FreehandTool {
    pub fn new(kind: FreehandKind) -> Self {
        Self { kind, last_pos: None }
    }

    pub fn kind(&self) -> FreehandKind {
        self.kind
    }

    fn color(&self, ctx: &ToolContext<'_>) -> Color32 {
        match self.kind {
            FreehandKind::Eraser => ctx.canvas.background(),
            FreehandKind::Pencil | FreehandKind::Brush => ctx.color,
        }
    }

    fn finish(&mut self) -> ToolResponse {
        match self.last_pos.take() {
            Some(_) => ToolResponse::ApplyNow,
            None => ToolResponse::Nothing,
        }
    }
}

impl Tool for FreehandTool {
    fn name(&self) -> &'static str {
        match self.kind {
            FreehandKind::Pencil => "Pencil",
            FreehandKind::Brush => "Brush",
            FreehandKind::Eraser => "Eraser",
        }
    }

    fn is_active(&self) -> bool {
        self.last_pos.is_some()
    }

    fn current_state_name(&self) -> &'static str {
        if self.is_active() { "StrokeActive" } else { "Idle" }
    }

    fn on_pointer_down(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        let color = self.color(ctx);
        raster::stamp_dab(ctx.canvas, pos, self.kind.dab(ctx.brush_size), color);
        self.last_pos = Some(pos);
        Ok(ToolResponse::MarkDirty)
    }

    fn on_pointer_move(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        let Some(last) = self.last_pos else {
            return Ok(ToolResponse::Nothing);
        };
        let color = self.color(ctx);
        raster::stroke_line(ctx.canvas, last, pos, self.kind.dab(ctx.brush_size), color);
        self.last_pos = Some(pos);
        Ok(ToolResponse::MarkDirty)
    }

    fn on_pointer_up(&mut self, _pos: PixelPos, _ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        Ok(self.finish())
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        // The pixels already laid down stay; only the stroke ends
        Ok(self.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelCanvas;
    use crate::raster::DEFAULT_FILL_LIMIT;

    fn run<F>(canvas: &mut PixelCanvas, brush_size: i32, f: F) -> ToolResponse
    where
        F: FnOnce(&mut ToolContext<'_>) -> PaintResult<ToolResponse>,
    {
        let backup = canvas.snapshot();
        let mut ctx = ToolContext {
            canvas,
            backup: &backup,
            color: Color32::BLACK,
            brush_size,
            fill_limit: DEFAULT_FILL_LIMIT,
        };
        f(&mut ctx).unwrap()
    }

    #[test]
    fn test_stroke_lifecycle() {
        let mut canvas = PixelCanvas::new(40, 40, Color32::WHITE).unwrap();
        let mut tool = FreehandTool::new(FreehandKind::Brush);

        let down = run(&mut canvas, 2, |ctx| tool.on_pointer_down(PixelPos::new(5, 5), ctx));
        assert_eq!(down, ToolResponse::MarkDirty);
        assert_eq!(tool.current_state_name(), "StrokeActive");

        let moved = run(&mut canvas, 2, |ctx| tool.on_pointer_move(PixelPos::new(30, 5), ctx));
        assert_eq!(moved, ToolResponse::MarkDirty);
        // Samples are joined, so the middle of the segment is painted
        assert_eq!(canvas.get_pixel(17, 5).unwrap(), Color32::BLACK);

        let up = run(&mut canvas, 2, |ctx| tool.on_pointer_up(PixelPos::new(30, 5), ctx));
        assert_eq!(up, ToolResponse::ApplyNow);
        assert!(!tool.is_active());
    }

    #[test]
    fn test_move_without_down_is_ignored() {
        let mut canvas = PixelCanvas::new(10, 10, Color32::WHITE).unwrap();
        let before = canvas.clone();
        let mut tool = FreehandTool::new(FreehandKind::Pencil);
        let response = run(&mut canvas, 3, |ctx| tool.on_pointer_move(PixelPos::new(4, 4), ctx));
        assert_eq!(response, ToolResponse::Nothing);
        assert_eq!(canvas, before);
    }

    #[test]
    fn test_eraser_paints_background() {
        let mut canvas = PixelCanvas::new(30, 30, Color32::WHITE).unwrap();
        canvas.clear(Color32::RED);
        let mut tool = FreehandTool::new(FreehandKind::Eraser);
        run(&mut canvas, 3, |ctx| tool.on_pointer_down(PixelPos::new(15, 15), ctx));
        // Eraser radius is twice the brush size
        assert_eq!(canvas.get_pixel(21, 15).unwrap(), Color32::WHITE);
        assert_eq!(canvas.get_pixel(22, 15).unwrap(), Color32::RED);
    }

    #[test]
    fn test_dab_scaling() {
        assert_eq!(FreehandKind::Brush.dab(4), Dab { reach: 4, radius_sq: 16 });
        assert_eq!(FreehandKind::Eraser.dab(4), Dab { reach: 8, radius_sq: 64 });
        assert_eq!(FreehandKind::Pencil.dab(4), Dab { reach: 4, radius_sq: 4 });
    }
}
