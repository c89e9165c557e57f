use super::{Tool, ToolContext, ToolResponse};
use crate::canvas::PixelPos;
use crate::error::PaintResult;
use crate::raster;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rectangle,
    Circle,
}

/// Line, rectangle and circle tools.
///
/// Pointer-down anchors the shape. Every move erases the previous preview by
/// restoring the backup and draws the shape again up to the pointer; release
/// draws the final shape the same way.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    kind: ShapeKind,
    anchor: Option<PixelPos>,
}

impl ShapeTool {
    pub fn new(kind: ShapeKind) -> Self {
        Self { kind, anchor: None }
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    fn redraw(&self, anchor: PixelPos, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<()> {
        ctx.canvas.restore(ctx.backup)?;
        match self.kind {
            ShapeKind::Line => raster::draw_line(ctx.canvas, anchor, pos, ctx.color, ctx.brush_size),
            ShapeKind::Rectangle => {
                raster::draw_rectangle_outline(ctx.canvas, anchor, pos, ctx.color, ctx.brush_size)
            }
            ShapeKind::Circle => {
                raster::draw_circle_outline(ctx.canvas, anchor, pos, ctx.color, ctx.brush_size)
            }
        }
        Ok(())
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        match self.kind {
            ShapeKind::Line => "Line",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
        }
    }

    fn is_active(&self) -> bool {
        self.anchor.is_some()
    }

    fn current_state_name(&self) -> &'static str {
        if self.is_active() { "ShapeAnchored" } else { "Idle" }
    }

    fn on_pointer_down(&mut self, pos: PixelPos, _ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        self.anchor = Some(pos);
        Ok(ToolResponse::Nothing)
    }

    fn on_pointer_move(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        let Some(anchor) = self.anchor else {
            return Ok(ToolResponse::Nothing);
        };
        self.redraw(anchor, pos, ctx)?;
        Ok(ToolResponse::ApplyNow)
    }

    fn on_pointer_up(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        let Some(anchor) = self.anchor.take() else {
            return Ok(ToolResponse::Nothing);
        };
        self.redraw(anchor, pos, ctx)?;
        log::debug!("{} committed from {:?} to {:?}", self.name(), anchor, pos);
        Ok(ToolResponse::ApplyNow)
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        if self.anchor.take().is_none() {
            return Ok(ToolResponse::Nothing);
        }
        ctx.canvas.restore(ctx.backup)?;
        Ok(ToolResponse::ApplyNow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelCanvas;
    use crate::raster::DEFAULT_FILL_LIMIT;
    use egui::Color32;

    #[test]
    fn test_preview_is_replaced_not_accumulated() {
        let mut canvas = PixelCanvas::new(60, 60, Color32::WHITE).unwrap();
        let backup = canvas.snapshot();
        let mut tool = ShapeTool::new(ShapeKind::Line);
        let mut ctx = ToolContext {
            canvas: &mut canvas,
            backup: &backup,
            color: Color32::BLACK,
            brush_size: 1,
            fill_limit: DEFAULT_FILL_LIMIT,
        };

        tool.on_pointer_down(PixelPos::new(10, 10), &mut ctx).unwrap();
        assert_eq!(tool.current_state_name(), "ShapeAnchored");
        assert_eq!(
            tool.on_pointer_move(PixelPos::new(50, 10), &mut ctx).unwrap(),
            ToolResponse::ApplyNow
        );
        assert_eq!(ctx.canvas.get_pixel(40, 10).unwrap(), Color32::BLACK);

        tool.on_pointer_move(PixelPos::new(10, 50), &mut ctx).unwrap();
        // The first preview is gone
        assert_eq!(ctx.canvas.get_pixel(40, 10).unwrap(), Color32::WHITE);
        assert_eq!(ctx.canvas.get_pixel(10, 40).unwrap(), Color32::BLACK);

        tool.on_pointer_up(PixelPos::new(30, 30), &mut ctx).unwrap();
        assert!(!tool.is_active());
        assert_eq!(ctx.canvas.get_pixel(10, 40).unwrap(), Color32::WHITE);
        assert_eq!(ctx.canvas.get_pixel(20, 20).unwrap(), Color32::BLACK);
    }

    #[test]
    fn test_cancel_restores_backup() {
        let mut canvas = PixelCanvas::new(30, 30, Color32::WHITE).unwrap();
        let backup = canvas.snapshot();
        let mut tool = ShapeTool::new(ShapeKind::Rectangle);
        let mut ctx = ToolContext {
            canvas: &mut canvas,
            backup: &backup,
            color: Color32::RED,
            brush_size: 2,
            fill_limit: DEFAULT_FILL_LIMIT,
        };
        tool.on_pointer_down(PixelPos::new(5, 5), &mut ctx).unwrap();
        tool.on_pointer_move(PixelPos::new(20, 20), &mut ctx).unwrap();
        assert_eq!(tool.cancel(&mut ctx).unwrap(), ToolResponse::ApplyNow);
        assert_eq!(ctx.canvas.pixels(), backup.pixels());
    }
}
