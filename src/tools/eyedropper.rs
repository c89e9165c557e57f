use super::{Tool, ToolContext, ToolResponse};
use crate::canvas::PixelPos;
use crate::error::PaintResult;
use crate::raster;

/// Picks the color under the pointer; never touches the canvas
#[derive(Debug, Clone, Default)]
pub struct EyedropperTool;

impl EyedropperTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for EyedropperTool {
    fn name(&self) -> &'static str {
        "Eyedropper"
    }

    fn is_active(&self) -> bool {
        false
    }

    fn current_state_name(&self) -> &'static str {
        "Idle"
    }

    fn on_pointer_down(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        Ok(ToolResponse::PickColor(raster::pick_color(ctx.canvas, pos)?))
    }

    fn on_pointer_move(&mut self, _pos: PixelPos, _ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        Ok(ToolResponse::Nothing)
    }

    fn on_pointer_up(&mut self, _pos: PixelPos, _ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        Ok(ToolResponse::Nothing)
    }
}
