use super::{Tool, ToolContext, ToolResponse};
use crate::canvas::PixelPos;
use crate::error::PaintResult;
use crate::raster;

/// Bucket fill. Runs entirely on pointer-down and asks for an immediate apply.
#[derive(Debug, Clone, Default)]
pub struct FillTool;

impl FillTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for FillTool {
    fn name(&self) -> &'static str {
        "Fill"
    }

    fn is_active(&self) -> bool {
        false
    }

    fn current_state_name(&self) -> &'static str {
        "Idle"
    }

    fn on_pointer_down(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        let outcome = raster::flood_fill(ctx.canvas, pos, ctx.color, ctx.fill_limit)?;
        log::debug!("Filled {} pixels from {:?}", outcome.filled, pos);
        Ok(ToolResponse::Filled(outcome))
    }

    fn on_pointer_move(&mut self, _pos: PixelPos, _ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        Ok(ToolResponse::Nothing)
    }

    fn on_pointer_up(&mut self, _pos: PixelPos, _ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        Ok(ToolResponse::Nothing)
    }
}
