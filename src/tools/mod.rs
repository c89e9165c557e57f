use egui::Color32;

use crate::canvas::{PixelCanvas, PixelPos, Snapshot};
use crate::error::{PaintError, PaintResult};
use crate::raster::FillOutcome;

mod eyedropper;
mod fill;
mod freehand;
mod shape;

pub use eyedropper::EyedropperTool;
pub use fill::FillTool;
pub use freehand::{FreehandKind, FreehandTool};
pub use shape::{ShapeKind, ShapeTool};

/// The eight tools, in shortcut order (key `1` is `Pencil`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Pencil,
    Brush,
    Eraser,
    Fill,
    Line,
    Rectangle,
    Circle,
    Eyedropper,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::Pencil,
        ToolKind::Brush,
        ToolKind::Eraser,
        ToolKind::Fill,
        ToolKind::Line,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Eyedropper,
    ];

    pub fn from_index(index: usize) -> PaintResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(PaintError::UnknownTool(index))
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pencil => "Pencil",
            Self::Brush => "Brush",
            Self::Eraser => "Eraser",
            Self::Fill => "Fill",
            Self::Line => "Line",
            Self::Rectangle => "Rectangle",
            Self::Circle => "Circle",
            Self::Eyedropper => "Eyedropper",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Pencil => "✏",
            Self::Brush => "🖌",
            Self::Eraser => "⌫",
            Self::Fill => "🪣",
            Self::Line => "╱",
            Self::Rectangle => "▭",
            Self::Circle => "◯",
            Self::Eyedropper => "💧",
        }
    }
}

/// Everything a tool may touch while handling one pointer event
pub struct ToolContext<'a> {
    pub canvas: &'a mut PixelCanvas,
    /// Canvas contents from the last pointer-down
    pub backup: &'a Snapshot,
    pub color: Color32,
    pub brush_size: i32,
    pub fill_limit: usize,
}

/// What the controller should do after a tool has handled an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolResponse {
    Nothing,
    /// Pixels changed; flush on the next scheduled apply
    MarkDirty,
    /// Pixels changed and must be shown this frame
    ApplyNow,
    /// A fill finished; must be shown this frame
    Filled(FillOutcome),
    /// The eyedropper read a color
    PickColor(Color32),
}

/// Tool trait defines the interface for all drawing tools
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// True while a gesture started by this tool is unresolved
    fn is_active(&self) -> bool;

    /// Name of the gesture state, for display
    fn current_state_name(&self) -> &'static str;

    /// Handle pointer press on the canvas. The backup already holds the
    /// pre-stroke canvas.
    fn on_pointer_down(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse>;

    /// Handle pointer movement while the pointer is held down
    fn on_pointer_move(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse>;

    /// Handle pointer release
    fn on_pointer_up(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse>;

    /// Resolve an unfinished gesture when the pointer leaves the drawing
    /// bounds or the tool is switched.
    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        Ok(ToolResponse::Nothing)
    }
}

/// Enum representing all available tool types
#[derive(Debug, Clone)]
pub enum ToolType {
    Freehand(FreehandTool),
    Shape(ShapeTool),
    Fill(FillTool),
    Eyedropper(EyedropperTool),
}

impl ToolType {
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Freehand(tool) => match tool.kind() {
                FreehandKind::Pencil => ToolKind::Pencil,
                FreehandKind::Brush => ToolKind::Brush,
                FreehandKind::Eraser => ToolKind::Eraser,
            },
            Self::Shape(tool) => match tool.kind() {
                ShapeKind::Line => ToolKind::Line,
                ShapeKind::Rectangle => ToolKind::Rectangle,
                ShapeKind::Circle => ToolKind::Circle,
            },
            Self::Fill(_) => ToolKind::Fill,
            Self::Eyedropper(_) => ToolKind::Eyedropper,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::Freehand(tool) => tool.name(),
            Self::Shape(tool) => tool.name(),
            Self::Fill(tool) => tool.name(),
            Self::Eyedropper(tool) => tool.name(),
        }
    }

    fn is_active(&self) -> bool {
        match self {
            Self::Freehand(tool) => tool.is_active(),
            Self::Shape(tool) => tool.is_active(),
            Self::Fill(tool) => tool.is_active(),
            Self::Eyedropper(tool) => tool.is_active(),
        }
    }

    fn current_state_name(&self) -> &'static str {
        match self {
            Self::Freehand(tool) => tool.current_state_name(),
            Self::Shape(tool) => tool.current_state_name(),
            Self::Fill(tool) => tool.current_state_name(),
            Self::Eyedropper(tool) => tool.current_state_name(),
        }
    }

    fn on_pointer_down(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        match self {
            Self::Freehand(tool) => tool.on_pointer_down(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_down(pos, ctx),
            Self::Fill(tool) => tool.on_pointer_down(pos, ctx),
            Self::Eyedropper(tool) => tool.on_pointer_down(pos, ctx),
        }
    }

    fn on_pointer_move(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        match self {
            Self::Freehand(tool) => tool.on_pointer_move(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_move(pos, ctx),
            Self::Fill(tool) => tool.on_pointer_move(pos, ctx),
            Self::Eyedropper(tool) => tool.on_pointer_move(pos, ctx),
        }
    }

    fn on_pointer_up(&mut self, pos: PixelPos, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        match self {
            Self::Freehand(tool) => tool.on_pointer_up(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_up(pos, ctx),
            Self::Fill(tool) => tool.on_pointer_up(pos, ctx),
            Self::Eyedropper(tool) => tool.on_pointer_up(pos, ctx),
        }
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) -> PaintResult<ToolResponse> {
        match self {
            Self::Freehand(tool) => tool.cancel(ctx),
            Self::Shape(tool) => tool.cancel(ctx),
            Self::Fill(tool) => tool.cancel(ctx),
            Self::Eyedropper(tool) => tool.cancel(ctx),
        }
    }
}

// Factory function to create a fresh tool of the specified kind
pub fn new_tool(kind: ToolKind) -> ToolType {
    match kind {
        ToolKind::Pencil => ToolType::Freehand(FreehandTool::new(FreehandKind::Pencil)),
        ToolKind::Brush => ToolType::Freehand(FreehandTool::new(FreehandKind::Brush)),
        ToolKind::Eraser => ToolType::Freehand(FreehandTool::new(FreehandKind::Eraser)),
        ToolKind::Fill => ToolType::Fill(FillTool::new()),
        ToolKind::Line => ToolType::Shape(ShapeTool::new(ShapeKind::Line)),
        ToolKind::Rectangle => ToolType::Shape(ShapeTool::new(ShapeKind::Rectangle)),
        ToolKind::Circle => ToolType::Shape(ShapeTool::new(ShapeKind::Circle)),
        ToolKind::Eyedropper => ToolType::Eyedropper(EyedropperTool::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, kind) in ToolKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(ToolKind::from_index(i).unwrap(), *kind);
            assert_eq!(new_tool(*kind).kind(), *kind);
        }
        assert!(matches!(ToolKind::from_index(8), Err(PaintError::UnknownTool(8))));
    }

    #[test]
    fn test_names() {
        assert_eq!(new_tool(ToolKind::Rectangle).name(), "Rectangle");
        assert_eq!(new_tool(ToolKind::Eyedropper).name(), "Eyedropper");
    }
}
