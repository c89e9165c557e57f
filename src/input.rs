use egui::{Context, Key, Modifiers, Pos2, Rect};

use crate::config::{BRUSH_SIZE_STEP, PaintConfig};
use crate::controller::{PaintCommand, PaintEvent};

/// Area of the window in which the pointer may draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingBounds {
    pub enabled: bool,
    /// Dead band along every edge of the window, in points
    pub margin: f32,
}

impl DrawingBounds {
    pub fn from_config(config: &PaintConfig) -> Self {
        Self {
            enabled: config.use_drawing_bounds,
            margin: config.drawing_bounds_margin,
        }
    }

    pub fn allows(&self, screen_rect: Rect, pos: Pos2) -> bool {
        if !screen_rect.contains(pos) {
            return false;
        }
        !self.enabled || screen_rect.shrink(self.margin).contains(pos)
    }
}

/// Project a screen position into canvas pixel space.
///
/// Returns `None` when the position is outside the drawing bounds or does not
/// land on the canvas.
pub fn project_to_canvas(
    pos: Pos2,
    screen_rect: Rect,
    canvas_rect: Rect,
    canvas_size: [usize; 2],
    bounds: DrawingBounds,
) -> Option<Pos2> {
    if !bounds.allows(screen_rect, pos) || canvas_rect.width() <= 0.0 || canvas_rect.height() <= 0.0 {
        return None;
    }
    let [width, height] = canvas_size;
    let x = (pos.x - canvas_rect.min.x) / canvas_rect.width() * width as f32;
    let y = (pos.y - canvas_rect.min.y) / canvas_rect.height() * height as f32;
    if x < 0.0 || y < 0.0 || x >= width as f32 || y >= height as f32 {
        return None;
    }
    Some(Pos2::new(x, y))
}

/// Keyboard shortcut for a key press, if any
pub fn command_for_key(key: Key, modifiers: Modifiers) -> Option<PaintCommand> {
    if modifiers.command {
        return match key {
            Key::Z => Some(PaintCommand::Undo),
            Key::C => Some(PaintCommand::Clear),
            Key::S => Some(PaintCommand::Save),
            _ => None,
        };
    }
    match key {
        Key::Num1 => Some(PaintCommand::SelectTool(0)),
        Key::Num2 => Some(PaintCommand::SelectTool(1)),
        Key::Num3 => Some(PaintCommand::SelectTool(2)),
        Key::Num4 => Some(PaintCommand::SelectTool(3)),
        Key::Num5 => Some(PaintCommand::SelectTool(4)),
        Key::Num6 => Some(PaintCommand::SelectTool(5)),
        Key::Num7 => Some(PaintCommand::SelectTool(6)),
        Key::Num8 => Some(PaintCommand::SelectTool(7)),
        Key::Plus | Key::Equals => Some(PaintCommand::AdjustBrushSize(BRUSH_SIZE_STEP)),
        Key::Minus => Some(PaintCommand::AdjustBrushSize(-BRUSH_SIZE_STEP)),
        _ => None,
    }
}

/// Turns raw egui input into [`PaintEvent`]s for the controller
#[derive(Debug, Clone)]
pub struct InputHandler {
    bounds: DrawingBounds,
    last_canvas_pos: Option<Pos2>,
}

impl InputHandler {
    pub fn new(bounds: DrawingBounds) -> Self {
        Self {
            bounds,
            last_canvas_pos: None,
        }
    }

    /// Collect this frame's events. `canvas_rect` is where the canvas is
    /// drawn on screen.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect, canvas_size: [usize; 2]) -> Vec<PaintEvent> {
        let mut events = Vec::new();
        let screen_rect = ctx.screen_rect();

        ctx.input(|input| {
            let canvas_pos = input
                .pointer
                .latest_pos()
                .and_then(|pos| project_to_canvas(pos, screen_rect, canvas_rect, canvas_size, self.bounds));

            if input.pointer.primary_pressed() {
                events.push(PaintEvent::PointerDown(canvas_pos));
            } else if input.pointer.primary_down() && canvas_pos != self.last_canvas_pos {
                events.push(PaintEvent::PointerMove(canvas_pos));
            }
            if input.pointer.primary_released() {
                events.push(PaintEvent::PointerUp(canvas_pos));
            }
            self.last_canvas_pos = canvas_pos;

            for event in &input.raw.events {
                match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        modifiers,
                        ..
                    } => {
                        if let Some(command) = command_for_key(*key, *modifiers) {
                            events.push(PaintEvent::Command(command));
                        }
                    }
                    // Native backends turn Ctrl+C into a copy event
                    egui::Event::Copy => events.push(PaintEvent::Command(PaintCommand::Clear)),
                    _ => {}
                }
            }
        });

        events
    }
}
