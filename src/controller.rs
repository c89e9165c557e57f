use std::path::PathBuf;

use chrono::Local;
use egui::{Color32, ColorImage, Pos2};

use crate::canvas::{PixelCanvas, PixelPos, Snapshot};
use crate::config::{self, PaintConfig, ToolSettings};
use crate::error::{ExportError, PaintError, PaintResult};
use crate::export;
use crate::palette::{self, COLOR_PALETTE};
use crate::raster::FillOutcome;
use crate::tools::{Tool, ToolContext, ToolKind, ToolResponse, ToolType, new_tool};

/// Receives the full canvas every time the controller applies
pub trait FrameSink {
    fn present(&mut self, image: ColorImage);
}

/// Discrete commands coming from the keyboard or the tools panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintCommand {
    SelectTool(usize),
    SetColor(usize),
    SetBrushSize(i32),
    AdjustBrushSize(i32),
    Undo,
    Clear,
    Save,
}

/// Input delivered to the controller. Positions are in canvas pixel space;
/// `None` means the pointer is outside the drawing bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintEvent {
    PointerDown(Option<Pos2>),
    PointerMove(Option<Pos2>),
    PointerUp(Option<Pos2>),
    Command(PaintCommand),
}

/// Dirty flag plus a minimum interval between batched applies.
///
/// Forced applies go through [`ApplyScheduler::record_apply`] as well, so the
/// interval always counts from the last time the sink saw the canvas.
#[derive(Debug, Clone)]
pub struct ApplyScheduler {
    interval: f64,
    last_apply: f64,
    dirty: bool,
}

impl ApplyScheduler {
    pub fn new(interval: f64) -> Self {
        Self {
            interval,
            last_apply: f64::NEG_INFINITY,
            dirty: false,
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a batched apply should happen at `now`
    pub fn is_due(&self, now: f64) -> bool {
        self.dirty && now - self.last_apply > self.interval
    }

    pub fn record_apply(&mut self, now: f64) {
        self.dirty = false;
        self.last_apply = now;
    }
}

/// The canvas and its single-level backup
#[derive(Debug)]
struct Surface {
    canvas: PixelCanvas,
    backup: Snapshot,
}

/// Drives the tools from pointer events and commands.
///
/// Owns the canvas, its backup and the tool state. Everything runs on the
/// caller's thread in event order; `now` is a monotonic time in seconds.
pub struct PaintController<S: FrameSink> {
    surface: Option<Surface>,
    tool: ToolType,
    color: Color32,
    brush_size: i32,
    fill_limit: usize,
    scheduler: ApplyScheduler,
    export_dir: PathBuf,
    last_fill: Option<FillOutcome>,
    sink: S,
}

impl<S: FrameSink> PaintController<S> {
    /// Controller without a canvas; pointer events are ignored until
    /// [`Self::attach_canvas`] is called.
    pub fn new(config: &PaintConfig, export_dir: PathBuf, sink: S) -> Self {
        Self {
            surface: None,
            tool: new_tool(ToolKind::Pencil),
            color: config.initial_color(),
            brush_size: config::clamp_brush_size(config.brush_size),
            fill_limit: config.fill_limit,
            scheduler: ApplyScheduler::new(config.apply_interval_secs),
            export_dir,
            last_fill: None,
            sink,
        }
    }

    /// Create the canvas described by `config` and attach it
    pub fn with_canvas(config: &PaintConfig, export_dir: PathBuf, sink: S, now: f64) -> PaintResult<Self> {
        let canvas = PixelCanvas::new(config.canvas_width, config.canvas_height, config.background())?;
        let mut controller = Self::new(config, export_dir, sink);
        controller.attach_canvas(canvas, now);
        Ok(controller)
    }

    /// Install the canvas and show it
    pub fn attach_canvas(&mut self, canvas: PixelCanvas, now: f64) {
        log::info!("Canvas attached: {}x{}", canvas.width(), canvas.height());
        let backup = canvas.snapshot();
        self.surface = Some(Surface { canvas, backup });
        self.apply(now);
    }

    pub fn canvas(&self) -> Option<&PixelCanvas> {
        self.surface.as_ref().map(|s| &s.canvas)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_dirty(&self) -> bool {
        self.scheduler.is_dirty()
    }

    /// Result of the most recent fill, if any
    pub fn last_fill(&self) -> Option<FillOutcome> {
        self.last_fill
    }

    pub fn gesture_state_name(&self) -> &'static str {
        self.tool.current_state_name()
    }

    // ---- event entry points ----

    pub fn handle_event(&mut self, event: PaintEvent, now: f64) -> PaintResult<()> {
        match event {
            PaintEvent::PointerDown(pos) => self.pointer_down(pos, now),
            PaintEvent::PointerMove(pos) => self.pointer_move(pos, now),
            PaintEvent::PointerUp(pos) => self.pointer_up(pos, now),
            PaintEvent::Command(command) => self.execute(command, now),
        }
    }

    /// Flush batched pixel writes if the apply interval has passed
    pub fn update(&mut self, now: f64) {
        if self.surface.is_some() && self.scheduler.is_due(now) {
            self.apply(now);
        }
    }

    pub fn pointer_down(&mut self, pos: Option<Pos2>, now: f64) -> PaintResult<()> {
        let Some(pos) = self.on_canvas(pos) else {
            return self.end_gesture(now);
        };
        // A down without a matching up: settle the old gesture first
        self.end_gesture(now)?;

        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        surface.backup = surface.canvas.snapshot();

        let mut ctx = ToolContext {
            canvas: &mut surface.canvas,
            backup: &surface.backup,
            color: self.color,
            brush_size: self.brush_size,
            fill_limit: self.fill_limit,
        };
        let response = self.tool.on_pointer_down(pos, &mut ctx)?;
        self.respond(response, now);
        Ok(())
    }

    pub fn pointer_move(&mut self, pos: Option<Pos2>, now: f64) -> PaintResult<()> {
        let Some(pos) = self.on_canvas(pos) else {
            return self.end_gesture(now);
        };
        if !self.tool.is_active() {
            return Ok(());
        }
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };

        let mut ctx = ToolContext {
            canvas: &mut surface.canvas,
            backup: &surface.backup,
            color: self.color,
            brush_size: self.brush_size,
            fill_limit: self.fill_limit,
        };
        let response = self.tool.on_pointer_move(pos, &mut ctx)?;
        self.respond(response, now);
        Ok(())
    }

    pub fn pointer_up(&mut self, pos: Option<Pos2>, now: f64) -> PaintResult<()> {
        let Some(pos) = self.on_canvas(pos) else {
            return self.end_gesture(now);
        };
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };

        let mut ctx = ToolContext {
            canvas: &mut surface.canvas,
            backup: &surface.backup,
            color: self.color,
            brush_size: self.brush_size,
            fill_limit: self.fill_limit,
        };
        let response = self.tool.on_pointer_up(pos, &mut ctx)?;
        self.respond(response, now);
        Ok(())
    }

    /// Resolve an unfinished gesture: strokes are kept, shape previews dropped
    fn end_gesture(&mut self, now: f64) -> PaintResult<()> {
        if !self.tool.is_active() {
            return Ok(());
        }
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };

        let mut ctx = ToolContext {
            canvas: &mut surface.canvas,
            backup: &surface.backup,
            color: self.color,
            brush_size: self.brush_size,
            fill_limit: self.fill_limit,
        };
        let response = self.tool.cancel(&mut ctx)?;
        self.respond(response, now);
        Ok(())
    }

    /// Map a pointer position to a canvas cell, dropping anything off-canvas
    fn on_canvas(&self, pos: Option<Pos2>) -> Option<PixelPos> {
        let canvas = &self.surface.as_ref()?.canvas;
        let pos = pos?;
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let cell = PixelPos::from(pos);
        canvas.contains(cell.x, cell.y).then_some(cell)
    }

    fn respond(&mut self, response: ToolResponse, now: f64) {
        match response {
            ToolResponse::Nothing => {}
            ToolResponse::MarkDirty => self.scheduler.mark_dirty(),
            ToolResponse::ApplyNow => self.apply(now),
            ToolResponse::Filled(outcome) => {
                self.last_fill = Some(outcome);
                self.apply(now);
            }
            ToolResponse::PickColor(color) => {
                log::debug!("Eyedropper picked {:?}", color);
                self.color = color;
            }
        }
    }

    /// Push the current canvas to the sink
    pub fn apply(&mut self, now: f64) {
        if let Some(surface) = &self.surface {
            self.sink.present(surface.canvas.to_color_image());
            self.scheduler.record_apply(now);
        }
    }

    // ---- commands ----

    pub fn execute(&mut self, command: PaintCommand, now: f64) -> PaintResult<()> {
        log::debug!("Executing {:?}", command);
        match command {
            PaintCommand::SelectTool(index) => self.select_tool(index, now),
            PaintCommand::SetColor(index) => self.set_color(index),
            PaintCommand::SetBrushSize(size) => {
                self.set_brush_size(size);
                Ok(())
            }
            PaintCommand::AdjustBrushSize(delta) => {
                self.adjust_brush_size(delta);
                Ok(())
            }
            PaintCommand::Undo => self.undo_last_stroke(now),
            PaintCommand::Clear => self.clear_canvas(now),
            PaintCommand::Save => self.export_image().map(|_| ()),
        }
    }

    /// Switch to the tool at `index` (0 = Pencil … 7 = Eyedropper)
    pub fn select_tool(&mut self, index: usize, now: f64) -> PaintResult<()> {
        let kind = ToolKind::from_index(index)?;
        self.set_tool(kind, now)
    }

    pub fn set_tool(&mut self, kind: ToolKind, now: f64) -> PaintResult<()> {
        self.end_gesture(now)?;
        if self.tool.kind() != kind {
            log::info!("Tool changed: {} -> {}", self.tool.name(), kind.name());
            self.tool = new_tool(kind);
        }
        Ok(())
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn current_tool_name(&self) -> &'static str {
        self.tool.name()
    }

    /// Pick a color from the palette
    pub fn set_color(&mut self, palette_index: usize) -> PaintResult<()> {
        self.color = palette::palette_color(palette_index).ok_or(PaintError::UnknownPaletteIndex(palette_index))?;
        Ok(())
    }

    pub fn current_color(&self) -> Color32 {
        self.color
    }

    pub fn color_palette(&self) -> &'static [Color32] {
        &COLOR_PALETTE
    }

    /// Set the brush size, clamped to `[1, 50]`; returns the size in effect
    pub fn set_brush_size(&mut self, size: i32) -> i32 {
        self.brush_size = config::clamp_brush_size(size);
        self.brush_size
    }

    pub fn adjust_brush_size(&mut self, delta: i32) -> i32 {
        self.set_brush_size(self.brush_size.saturating_add(delta))
    }

    pub fn brush_size(&self) -> i32 {
        self.brush_size
    }

    /// Put the canvas back to how it was before the last stroke
    pub fn undo_last_stroke(&mut self, now: f64) -> PaintResult<()> {
        self.end_gesture(now)?;
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        debug_assert_eq!(surface.canvas.size(), surface.backup.size());
        if let Err(err) = surface.canvas.restore(&surface.backup) {
            log::error!("Backup does not fit the canvas: {}", err);
            return Err(err);
        }
        self.apply(now);
        Ok(())
    }

    /// Refill with the background color. Can be undone like a stroke.
    pub fn clear_canvas(&mut self, now: f64) -> PaintResult<()> {
        self.end_gesture(now)?;
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        surface.backup = surface.canvas.snapshot();
        let background = surface.canvas.background();
        surface.canvas.clear(background);
        self.apply(now);
        Ok(())
    }

    /// Save the canvas as `PaintDrawing_<timestamp>.png` in the export directory
    pub fn export_image(&self) -> PaintResult<PathBuf> {
        let snapshot = self
            .canvas()
            .map(PixelCanvas::snapshot)
            .ok_or(ExportError::NoCanvas)?;
        Ok(export::export_png(&snapshot, &self.export_dir, Local::now())?)
    }

    // ---- persisted settings ----

    pub fn tool_settings(&self) -> ToolSettings {
        ToolSettings {
            tool_index: self.tool.kind().index(),
            color: config::color_to_array(self.color),
            brush_size: self.brush_size,
        }
    }

    pub fn apply_tool_settings(&mut self, settings: ToolSettings, now: f64) {
        match ToolKind::from_index(settings.tool_index) {
            Ok(kind) => {
                if let Err(err) = self.set_tool(kind, now) {
                    log::warn!("Could not restore tool: {}", err);
                }
            }
            Err(err) => log::warn!("Ignoring saved tool: {}", err),
        }
        self.color = config::color_from_array(settings.color);
        self.set_brush_size(settings.brush_size);
    }
}
