use std::path::PathBuf;

use crate::config::{PaintConfig, ToolSettings};
use crate::controller::{PaintCommand, PaintController, PaintEvent};
use crate::error::PaintResult;
use crate::input::{DrawingBounds, InputHandler};
use crate::panels::{central_panel, tools_panel};
use crate::renderer::TextureSink;
use crate::util::time;

pub const APP_ID: &str = "eframe_pixel_paint";

/// Where exported drawings go: the configured directory, else the app data
/// directory, else the working directory.
pub fn resolve_export_dir(config: &PaintConfig) -> PathBuf {
    #[cfg(not(target_arch = "wasm32"))]
    let app_data_dir = eframe::storage_dir(APP_ID);
    #[cfg(target_arch = "wasm32")]
    let app_data_dir: Option<PathBuf> = None;

    config
        .export_dir
        .clone()
        .or(app_data_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub struct PaintApp {
    controller: PaintController<TextureSink>,
    input: InputHandler,
    // Last message shown under the tools, e.g. where a drawing was saved
    status: Option<String>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: PaintConfig) -> PaintResult<Self> {
        let now = time::current_time_secs();
        let sink = TextureSink::new(cc.egui_ctx.clone());
        let mut controller = PaintController::with_canvas(&config, resolve_export_dir(&config), sink, now)?;

        if let Some(storage) = cc.storage {
            if let Some(settings) = eframe::get_value::<ToolSettings>(storage, eframe::APP_KEY) {
                log::debug!("Restoring tool settings {:?}", settings);
                controller.apply_tool_settings(settings, now);
            }
        }

        Ok(Self {
            controller,
            input: InputHandler::new(DrawingBounds::from_config(&config)),
            status: None,
        })
    }

    pub fn controller(&self) -> &PaintController<TextureSink> {
        &self.controller
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Collect pointer and keyboard events for the canvas drawn at `canvas_rect`
    pub fn handle_input(&mut self, ctx: &egui::Context, canvas_rect: egui::Rect) {
        let Some(canvas_size) = self.controller.canvas().map(|c| c.size()) else {
            return;
        };
        for event in self.input.process_input(ctx, canvas_rect, canvas_size) {
            self.handle_event(event);
        }
    }

    pub fn handle_event(&mut self, event: PaintEvent) {
        if let PaintEvent::Command(command) = event {
            self.execute_command(command);
            return;
        }
        if let Err(err) = self.controller.handle_event(event, time::current_time_secs()) {
            log::error!("Failed to handle {:?}: {}", event, err);
        }
    }

    pub fn execute_command(&mut self, command: PaintCommand) {
        let now = time::current_time_secs();
        if command == PaintCommand::Save {
            self.status = Some(match self.controller.export_image() {
                Ok(path) => format!("Saved to {}", path.display()),
                Err(err) => {
                    log::error!("Save failed: {}", err);
                    format!("Save failed: {}", err)
                }
            });
            return;
        }
        if let Err(err) = self.controller.execute(command, now) {
            log::warn!("Command {:?} failed: {}", command, err);
            self.status = Some(err.to_string());
        }
    }

    pub fn render_canvas(&self, painter: &egui::Painter, rect: egui::Rect) {
        self.controller.sink().render(painter, rect);
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.controller.tool_settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.controller.update(time::current_time_secs());
        if self.controller.is_dirty() {
            // Come back for the batched apply even if no input arrives
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}
