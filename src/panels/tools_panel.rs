use crate::PaintApp;
use crate::components::{ColorSwatch, ToolButton};
use crate::config::{MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
use crate::controller::PaintCommand;
use crate::tools::ToolKind;

const SWATCHES_PER_ROW: usize = 7;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            let mut commands = Vec::new();
            let controller = app.controller();

            ui.heading("Tools");
            let active = controller.current_tool();
            ui.horizontal_wrapped(|ui| {
                for kind in ToolKind::ALL {
                    if ToolButton::new(kind, kind == active).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", kind.name());
                        commands.push(PaintCommand::SelectTool(kind.index()));
                    }
                }
            });
            ui.label(format!(
                "Tool: {} ({})",
                controller.current_tool_name(),
                controller.gesture_state_name()
            ));
            ui.separator();

            ui.heading("Color");
            let current = controller.current_color();
            ui.horizontal(|ui| {
                ui.label("Current:");
                let _ = ColorSwatch::new(current, false).show(ui);
            });
            egui::Grid::new("color_palette_grid")
                .spacing([4.0, 4.0])
                .show(ui, |ui| {
                    for (index, &color) in controller.color_palette().iter().enumerate() {
                        if ColorSwatch::new(color, color == current).show(ui).clicked() {
                            commands.push(PaintCommand::SetColor(index));
                        }
                        if (index + 1) % SWATCHES_PER_ROW == 0 {
                            ui.end_row();
                        }
                    }
                });
            ui.separator();

            let mut brush_size = controller.brush_size();
            ui.horizontal(|ui| {
                ui.label("Brush size:");
                if ui
                    .add(egui::Slider::new(&mut brush_size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE))
                    .changed()
                {
                    commands.push(PaintCommand::SetBrushSize(brush_size));
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Undo").clicked() {
                    commands.push(PaintCommand::Undo);
                }
                if ui.button("Clear").clicked() {
                    commands.push(PaintCommand::Clear);
                }
                if ui.button("Save").clicked() {
                    commands.push(PaintCommand::Save);
                }
            });

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }

            for command in commands {
                app.execute_command(command);
            }
        });
}
