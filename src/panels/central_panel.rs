use crate::PaintApp;
use crate::renderer::fit_canvas_rect;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let available = ui.available_rect_before_wrap();
        let Some(canvas_size) = app.controller().canvas().map(|c| c.size()) else {
            ui.label("Waiting for canvas…");
            return;
        };
        let canvas_rect = fit_canvas_rect(available, canvas_size);

        // Handle input
        app.handle_input(ctx, canvas_rect);

        // Render the canvas
        app.render_canvas(ui.painter(), canvas_rect);
    });
}
