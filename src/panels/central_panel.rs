use crate::compose::redraw;
use crate::surface::PainterSurface;
use crate::view::ViewTransform;
use crate::AnnotatorApp;

pub fn central_panel(app: &mut AnnotatorApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());

            let view = ViewTransform::new(response.rect.min, app.state.settings().view());
            app.handle_pointer(&response, view);

            // Input may have changed zoom or pan, so map with the settings as they are now
            let view = ViewTransform::new(response.rect.min, app.state.settings().view());
            let mut surface = PainterSurface::new(&painter, &mut app.textures, view);
            redraw(&mut surface, &app.scene, &app.state, &app.tools, &app.crop);
        });
}
