use crate::crop::CropOverlay;
use crate::filter::ImageFilter;
use crate::scene::Scene;
use crate::state::CanvasState;
use crate::surface::Surface;
use crate::tool::ToolManager;

/// Repaint the whole canvas.
///
/// Order: clear, background frame under the current filter, image objects
/// unfiltered, committed drawings, the open path, then the crop overlay.
/// The output depends only on the arguments, so repeated calls with the same
/// inputs paint the same thing.
pub fn redraw(
    surface: &mut dyn Surface,
    scene: &Scene,
    state: &CanvasState,
    tools: &ToolManager,
    crop: &CropOverlay,
) {
    surface.clear();

    if let Some(frame) = scene.background() {
        surface.draw_frame(frame, scene.canvas_rect(), state.settings().filter());
    }
    for object in scene.objects() {
        surface.draw_frame(&object.frame, object.bounds, ImageFilter::NEUTRAL);
    }

    for drawing in state.drawings() {
        tools.render_drawing(surface, drawing);
    }
    tools.render_preview(surface);

    crop.render(surface);
}
