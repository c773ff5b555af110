use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke};
use log::warn;

use super::{PaintState, StateStack, Surface};
use crate::filter::ImageFilter;
use crate::scene::Frame;
use crate::texture_manager::TextureManager;
use crate::view::ViewTransform;

// Segments used when a dashed circle is flattened into a polyline
const CIRCLE_SEGMENTS: usize = 64;

/// Surface backed by an egui painter. Canvas coordinates are mapped through
/// the view transform, so zoom and pan are applied here and nowhere else.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    textures: &'a mut TextureManager,
    view: ViewTransform,
    background: Color32,
    stack: StateStack,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, textures: &'a mut TextureManager, view: ViewTransform) -> Self {
        Self {
            painter,
            textures,
            view,
            background: Color32::BLACK,
            stack: StateStack::default(),
        }
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    fn stroke(&self) -> Stroke {
        let state = self.stack.current();
        Stroke::new(self.view.scale(state.line_width), state.effective_stroke())
    }

    fn add_polyline(&self, screen_points: Vec<Pos2>) {
        let state: &PaintState = self.stack.current();
        let stroke = self.stroke();
        match state.dash {
            Some(dash) => {
                self.painter.extend(Shape::dashed_line(
                    &screen_points,
                    stroke,
                    self.view.scale(dash.on),
                    self.view.scale(dash.off),
                ));
            }
            None => {
                self.painter.add(Shape::line(screen_points, stroke));
            }
        }
    }
}

impl Surface for PainterSurface<'_> {
    fn state(&self) -> &PaintState {
        self.stack.current()
    }

    fn state_mut(&mut self) -> &mut PaintState {
        self.stack.current_mut()
    }

    fn save(&mut self) {
        self.stack.save();
    }

    fn restore(&mut self) {
        self.stack.restore();
    }

    fn clear(&mut self) {
        self.painter.rect_filled(self.painter.clip_rect(), 0.0, self.background);
    }

    fn stroke_path(&mut self, points: &[Pos2]) {
        if points.len() < 2 {
            return;
        }
        let screen_points = points.iter().map(|p| self.view.to_screen(*p)).collect();
        self.add_polyline(screen_points);
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32) {
        if self.stack.current().dash.is_some() {
            let points = (0..=CIRCLE_SEGMENTS)
                .map(|i| {
                    let angle = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                    self.view
                        .to_screen(center + egui::vec2(angle.cos(), angle.sin()) * radius)
                })
                .collect();
            self.add_polyline(points);
        } else {
            self.painter
                .circle_stroke(self.view.to_screen(center), self.view.scale(radius), self.stroke());
        }
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32) {
        let color = self.stack.current().effective_fill();
        self.painter
            .circle_filled(self.view.to_screen(center), self.view.scale(radius), color);
    }

    fn stroke_rect(&mut self, rect: Rect, corner_radius: f32) {
        let screen = self.view.to_screen_rect(rect);
        if self.stack.current().dash.is_some() {
            // Dashed outlines ignore rounding
            let corners = vec![
                screen.left_top(),
                screen.right_top(),
                screen.right_bottom(),
                screen.left_bottom(),
                screen.left_top(),
            ];
            self.add_polyline(corners);
        } else {
            self.painter
                .rect_stroke(screen, self.view.scale(corner_radius), self.stroke());
        }
    }

    fn fill_rect(&mut self, rect: Rect, corner_radius: f32) {
        let color = self.stack.current().effective_fill();
        self.painter
            .rect_filled(self.view.to_screen_rect(rect), self.view.scale(corner_radius), color);
    }

    fn draw_frame(&mut self, frame: &Frame, dest: Rect, filter: ImageFilter) {
        match self.textures.texture_for(frame, filter, self.painter.ctx()) {
            Ok(texture) => {
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                let tint = Color32::WHITE.gamma_multiply(self.stack.current().alpha);
                self.painter
                    .image(texture, self.view.to_screen_rect(dest), uv, tint);
            }
            Err(err) => warn!("Skipping frame {:?}: {}", frame.id(), err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Dash;
    use image::RgbaImage;

    #[test]
    fn test_painter_surface_draws_without_panicking() {
        let ctx = egui::Context::default();
        let mut textures = TextureManager::default();
        let frame = Frame::new(RgbaImage::new(4, 4));

        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            let view = ViewTransform {
                origin: Pos2::new(10.0, 10.0),
                zoom: 2.0,
                pan: egui::Vec2::ZERO,
            };
            let mut surface = PainterSurface::new(&painter, &mut textures, view);

            surface.clear();
            surface.draw_frame(&frame, Rect::from_min_size(Pos2::ZERO, egui::vec2(4.0, 4.0)), ImageFilter::NEUTRAL);
            surface.save();
            surface.state_mut().dash = Some(Dash::new(5.0, 5.0));
            surface.stroke_circle(Pos2::new(5.0, 5.0), 3.0);
            surface.stroke_rect(Rect::from_min_size(Pos2::ZERO, egui::vec2(3.0, 3.0)), 0.0);
            surface.restore();
            surface.stroke_path(&[Pos2::ZERO, Pos2::new(5.0, 5.0)]);
            assert_eq!(surface.state().dash, None);
        });

        assert_eq!(textures.len(), 1);
    }
}
