use egui::{Pos2, Rect, Vec2};
use frame_annotator::config::CropSettings;
use frame_annotator::crop::CropTarget;
use frame_annotator::{AspectRatio, CropError, CropOverlay, Frame, ImageObject, Scene};
use image::{Rgba, RgbaImage};

fn scene_with_background(width: u32, height: u32) -> Scene {
    let mut scene = Scene::new(Vec2::new(width as f32, height as f32));
    scene.set_background(Frame::new(RgbaImage::from_pixel(width, height, Rgba([90, 90, 90, 255]))));
    scene
}

fn area(rect: Rect) -> f32 {
    rect.width() * rect.height()
}

#[test]
fn test_enter_without_image_fails() {
    let mut overlay = CropOverlay::default();
    assert_eq!(overlay.enter(&Scene::default()), Err(CropError::NoTarget));
    assert!(!overlay.is_active());
    assert_eq!(overlay.apply(&mut Scene::default()).unwrap_err(), CropError::NotActive);
}

#[test]
fn test_initial_box_is_centred_and_capped() {
    let scene = scene_with_background(800, 600);
    let mut overlay = CropOverlay::new(CropSettings::default());
    overlay.enter(&scene).unwrap();

    let rect = overlay.crop_box().unwrap().rect();
    assert_eq!(rect.width(), 300.0);
    assert_eq!(rect.center(), scene.canvas_rect().center());
    assert_eq!(overlay.target(), Some(CropTarget::Background));
}

#[test]
fn test_masks_and_box_tile_the_bounds() {
    let scene = scene_with_background(800, 600);
    let mut overlay = CropOverlay::default();
    overlay.enter(&scene).unwrap();

    // Drag the box off-centre first so every mask has a different size
    let start = overlay.crop_box().unwrap().rect().center();
    assert!(overlay.begin_drag(start));
    overlay.drag_to(start + Vec2::new(-120.0, 45.0));
    overlay.end_drag();

    let rect = overlay.crop_box().unwrap().rect();
    let masks = overlay.masks().unwrap();
    let covered: f32 = masks.iter().copied().map(area).sum::<f32>() + area(rect);
    assert!((covered - area(overlay.bounds().unwrap())).abs() < 0.5);
}

#[test]
fn test_moving_the_box_stays_inside_bounds() {
    let scene = scene_with_background(800, 600);
    let mut overlay = CropOverlay::default();
    overlay.enter(&scene).unwrap();

    let start = overlay.crop_box().unwrap().rect().center();
    overlay.begin_drag(start);
    overlay.drag_to(start + Vec2::new(5000.0, -5000.0));
    let rect = overlay.crop_box().unwrap().rect();
    assert_eq!(rect.max.x, 800.0);
    assert_eq!(rect.min.y, 0.0);
    assert!(overlay.is_dragging());
}

#[test]
fn test_aspect_change_recreates_centred_box() {
    let scene = scene_with_background(800, 600);
    let mut overlay = CropOverlay::default();
    overlay.enter(&scene).unwrap();

    let start = overlay.crop_box().unwrap().rect().center();
    overlay.begin_drag(start);
    overlay.drag_to(start + Vec2::new(100.0, 0.0));

    overlay.set_aspect(AspectRatio::Square);
    let rect = overlay.crop_box().unwrap().rect();
    assert_eq!(rect.width(), rect.height());
    assert_eq!(rect.center(), scene.canvas_rect().center());
    assert!(!overlay.is_dragging());
}

#[test]
fn test_cancel_leaves_scene_untouched() {
    let scene = scene_with_background(640, 480);
    let before_size = scene.canvas_size();
    let before_frame = scene.background().map(Frame::id);

    let mut overlay = CropOverlay::default();
    overlay.enter(&scene).unwrap();
    let start = overlay.crop_box().unwrap().rect().center();
    overlay.begin_drag(start);
    overlay.drag_to(start + Vec2::new(30.0, 30.0));
    overlay.cancel();

    assert!(!overlay.is_active());
    assert!(overlay.masks().is_none());
    assert_eq!(scene.canvas_size(), before_size);
    assert_eq!(scene.background().map(Frame::id), before_frame);
}

#[test]
fn test_apply_resizes_canvas_to_crop() {
    let mut scene = scene_with_background(800, 600);
    let old_frame = scene.background().map(Frame::id);
    let mut overlay = CropOverlay::default();
    overlay.enter(&scene).unwrap();
    overlay.set_aspect(AspectRatio::Widescreen);

    let applied = overlay.apply(&mut scene).unwrap();
    assert!(!overlay.is_active());

    let size = scene.canvas_size();
    assert_eq!(applied.output_size, [size.x as u32, size.y as u32]);
    assert_eq!(size, Vec2::new(applied.rect.width.round(), applied.rect.height.round()));

    let background = scene.background().unwrap();
    assert_ne!(Some(background.id()), old_frame);
    assert_eq!([background.width(), background.height()], applied.output_size);
}

#[test]
fn test_object_is_cropped_when_no_background() {
    let mut scene = Scene::default();
    let small = Frame::new(RgbaImage::new(40, 40));
    let large = Frame::new(RgbaImage::from_pixel(200, 100, Rgba([255, 0, 0, 255])));
    scene.add_object(ImageObject::at_native_size(small, Pos2::new(0.0, 0.0)));
    let index = scene.add_object(ImageObject::at_native_size(large, Pos2::new(50.0, 50.0)));

    let mut overlay = CropOverlay::default();
    overlay.enter(&scene).unwrap();
    assert_eq!(overlay.target(), Some(CropTarget::Object(index)));

    let selected = overlay.crop_box().unwrap().rect();
    let applied = overlay.apply(&mut scene).unwrap();
    let object = &scene.objects()[index];
    assert_eq!(object.bounds, selected);
    assert_eq!([object.frame.width(), object.frame.height()], applied.output_size);
    assert_eq!(object.frame.pixels().get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
}
