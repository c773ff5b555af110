use egui::{Pos2, Rect, Vec2};
use frame_annotator::drawing::ToolData;
use frame_annotator::{DrawOp, EngineConfig, RecordingSurface, ToolKind, ToolManager, ViewSnapshot};

fn manager_with(kind: ToolKind) -> ToolManager {
    let mut manager = ToolManager::new(&EngineConfig::default());
    assert!(manager.activate(kind));
    manager
}

#[test]
fn test_brush_rejects_jitter_and_fills_gaps() {
    let mut manager = manager_with(ToolKind::Brush);
    manager.start_drawing(Pos2::new(10.0, 10.0), ViewSnapshot::default());

    let path = manager.continue_drawing_at(Pos2::new(10.0, 10.0), 16.0).unwrap();
    assert_eq!(path.path().len(), 1);

    let path = manager.continue_drawing_at(Pos2::new(50.0, 10.0), 32.0).unwrap();
    assert_eq!(path.path().len(), 4);
    assert_eq!(*path.path().last().unwrap(), Pos2::new(50.0, 10.0));
    for pair in path.path().windows(2) {
        assert!(pair[0].distance(pair[1]) <= 15.0 + 1e-3);
    }

    let drawing = manager.finish_drawing().unwrap();
    let smoothed = drawing.smoothed_path();
    assert_eq!(smoothed.first(), Some(&Pos2::new(10.0, 10.0)));
    assert_eq!(smoothed.last(), Some(&Pos2::new(50.0, 10.0)));

    let ToolData::Brush(stroke) = drawing.data() else {
        panic!("brush drawing without brush data");
    };
    assert_eq!(stroke.pressures.len(), drawing.path().len());
    assert_eq!(stroke.smoothed_pressures.len(), smoothed.len());
    assert!(stroke.pressures.iter().all(|p| (0.2..=1.0).contains(p)));
}

#[test]
fn test_rectangle_normalises_backwards_drag() {
    let mut manager = manager_with(ToolKind::Rectangle);
    manager.start_drawing(Pos2::ZERO, ViewSnapshot::default());
    manager.continue_drawing_at(Pos2::new(-20.0, -30.0), 0.0);
    let drawing = manager.finish_drawing().unwrap();

    let mut surface = RecordingSurface::new();
    manager.render_drawing(&mut surface, &drawing);
    let expected = Rect::from_min_size(Pos2::new(-20.0, -30.0), Vec2::new(20.0, 30.0));
    assert!(surface
        .ops()
        .iter()
        .any(|op| matches!(op, DrawOp::StrokeRect { rect, .. } if *rect == expected)));
    assert_eq!(surface.save_depth(), 0);
}

#[test]
fn test_circle_radius_is_drag_distance() {
    let mut manager = manager_with(ToolKind::Circle);
    manager.start_drawing(Pos2::new(100.0, 100.0), ViewSnapshot::default());
    manager.continue_drawing_at(Pos2::new(110.0, 100.0), 0.0);
    let drawing = manager.finish_drawing().unwrap();

    let mut surface = RecordingSurface::new();
    manager.render_drawing(&mut surface, &drawing);
    let circle = surface.ops().iter().find_map(|op| match op {
        DrawOp::StrokeCircle { center, radius, .. } => Some((*center, *radius)),
        _ => None,
    });
    assert_eq!(circle, Some((Pos2::new(100.0, 100.0), 10.0)));
}

#[test]
fn test_two_anchor_tools_hold_exactly_two_points() {
    for kind in [ToolKind::Line, ToolKind::Rectangle, ToolKind::Circle] {
        let mut manager = manager_with(kind);
        manager.start_drawing(Pos2::new(1.0, 1.0), ViewSnapshot::default());
        for step in 0..10 {
            let path = manager
                .continue_drawing_at(Pos2::new(step as f32 * 7.0, 3.0), step as f64)
                .unwrap();
            assert_eq!(path.path().len(), 2, "{kind}");
        }
    }
}

#[test]
fn test_degenerate_drawings_paint_nothing() {
    for kind in [ToolKind::Line, ToolKind::Rectangle, ToolKind::Circle] {
        let mut manager = manager_with(kind);
        manager.start_drawing(Pos2::new(5.0, 5.0), ViewSnapshot::default());
        let drawing = manager.finish_drawing().unwrap();

        let mut surface = RecordingSurface::new();
        manager.render_drawing(&mut surface, &drawing);
        assert!(surface.ops().is_empty(), "{kind}");
        assert_eq!(surface.save_depth(), 0);
    }
}

#[test]
fn test_unknown_tool_keeps_active_tool() {
    let mut manager = manager_with(ToolKind::Line);
    assert!(!manager.activate_tool("lasso"));
    assert_eq!(manager.active_kind(), Some(ToolKind::Line));
    assert!(manager.activate_tool("circle"));
    assert_eq!(manager.active_kind(), Some(ToolKind::Circle));
}

#[test]
fn test_switching_tools_drops_open_path() {
    let mut manager = manager_with(ToolKind::Brush);
    manager.start_drawing(Pos2::ZERO, ViewSnapshot::default());
    assert!(manager.is_drawing());
    manager.activate(ToolKind::Eraser);
    assert!(!manager.is_drawing());
    assert!(manager.finish_drawing().is_none());
}

#[test]
fn test_no_active_tool_means_no_path() {
    let mut manager = ToolManager::new(&EngineConfig::default());
    assert!(manager.start_drawing(Pos2::ZERO, ViewSnapshot::default()).is_none());
    assert!(manager.continue_drawing_at(Pos2::new(4.0, 4.0), 1.0).is_none());
    assert!(manager.finish_drawing().is_none());
}
