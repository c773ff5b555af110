use egui::{CursorIcon, Pos2, Rect};

/// Default pick radius around a resize handle, in canvas pixels
pub const RESIZE_HANDLE_RADIUS: f32 = 12.0;

/// A resize handle on an axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    /// Corners come first so they win over edge midpoints on tiny boxes
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomLeft,
        Handle::BottomRight,
        Handle::Top,
        Handle::Right,
        Handle::Bottom,
        Handle::Left,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Handle::TopLeft => "top_left",
            Handle::Top => "top",
            Handle::TopRight => "top_right",
            Handle::Right => "right",
            Handle::BottomRight => "bottom_right",
            Handle::Bottom => "bottom",
            Handle::BottomLeft => "bottom_left",
            Handle::Left => "left",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Handle::TopLeft | Handle::BottomRight => CursorIcon::ResizeNwSe,
            Handle::TopRight | Handle::BottomLeft => CursorIcon::ResizeNeSw,
            Handle::Top | Handle::Bottom => CursorIcon::ResizeVertical,
            Handle::Left | Handle::Right => CursorIcon::ResizeHorizontal,
        }
    }

    pub fn is_corner(&self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft | Handle::BottomRight
        )
    }

    /// Whether dragging this handle moves the left edge (-1), the right edge (+1) or neither (0)
    pub fn horizontal_sign(&self) -> i8 {
        match self {
            Handle::TopLeft | Handle::Left | Handle::BottomLeft => -1,
            Handle::TopRight | Handle::Right | Handle::BottomRight => 1,
            Handle::Top | Handle::Bottom => 0,
        }
    }

    /// Whether dragging this handle moves the top edge (-1), the bottom edge (+1) or neither (0)
    pub fn vertical_sign(&self) -> i8 {
        match self {
            Handle::TopLeft | Handle::Top | Handle::TopRight => -1,
            Handle::BottomLeft | Handle::Bottom | Handle::BottomRight => 1,
            Handle::Left | Handle::Right => 0,
        }
    }

    /// Position of the handle on `rect`
    pub fn position(&self, rect: Rect) -> Pos2 {
        match self {
            Handle::TopLeft => rect.left_top(),
            Handle::Top => rect.center_top(),
            Handle::TopRight => rect.right_top(),
            Handle::Right => rect.right_center(),
            Handle::BottomRight => rect.right_bottom(),
            Handle::Bottom => rect.center_bottom(),
            Handle::BottomLeft => rect.left_bottom(),
            Handle::Left => rect.left_center(),
        }
    }
}

/// Find the handle of `rect` within `radius` of `pos`, checking corners first
pub fn handle_at(pos: Pos2, rect: Rect, radius: f32) -> Option<Handle> {
    Handle::ALL
        .iter()
        .copied()
        .find(|handle| pos.distance(handle.position(rect)) <= radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_wins_over_edge() {
        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(10.0, 10.0));
        // Close to both the top-left corner and the top/left midpoints
        assert_eq!(handle_at(Pos2::new(1.0, 1.0), rect, 6.0), Some(Handle::TopLeft));
    }

    #[test]
    fn test_edge_and_miss() {
        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 50.0));
        assert_eq!(handle_at(Pos2::new(50.0, 49.0), rect, RESIZE_HANDLE_RADIUS), Some(Handle::Bottom));
        assert_eq!(handle_at(Pos2::new(50.0, 25.0), rect, RESIZE_HANDLE_RADIUS), None);
    }
}
