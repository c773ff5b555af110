//! Pure geometry helpers shared by the tools and the crop overlay.

pub mod hit_testing;

use egui::{Pos2, Rect};

/// Euclidean distance between two points
pub fn distance(a: Pos2, b: Pos2) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Linear interpolation between two points, `t = 0` gives `a`, `t = 1` gives `b`
pub fn lerp(a: Pos2, b: Pos2, t: f32) -> Pos2 {
    Pos2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Evaluate the Catmull-Rom segment between `p1` and `p2` at `t` in `[0, 1]`.
///
/// `p0` and `p3` are the outer neighbours. Tangents use the classic 0.5 tension.
pub fn catmull_rom(p0: Pos2, p1: Pos2, p2: Pos2, p3: Pos2, t: f32) -> Pos2 {
    let t2 = t * t;
    let t3 = t2 * t;

    let v0x = (p2.x - p0.x) * 0.5;
    let v0y = (p2.y - p0.y) * 0.5;
    let v1x = (p3.x - p1.x) * 0.5;
    let v1y = (p3.y - p1.y) * 0.5;

    Pos2::new(
        (2.0 * p1.x - 2.0 * p2.x + v0x + v1x) * t3
            + (-3.0 * p1.x + 3.0 * p2.x - 2.0 * v0x - v1x) * t2
            + v0x * t
            + p1.x,
        (2.0 * p1.y - 2.0 * p2.y + v0y + v1y) * t3
            + (-3.0 * p1.y + 3.0 * p2.y - 2.0 * v0y - v1y) * t2
            + v0y * t
            + p1.y,
    )
}

/// True if the segment `start..end` passes within `radius` of `center`.
///
/// Solves the quadratic for the infinite line and checks that one of the
/// roots lies on the segment. A segment fully inside the circle has both
/// roots outside `[0, 1]`, so that case is checked via the start point.
pub fn segment_intersects_circle(start: Pos2, end: Pos2, center: Pos2, radius: f32) -> bool {
    if distance(start, center) <= radius {
        return true;
    }

    let a_x = end.x - start.x;
    let a_y = end.y - start.y;
    let c_x = start.x - center.x;
    let c_y = start.y - center.y;

    let a = a_x * a_x + a_y * a_y;
    if a == 0.0 {
        return false;
    }
    let b = 2.0 * (a_x * c_x + a_y * c_y);
    let c = c_x * c_x + c_y * c_y - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return false;
    }

    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);
    (0.0..=1.0).contains(&t1) || (0.0..=1.0).contains(&t2)
}

/// Axis-aligned rectangle spanned by two anchors, in any drag direction
pub fn rect_from_anchors(start: Pos2, end: Pos2) -> Rect {
    Rect::from_min_max(
        Pos2::new(start.x.min(end.x), start.y.min(end.y)),
        Pos2::new(start.x.max(end.x), start.y.max(end.y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_and_lerp() {
        let a = Pos2::new(0.0, 0.0);
        let b = Pos2::new(3.0, 4.0);
        assert_eq!(distance(a, b), 5.0);
        assert_eq!(lerp(a, b, 0.5), Pos2::new(1.5, 2.0));
        assert_eq!(lerp(a, b, 1.0), b);
    }

    #[test]
    fn test_catmull_rom_hits_control_points() {
        let p0 = Pos2::new(0.0, 0.0);
        let p1 = Pos2::new(10.0, 5.0);
        let p2 = Pos2::new(20.0, -5.0);
        let p3 = Pos2::new(30.0, 0.0);
        assert_eq!(catmull_rom(p0, p1, p2, p3, 0.0), p1);
        let end = catmull_rom(p0, p1, p2, p3, 1.0);
        assert!((end.x - p2.x).abs() < 1e-4 && (end.y - p2.y).abs() < 1e-4);
    }

    #[test]
    fn test_segment_circle_intersection() {
        let center = Pos2::new(50.0, 0.0);
        // Passes straight through the circle
        assert!(segment_intersects_circle(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), center, 5.0));
        // Stops short of it
        assert!(!segment_intersects_circle(Pos2::new(0.0, 0.0), Pos2::new(40.0, 0.0), center, 5.0));
        // Parallel, too far away
        assert!(!segment_intersects_circle(Pos2::new(0.0, 10.0), Pos2::new(100.0, 10.0), center, 5.0));
        // Entirely inside
        assert!(segment_intersects_circle(Pos2::new(49.0, 0.0), Pos2::new(51.0, 0.0), center, 5.0));
    }

    #[test]
    fn test_rect_from_anchors_any_direction() {
        let rect = rect_from_anchors(Pos2::new(0.0, 0.0), Pos2::new(-20.0, -30.0));
        assert_eq!(rect.min, Pos2::new(-20.0, -30.0));
        assert_eq!(rect.width(), 20.0);
        assert_eq!(rect.height(), 30.0);
    }
}
