//! Shape tessellation for 2D primitives
//!
//! Everything is emitted as triangle lists in screen-pixel coordinates.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle
pub fn rect(x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) -> Vec<Vertex> {
    let (x2, y2) = (x + width, y + height);
    vec![
        Vertex::new(x, y, color),
        Vertex::new(x2, y, color),
        Vertex::new(x, y2, color),
        Vertex::new(x, y2, color),
        Vertex::new(x2, y, color),
        Vertex::new(x2, y2, color),
    ]
}

/// Rectangle outline of the given stroke weight, centered on the edges
pub fn rect_outline(x: f32, y: f32, width: f32, height: f32, weight: f32, color: [f32; 4]) -> Vec<Vertex> {
    let h = weight / 2.0;
    let mut vertices = Vec::with_capacity(24);
    vertices.extend(rect(x - h, y - h, width + weight, weight, color));
    vertices.extend(rect(x - h, y + height - h, width + weight, weight, color));
    vertices.extend(rect(x - h, y + h, weight, height - weight, color));
    vertices.extend(rect(x + width - h, y + h, weight, height - weight, color));
    vertices
}

/// Thick line segment as a quad
pub fn line(from: Vec2, to: Vec2, weight: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = Vec2::new(-dir.y, dir.x) * (weight / 2.0);

    let a = from + perp;
    let b = from - perp;
    let c = to + perp;
    let d = to - perp;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse_arc(center, radius * 2.0, radius * 2.0, 0.0, 2.0 * PI, color, segments)
}

/// Filled pie slice of an ellipse with the given full width/height,
/// sweeping from `start` to `end` radians (screen y grows downwards)
pub fn ellipse_arc(
    center: Vec2,
    width: f32,
    height: f32,
    start: f32,
    end: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let (rx, ry) = (width / 2.0, height / 2.0);
    let span = end - start;
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = start + (i as f32 / segments as f32) * span;
        let theta2 = start + ((i + 1) as f32 / segments as f32) * span;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + rx * theta1.cos(),
            center.y + ry * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + rx * theta2.cos(),
            center.y + ry * theta2.sin(),
            color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_covers_corners() {
        let v = rect(10.0, 20.0, 30.0, 40.0, [1.0; 4]);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 60.0);
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        let p = Vec2::new(5.0, 5.0);
        assert!(line(p, p, 3.0, [1.0; 4]).is_empty());
        assert_eq!(line(p, Vec2::new(10.0, 5.0), 3.0, [1.0; 4]).len(), 6);
    }

    #[test]
    fn test_lower_half_ellipse_stays_below_center() {
        let center = Vec2::new(100.0, 100.0);
        let v = ellipse_arc(center, 20.0, 10.0, 0.0, PI, [1.0; 4], 8);
        assert_eq!(v.len(), 24);
        assert!(v.iter().all(|v| v.position[1] >= center.y - 1e-3));
    }
}
