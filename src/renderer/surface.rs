//! Per-scene render surface
//!
//! Each scene owns one [`Surface`]: a retained display list of triangles plus
//! text labels. A frame is drawn between [`Surface::begin_frame`] and
//! [`Surface::end_frame`]; once closed, the list is the scene's last frame and
//! can be presented by the host or composited by a transition.

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use crate::assets::Image;

/// A piece of text to be laid out by the host (DOM overlay on the web)
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub position: Vec2,
    pub size: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone)]
pub struct Surface {
    width: f32,
    height: f32,
    vertices: Vec<Vertex>,
    labels: Vec<TextLabel>,
    drawing: bool,
    frames: u64,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            vertices: Vec::new(),
            labels: Vec::new(),
            drawing: false,
            frames: 0,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Open a frame, discarding the previous one
    pub fn begin_frame(&mut self) {
        debug_assert!(!self.drawing, "begin_frame while a frame is open");
        self.vertices.clear();
        self.labels.clear();
        self.drawing = true;
    }

    pub fn end_frame(&mut self) {
        debug_assert!(self.drawing, "end_frame without begin_frame");
        self.drawing = false;
        self.frames += 1;
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Number of completed frames
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    fn push(&mut self, vertices: Vec<Vertex>) {
        debug_assert!(self.drawing, "drawing outside a frame");
        self.vertices.extend(vertices);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: [f32; 4]) {
        self.push(shapes::rect(x, y, width, height, color));
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, weight: f32, color: [f32; 4]) {
        self.push(shapes::rect_outline(x, y, width, height, weight, color));
    }

    /// Fill the whole surface, e.g. a fade veil
    pub fn fill(&mut self, color: [f32; 4]) {
        let (w, h) = (self.width, self.height);
        self.fill_rect(0.0, 0.0, w, h, color);
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, weight: f32, color: [f32; 4]) {
        self.push(shapes::line(from, to, weight, color));
    }

    /// Circle given by its diameter
    pub fn circle(&mut self, center: Vec2, diameter: f32, color: [f32; 4]) {
        self.push(shapes::circle(center, diameter / 2.0, color, 16));
    }

    pub fn arc(&mut self, center: Vec2, width: f32, height: f32, start: f32, end: f32, color: [f32; 4]) {
        self.push(shapes::ellipse_arc(center, width, height, start, end, color, 12));
    }

    /// Draw an image at its natural size, optionally multiplied by a tint
    pub fn image(&mut self, image: &Image, x: f32, y: f32, tint: Option<[f32; 4]>) {
        let color = match tint {
            Some(t) => [
                image.color[0] * t[0],
                image.color[1] * t[1],
                image.color[2] * t[2],
                image.color[3] * t[3],
            ],
            None => image.color,
        };
        self.fill_rect(x, y, image.width, image.height, color);
    }

    pub fn text(&mut self, text: impl Into<String>, position: Vec2, size: f32, color: [f32; 4]) {
        debug_assert!(self.drawing, "drawing outside a frame");
        self.labels.push(TextLabel {
            text: text.into(),
            position,
            size,
            color,
        });
    }

    /// Rough advance width of a label, for centering
    pub fn text_width(text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * 0.5
    }

    /// Composite another surface's last completed frame
    pub fn blit(&mut self, other: &Surface) {
        debug_assert!(!other.drawing, "blitting a surface mid-frame");
        debug_assert!(self.drawing, "drawing outside a frame");
        self.vertices.extend_from_slice(&other.vertices);
        self.labels.extend(other.labels.iter().cloned());
    }

    /// Multiply the alpha of the text labels, used by fades
    pub fn fade_labels(&mut self, alpha: f32) {
        for label in &mut self.labels {
            label.color[3] *= alpha;
        }
    }
}
