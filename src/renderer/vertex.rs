//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::rgb8;

/// 2D vertex in screen pixels with a straight-alpha color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for game elements
pub mod colors {
    use super::rgb8;

    pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const RED: [f32; 4] = rgb8(255, 0, 0);
    pub const YELLOW: [f32; 4] = rgb8(255, 255, 0);

    // Match sticks are two offset lines for a cheap perspective look
    pub const STICK_LIGHT: [f32; 4] = rgb8(255, 237, 181);
    pub const STICK_DARK: [f32; 4] = rgb8(214, 199, 153);
    pub const HEAD_COLD: [f32; 4] = rgb8(188, 32, 0);
    pub const HEAD_ASH: [f32; 4] = rgb8(74, 52, 52);

    pub const LIFE_BAR: [f32; 4] = rgb8(200, 0, 0);
    pub const LIFE_SHINE: [f32; 4] = rgb8(255, 0, 0);
    pub const POWER_BAR: [f32; 4] = rgb8(0, 0, 255);
    pub const BAR_BORDER_IDLE: [f32; 4] = rgb8(55, 55, 55);
    pub const BAR_BORDER_PENDING: [f32; 4] = WHITE;

    pub const BUTTON_NORMAL: [f32; 4] = rgb8(190, 34, 0);
    pub const BUTTON_OVER: [f32; 4] = rgb8(254, 180, 38);
    pub const BUTTON_ACTIVE: [f32; 4] = rgb8(255, 255, 255);
    pub const SLIDER_TRACK: [f32; 4] = [0.0, 0.0, 0.0, 100.0 / 255.0];

    pub const BACKGROUND: [f32; 4] = [0.02, 0.02, 0.05, 1.0];
}
