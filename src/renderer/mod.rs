//! Rendering module
//!
//! Scenes draw into their own [`Surface`]; the WebGPU pipeline presents
//! whichever surface the sequencer exposes this frame.

pub mod pipeline;
pub mod shapes;
pub mod surface;
pub mod vertex;

pub use pipeline::RenderState;
pub use surface::{Surface, TextLabel};
pub use vertex::{Vertex, colors};
