//! Procedural terrain
//!
//! Heights come from a deterministic function of the generation counter, never
//! of scroll position, so the path looks the same at any frame rate.

use std::f32::consts::TAU;

/// Generation counter units per terrain sample
const SAMPLE_DIVISOR: f32 = 50.0;

/// Cosine of `t` periods scaled by `amplitude`
fn wave(t: f32, amplitude: f32) -> f32 {
    amplitude * (TAU * t).cos()
}

/// Y of the path segment generated at `counter` for a viewport `height` px tall
pub fn terrain_height(counter: u64, height: u32) -> f32 {
    let x = counter as f32 / SAMPLE_DIVISOR;
    let period = x % TAU;
    // Sawtooth ramp over three nested cosines
    let ramp = -50.0 + x % 100.0;
    let hills = wave(period, 50.0) * wave(period / 2.0, 2.0) * wave(period / 4.0, 1.0);
    let baseline = (2 * height / 3) as f32;
    baseline + (ramp + hills).trunc()
}
