//! Heat diffusion and fire along the path
//!
//! One fire step runs in this order:
//! 1. rare spontaneous ignition of one unburnt match
//! 2. burning matches lose intensity
//! 3. matches at the heat threshold ignite
//! 4. burning matches pass heat to eligible neighbors
//! 5. neighbors that reached the threshold ignite
//!
//! so at the end of every step each unused match sits below the threshold.

use rand::Rng;

use super::collision::Aabb;
use super::state::PathSlot;
use crate::consts::*;
use crate::lerp_color;
use crate::rgb8;

/// Run a full fire step; returns the generations that ignited
pub fn step(slots: &mut [PathSlot], rng: &mut impl Rng, per_mille: u32) -> Vec<u64> {
    spontaneous_ignition(slots, rng, per_mille);
    decay(slots);
    let mut ignited = ignite(slots);
    transmit(slots);
    ignited.extend(ignite(slots));
    ignited
}

/// With `per_mille` chance, raise one random unburnt match to the threshold
pub fn spontaneous_ignition(slots: &mut [PathSlot], rng: &mut impl Rng, per_mille: u32) -> Option<usize> {
    if rng.random_range(0..1000) >= per_mille {
        return None;
    }
    let candidates: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.segment.takes_heat())
        .map(|(i, _)| i)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let index = candidates[rng.random_range(0..candidates.len())];
    slots[index].segment.heat = HEAT_IGNITE;
    log::trace!("spontaneous ignition at slot {}", slots[index].generation);
    Some(index)
}

pub fn decay(slots: &mut [PathSlot]) {
    for slot in slots.iter_mut().filter(|s| s.segment.is_burning()) {
        slot.segment.intensity = (slot.segment.intensity - INTENSITY_DECAY).max(0.0);
    }
}

pub fn ignite(slots: &mut [PathSlot]) -> Vec<u64> {
    let mut ignited = Vec::new();
    for slot in slots.iter_mut() {
        let segment = &mut slot.segment;
        if !segment.used && segment.heat >= HEAT_IGNITE {
            segment.ignite();
            ignited.push(slot.generation);
        }
    }
    ignited
}

/// Pass heat from every burning match to its immediate neighbors
pub fn transmit(slots: &mut [PathSlot]) {
    let mut receivers = Vec::new();
    for (i, slot) in slots.iter().enumerate() {
        if !slot.segment.is_burning() {
            continue;
        }
        if i > 0 {
            receivers.push(i - 1);
        }
        if i + 1 < slots.len() {
            receivers.push(i + 1);
        }
    }
    for i in receivers {
        let segment = &mut slots[i].segment;
        if segment.takes_heat() {
            segment.heat += HEAT_TRANSMISSION;
        }
    }
}

/// Flame silhouette height for an intensity
pub fn flame_height(intensity: f32) -> f32 {
    (MATCH_HEAD_RADIUS * 8.0 * intensity / MAX_INTENSITY).trunc()
}

/// Damage a flame deals on contact
pub fn flame_damage(intensity: f32) -> i64 {
    intensity as i64 / 10
}

/// Collision box of a lit flame, standing on the match head
pub fn flame_box(slot: &PathSlot) -> Option<Aabb> {
    let segment = &slot.segment;
    if !segment.is_burning() {
        return None;
    }
    let h = flame_height(segment.intensity);
    Some(Aabb::new(segment.position.x, segment.position.y - h, MATCH_HEAD_RADIUS, h))
}

/// Gradient used for flames and the game-over label
#[derive(Debug, Clone)]
pub struct FirePalette {
    colors: Vec<[f32; 4]>,
}

impl Default for FirePalette {
    fn default() -> Self {
        Self::new()
    }
}

impl FirePalette {
    const STEPS: usize = 64;

    pub fn new() -> Self {
        let stops = [
            rgb8(255, 255, 255),
            rgb8(255, 255, 255),
            rgb8(255, 255, 0),
            rgb8(255, 194, 0),
            rgb8(100, 100, 0),
            rgb8(50, 0, 0),
        ];
        let mut colors = Vec::with_capacity((stops.len() - 1) * Self::STEPS);
        for pair in stops.windows(2) {
            for step in 0..Self::STEPS {
                colors.push(lerp_color(pair[0], pair[1], step as f32 / Self::STEPS as f32));
            }
        }
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `value` as if the palette had `max` entries
    pub fn color(&self, value: f32, max: f32) -> [f32; 4] {
        let index = (value.max(0.0) * self.colors.len() as f32 / max.max(f32::EPSILON)) as usize;
        self.colors[index.min(self.colors.len() - 1)]
    }

    /// Flame color: white-hot when fresh, dark red when dying
    pub fn flame(&self, intensity: f32) -> [f32; 4] {
        self.color(MAX_INTENSITY - intensity, MAX_INTENSITY)
    }
}
