//! Hell's Matches - a side-scrolling arcade game over a chain of burning matches
//!
//! Core modules:
//! - `clock`: Per-frame delta from monotonic timestamps
//! - `input`: Edge-latched pointer/button/key snapshot
//! - `scene`: Scene lifecycle, the closed set of scene kinds and the sequencer
//! - `sim`: Deterministic world simulation (terrain, fire, collisions, meters)
//! - `renderer`: Per-scene surfaces and the WebGPU presentation pipeline
//! - `audio`, `assets`, `ui`: Collaborators consumed by the scenes
//! - `settings`: Data-driven configuration

pub mod assets;
pub mod audio;
pub mod clock;
pub mod game;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::Game;
pub use settings::{Settings, Theme};

/// Game configuration constants
pub mod consts {
    /// Display surface dimensions
    pub const SCREEN_WIDTH: u32 = 1600;
    pub const SCREEN_HEIGHT: u32 = 800;
    /// Target update rate (not guaranteed, delta timing compensates)
    pub const TARGET_FPS: u32 = 60;

    /// Default scene timings (ms)
    pub const CARD_DURATION_MS: u64 = 5000;
    pub const TRANSITION_DURATION_MS: u64 = 1000;

    /// Horizontal distance between two consecutive path slots; also the match head size
    pub const MATCH_HEAD_RADIUS: f32 = 15.0;
    /// Perspective correction between sprite boxes and match heads
    pub const PERSP_X_ADJUST: f32 = -75.0;

    /// Match fire model
    pub const HEAT_IGNITE: f32 = 25.0;
    pub const HEAT_TRANSMISSION: f32 = 5.0;
    pub const MAX_INTENSITY: f32 = 150.0;
    pub const INTENSITY_DECAY: f32 = 2.0;
    /// Chance (per mille, per tick) of a spontaneous ignition somewhere on the path
    pub const SPONTANEOUS_IGNITION_PER_MILLE: u32 = 10;
    /// Chance (percent) that a generated match has no head
    pub const IGNITELESS_PERCENT: u32 = 5;

    /// Terrain scroll speed (px/tick) and its growth period
    pub const BASE_TERRAIN_SPEED: f32 = 10.0;
    pub const SPEED_UP_EVERY_MS: u64 = 5000;

    /// Pickups
    pub const COIN_VALUE: i64 = 50;
    pub const HEART_VALUE: i64 = 10;
    pub const FLASK_VALUE: i64 = 30;
    pub const ITEM_ENABLED_PERCENT: u32 = 5;
    pub const ITEM_Y_OFFSET: f32 = -75.0;
    /// Collected items float up this far per tick
    pub const PICKUP_RISE: f32 = 10.0;
    /// Collected items jump up this far before rising
    pub const PICKUP_LIFT: f32 = 50.0;
    pub const ITEM_SIZE: f32 = 50.0;

    /// Hazards
    pub const ENEMY_KINDS: u8 = 2;
    pub const ENEMY_ENABLED_PER_MILLE: u32 = 10;
    pub const ENEMY_Y_OFFSET: f32 = -150.0;
    pub const ENEMY_SIZE: f32 = 100.0;

    /// Avatar
    pub const TURKEY_SIZE: f32 = 150.0;
    pub const MAX_LIFE: i64 = 100;
    pub const MAX_POWER: i64 = 100;
    pub const FLY_THRUST: f32 = -20.0;
    pub const GRAVITY: f32 = 1.0;
    pub const FLY_POWER_COST: i64 = 2;
    pub const INVULNERABLE_MS: u64 = 1500;

    /// Collision padding (px) applied inward on both boxes
    pub const SPRITE_PADDING: f32 = 10.0;
    pub const FLAME_PADDING: f32 = 5.0;

    /// Meter drain rates (units per tick)
    pub const SCORE_DRAIN: i64 = 5;
    pub const BAR_DRAIN: i64 = 1;

    /// Animations advance one frame per this many ms (25 fps)
    pub const ANIMATION_FRAME_MS: u64 = 40;
}

/// Linear interpolation between two RGBA colors
#[inline]
pub fn lerp_color(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Convert 8-bit RGB to a normalized opaque color
#[inline]
pub const fn rgb8(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}
