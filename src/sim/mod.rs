//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Terrain is a function of the generation counter, never of wall time
//! - Stable iteration order (left to right along the path)
//! - No rendering, audio or platform dependencies; the scene reacts to
//!   [`WorldEvent`]s instead

pub mod anim;
pub mod collision;
pub mod fire;
pub mod meters;
pub mod state;
pub mod terrain;
pub mod tick;

pub use anim::Animation;
pub use collision::Aabb;
pub use fire::FirePalette;
pub use meters::Meter;
pub use state::{Hazard, Item, ItemKind, Match, PathSlot, Pose, Turkey, World, WorldEvent};
pub use terrain::terrain_height;
pub use tick::{TickInput, tick};
