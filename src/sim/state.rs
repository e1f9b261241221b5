//! World state and entity types
//!
//! The path is a single registry of [`PathSlot`]s. Every slot carries the
//! match, item and hazard generated for the same column, so the three always
//! scroll, collide and get discarded together.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::anim::Animation;
use super::collision::Aabb;
use super::meters::Meter;
use super::terrain::terrain_height;
use crate::assets::ANIMATION_FRAMES;
use crate::consts::*;

/// One ignitable path segment
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Head position
    pub position: Vec2,
    /// Heat received from burning neighbors, below [`HEAT_IGNITE`] while unused
    pub heat: f32,
    pub intensity: f32,
    /// Has burnt (never reverts)
    pub used: bool,
    /// Headless match that never catches fire
    pub igniteless: bool,
}

impl Match {
    pub fn new(position: Vec2, igniteless: bool) -> Self {
        Self {
            position,
            heat: 0.0,
            intensity: 0.0,
            used: false,
            igniteless,
        }
    }

    pub fn is_burning(&self) -> bool {
        self.used && self.intensity > 0.0
    }

    /// Whether neighbor heat is accepted
    pub fn takes_heat(&self) -> bool {
        !self.used && !self.igniteless
    }

    pub fn ignite(&mut self) {
        self.used = true;
        self.intensity = MAX_INTENSITY;
        self.heat = 0.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Coin,
    Heart,
    Flask,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Coin, ItemKind::Heart, ItemKind::Flask];

    /// Index into per-kind sprite tables
    pub fn index(&self) -> usize {
        match self {
            ItemKind::Coin => 0,
            ItemKind::Heart => 1,
            ItemKind::Flask => 2,
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            ItemKind::Coin => COIN_VALUE,
            ItemKind::Heart => HEART_VALUE,
            ItemKind::Flask => FLASK_VALUE,
        }
    }
}

/// Collectible floating above a match
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    pub position: Vec2,
    /// Where the collected item is drawn while it floats away
    pub touch: Option<Vec2>,
    /// Only enabled items are shown and collectible
    pub enabled: bool,
    pub value: i64,
}

impl Item {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, ITEM_SIZE, ITEM_SIZE)
    }

    pub fn is_collected(&self) -> bool {
        self.touch.is_some()
    }

    /// Opacity of a collected item, fading as it rises
    pub fn fade(&self) -> f32 {
        match self.touch {
            Some(touch) if self.position.y > 0.0 => {
                (1.0 - (self.position.y - touch.y) / self.position.y).clamp(0.0, 1.0)
            }
            Some(_) => 0.0,
            None => 1.0,
        }
    }
}

/// Enemy standing on the path
#[derive(Debug, Clone, PartialEq)]
pub struct Hazard {
    pub kind: u8,
    pub position: Vec2,
    pub strength: i64,
    pub enabled: bool,
}

impl Hazard {
    pub fn new(kind: u8, position: Vec2, enabled: bool) -> Self {
        Self {
            kind,
            position,
            strength: (kind as i64 + 1) * 5,
            enabled,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, ENEMY_SIZE, ENEMY_SIZE)
    }
}

/// Everything generated for one path column
#[derive(Debug, Clone, PartialEq)]
pub struct PathSlot {
    /// Value of the generation counter this slot was built from
    pub generation: u64,
    pub segment: Match,
    pub item: Item,
    pub hazard: Hazard,
}

impl PathSlot {
    pub fn x(&self) -> f32 {
        self.segment.position.x
    }

    /// Scroll the whole column left
    pub fn shift(&mut self, dx: f32) {
        self.segment.position.x -= dx;
        self.item.position.x -= dx;
        self.hazard.position.x -= dx;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pose {
    Run,
    Jump,
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq)]
pub struct Turkey {
    pub position: Vec2,
    pub size: Vec2,
    pub velocity_y: f32,
    pub pose: Pose,
    run: Animation,
    jump: Animation,
}

impl Turkey {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            size: Vec2::splat(TURKEY_SIZE),
            velocity_y: 0.0,
            pose: Pose::Run,
            run: Animation::new(ANIMATION_FRAMES),
            jump: Animation::new(ANIMATION_FRAMES),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.position, self.size)
    }

    /// Animation of the current pose
    pub fn animation(&self) -> &Animation {
        match self.pose {
            Pose::Run => &self.run,
            Pose::Jump => &self.jump,
        }
    }

    pub fn animation_mut(&mut self) -> &mut Animation {
        match self.pose {
            Pose::Run => &mut self.run,
            Pose::Jump => &mut self.jump,
        }
    }
}

/// Things the scene reacts to (sounds), drained after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorldEvent {
    Ignited { generation: u64 },
    Picked(ItemKind),
    Hit { damage: i64 },
    Died,
}

/// Complete gameplay state
#[derive(Debug, Clone)]
pub struct World {
    pub seed: u64,
    pub width: u32,
    pub height: u32,
    /// Ordered left to right
    pub slots: Vec<PathSlot>,
    /// Next value of the generation counter
    pub generation: u64,
    pub turkey: Turkey,
    /// Left button held
    pub flying: bool,
    pub life: Meter,
    pub power: Meter,
    pub score: Meter,
    /// Permanent once set
    pub dead: bool,
    /// World time of the last damage, while invulnerable
    pub last_hit: Option<u64>,
    pub terrain_speed: f32,
    pub elapsed_ms: u64,
    /// Shared per-kind animations
    pub item_animations: Vec<Animation>,
    pub hazard_animations: Vec<Animation>,
    /// Spontaneous ignition chance per tick
    pub ignition_per_mille: u32,
    pub events: Vec<WorldEvent>,
    pub(crate) rng: Pcg32,
}

impl World {
    pub fn new(seed: u64, width: u32, height: u32) -> Self {
        let mut world = Self {
            seed,
            width,
            height,
            slots: Vec::new(),
            generation: 0,
            turkey: Turkey::new(Vec2::new(width as f32 / 2.0, height as f32 / 2.0)),
            flying: false,
            life: Meter::bounded(MAX_LIFE, MAX_LIFE, BAR_DRAIN),
            power: Meter::bounded(MAX_POWER, MAX_POWER, BAR_DRAIN),
            score: Meter::unbounded(SCORE_DRAIN),
            dead: false,
            last_hit: None,
            terrain_speed: BASE_TERRAIN_SPEED,
            elapsed_ms: 0,
            item_animations: ItemKind::ALL.iter().map(|_| Animation::new(ANIMATION_FRAMES)).collect(),
            hazard_animations: (0..ENEMY_KINDS).map(|_| Animation::new(ANIMATION_FRAMES)).collect(),
            ignition_per_mille: SPONTANEOUS_IGNITION_PER_MILLE,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        world.fill();
        world
    }

    /// Append slots until the path reaches the right edge
    pub fn fill(&mut self) {
        let mut x = self.slots.last().map_or(0.0, |s| s.x() + MATCH_HEAD_RADIUS);
        while x < self.width as f32 {
            let slot = self.generate_slot(x);
            self.slots.push(slot);
            x += MATCH_HEAD_RADIUS;
        }
    }

    fn generate_slot(&mut self, x: f32) -> PathSlot {
        let generation = self.generation;
        self.generation += 1;
        let y = terrain_height(generation, self.height);

        let igniteless = self.rng.random_range(0..100) < IGNITELESS_PERCENT;

        // 75% coins, then 80/20 flasks and hearts
        let kind = if self.rng.random_range(0..100) < 75 {
            ItemKind::Coin
        } else if self.rng.random_range(0..100) < 80 {
            ItemKind::Flask
        } else {
            ItemKind::Heart
        };
        let item = Item {
            kind,
            position: Vec2::new(x, y + ITEM_Y_OFFSET),
            touch: None,
            enabled: self.rng.random_range(0..100) < ITEM_ENABLED_PERCENT,
            value: kind.value(),
        };

        let hazard = Hazard::new(
            self.rng.random_range(0..ENEMY_KINDS),
            Vec2::new(x, y + ENEMY_Y_OFFSET),
            self.rng.random_range(0..1000) < ENEMY_ENABLED_PER_MILLE,
        );

        PathSlot {
            generation,
            segment: Match::new(Vec2::new(x, y), igniteless),
            item,
            hazard,
        }
    }

    pub fn is_invulnerable(&self) -> bool {
        self.last_hit.is_some()
    }

    /// Queue a life change; damage sounds the hit cue while alive
    pub fn add_life(&mut self, amount: i64) {
        if amount < 0 && !self.dead {
            self.events.push(WorldEvent::Hit { damage: -amount });
        }
        self.life.add(amount);
    }

    /// Apply damage unless still invulnerable from an earlier hit
    pub fn hurt(&mut self, damage: i64) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.last_hit = Some(self.elapsed_ms);
        self.add_life(-damage);
        true
    }

    /// Index of the slot whose column contains `x`
    pub fn slot_under(&self, x: f32) -> Option<usize> {
        self.slots
            .windows(2)
            .position(|pair| x >= pair[0].x() && x < pair[1].x())
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_fills_viewport() {
        let world = World::new(42, 1600, 800);
        assert_eq!(world.slots.len(), (1600.0 / MATCH_HEAD_RADIUS).ceil() as usize);
        assert_eq!(world.slots[0].x(), 0.0);
        assert_eq!(world.generation, world.slots.len() as u64);
        for (i, slot) in world.slots.iter().enumerate() {
            assert_eq!(slot.generation, i as u64);
            assert_eq!(slot.item.position.x, slot.x());
            assert_eq!(slot.hazard.position.x, slot.x());
            assert_eq!(slot.item.position.y, slot.segment.position.y + ITEM_Y_OFFSET);
            assert_eq!(slot.hazard.position.y, slot.segment.position.y + ENEMY_Y_OFFSET);
            assert_eq!(slot.segment.position.y, terrain_height(slot.generation, 800));
        }
    }

    #[test]
    fn test_same_seed_same_path() {
        let a = World::new(7, 1600, 800);
        let b = World::new(7, 1600, 800);
        assert_eq!(a.slots, b.slots);
    }

    #[test]
    fn test_hazard_strength_by_kind() {
        assert_eq!(Hazard::new(0, Vec2::ZERO, true).strength, 5);
        assert_eq!(Hazard::new(1, Vec2::ZERO, true).strength, 10);
    }

    #[test]
    fn test_hurt_respects_invulnerability() {
        let mut world = World::new(1, 1600, 800);
        assert!(world.hurt(10));
        assert!(!world.hurt(10));
        assert_eq!(world.life.total(), MAX_LIFE - 10);
        assert_eq!(world.drain_events(), vec![WorldEvent::Hit { damage: 10 }]);
    }

    #[test]
    fn test_slot_under() {
        let world = World::new(3, 1600, 800);
        assert_eq!(world.slot_under(0.0), Some(0));
        assert_eq!(world.slot_under(16.0), Some(1));
        assert_eq!(world.slot_under(-1.0), None);
    }

    #[test]
    fn test_item_fade() {
        let mut item = Item {
            kind: ItemKind::Coin,
            position: Vec2::new(0.0, 400.0),
            touch: None,
            enabled: true,
            value: COIN_VALUE,
        };
        assert_eq!(item.fade(), 1.0);
        item.touch = Some(Vec2::new(0.0, 200.0));
        assert!((item.fade() - 0.5).abs() < 1e-6);
    }
}
