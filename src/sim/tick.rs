//! Per-frame world update
//!
//! One call advances the world by one rendered frame. Scrolling and meter
//! drains are per tick; timers (invulnerability, speed-up, animations) use the
//! frame delta.

use glam::Vec2;

use super::fire;
use super::state::{ItemKind, Pose, World, WorldEvent};
use crate::consts::*;

/// Player input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub pointer: Vec2,
    /// `Some(true)` when the fly button went down this frame, `Some(false)`
    /// when it came up
    pub fly: Option<bool>,
    pub delta_ms: u64,
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput) {
    world.elapsed_ms += input.delta_ms;
    if let Some(fly) = input.fly {
        world.flying = fly;
    }

    if !world.dead {
        expire_invulnerability(world);

        // Whole columns leave together, so indices stay aligned
        world.slots.retain(|slot| slot.x() >= 0.0);

        collect_items(world);
        burn(world);
        hazard_collisions(world);

        let speed = world.terrain_speed;
        for slot in &mut world.slots {
            slot.shift(speed);
            if let Some(touch) = slot.item.touch.as_mut() {
                if touch.y > 0.0 {
                    touch.y -= PICKUP_RISE;
                }
            }
        }
        world.fill();

        drain_meters(world);
    }

    move_turkey(world, input.pointer);
    advance_animations(world, input.delta_ms);

    world.terrain_speed = BASE_TERRAIN_SPEED + (world.elapsed_ms / SPEED_UP_EVERY_MS) as f32;
}

fn expire_invulnerability(world: &mut World) {
    if let Some(hit) = world.last_hit {
        if world.elapsed_ms.saturating_sub(hit) > INVULNERABLE_MS {
            world.last_hit = None;
        }
    }
}

fn collect_items(world: &mut World) {
    let turkey = world.turkey.bounds();
    for i in 0..world.slots.len() {
        let item = &world.slots[i].item;
        if !item.enabled || item.is_collected() || !turkey.overlaps(&item.bounds(), SPRITE_PADDING) {
            continue;
        }
        let (kind, value) = (item.kind, item.value);

        let taken = match kind {
            ItemKind::Coin => {
                world.score.add(value);
                true
            }
            // Hearts and flasks are left alone when the meter is full
            ItemKind::Heart if world.life.total() < MAX_LIFE => {
                world.life.add(value);
                true
            }
            ItemKind::Flask if world.power.committed() < MAX_POWER => {
                world.power.add(value);
                true
            }
            _ => false,
        };

        if taken {
            let item = &mut world.slots[i].item;
            item.position.y -= PICKUP_LIFT;
            item.touch = Some(Vec2::new(item.position.x, item.position.y - PICKUP_RISE));
            world.events.push(WorldEvent::Picked(kind));
            log::debug!("picked {:?} worth {}", kind, value);
        }
    }
}

fn burn(world: &mut World) {
    let ignited = fire::step(&mut world.slots, &mut world.rng, world.ignition_per_mille);
    world
        .events
        .extend(ignited.into_iter().map(|generation| WorldEvent::Ignited { generation }));

    let turkey = world.turkey.bounds();
    let touching = world.slots.iter().find_map(|slot| {
        let flame = fire::flame_box(slot)?;
        flame
            .overlaps(&turkey, FLAME_PADDING)
            .then(|| slot.segment.intensity)
    });
    if let Some(intensity) = touching {
        if world.hurt(fire::flame_damage(intensity)) {
            log::debug!("burnt by a flame of intensity {}", intensity);
        }
    }
}

fn hazard_collisions(world: &mut World) {
    let turkey = world.turkey.bounds();
    let strength = world
        .slots
        .iter()
        .filter(|slot| slot.hazard.enabled)
        .find(|slot| turkey.overlaps(&slot.hazard.bounds(), SPRITE_PADDING))
        .map(|slot| slot.hazard.strength);
    if let Some(strength) = strength {
        if world.hurt(strength) {
            log::debug!("hit by a hazard of strength {}", strength);
        }
    }
}

fn drain_meters(world: &mut World) {
    world.score.drain();
    world.power.drain();
    if world.life.drain() != 0 && world.life.committed() == 0 {
        world.dead = true;
        world.events.push(WorldEvent::Died);
        log::info!("Turkey died after {} ms", world.elapsed_ms);
    }
}

/// Steer the avatar over the match it currently stands above
fn move_turkey(world: &mut World, pointer: Vec2) {
    let Some(index) = world.slot_under(world.turkey.position.x) else {
        return;
    };
    let ground = world.slots[index].segment.position.y;

    let can_thrust = world.flying && world.turkey.velocity_y >= 0.0 && world.power.committed() > 0;
    let turkey = &mut world.turkey;
    if can_thrust {
        turkey.velocity_y = FLY_THRUST;
        turkey.pose = Pose::Jump;
    } else {
        turkey.velocity_y += GRAVITY;
    }
    turkey.position.y += turkey.velocity_y;

    let max_x = world.width as f32 - turkey.size.x - PERSP_X_ADJUST;
    turkey.position.x = pointer.x.min(max_x).max(0.0);

    if turkey.position.y < 0.0 {
        turkey.position.y = 0.0;
    } else if turkey.position.y >= ground - turkey.size.y {
        // Landed on the match below
        turkey.position.y = ground - turkey.size.y;
        turkey.velocity_y = 0.0;
        turkey.pose = Pose::Run;
    }

    if can_thrust {
        world.power.add(-FLY_POWER_COST);
    }
}

fn advance_animations(world: &mut World, delta_ms: u64) {
    world.turkey.animation_mut().advance(delta_ms);
    for anim in world
        .item_animations
        .iter_mut()
        .chain(world.hazard_animations.iter_mut())
    {
        anim.advance(delta_ms);
    }
}
