//! The game itself
//!
//! Wraps a [`World`]: feeds it the frame's input, turns its events into
//! sound cues and draws it back to front, column by column, so items and
//! the avatar overlap the matches in perspective.

use std::f32::consts::PI;

use glam::Vec2;

use super::{Lifecycle, SceneContext, Stage};
use crate::assets::{BUTTON_HEIGHT, ButtonId, SpriteBank};
use crate::audio::Cue;
use crate::consts::*;
use crate::input::{ButtonEdge, MouseButton, keys};
use crate::lerp_color;
use crate::renderer::{Surface, colors};
use crate::sim::fire::{FirePalette, flame_height};
use crate::sim::{Hazard, Item, ItemKind, Match, Pose, TickInput, World, WorldEvent, tick};
use crate::ui::{Layer, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Back,
}

/// Pixels per meter point in the HUD bars
const BAR_SCALE: f32 = 3.0;

#[derive(Debug)]
pub struct GameplayScene {
    stage: Stage,
    seed: u64,
    world: Option<World>,
    ui: Layer<GameAction>,
    palette: FirePalette,
}

impl GameplayScene {
    pub fn new(seed: u64) -> Self {
        Self {
            stage: Stage::new(),
            seed,
            world: None,
            ui: Layer::new(),
            palette: FirePalette::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Simulation state; `None` until the scene starts
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn world_mut(&mut self) -> Option<&mut World> {
        self.world.as_mut()
    }

    fn play_events(world: &mut World, ctx: &mut SceneContext<'_>) {
        for event in world.drain_events() {
            let cue = match event {
                WorldEvent::Ignited { .. } => Cue::Flame,
                WorldEvent::Picked(ItemKind::Coin) => Cue::Coin,
                WorldEvent::Picked(ItemKind::Heart) => Cue::Heart,
                WorldEvent::Picked(ItemKind::Flask) => Cue::Flask,
                WorldEvent::Hit { .. } => Cue::Hit,
                WorldEvent::Died => continue,
            };
            ctx.audio.play_cue(cue);
        }
    }
}

impl Lifecycle for GameplayScene {
    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    fn name(&self) -> &'static str {
        "gameplay"
    }

    fn on_start(&mut self, ctx: &mut SceneContext<'_>) {
        let (w, h) = self.stage.viewport();
        self.world = Some(World::new(self.seed, w as u32, h as u32));
        self.ui = Layer::new();
        self.ui.button(ctx.sprites.button(ButtonId::Back), 25.0, h - BUTTON_HEIGHT - 25.0, GameAction::Back);
        log::info!("Run started with seed {}", self.seed);
    }

    fn on_update(&mut self, delta_ms: u64, ctx: &mut SceneContext<'_>) {
        let mut leave = ctx.input.is_key_pressed(keys::ESCAPE);
        for event in self.ui.update(ctx.input) {
            if let UiEvent::Clicked(GameAction::Back) = event {
                leave = true;
            }
        }

        // Presses on the Back button do not reach the turkey
        let over_ui = self.ui.mouse_over().is_some();
        let fly = match ctx.input.button_state(MouseButton::Left) {
            ButtonEdge::Pressed if over_ui => None,
            ButtonEdge::Pressed => Some(true),
            ButtonEdge::Released => Some(false),
            ButtonEdge::None => None,
        };
        let input = TickInput {
            pointer: ctx.input.pointer_position(),
            fly,
            delta_ms,
        };

        let elapsed = self.stage.elapsed_ms();
        if let Some(world) = self.world.as_mut() {
            tick(world, &input);
            Self::play_events(world, ctx);

            if let Some(surface) = self.stage.surface_mut() {
                let mut painter = Painter {
                    surface,
                    sprites: ctx.sprites,
                    palette: &self.palette,
                };
                painter.draw(world, &ctx.settings.background, elapsed);
                self.ui.draw(painter.surface);
            }
        }

        if leave {
            self.end();
        }
    }

    fn on_end(&mut self) {
        self.ui.set_enabled(false);
        if let Some(world) = &self.world {
            log::info!("Run over: score {}, alive {}", world.score.total(), !world.dead);
        }
    }
}

/// Draws one world frame onto a surface
struct Painter<'a> {
    surface: &'a mut Surface,
    sprites: &'a SpriteBank,
    palette: &'a FirePalette,
}

impl Painter<'_> {
    fn draw(&mut self, world: &World, background: &str, elapsed_ms: u64) {
        let (w, h) = (self.surface.width(), self.surface.height());
        let image = self.sprites.background(background);
        self.surface.fill(colors::BLACK);
        self.surface.image(image, (w - image.width) / 2.0, (h - image.height) / 2.0, None);

        let turkey_slot = world.slot_under(world.turkey.position.x);
        for (i, slot) in world.slots.iter().enumerate() {
            self.draw_match(&slot.segment);
            if turkey_slot == Some(i) && !world.dead {
                self.draw_turkey(world);
            }
            if slot.item.enabled {
                self.draw_item(world, &slot.item);
            }
            if slot.hazard.enabled {
                self.draw_hazard(world, &slot.hazard);
            }
        }

        self.draw_score(world.score.committed());
        self.draw_fire(world);
        self.draw_bar(25.0, world.life.committed(), world.life.pending(), MAX_LIFE, colors::LIFE_BAR, colors::LIFE_SHINE);
        self.draw_bar(50.0, world.power.committed(), world.power.pending(), MAX_POWER, colors::POWER_BAR, colors::POWER_BAR);

        if world.dead {
            self.draw_game_over(elapsed_ms);
        }
    }

    fn draw_match(&mut self, segment: &Match) {
        let Vec2 { x, y } = segment.position;
        // Slightly tilted two-tone stick
        self.surface.line(Vec2::new(x, y), Vec2::new(x + 50.0, y - 5.0), 10.0, colors::STICK_LIGHT);
        self.surface.line(Vec2::new(x + 5.0, y), Vec2::new(x + 55.0, y - 5.0), 10.0, colors::STICK_DARK);

        if segment.igniteless {
            return;
        }
        let head = if segment.used {
            colors::HEAD_ASH
        } else {
            lerp_color(colors::HEAD_COLD, colors::WHITE, segment.heat / HEAT_IGNITE)
        };
        self.surface.circle(segment.position, MATCH_HEAD_RADIUS, head);
    }

    fn draw_turkey(&mut self, world: &World) {
        let turkey = &world.turkey;
        let frames = match turkey.pose {
            Pose::Run => &self.sprites.turkey_run,
            Pose::Jump => &self.sprites.turkey_jump,
        };
        let image = turkey.animation().frame(frames);
        // Pulsing red while invulnerable
        let tint = world.is_invulnerable().then(|| {
            let on = (world.elapsed_ms / 100 % 2) as f32;
            [on, 0.0, 0.0, 1.0]
        });
        self.surface.image(image, turkey.position.x + PERSP_X_ADJUST, turkey.position.y, tint);
    }

    fn draw_item(&mut self, world: &World, item: &Item) {
        let kind = item.kind.index();
        let image = world.item_animations[kind].frame(&self.sprites.items[kind]);
        match item.touch {
            Some(touch) => {
                let tint = [1.0, 1.0, 1.0, item.fade()];
                self.surface.image(image, touch.x, touch.y, Some(tint));
            }
            None => self.surface.image(image, item.position.x, item.position.y, None),
        }
    }

    fn draw_hazard(&mut self, world: &World, hazard: &Hazard) {
        let kind = hazard.kind as usize;
        let image = world.hazard_animations[kind].frame(&self.sprites.enemies[kind]);
        self.surface.image(image, hazard.position.x + PERSP_X_ADJUST, hazard.position.y, None);
    }

    fn draw_fire(&mut self, world: &World) {
        for slot in world.slots.iter().filter(|s| s.segment.intensity > 0.0) {
            let segment = &slot.segment;
            let size = flame_height(segment.intensity);
            let color = self.palette.flame(segment.intensity);
            // Flat base below the head, tall tongue above
            self.surface.arc(segment.position, size / 6.0, size / 8.0, 0.0, PI, color);
            self.surface.arc(segment.position, size / 6.0, size * 2.0, PI, 2.0 * PI, color);
        }
    }

    fn draw_score(&mut self, score: i64) {
        let text = score.to_string();
        let size = 32.0;
        let x = self.surface.width() - Surface::text_width(&text, size) - 25.0;
        self.surface.text(text, Vec2::new(x, 50.0), size, colors::WHITE);
    }

    fn draw_bar(&mut self, y: f32, committed: i64, pending: i64, max: i64, fill: [f32; 4], shine: [f32; 4]) {
        let width = committed as f32 * BAR_SCALE;
        self.surface.fill_rect(25.0, y, width, 15.0, fill);
        self.surface.fill_rect(25.0, y, width, 5.0, shine);
        let border = if pending == 0 {
            colors::BAR_BORDER_IDLE
        } else {
            colors::BAR_BORDER_PENDING
        };
        self.surface.stroke_rect(25.0, y, max as f32 * BAR_SCALE, 15.0, 3.0, border);
    }

    fn draw_game_over(&mut self, elapsed_ms: u64) {
        let text = "GAME OVER";
        let size = 150.0;
        let (w, h) = (self.surface.width(), self.surface.height());
        let color = self.palette.color((elapsed_ms % 1000) as f32, 1000.0);
        let x = (w - Surface::text_width(text, size)) / 2.0;
        self.surface.text(text, Vec2::new(x, h / 2.0 - 25.0), size, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneState;
    use crate::scene::testing::Harness;

    fn started(h: &mut Harness) -> GameplayScene {
        let mut scene = GameplayScene::new(99);
        scene.stage_mut().set_viewport(1600.0, 800.0);
        scene.begin(&mut h.ctx());
        let world = scene.world_mut().unwrap();
        world.ignition_per_mille = 0;
        for slot in &mut world.slots {
            slot.item.enabled = false;
            slot.hazard.enabled = false;
        }
        scene
    }

    #[test]
    fn test_world_sized_to_viewport() {
        let mut h = Harness::new();
        let scene = started(&mut h);
        let world = scene.world().unwrap();
        assert_eq!((world.width, world.height), (1600, 800));
        assert_eq!(world.seed, 99);
    }

    #[test]
    fn test_ignition_plays_flame_cue() {
        let mut h = Harness::new();
        let mut scene = started(&mut h);
        let world = scene.world_mut().unwrap();
        world.slots[40].segment.igniteless = false;
        world.slots[40].segment.heat = HEAT_IGNITE;

        scene.update(16, &mut h.ctx());

        assert_eq!(h.audio.count(Cue::Flame), 1);
        let world = scene.world().unwrap();
        assert!(world.slots[40].segment.used);
        assert_eq!(world.slots[40].segment.intensity, MAX_INTENSITY);
    }

    #[test]
    fn test_coin_pickup_plays_cue() {
        let mut h = Harness::new();
        let mut scene = started(&mut h);
        let world = scene.world_mut().unwrap();
        let under = world.slot_under(world.turkey.position.x).unwrap();
        let turkey = world.turkey.position;
        let item = &mut world.slots[under].item;
        item.enabled = true;
        item.kind = ItemKind::Coin;
        item.position = turkey;
        h.input.pointer_moved(turkey);

        scene.update(16, &mut h.ctx());

        assert_eq!(h.audio.count(Cue::Coin), 1);
    }

    #[test]
    fn test_escape_ends_run() {
        let mut h = Harness::new();
        let mut scene = started(&mut h);
        scene.update(16, &mut h.ctx());
        assert_eq!(scene.state(), SceneState::Started);

        h.input.key_down(keys::ESCAPE);
        scene.update(16, &mut h.ctx());
        assert_eq!(scene.state(), SceneState::Ended);
    }

    #[test]
    fn test_back_button_ends_run() {
        let mut h = Harness::new();
        let mut scene = started(&mut h);
        let back = Vec2::new(50.0, 800.0 - BUTTON_HEIGHT - 10.0);
        h.input.pointer_moved(back);
        h.input.button_down(MouseButton::Left);
        scene.update(16, &mut h.ctx());
        h.input.clear();
        h.input.button_up(MouseButton::Left);
        scene.update(16, &mut h.ctx());
        assert_eq!(scene.state(), SceneState::Ended);
    }

    #[test]
    fn test_back_button_press_does_not_fly() {
        let mut h = Harness::new();
        let mut scene = started(&mut h);
        h.input.pointer_moved(Vec2::new(50.0, 800.0 - BUTTON_HEIGHT - 10.0));
        h.input.button_down(MouseButton::Left);
        scene.update(16, &mut h.ctx());
        h.input.clear();
        assert!(!scene.world().unwrap().flying);

        h.input.pointer_moved(Vec2::new(400.0, 300.0));
        h.input.button_down(MouseButton::Left);
        scene.update(16, &mut h.ctx());
        assert!(scene.world().unwrap().flying);
    }

    #[test]
    fn test_quick_click_on_back_ends_run() {
        let mut h = Harness::new();
        let mut scene = started(&mut h);
        h.input.pointer_moved(Vec2::new(50.0, 800.0 - BUTTON_HEIGHT - 10.0));
        h.input.button_down(MouseButton::Left);
        h.input.button_up(MouseButton::Left);
        scene.update(16, &mut h.ctx());
        assert_eq!(scene.state(), SceneState::Ended);
    }

    #[test]
    fn test_frame_draws_hud() {
        let mut h = Harness::new();
        let mut scene = started(&mut h);
        scene.update(16, &mut h.ctx());
        let surface = scene.stage().surface().unwrap();
        assert!(!surface.vertices().is_empty());
        // Score plus the Back caption
        assert!(surface.labels().iter().any(|l| l.text == "0"));
        assert!(surface.labels().iter().any(|l| l.text == "BACK"));
    }

    #[test]
    fn test_death_shows_game_over() {
        let mut h = Harness::new();
        let mut scene = started(&mut h);
        let world = scene.world_mut().unwrap();
        world.life = crate::sim::Meter::bounded(1, MAX_LIFE, BAR_DRAIN);
        world.add_life(-1);
        scene.update(16, &mut h.ctx());

        assert!(scene.world().unwrap().dead);
        let labels = scene.stage().surface().unwrap().labels();
        assert!(labels.iter().any(|l| l.text == "GAME OVER"));
        // Death is a normal state, the scene keeps running
        assert_eq!(scene.state(), SceneState::Started);
    }
}
