//! Fade to black between two scenes
//!
//! The first half of the duration darkens the finished scene's last frame;
//! the second half runs the next scene live while the veil lifts. The
//! transition owns both scenes and hands the next one back through
//! [`TransitionScene::into_next`] once it has ended.

use super::{Lifecycle, Scene, SceneContext, SceneState, Stage};

#[derive(Debug)]
pub struct TransitionScene {
    stage: Stage,
    previous: Scene,
    next: Scene,
    duration_ms: u64,
}

impl TransitionScene {
    pub fn new(previous: Scene, next: Scene, duration_ms: u64) -> Self {
        Self {
            stage: Stage::new(),
            previous,
            next,
            duration_ms,
        }
    }

    pub fn previous(&self) -> &Scene {
        &self.previous
    }

    pub fn next(&self) -> &Scene {
        &self.next
    }

    /// Give up the scene being faded in
    pub fn into_next(self) -> Scene {
        self.next
    }

    /// Black veil opacity at `elapsed_ms`, rising to 1 at the midpoint
    pub fn veil_opacity(&self, elapsed_ms: u64) -> f32 {
        let half = (self.duration_ms / 2).max(1);
        if elapsed_ms <= half {
            elapsed_ms as f32 / half as f32
        } else {
            (1.0 - (elapsed_ms - half) as f32 / half as f32).max(0.0)
        }
    }
}

impl Lifecycle for TransitionScene {
    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    fn name(&self) -> &'static str {
        "transition"
    }

    fn on_start(&mut self, ctx: &mut SceneContext<'_>) {
        // The next scene needs a drawn surface before it can be shown
        if self.next.state() == SceneState::Undefined {
            let (w, h) = self.stage.viewport();
            self.next.set_viewport(w, h);
            self.next.begin(ctx);
        }
    }

    fn on_update(&mut self, delta_ms: u64, ctx: &mut SceneContext<'_>) {
        let elapsed = self.stage.elapsed_ms();
        let half = self.duration_ms / 2;
        let opacity = self.veil_opacity(elapsed);

        let (shown, veiled) = if elapsed <= half {
            (&self.previous, true)
        } else if elapsed - half < half {
            self.next.update(delta_ms, ctx);
            (&self.next, true)
        } else {
            (&self.next, false)
        };

        if let Some(surface) = self.stage.surface_mut() {
            if let Some(frame) = shown.surface() {
                surface.blit(frame);
            }
            if veiled {
                surface.fade_labels(1.0 - opacity);
                surface.fill([0.0, 0.0, 0.0, opacity]);
            }
        }

        if !veiled {
            self.end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::Harness;
    use crate::scene::{CardScene, MenuScene};

    fn finished_intro(h: &mut Harness) -> Scene {
        let mut intro = Scene::Intro(CardScene::intro(10));
        intro.set_viewport(1600.0, 800.0);
        intro.begin(&mut h.ctx());
        intro.update(10, &mut h.ctx());
        assert_eq!(intro.state(), SceneState::Ended);
        intro
    }

    fn started(h: &mut Harness) -> TransitionScene {
        let previous = finished_intro(h);
        let mut fade = TransitionScene::new(previous, Scene::Menu(MenuScene::new()), 1000);
        fade.stage_mut().set_viewport(1600.0, 800.0);
        fade.begin(&mut h.ctx());
        fade
    }

    #[test]
    fn test_start_begins_next_scene() {
        let mut h = Harness::new();
        let fade = started(&mut h);
        assert_eq!(fade.next().state(), SceneState::Started);
        let surface = fade.next().surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (1600.0, 800.0));
    }

    #[test]
    fn test_already_started_next_is_not_restarted() {
        let mut h = Harness::new();
        let previous = finished_intro(&mut h);
        let mut next = Scene::Menu(MenuScene::new());
        next.set_viewport(1600.0, 800.0);
        next.begin(&mut h.ctx());
        let mut fade = TransitionScene::new(previous, next, 1000);
        fade.stage_mut().set_viewport(1600.0, 800.0);
        // Would panic on a second begin
        fade.begin(&mut h.ctx());
        assert_eq!(fade.next().state(), SceneState::Started);
    }

    #[test]
    fn test_halves() {
        let mut h = Harness::new();
        let mut fade = started(&mut h);
        let previous_elapsed = fade.previous().elapsed_ms();

        fade.update(250, &mut h.ctx());
        fade.update(250, &mut h.ctx());
        // First half: frozen frame, next scene idle
        assert_eq!(fade.next().elapsed_ms(), 0);
        assert_eq!(fade.previous().elapsed_ms(), previous_elapsed);
        let veil = fade.stage().surface().unwrap().vertices().last().unwrap().color;
        assert_eq!(veil[3], 1.0);

        fade.update(250, &mut h.ctx());
        assert_eq!(fade.next().elapsed_ms(), 250);
        let veil = fade.stage().surface().unwrap().vertices().last().unwrap().color;
        assert!((veil[3] - 0.5).abs() < 1e-6);
        assert_eq!(fade.state(), SceneState::Started);

        fade.update(300, &mut h.ctx());
        assert_eq!(fade.state(), SceneState::Ended);
        // Previous scene was never touched
        assert_eq!(fade.previous().elapsed_ms(), previous_elapsed);
        assert_eq!(fade.into_next().state(), SceneState::Started);
    }

    #[test]
    fn test_veil_opacity_ramps() {
        let fade = TransitionScene::new(
            Scene::Intro(CardScene::intro(1)),
            Scene::Outro(CardScene::outro(1)),
            1000,
        );
        assert_eq!(fade.veil_opacity(0), 0.0);
        assert_eq!(fade.veil_opacity(250), 0.5);
        assert_eq!(fade.veil_opacity(500), 1.0);
        assert_eq!(fade.veil_opacity(750), 0.5);
        assert_eq!(fade.veil_opacity(1200), 0.0);
    }
}
