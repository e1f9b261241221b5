//! Scene navigation
//!
//! All "what comes next" decisions live here. Each frame the sequencer first
//! checks whether the current scene has ended and, if so, picks its successor
//! from the kind of scene that ended:
//!
//! | ended      | next                                  |
//! |------------|---------------------------------------|
//! | (none)     | intro card                            |
//! | intro      | fade into a new menu                  |
//! | transition | the scene it was fading in            |
//! | gameplay   | fade into a new menu                  |
//! | menu       | fade into gameplay or the outro card  |
//! | outro      | exit                                  |

use super::{
    CardScene, GameplayScene, MenuScene, PlayerChoice, Scene, SceneContext, SceneKind, SceneState,
    TransitionScene,
};
use crate::renderer::Surface;
use crate::settings::Settings;

/// What the host loop should do after [`SceneSequencer::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct SceneSequencer {
    current: Option<Scene>,
    viewport: (f32, f32),
    intro_duration_ms: u64,
    transition_duration_ms: u64,
    /// Seed for the next gameplay run
    next_seed: u64,
}

impl SceneSequencer {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        Self {
            current: None,
            viewport: settings.viewport(),
            intro_duration_ms: settings.intro_duration_ms,
            transition_duration_ms: settings.transition_duration_ms,
            next_seed: seed,
        }
    }

    pub fn current(&self) -> Option<&Scene> {
        self.current.as_ref()
    }

    pub fn current_kind(&self) -> Option<SceneKind> {
        self.current.as_ref().map(Scene::kind)
    }

    /// Seed the next gameplay run will use
    pub fn next_seed(&self) -> u64 {
        self.next_seed
    }

    /// Last frame of the current scene
    pub fn surface(&self) -> Option<&Surface> {
        self.current.as_ref().and_then(Scene::surface)
    }

    /// Replace the current scene once it has ended. Run before [`Self::update`].
    pub fn advance(&mut self, ctx: &mut SceneContext<'_>) -> Advance {
        let Some(current) = self.current.take() else {
            let intro = Scene::Intro(CardScene::intro(self.intro_duration_ms));
            self.set_next_stage(intro, ctx);
            return Advance::Continue;
        };

        if current.state() != SceneState::Ended {
            self.current = Some(current);
            return Advance::Continue;
        }

        let next = match current {
            Scene::Transition(fade) => fade.into_next(),
            Scene::Menu(menu) => {
                let choice = menu.choice();
                let finished = Scene::Menu(menu);
                match choice {
                    PlayerChoice::Run => {
                        let seed = self.take_seed();
                        self.fade(finished, Scene::Gameplay(Box::new(GameplayScene::new(seed))))
                    }
                    PlayerChoice::Exit => {
                        let outro = Scene::Outro(CardScene::outro(self.intro_duration_ms));
                        self.fade(finished, outro)
                    }
                    PlayerChoice::None => {
                        log::warn!("Menu ended without a choice, showing it again");
                        self.fade(finished, Scene::Menu(MenuScene::new()))
                    }
                }
            }
            Scene::Outro(card) => {
                self.current = Some(Scene::Outro(card));
                log::info!("Farewell shown, exiting");
                return Advance::Exit;
            }
            finished @ (Scene::Intro(_) | Scene::Gameplay(_)) => {
                self.fade(finished, Scene::Menu(MenuScene::new()))
            }
        };

        self.set_next_stage(next, ctx);
        Advance::Continue
    }

    /// Update the current scene with the frame delta
    pub fn update(&mut self, delta_ms: u64, ctx: &mut SceneContext<'_>) {
        if let Some(scene) = self.current.as_mut() {
            scene.update(delta_ms, ctx);
        }
    }

    /// Install `next`, starting it unless a transition already did
    pub fn set_next_stage(&mut self, mut next: Scene, ctx: &mut SceneContext<'_>) {
        let (w, h) = self.viewport;
        if next.state() == SceneState::Undefined {
            next.set_viewport(w, h);
            next.begin(ctx);
        }
        log::info!("Now showing {}", next.name());
        self.current = Some(next);
    }

    fn fade(&self, finished: Scene, next: Scene) -> Scene {
        Scene::Transition(Box::new(TransitionScene::new(
            finished,
            next,
            self.transition_duration_ms,
        )))
    }

    fn take_seed(&mut self) -> u64 {
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use crate::scene::Lifecycle;
    use crate::scene::testing::Harness;
    use glam::Vec2;

    fn sequencer() -> SceneSequencer {
        SceneSequencer::new(&Settings::default(), 7)
    }

    /// Run whole frames the way the game loop does
    fn frames(seq: &mut SceneSequencer, h: &mut Harness, count: usize, delta_ms: u64) -> Advance {
        let mut last = Advance::Continue;
        for _ in 0..count {
            last = seq.advance(&mut h.ctx());
            seq.update(delta_ms, &mut h.ctx());
            h.input.clear();
        }
        last
    }

    fn click(seq: &mut SceneSequencer, h: &mut Harness, at: Vec2) {
        h.input.pointer_moved(at);
        h.input.button_down(MouseButton::Left);
        frames(seq, h, 1, 16);
        h.input.button_up(MouseButton::Left);
        frames(seq, h, 1, 16);
    }

    /// Play through the intro and its fade, landing on the menu
    fn to_menu(seq: &mut SceneSequencer, h: &mut Harness) {
        frames(seq, h, 1, 0);
        frames(seq, h, 1, 5000);
        frames(seq, h, 3, 600);
        assert_eq!(seq.current_kind(), Some(SceneKind::Menu));
    }

    #[test]
    fn test_starts_with_intro() {
        let mut h = Harness::new();
        let mut seq = sequencer();
        assert!(seq.current().is_none());
        assert_eq!(seq.advance(&mut h.ctx()), Advance::Continue);
        assert_eq!(seq.current_kind(), Some(SceneKind::Intro));
        assert_eq!(seq.current().unwrap().state(), SceneState::Started);
    }

    #[test]
    fn test_advance_keeps_running_scene() {
        let mut h = Harness::new();
        let mut seq = sequencer();
        seq.advance(&mut h.ctx());
        seq.update(100, &mut h.ctx());
        for _ in 0..5 {
            seq.advance(&mut h.ctx());
            assert_eq!(seq.current_kind(), Some(SceneKind::Intro));
            assert_eq!(seq.current().unwrap().elapsed_ms(), 100);
        }
    }

    #[test]
    fn test_intro_fades_into_menu() {
        let mut h = Harness::new();
        let mut seq = sequencer();
        frames(&mut seq, &mut h, 1, 0);
        frames(&mut seq, &mut h, 1, 5000);
        assert_eq!(seq.current().unwrap().state(), SceneState::Ended);

        seq.advance(&mut h.ctx());
        let Some(Scene::Transition(fade)) = seq.current() else {
            panic!("expected a transition");
        };
        assert_eq!(fade.previous().kind(), SceneKind::Intro);
        assert_eq!(fade.next().kind(), SceneKind::Menu);
        assert_eq!(fade.next().state(), SceneState::Started);
    }

    #[test]
    fn test_run_choice_leads_to_gameplay() {
        let mut h = Harness::new();
        let mut seq = sequencer();
        to_menu(&mut seq, &mut h);

        click(&mut seq, &mut h, Vec2::new(800.0, 200.0));
        assert_eq!(seq.current().unwrap().state(), SceneState::Ended);

        seq.advance(&mut h.ctx());
        let Some(Scene::Transition(fade)) = seq.current() else {
            panic!("expected a transition");
        };
        assert_eq!(fade.next().kind(), SceneKind::Gameplay);

        seq.update(1001, &mut h.ctx());
        seq.advance(&mut h.ctx());
        let Some(Scene::Gameplay(game)) = seq.current() else {
            panic!("expected gameplay");
        };
        assert_eq!(game.seed(), 7);
        assert_eq!(game.state(), SceneState::Started);
    }

    #[test]
    fn test_exit_choice_ends_program() {
        let mut h = Harness::new();
        let mut seq = sequencer();
        to_menu(&mut seq, &mut h);

        click(&mut seq, &mut h, Vec2::new(800.0, 275.0));
        // Fade, then the farewell card
        frames(&mut seq, &mut h, 3, 600);
        assert_eq!(seq.current_kind(), Some(SceneKind::Outro));
        frames(&mut seq, &mut h, 1, 5000);
        assert_eq!(frames(&mut seq, &mut h, 1, 16), Advance::Exit);
        assert_eq!(seq.advance(&mut h.ctx()), Advance::Exit);
    }

    #[test]
    fn test_each_run_gets_a_new_seed() {
        let mut seq = sequencer();
        assert_eq!(seq.take_seed(), 7);
        assert_eq!(seq.take_seed(), 8);
    }
}
