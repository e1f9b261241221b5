//! Scene lifecycle
//!
//! A scene is one phase of the program (intro card, menu, gameplay, fade,
//! farewell card). Every scene keeps the same bookkeeping in a [`Stage`] and
//! plugs its behavior into the [`Lifecycle`] hooks. The set of scenes is
//! closed, so the sequencer dispatches on the [`Scene`] variant.

pub mod card;
pub mod gameplay;
pub mod menu;
pub mod sequencer;
pub mod transition;

pub use card::{CardConfig, CardScene};
pub use gameplay::GameplayScene;
pub use menu::{MenuScene, PlayerChoice};
pub use sequencer::{Advance, SceneSequencer};
pub use transition::TransitionScene;

use crate::assets::SpriteBank;
use crate::audio::AudioSink;
use crate::input::InputState;
use crate::renderer::Surface;
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneState {
    #[default]
    Undefined,
    Started,
    /// Reserved, nothing pauses yet
    Paused,
    Ended,
}

/// Services a scene may use during a hook
pub struct SceneContext<'a> {
    pub input: &'a InputState,
    pub audio: &'a mut dyn AudioSink,
    pub sprites: &'a SpriteBank,
    pub settings: &'a mut Settings,
}

/// Bookkeeping shared by every scene
#[derive(Debug, Clone, Default)]
pub struct Stage {
    state: SceneState,
    elapsed_ms: u64,
    surface: Option<Surface>,
    viewport: (f32, f32),
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Time spent in `Started`
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
    }

    /// Last completed frame; `None` before `begin`
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut()
    }

    fn start(&mut self) {
        assert_eq!(self.state, SceneState::Undefined, "scene started twice");
        let (w, h) = self.viewport;
        self.surface = Some(Surface::new(w, h));
        self.state = SceneState::Started;
    }
}

/// Hooks plus the template methods that bracket them
pub trait Lifecycle {
    fn stage(&self) -> &Stage;
    fn stage_mut(&mut self) -> &mut Stage;

    /// Short name for logs
    fn name(&self) -> &'static str;

    fn on_start(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Draw and simulate one frame; the surface frame is already open
    fn on_update(&mut self, delta_ms: u64, ctx: &mut SceneContext<'_>);

    fn on_end(&mut self) {}

    fn state(&self) -> SceneState {
        self.stage().state()
    }

    fn elapsed_ms(&self) -> u64 {
        self.stage().elapsed_ms()
    }

    /// Allocate the surface, run `on_start` and enter `Started`.
    ///
    /// Panics unless the scene is still `Undefined`.
    fn begin(&mut self, ctx: &mut SceneContext<'_>) {
        self.stage_mut().start();
        log::info!("Scene {} starts", self.name());
        self.on_start(ctx);
    }

    /// Advance one frame; does nothing unless `Started`
    fn update(&mut self, delta_ms: u64, ctx: &mut SceneContext<'_>) {
        if self.state() != SceneState::Started {
            return;
        }
        let stage = self.stage_mut();
        stage.elapsed_ms += delta_ms;
        if let Some(surface) = stage.surface.as_mut() {
            surface.begin_frame();
        }
        self.on_update(delta_ms, ctx);
        if let Some(surface) = self.stage_mut().surface.as_mut() {
            surface.end_frame();
        }
    }

    /// Enter `Ended` and run `on_end`; later calls do nothing
    fn end(&mut self) {
        if self.state() == SceneState::Ended {
            return;
        }
        self.stage_mut().state = SceneState::Ended;
        self.on_end();
        log::info!("Scene {} alive for {} ms", self.name(), self.elapsed_ms());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Intro,
    Menu,
    Gameplay,
    Transition,
    Outro,
}

/// The closed set of scenes
#[derive(Debug)]
pub enum Scene {
    Intro(CardScene),
    Menu(MenuScene),
    Gameplay(Box<GameplayScene>),
    Transition(Box<TransitionScene>),
    Outro(CardScene),
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Intro(_) => SceneKind::Intro,
            Scene::Menu(_) => SceneKind::Menu,
            Scene::Gameplay(_) => SceneKind::Gameplay,
            Scene::Transition(_) => SceneKind::Transition,
            Scene::Outro(_) => SceneKind::Outro,
        }
    }

    pub fn lifecycle(&self) -> &dyn Lifecycle {
        match self {
            Scene::Intro(s) | Scene::Outro(s) => s,
            Scene::Menu(s) => s,
            Scene::Gameplay(s) => &**s,
            Scene::Transition(s) => &**s,
        }
    }

    pub fn lifecycle_mut(&mut self) -> &mut dyn Lifecycle {
        match self {
            Scene::Intro(s) | Scene::Outro(s) => s,
            Scene::Menu(s) => s,
            Scene::Gameplay(s) => &mut **s,
            Scene::Transition(s) => &mut **s,
        }
    }

    pub fn name(&self) -> &'static str {
        self.lifecycle().name()
    }

    pub fn state(&self) -> SceneState {
        self.lifecycle().state()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.lifecycle().elapsed_ms()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.lifecycle().stage().surface()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.lifecycle_mut().stage_mut().set_viewport(width, height);
    }

    pub fn begin(&mut self, ctx: &mut SceneContext<'_>) {
        self.lifecycle_mut().begin(ctx);
    }

    pub fn update(&mut self, delta_ms: u64, ctx: &mut SceneContext<'_>) {
        self.lifecycle_mut().update(delta_ms, ctx);
    }

    pub fn end(&mut self) {
        self.lifecycle_mut().end();
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for scene tests

    use super::*;
    use crate::assets::AssetCatalog;
    use crate::audio::RecordingAudio;

    pub struct Harness {
        pub input: InputState,
        pub audio: RecordingAudio,
        pub sprites: SpriteBank,
        pub settings: Settings,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                input: InputState::new(),
                audio: RecordingAudio::new(),
                sprites: SpriteBank::load(&AssetCatalog::builtin()).unwrap(),
                settings: Settings::default(),
            }
        }

        pub fn ctx(&mut self) -> SceneContext<'_> {
            SceneContext {
                input: &self.input,
                audio: &mut self.audio,
                sprites: &self.sprites,
                settings: &mut self.settings,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Harness;
    use super::*;
    use proptest::prelude::*;

    /// Counts hook calls and ends after a fixed time
    struct Probe {
        stage: Stage,
        starts: u32,
        updates: u32,
        ends: u32,
        lifetime_ms: u64,
    }

    impl Probe {
        fn new(lifetime_ms: u64) -> Self {
            let mut stage = Stage::new();
            stage.set_viewport(64.0, 32.0);
            Self {
                stage,
                starts: 0,
                updates: 0,
                ends: 0,
                lifetime_ms,
            }
        }
    }

    impl Lifecycle for Probe {
        fn stage(&self) -> &Stage {
            &self.stage
        }

        fn stage_mut(&mut self) -> &mut Stage {
            &mut self.stage
        }

        fn name(&self) -> &'static str {
            "probe"
        }

        fn on_start(&mut self, _ctx: &mut SceneContext<'_>) {
            self.starts += 1;
        }

        fn on_update(&mut self, _delta_ms: u64, _ctx: &mut SceneContext<'_>) {
            self.updates += 1;
            assert!(self.stage.surface().is_some_and(|s| s.is_drawing()));
            if self.elapsed_ms() >= self.lifetime_ms {
                self.end();
            }
        }

        fn on_end(&mut self) {
            self.ends += 1;
        }
    }

    #[test]
    fn test_update_before_begin_is_noop() {
        let mut h = Harness::new();
        let mut probe = Probe::new(100);
        probe.update(16, &mut h.ctx());
        assert_eq!(probe.updates, 0);
        assert_eq!(probe.elapsed_ms(), 0);
        assert!(probe.stage().surface().is_none());
    }

    #[test]
    fn test_begin_allocates_surface() {
        let mut h = Harness::new();
        let mut probe = Probe::new(100);
        probe.begin(&mut h.ctx());
        assert_eq!(probe.state(), SceneState::Started);
        assert_eq!(probe.starts, 1);
        let surface = probe.stage().surface().unwrap();
        assert_eq!((surface.width(), surface.height()), (64.0, 32.0));
    }

    #[test]
    #[should_panic(expected = "scene started twice")]
    fn test_begin_twice_panics() {
        let mut h = Harness::new();
        let mut probe = Probe::new(100);
        probe.begin(&mut h.ctx());
        probe.begin(&mut h.ctx());
    }

    #[test]
    fn test_no_updates_after_end() {
        let mut h = Harness::new();
        let mut probe = Probe::new(32);
        probe.begin(&mut h.ctx());
        probe.update(16, &mut h.ctx());
        probe.update(16, &mut h.ctx());
        assert_eq!(probe.state(), SceneState::Ended);
        probe.update(16, &mut h.ctx());
        probe.end();
        assert_eq!(probe.updates, 2);
        assert_eq!(probe.ends, 1);
        assert_eq!(probe.elapsed_ms(), 32);
        // The frame opened before ending was still closed
        assert!(!probe.stage().surface().unwrap().is_drawing());
    }

    proptest! {
        #[test]
        fn prop_state_machine(ops in proptest::collection::vec(0u8..3, 0..40)) {
            let mut h = Harness::new();
            let mut probe = Probe::new(u64::MAX);
            let mut ended = false;
            for op in ops {
                match op {
                    0 if probe.state() == SceneState::Undefined => probe.begin(&mut h.ctx()),
                    0 => {}
                    1 => {
                        let before = probe.updates;
                        probe.update(10, &mut h.ctx());
                        let expected = if probe.state() == SceneState::Started { before + 1 } else { before };
                        prop_assert_eq!(probe.updates, expected);
                    }
                    _ => {
                        probe.end();
                        ended = true;
                    }
                }
                prop_assert!(probe.starts <= 1);
                prop_assert_eq!(probe.ends, u32::from(ended));
                if ended {
                    prop_assert_eq!(probe.state(), SceneState::Ended);
                }
            }
        }
    }
}
