//! Frame loop
//!
//! [`Game`] owns every collaborator the scenes borrow and runs one frame per
//! host callback: sample the clock, let the sequencer swap finished scenes,
//! update the current scene with the frame delta, then clear the input
//! latches. The host presents [`Game::surface`] after each frame.

use crate::assets::SpriteBank;
use crate::audio::AudioSink;
use crate::clock::{Clock, TimeSource};
use crate::input::InputState;
use crate::renderer::Surface;
use crate::scene::{Advance, SceneContext, SceneKind, SceneSequencer};
use crate::settings::Settings;

pub struct Game<A: AudioSink> {
    settings: Settings,
    sprites: SpriteBank,
    audio: A,
    input: InputState,
    clock: Clock,
    sequencer: SceneSequencer,
    frames: u64,
    exited: bool,
}

impl<A: AudioSink> Game<A> {
    /// `fallback_seed` is used unless the settings fix one
    pub fn new(settings: Settings, sprites: SpriteBank, mut audio: A, fallback_seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(fallback_seed);
        log::info!(
            "Game ready: {}x{}, seed {}",
            settings.screen_width,
            settings.screen_height,
            seed
        );

        audio.set_volume(settings.audio_volume);
        audio.play_track(settings.audio_theme);

        let sequencer = SceneSequencer::new(&settings, seed);
        Self {
            settings,
            sprites,
            audio,
            input: InputState::new(),
            clock: Clock::new(),
            sequencer,
            frames: 0,
            exited: false,
        }
    }

    /// Run one frame at host timestamp `now_ms`
    pub fn frame(&mut self, now_ms: u64) -> Advance {
        if self.exited {
            return Advance::Exit;
        }
        self.clock.update_at(now_ms);
        self.step()
    }

    /// Run one frame sampling `source`
    pub fn tick(&mut self, source: &impl TimeSource) -> Advance {
        if self.exited {
            return Advance::Exit;
        }
        self.clock.update(source);
        self.step()
    }

    fn step(&mut self) -> Advance {
        let mut ctx = SceneContext {
            input: &self.input,
            audio: &mut self.audio,
            sprites: &self.sprites,
            settings: &mut self.settings,
        };

        let advance = self.sequencer.advance(&mut ctx);
        if advance == Advance::Continue {
            self.sequencer.update(self.clock.delta_millis(), &mut ctx);
        } else {
            log::info!("Exit after {} frames", self.frames);
            self.exited = true;
        }

        self.input.clear();
        self.frames += 1;
        advance
    }

    /// Latch host input events here between frames
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Frame to present, `None` before the first frame
    pub fn surface(&self) -> Option<&Surface> {
        self.sequencer.surface()
    }

    pub fn current_kind(&self) -> Option<SceneKind> {
        self.sequencer.current_kind()
    }

    pub fn sequencer(&self) -> &SceneSequencer {
        &self.sequencer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }
}
