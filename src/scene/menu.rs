//! Main menu with a configuration panel
//!
//! Two widget layers share the screen; only the active one is visible and
//! reports events. The scene ends once the player picks Run or Exit, and the
//! sequencer reads [`MenuScene::choice`] to decide what comes next.

use super::{Lifecycle, SceneContext, Stage};
use crate::assets::{BUTTON_WIDTH, ButtonId};
use crate::audio::Cue;
use crate::renderer::colors;
use crate::settings::{BACKGROUNDS, Theme};
use crate::ui::{Layer, UiEvent};

/// Initial position of the volume slider
const VOLUME_SLIDER_START: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerChoice {
    #[default]
    None,
    Run,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Config,
    Run,
    Exit,
    Music(usize),
    Volume,
    Image(usize),
    Back,
}

#[derive(Debug, Default)]
pub struct MenuScene {
    stage: Stage,
    main: Layer<MenuAction>,
    config: Layer<MenuAction>,
    config_active: bool,
    /// Pointer was over a widget last frame
    hovering: bool,
    choice: PlayerChoice,
}

impl MenuScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choice(&self) -> PlayerChoice {
        self.choice
    }

    pub fn is_config_active(&self) -> bool {
        self.config_active
    }

    fn show_config(&mut self, active: bool) {
        self.config_active = active;
        self.main.set_enabled(!active);
        self.config.set_enabled(active);
    }

    fn active_layer(&mut self) -> &mut Layer<MenuAction> {
        if self.config_active {
            &mut self.config
        } else {
            &mut self.main
        }
    }

    fn handle(&mut self, event: UiEvent<MenuAction>, ctx: &mut SceneContext<'_>) {
        // Every widget event clicks, slider drags included
        ctx.audio.play_cue(Cue::ButtonClick);

        match event {
            UiEvent::Clicked(MenuAction::Config) => self.show_config(true),
            UiEvent::Clicked(MenuAction::Back) => self.show_config(false),
            UiEvent::Clicked(MenuAction::Run) => self.choice = PlayerChoice::Run,
            UiEvent::Clicked(MenuAction::Exit) => self.choice = PlayerChoice::Exit,
            UiEvent::Clicked(MenuAction::Music(i)) => {
                let theme = Theme::ALL[i];
                ctx.settings.audio_theme = theme;
                ctx.audio.play_track(theme);
            }
            UiEvent::Clicked(MenuAction::Image(i)) => {
                ctx.settings.background = BACKGROUNDS[i].to_string();
                log::info!("Background set to {}", BACKGROUNDS[i]);
            }
            UiEvent::Changed(MenuAction::Volume, value) => {
                let volume = value.clamp(0.0, 100.0) as u8;
                ctx.settings.audio_volume = volume;
                ctx.audio.set_volume(volume);
            }
            other => log::trace!("ignored menu event {:?}", other),
        }
    }
}

impl Lifecycle for MenuScene {
    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    fn name(&self) -> &'static str {
        "menu"
    }

    fn on_start(&mut self, ctx: &mut SceneContext<'_>) {
        let sprites = ctx.sprites;
        let (width, _) = self.stage.viewport();
        let x = (width - BUTTON_WIDTH) / 2.0;

        let mut main = Layer::new();
        main.button(sprites.button(ButtonId::Config), x, 100.0, MenuAction::Config)
            .button(sprites.button(ButtonId::Run), x, 175.0, MenuAction::Run)
            .button(sprites.button(ButtonId::Exit), x, 250.0, MenuAction::Exit);

        let mut config = Layer::new();
        config.label("Cambiar música", 25.0, 50.0, 40.0);
        for (i, id) in [ButtonId::Music1, ButtonId::Music2, ButtonId::Music3].into_iter().enumerate() {
            config.button(sprites.button(id), 75.0 + 160.0 * i as f32, 100.0, MenuAction::Music(i));
        }
        config
            .slider("Volumen", (75.0, 175.0, 400.0, 50.0), (0.0, 100.0), VOLUME_SLIDER_START, MenuAction::Volume)
            .label("Cambiar imagen", 25.0, 275.0, 40.0);
        for (i, id) in [ButtonId::Image1, ButtonId::Image2, ButtonId::Image3].into_iter().enumerate() {
            config.button(sprites.button(id), 75.0 + 160.0 * i as f32, 325.0, MenuAction::Image(i));
        }
        config.button(sprites.button(ButtonId::Back), 25.0, 500.0, MenuAction::Back);

        self.main = main;
        self.config = config;
        self.show_config(false);
        self.choice = PlayerChoice::None;
    }

    fn on_update(&mut self, _delta_ms: u64, ctx: &mut SceneContext<'_>) {
        let layer = self.active_layer();
        let events = layer.update(ctx.input);
        let over = layer.mouse_over().is_some();

        if over && !self.hovering {
            ctx.audio.play_cue(Cue::ButtonOver);
        }
        self.hovering = over;

        for event in events {
            self.handle(event, ctx);
        }

        let background = ctx.sprites.background(&ctx.settings.background);
        if let Some(surface) = self.stage.surface_mut() {
            let (w, h) = (surface.width(), surface.height());
            surface.fill(colors::BACKGROUND);
            surface.image(background, (w - background.width) / 2.0, (h - background.height) / 2.0, None);
            self.main.draw(surface);
            self.config.draw(surface);
        }

        if self.choice != PlayerChoice::None {
            self.end();
        }
    }

    fn on_end(&mut self) {
        self.main.set_enabled(false);
        self.config.set_enabled(false);
    }
}
