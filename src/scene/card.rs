//! Greeting cards shown before the menu and before quitting

use glam::Vec2;

use super::{Lifecycle, SceneContext, Stage};
use crate::renderer::{Surface, colors};

const TEXT_SIZE: f32 = 55.0;

/// What a card shows and for how long
#[derive(Debug, Clone, PartialEq)]
pub struct CardConfig {
    pub title: String,
    pub subtitle: String,
    pub duration_ms: u64,
}

impl CardConfig {
    pub fn greeting(duration_ms: u64) -> Self {
        Self {
            title: "Hell's Matches les desea feliz navidad".to_string(),
            subtitle: "Prendiendo el asunto desde 1820".to_string(),
            duration_ms,
        }
    }
}

/// Static card that ends on its own after `duration_ms`
#[derive(Debug)]
pub struct CardScene {
    stage: Stage,
    config: CardConfig,
    name: &'static str,
}

impl CardScene {
    pub fn intro(duration_ms: u64) -> Self {
        Self::new("intro", CardConfig::greeting(duration_ms))
    }

    pub fn outro(duration_ms: u64) -> Self {
        Self::new("outro", CardConfig::greeting(duration_ms))
    }

    pub fn new(name: &'static str, config: CardConfig) -> Self {
        Self {
            stage: Stage::new(),
            config,
            name,
        }
    }
}

impl Lifecycle for CardScene {
    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn on_update(&mut self, _delta_ms: u64, ctx: &mut SceneContext<'_>) {
        let elapsed = self.stage.elapsed_ms();
        let Some(surface) = self.stage.surface_mut() else {
            return;
        };
        let (w, h) = (surface.width(), surface.height());
        surface.fill(colors::BLACK);
        surface.image(&ctx.sprites.card, 0.0, 0.0, None);

        // Centered over the left two thirds, leaving the match picture visible
        let lines = [
            (&self.config.title, h / 2.0 - 100.0, colors::RED),
            (&self.config.subtitle, h / 2.0 + 100.0, colors::YELLOW),
        ];
        for (text, y, color) in lines {
            let x = (2.0 * w / 3.0 - Surface::text_width(text, TEXT_SIZE)) / 2.0;
            surface.text(text.as_str(), Vec2::new(x, y), TEXT_SIZE, color);
        }

        if elapsed >= self.config.duration_ms {
            self.end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneState;
    use crate::scene::testing::Harness;

    #[test]
    fn test_card_ends_after_duration() {
        let mut h = Harness::new();
        let mut card = CardScene::intro(100);
        card.stage_mut().set_viewport(1600.0, 800.0);
        card.begin(&mut h.ctx());

        card.update(60, &mut h.ctx());
        assert_eq!(card.state(), SceneState::Started);
        card.update(40, &mut h.ctx());
        assert_eq!(card.state(), SceneState::Ended);
    }

    #[test]
    fn test_card_draws_both_lines() {
        let mut h = Harness::new();
        let mut card = CardScene::outro(5000);
        card.stage_mut().set_viewport(1600.0, 800.0);
        card.begin(&mut h.ctx());
        card.update(16, &mut h.ctx());

        let labels = card.stage().surface().unwrap().labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].text, "Hell's Matches les desea feliz navidad");
        assert_eq!(labels[0].position.y, 300.0);
        assert_eq!(labels[1].color, colors::YELLOW);
    }
}
