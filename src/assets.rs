//! Asset catalog and the resolved sprite bank
//!
//! The catalog maps names to image descriptions. [`SpriteBank::load`] resolves
//! every image the scenes need up front, so a missing asset stops startup
//! instead of surfacing mid-frame. Images are flat-colored placeholders of the
//! right size; the renderer draws them as tinted rectangles.

use std::collections::HashMap;

use thiserror::Error;

use crate::consts::{ENEMY_KINDS, ENEMY_SIZE, ITEM_SIZE, TURKEY_SIZE};
use crate::renderer::colors;
use crate::rgb8;
use crate::settings::BACKGROUNDS;

/// Frames in every sprite animation
pub const ANIMATION_FRAMES: usize = 6;
/// Size of every widget image
pub const BUTTON_WIDTH: f32 = 150.0;
pub const BUTTON_HEIGHT: f32 = 50.0;

/// Avatar animations
pub const TURKEY_RUN: &str = "pavo_corre";
pub const TURKEY_JUMP: &str = "pavo_salta";

#[derive(Debug, Error, PartialEq)]
pub enum AssetError {
    #[error("asset {name:?} not found")]
    Missing { name: String },
}

/// A resolved image
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub color: [f32; 4],
}

impl Image {
    pub fn new(name: impl Into<String>, width: f32, height: f32, color: [f32; 4]) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            color,
        }
    }
}

/// Widget images, one set of three states each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    Config,
    Run,
    Exit,
    Music1,
    Music2,
    Music3,
    Image1,
    Image2,
    Image3,
    Back,
}

impl ButtonId {
    pub const ALL: [ButtonId; 10] = [
        ButtonId::Config,
        ButtonId::Run,
        ButtonId::Exit,
        ButtonId::Music1,
        ButtonId::Music2,
        ButtonId::Music3,
        ButtonId::Image1,
        ButtonId::Image2,
        ButtonId::Image3,
        ButtonId::Back,
    ];

    pub fn asset_name(&self) -> &'static str {
        match self {
            ButtonId::Config => "btn-config",
            ButtonId::Run => "btn-run",
            ButtonId::Exit => "btn-exit",
            ButtonId::Music1 => "btn-music1",
            ButtonId::Music2 => "btn-music2",
            ButtonId::Music3 => "btn-music3",
            ButtonId::Image1 => "btn-image1",
            ButtonId::Image2 => "btn-image2",
            ButtonId::Image3 => "btn-image3",
            ButtonId::Back => "btn-back",
        }
    }
}

/// The three state images of a button
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonArt {
    pub normal: Image,
    pub over: Image,
    pub highlight: Image,
}

/// Named image descriptions
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    entries: HashMap<String, (f32, f32, [f32; 4])>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The game's built-in placeholder art
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        for (name, color) in [(TURKEY_RUN, rgb8(140, 80, 40)), (TURKEY_JUMP, rgb8(170, 100, 50))] {
            catalog.insert_frames(name, TURKEY_SIZE, TURKEY_SIZE, color);
        }
        for kind in 0..ENEMY_KINDS {
            let color = if kind == 0 { rgb8(60, 160, 60) } else { rgb8(120, 40, 160) };
            catalog.insert_frames(&format!("enemy_{}", kind), ENEMY_SIZE, ENEMY_SIZE, color);
        }
        // Coin, heart, flask
        for (kind, color) in [rgb8(255, 215, 0), rgb8(255, 60, 90), rgb8(60, 120, 255)]
            .into_iter()
            .enumerate()
        {
            catalog.insert_frames(&format!("item_{}", kind), ITEM_SIZE, ITEM_SIZE, color);
        }

        let (w, h) = (crate::consts::SCREEN_WIDTH as f32, crate::consts::SCREEN_HEIGHT as f32);
        for (id, color) in BACKGROUNDS
            .iter()
            .zip([rgb8(30, 10, 10), rgb8(10, 10, 30), rgb8(20, 20, 20)])
        {
            catalog.insert(&format!("background-{}", id), w, h, color);
        }
        catalog.insert("match", w, h, rgb8(40, 20, 10));

        for button in ButtonId::ALL {
            let name = button.asset_name();
            catalog.insert(&format!("{}_normal", name), BUTTON_WIDTH, BUTTON_HEIGHT, colors::BUTTON_NORMAL);
            catalog.insert(&format!("{}_over", name), BUTTON_WIDTH, BUTTON_HEIGHT, colors::BUTTON_OVER);
            catalog.insert(&format!("{}_highlight", name), BUTTON_WIDTH, BUTTON_HEIGHT, colors::BUTTON_ACTIVE);
        }

        catalog
    }

    pub fn insert(&mut self, name: &str, width: f32, height: f32, color: [f32; 4]) {
        self.entries.insert(name.to_string(), (width, height, color));
    }

    /// Insert `name_0` .. `name_N` animation frames
    pub fn insert_frames(&mut self, name: &str, width: f32, height: f32, color: [f32; 4]) {
        for i in 0..ANIMATION_FRAMES {
            // Alternate brightness so frame changes are visible
            let shade = if i % 2 == 0 { 1.0 } else { 0.85 };
            let frame_color = [color[0] * shade, color[1] * shade, color[2] * shade, color[3]];
            self.insert(&format!("{}_{}", name, i), width, height, frame_color);
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, name: &str) -> Result<Image, AssetError> {
        self.entries
            .get(name)
            .map(|&(w, h, color)| Image::new(name, w, h, color))
            .ok_or_else(|| AssetError::Missing {
                name: name.to_string(),
            })
    }

    pub fn resolve_frames(&self, name: &str) -> Result<Vec<Image>, AssetError> {
        (0..ANIMATION_FRAMES)
            .map(|i| self.resolve(&format!("{}_{}", name, i)))
            .collect()
    }
}

/// Every image the scenes use, resolved once at startup
#[derive(Debug, Clone)]
pub struct SpriteBank {
    pub turkey_run: Vec<Image>,
    pub turkey_jump: Vec<Image>,
    /// Indexed by hazard kind
    pub enemies: Vec<Vec<Image>>,
    /// Indexed by item kind
    pub items: Vec<Vec<Image>>,
    /// Card background
    pub card: Image,
    /// Aligned with [`BACKGROUNDS`]
    backgrounds: Vec<Image>,
    /// Aligned with [`ButtonId::ALL`]
    buttons: Vec<ButtonArt>,
}

impl SpriteBank {
    pub fn load(catalog: &AssetCatalog) -> Result<Self, AssetError> {
        let turkey_run = catalog.resolve_frames(TURKEY_RUN)?;
        let turkey_jump = catalog.resolve_frames(TURKEY_JUMP)?;
        let enemies = (0..ENEMY_KINDS)
            .map(|kind| catalog.resolve_frames(&format!("enemy_{}", kind)))
            .collect::<Result<Vec<_>, _>>()?;
        let items = (0..3)
            .map(|kind| catalog.resolve_frames(&format!("item_{}", kind)))
            .collect::<Result<Vec<_>, _>>()?;
        let card = catalog.resolve("match")?;
        let backgrounds = BACKGROUNDS
            .iter()
            .map(|id| catalog.resolve(&format!("background-{}", id)))
            .collect::<Result<Vec<_>, _>>()?;
        let buttons = ButtonId::ALL
            .iter()
            .map(|button| {
                let name = button.asset_name();
                Ok(ButtonArt {
                    normal: catalog.resolve(&format!("{}_normal", name))?,
                    over: catalog.resolve(&format!("{}_over", name))?,
                    highlight: catalog.resolve(&format!("{}_highlight", name))?,
                })
            })
            .collect::<Result<Vec<_>, AssetError>>()?;

        log::info!("Sprite bank loaded ({} catalog entries)", catalog.len());

        Ok(Self {
            turkey_run,
            turkey_jump,
            enemies,
            items,
            card,
            backgrounds,
            buttons,
        })
    }

    /// Background image by id, falling back to the first one
    pub fn background(&self, id: &str) -> &Image {
        let name = format!("background-{}", id);
        match self.backgrounds.iter().find(|image| image.name == name) {
            Some(image) => image,
            None => {
                log::error!("Unknown background {:?}", id);
                &self.backgrounds[0]
            }
        }
    }

    pub fn button(&self, id: ButtonId) -> &ButtonArt {
        // ALL is in declaration order
        &self.buttons[id as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_loads() {
        let bank = SpriteBank::load(&AssetCatalog::builtin()).unwrap();
        assert_eq!(bank.turkey_run.len(), ANIMATION_FRAMES);
        assert_eq!(bank.enemies.len(), ENEMY_KINDS as usize);
        assert_eq!(bank.items.len(), 3);
        assert_eq!(bank.turkey_jump[0].width, TURKEY_SIZE);
        assert_eq!(bank.button(ButtonId::Back).normal.name, "btn-back_normal");
        assert_eq!(bank.background("c").name, "background-c");
    }

    #[test]
    fn test_missing_asset_is_fatal() {
        let mut catalog = AssetCatalog::builtin();
        assert!(catalog.remove("item_2_4"));
        let err = SpriteBank::load(&catalog).unwrap_err();
        assert_eq!(
            err,
            AssetError::Missing {
                name: "item_2_4".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_background_falls_back() {
        let bank = SpriteBank::load(&AssetCatalog::builtin()).unwrap();
        assert_eq!(bank.background("nope").name, "background-a");
    }
}
