//! Edge-latched input snapshot
//!
//! The host forwards raw events as they arrive; scenes query the snapshot
//! during their update; the frame loop calls [`InputState::clear`] once all
//! game logic has run. Mouse button edges last exactly one frame. Keys keep
//! their latched "pressed" edge until a release arrives, and a release is
//! visible for one frame before the key is forgotten.

use std::collections::HashMap;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }

    /// Map a DOM-style button number (0 left, 1 middle, 2 right)
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            2 => MouseButton::Right,
            _ => MouseButton::Middle,
        }
    }
}

/// Edge latched for a mouse button during the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonEdge {
    #[default]
    None,
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyEdge {
    Pressed,
    Released,
}

/// Common key codes (DOM `keyCode` values)
pub mod keys {
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    buttons: [ButtonEdge; MouseButton::COUNT],
    /// A press arrived this frame, even if a release has since replaced it
    pressed_this_frame: [bool; MouseButton::COUNT],
    keys: HashMap<u32, KeyEdge>,
    pointer: Vec2,
    pointer_moved: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button_down(&mut self, button: MouseButton) {
        self.buttons[button.index()] = ButtonEdge::Pressed;
        self.pressed_this_frame[button.index()] = true;
    }

    /// A release overrides a press latched in the same frame
    pub fn button_up(&mut self, button: MouseButton) {
        self.buttons[button.index()] = ButtonEdge::Released;
    }

    pub fn key_down(&mut self, code: u32) {
        self.keys.insert(code, KeyEdge::Pressed);
    }

    pub fn key_up(&mut self, code: u32) {
        log::trace!("key {} released", code);
        self.keys.insert(code, KeyEdge::Released);
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        self.pointer = position;
        self.pointer_moved = true;
    }

    /// Reset per-frame edges. Call once per frame after all game logic.
    pub fn clear(&mut self) {
        self.buttons = [ButtonEdge::None; MouseButton::COUNT];
        self.pressed_this_frame = [false; MouseButton::COUNT];
        self.keys.retain(|_, edge| *edge != KeyEdge::Released);
        self.pointer_moved = false;
    }

    pub fn button_state(&self, button: MouseButton) -> ButtonEdge {
        self.buttons[button.index()]
    }

    /// Whether `button` went down during this frame
    pub fn was_pressed(&self, button: MouseButton) -> bool {
        self.pressed_this_frame[button.index()]
    }

    pub fn is_key_pressed(&self, code: u32) -> bool {
        self.keys.get(&code) == Some(&KeyEdge::Pressed)
    }

    /// Codes currently latched as pressed, in ascending order
    pub fn pressed_keys(&self) -> Vec<u32> {
        let mut pressed: Vec<u32> = self
            .keys
            .iter()
            .filter(|(_, edge)| **edge == KeyEdge::Pressed)
            .map(|(code, _)| *code)
            .collect();
        pressed.sort_unstable();
        pressed
    }

    pub fn pointer_position(&self) -> Vec2 {
        self.pointer
    }

    pub fn is_pointer_moving(&self) -> bool {
        self.pointer_moved
    }
}
