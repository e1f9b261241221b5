//! Immediate widget layers for the menu and in-game buttons
//!
//! A [`Layer`] groups widgets that are shown and hidden together. Widgets are
//! built by a small factory (image, position, action); each frame the layer
//! reads the input snapshot and reports the actions that fired.

use glam::Vec2;

use crate::assets::{BUTTON_HEIGHT, BUTTON_WIDTH, ButtonArt};
use crate::input::{ButtonEdge, InputState, MouseButton};
use crate::renderer::{Surface, colors};

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    Button(ButtonArt),
    Slider { label: String, value: f32, min: f32, max: f32 },
    Label { text: String, size: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Widget<A> {
    pub kind: WidgetKind,
    pub position: Vec2,
    pub size: Vec2,
    /// Labels carry no action
    pub action: Option<A>,
}

impl<A> Widget<A> {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.size.x
            && point.y >= self.position.y
            && point.y <= self.position.y + self.size.y
    }

    fn interactive(&self) -> bool {
        self.action.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent<A> {
    Clicked(A),
    Changed(A, f32),
}

#[derive(Debug, Clone)]
pub struct Layer<A> {
    widgets: Vec<Widget<A>>,
    visible: bool,
    /// Whether widget events are reported
    broadcast: bool,
    mouse_over: Option<usize>,
    /// Widget under the pointer when the left button went down
    pressed: Option<usize>,
}

impl<A> Default for Layer<A> {
    fn default() -> Self {
        Self {
            widgets: Vec::new(),
            visible: true,
            broadcast: true,
            mouse_over: None,
            pressed: None,
        }
    }
}

impl<A: Copy> Layer<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image button of the standard widget size
    pub fn button(&mut self, art: &ButtonArt, x: f32, y: f32, action: A) -> &mut Self {
        self.widgets.push(Widget {
            kind: WidgetKind::Button(art.clone()),
            position: Vec2::new(x, y),
            size: Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT),
            action: Some(action),
        });
        self
    }

    /// Horizontal slider over `[min, max]`
    pub fn slider(
        &mut self,
        label: &str,
        rect: (f32, f32, f32, f32),
        range: (f32, f32),
        value: f32,
        action: A,
    ) -> &mut Self {
        let (x, y, w, h) = rect;
        self.widgets.push(Widget {
            kind: WidgetKind::Slider {
                label: label.to_string(),
                value: value.clamp(range.0, range.1),
                min: range.0,
                max: range.1,
            },
            position: Vec2::new(x, y),
            size: Vec2::new(w, h),
            action: Some(action),
        });
        self
    }

    pub fn label(&mut self, text: &str, x: f32, y: f32, size: f32) -> &mut Self {
        self.widgets.push(Widget {
            kind: WidgetKind::Label {
                text: text.to_string(),
                size,
            },
            position: Vec2::new(x, y),
            size: Vec2::new(Surface::text_width(text, size), size),
            action: None,
        });
        self
    }

    /// Show/hide and start/stop reporting events together
    pub fn set_enabled(&mut self, enabled: bool) {
        self.visible = enabled;
        self.broadcast = enabled;
        if !enabled {
            self.mouse_over = None;
            self.pressed = None;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_broadcasting(&self) -> bool {
        self.broadcast
    }

    /// Interactive widget currently under the pointer
    pub fn mouse_over(&self) -> Option<usize> {
        self.mouse_over
    }

    pub fn slider_value(&self, action_index: usize) -> Option<f32> {
        match self.widgets.get(action_index)?.kind {
            WidgetKind::Slider { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Consume this frame's input and report fired actions
    pub fn update(&mut self, input: &InputState) -> Vec<UiEvent<A>> {
        let mut events = Vec::new();
        if !self.broadcast {
            return events;
        }

        let pointer = input.pointer_position();
        self.mouse_over = self
            .widgets
            .iter()
            .position(|w| w.interactive() && w.contains(pointer));

        match input.button_state(MouseButton::Left) {
            ButtonEdge::Pressed => {
                self.pressed = self.mouse_over;
                if let Some(event) = self.pressed.and_then(|i| self.drag(i, pointer.x)) {
                    events.push(event);
                }
            }
            ButtonEdge::Released => {
                // A press and release inside one frame count as a click in place
                let pressed = match self.pressed.take() {
                    Some(index) => Some(index),
                    None if input.was_pressed(MouseButton::Left) => self.mouse_over,
                    None => None,
                };
                if let Some(index) = pressed {
                    let widget = &self.widgets[index];
                    if let (WidgetKind::Button(_), Some(action)) = (&widget.kind, widget.action) {
                        // A click needs press and release on the same button
                        if self.mouse_over == Some(index) {
                            events.push(UiEvent::Clicked(action));
                        }
                    }
                }
            }
            ButtonEdge::None => {
                if input.is_pointer_moving() {
                    if let Some(event) = self.pressed.and_then(|i| self.drag(i, pointer.x)) {
                        events.push(event);
                    }
                }
            }
        }

        events
    }

    /// Move a slider to the pointer; `None` for buttons or unchanged values
    fn drag(&mut self, index: usize, pointer_x: f32) -> Option<UiEvent<A>> {
        let widget = &mut self.widgets[index];
        let action = widget.action?;
        let WidgetKind::Slider { value, min, max, .. } = &mut widget.kind else {
            return None;
        };
        let t = ((pointer_x - widget.position.x) / widget.size.x.max(1.0)).clamp(0.0, 1.0);
        let next = (*min + t * (*max - *min)).round();
        if next == *value {
            return None;
        }
        *value = next;
        Some(UiEvent::Changed(action, next))
    }

    pub fn draw(&self, surface: &mut Surface) {
        if !self.visible {
            return;
        }
        for (i, widget) in self.widgets.iter().enumerate() {
            let Vec2 { x, y } = widget.position;
            let over = self.mouse_over == Some(i);
            match &widget.kind {
                WidgetKind::Button(art) => {
                    let image = if self.pressed == Some(i) && over {
                        &art.highlight
                    } else if over {
                        &art.over
                    } else {
                        &art.normal
                    };
                    surface.image(image, x, y, None);
                    let caption = art
                        .normal
                        .name
                        .trim_start_matches("btn-")
                        .trim_end_matches("_normal")
                        .to_uppercase();
                    let size = 25.0;
                    let tx = x + (widget.size.x - Surface::text_width(&caption, size)) / 2.0;
                    surface.text(caption, Vec2::new(tx, y + (widget.size.y - size) / 2.0), size, colors::WHITE);
                }
                WidgetKind::Slider { label, value, min, max } => {
                    let (w, h) = (widget.size.x, widget.size.y);
                    let t = (value - min) / (max - min).max(f32::EPSILON);
                    let fill = if over { colors::BUTTON_OVER } else { colors::BUTTON_NORMAL };
                    surface.fill_rect(x, y, w, h, colors::SLIDER_TRACK);
                    surface.fill_rect(x, y, w * t, h, fill);
                    surface.text(format!("{}", *value as i32), Vec2::new(x + 10.0, y + 12.0), 25.0, colors::WHITE);
                    surface.text(label.clone(), Vec2::new(x + w + 10.0, y + 12.0), 25.0, colors::WHITE);
                }
                WidgetKind::Label { text, size } => {
                    surface.text(text.clone(), widget.position, *size, colors::WHITE);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetCatalog, ButtonId, SpriteBank};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Act {
        Go,
        Volume,
    }

    fn layer() -> Layer<Act> {
        let bank = SpriteBank::load(&AssetCatalog::builtin()).unwrap();
        let mut layer = Layer::new();
        layer
            .label("title", 0.0, 0.0, 40.0)
            .button(bank.button(ButtonId::Run), 100.0, 100.0, Act::Go)
            .slider("vol", (100.0, 200.0, 400.0, 50.0), (0.0, 100.0), 50.0, Act::Volume);
        layer
    }

    fn click_at(layer: &mut Layer<Act>, input: &mut InputState, at: Vec2) -> Vec<UiEvent<Act>> {
        input.pointer_moved(at);
        input.button_down(MouseButton::Left);
        let mut events = layer.update(input);
        input.clear();
        input.button_up(MouseButton::Left);
        events.extend(layer.update(input));
        input.clear();
        events
    }

    #[test]
    fn test_click_fires_on_release_inside() {
        let mut layer = layer();
        let mut input = InputState::new();
        let events = click_at(&mut layer, &mut input, Vec2::new(150.0, 120.0));
        assert_eq!(events, vec![UiEvent::Clicked(Act::Go)]);
    }

    #[test]
    fn test_click_within_one_frame() {
        let mut layer = layer();
        let mut input = InputState::new();
        input.pointer_moved(Vec2::new(150.0, 120.0));
        input.button_down(MouseButton::Left);
        input.button_up(MouseButton::Left);
        assert_eq!(layer.update(&input), vec![UiEvent::Clicked(Act::Go)]);
    }

    #[test]
    fn test_release_without_press_does_not_click() {
        let mut layer = layer();
        let mut input = InputState::new();
        input.pointer_moved(Vec2::new(150.0, 120.0));
        input.button_up(MouseButton::Left);
        assert!(layer.update(&input).is_empty());
    }

    #[test]
    fn test_release_outside_does_not_click() {
        let mut layer = layer();
        let mut input = InputState::new();
        input.pointer_moved(Vec2::new(150.0, 120.0));
        input.button_down(MouseButton::Left);
        layer.update(&input);
        input.clear();
        input.pointer_moved(Vec2::new(900.0, 700.0));
        input.button_up(MouseButton::Left);
        assert!(layer.update(&input).is_empty());
    }

    #[test]
    fn test_labels_are_not_hoverable() {
        let mut layer = layer();
        let mut input = InputState::new();
        input.pointer_moved(Vec2::new(5.0, 5.0));
        layer.update(&input);
        assert_eq!(layer.mouse_over(), None);
        input.pointer_moved(Vec2::new(110.0, 110.0));
        layer.update(&input);
        assert_eq!(layer.mouse_over(), Some(1));
    }

    #[test]
    fn test_slider_drag_reports_values() {
        let mut layer = layer();
        let mut input = InputState::new();
        input.pointer_moved(Vec2::new(200.0, 220.0));
        input.button_down(MouseButton::Left);
        assert_eq!(layer.update(&input), vec![UiEvent::Changed(Act::Volume, 25.0)]);
        input.clear();

        input.pointer_moved(Vec2::new(1000.0, 220.0));
        assert_eq!(layer.update(&input), vec![UiEvent::Changed(Act::Volume, 100.0)]);
        assert_eq!(layer.slider_value(2), Some(100.0));
    }

    #[test]
    fn test_disabled_layer_is_silent() {
        let mut layer = layer();
        layer.set_enabled(false);
        let mut input = InputState::new();
        assert!(click_at(&mut layer, &mut input, Vec2::new(150.0, 120.0)).is_empty());
        assert!(!layer.is_visible());
    }
}
