//! Hell's Matches entry point
//!
//! The web build hosts the game on a canvas with WebGPU and an HTML text
//! overlay. The native build has no window; it runs a scripted headless
//! session in real time, which is handy for logging and profiling.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

    use glam::Vec2;
    use hells_matches::assets::{AssetCatalog, SpriteBank};
    use hells_matches::audio::WebAudio;
    use hells_matches::input::MouseButton;
    use hells_matches::renderer::pipeline::letterbox;
    use hells_matches::renderer::{RenderState, Surface};
    use hells_matches::scene::Advance;
    use hells_matches::{Game, Settings};

    /// Game plus the browser-side presentation state
    struct Host {
        game: Game<WebAudio>,
        render_state: Option<RenderState>,
        overlay: Option<HtmlElement>,
        /// Logical size the scenes draw at
        viewport: (f32, f32),
        running: bool,
    }

    impl Host {
        /// Map a canvas-relative CSS position onto the logical viewport,
        /// undoing the letterbox
        fn to_viewport(&self, canvas: &HtmlCanvasElement, x: i32, y: i32) -> Vec2 {
            let client = (canvas.client_width().max(1) as u32, canvas.client_height().max(1) as u32);
            let [bx, by, bw, bh] = letterbox(client, self.viewport);
            Vec2::new(
                (x as f32 - bx) * self.viewport.0 / bw,
                (y as f32 - by) * self.viewport.1 / bh,
            )
        }

        fn render(&mut self) {
            let Some(frame) = self.game.surface() else {
                return;
            };
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(frame) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
            if let Some(ref overlay) = self.overlay {
                draw_labels(overlay, frame, self.viewport);
            }
        }
    }

    /// Lay the frame's text out as absolutely positioned spans
    fn draw_labels(overlay: &HtmlElement, frame: &Surface, viewport: (f32, f32)) {
        let Some(document) = overlay.owner_document() else {
            return;
        };
        overlay.set_inner_html("");
        for label in frame.labels() {
            let Ok(span) = document.create_element("span") else {
                continue;
            };
            span.set_text_content(Some(&label.text));
            let [r, g, b, a] = label.color;
            let style = format!(
                "position:absolute;left:{:.2}%;top:{:.2}%;font-size:{:.2}vw;\
                 color:rgba({},{},{},{:.3});white-space:pre;line-height:1;",
                label.position.x * 100.0 / viewport.0,
                label.position.y * 100.0 / viewport.1,
                label.size * 100.0 / viewport.0,
                (r * 255.0) as u8,
                (g * 255.0) as u8,
                (b * 255.0) as u8,
                a
            );
            let _ = span.set_attribute("style", &style);
            let _ = overlay.append_child(&span);
        }
    }

    fn label_overlay(document: &Document) -> Option<HtmlElement> {
        document
            .get_element_by_id("labels")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Hell's Matches starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = match Settings::load() {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };
        let sprites = match SpriteBank::load(&AssetCatalog::builtin()) {
            Ok(sprites) => sprites,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        let viewport = settings.viewport();
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(settings, sprites, WebAudio::new(), seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;

        let host = Rc::new(RefCell::new(Host {
            game,
            render_state: Some(render_state),
            overlay: label_overlay(&document),
            viewport,
            running: true,
        }));

        setup_input_handlers(&canvas, host.clone());
        request_animation_frame(host);

        log::info!("Hell's Matches running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut h = host.borrow_mut();
                let at = h.to_viewport(&canvas_clone, event.offset_x(), event.offset_y());
                h.game.input_mut().pointer_moved(at);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let host = host.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut h = host.borrow_mut();
                // Browsers only start audio after a user gesture
                h.game.audio().resume();
                let at = h.to_viewport(&canvas_clone, event.offset_x(), event.offset_y());
                let input = h.game.input_mut();
                input.pointer_moved(at);
                input.button_down(MouseButton::from_dom(event.button()));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                host.borrow_mut()
                    .game
                    .input_mut()
                    .button_up(MouseButton::from_dom(event.button()));
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                host.borrow_mut().game.input_mut().key_down(event.key_code());
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                host.borrow_mut().game.input_mut().key_up(event.key_code());
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();
            if h.game.frame(time.max(0.0) as u64) == Advance::Exit {
                h.running = false;
            }
            h.render();

            if !h.running {
                log::info!("Hell's Matches stopped");
                if let Some(ref overlay) = h.overlay {
                    overlay.set_inner_html("");
                }
                return;
            }
        }

        request_animation_frame(host);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{Duration, Instant};

    use glam::Vec2;
    use hells_matches::assets::{AssetCatalog, SpriteBank};
    use hells_matches::audio::NullAudio;
    use hells_matches::clock::{InstantSource, TimeSource};
    use hells_matches::input::{MouseButton, keys};
    use hells_matches::scene::{Advance, SceneKind};
    use hells_matches::{Game, Settings};

    /// Seconds before the session gives up
    const MAX_SECONDS: u64 = 120;
    /// Gameplay time before the autopilot presses Escape
    const PLAY_MS: u64 = 20_000;

    /// Menu button centers at the default viewport
    const RUN_BUTTON: Vec2 = Vec2::new(800.0, 200.0);
    const EXIT_BUTTON: Vec2 = Vec2::new(800.0, 275.0);

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let settings = Settings::load()?;
        let sprites = SpriteBank::load(&AssetCatalog::builtin())?;

        let frame_budget = Duration::from_millis(1000 / u64::from(settings.target_fps));
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut game = Game::new(settings, sprites, NullAudio::new(), seed);
        let source = InstantSource::new();
        let mut last_kind = None;
        let mut played = false;
        let mut menu_frames = 0u32;

        while source.now_millis() < MAX_SECONDS * 1000 {
            let started = Instant::now();
            autopilot(&mut game, source.now_millis(), played, menu_frames);

            if game.tick(&source) == Advance::Exit {
                break;
            }

            let kind = game.current_kind();
            if kind != last_kind {
                log::info!("{:>7} ms  {:?}", source.now_millis(), kind);
                last_kind = kind;
                menu_frames = 0;
            }
            match kind {
                Some(SceneKind::Gameplay) => played = true,
                Some(SceneKind::Menu) => menu_frames += 1,
                _ => {}
            }

            std::thread::sleep(frame_budget.saturating_sub(started.elapsed()));
        }

        log::info!(
            "Session over after {} frames ({} ms)",
            game.frames(),
            source.now_millis()
        );
        Ok(())
    }

    /// Play once, then leave through the menu's Exit button
    fn autopilot(game: &mut Game<NullAudio>, now: u64, played: bool, menu_frames: u32) {
        let elapsed = game
            .sequencer()
            .current()
            .map(|scene| scene.elapsed_ms())
            .unwrap_or_default();
        let kind = game.current_kind();
        let input = game.input_mut();

        match kind {
            Some(SceneKind::Menu) => {
                let target = if played { EXIT_BUTTON } else { RUN_BUTTON };
                input.pointer_moved(target);
                match menu_frames {
                    2 => input.button_down(MouseButton::Left),
                    3 => input.button_up(MouseButton::Left),
                    _ => {}
                }
                input.key_up(keys::ESCAPE);
            }
            Some(SceneKind::Gameplay) => {
                // Sweep across the screen, flying in bursts
                let x = 400.0 + 300.0 * ((now as f32) / 1500.0).sin();
                input.pointer_moved(Vec2::new(x, 400.0));
                match (now / 500) % 3 {
                    0 => input.button_down(MouseButton::Left),
                    1 => input.button_up(MouseButton::Left),
                    _ => {}
                }
                if elapsed >= PLAY_MS {
                    input.key_down(keys::ESCAPE);
                } else {
                    input.key_up(keys::ESCAPE);
                }
            }
            _ => input.key_up(keys::ESCAPE),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Hell's Matches (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
