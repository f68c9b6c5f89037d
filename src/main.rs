//! Aeternus entry point
//!
//! Browser builds run the game on a canvas; native builds run a headless
//! session for soak testing the script.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use aeternus::Settings;
    use aeternus::audio::MusicPlayer;
    use aeternus::clock::dt_between;
    use aeternus::input::{Action, TickInput};
    use aeternus::renderer::{RenderState, VertexBatch};
    use aeternus::sim::Session;

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        batch: VertexBatch,
        audio: MusicPlayer,
        input: TickInput,
        last_time: f64,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let audio = MusicPlayer::new(settings.music_volume);
            Self {
                session: Session::new(settings),
                render_state: None,
                batch: VertexBatch::new(),
                audio,
                input: TickInput::default(),
                last_time: 0.0,
            }
        }

        fn start(&mut self) {
            let Self { session, audio, .. } = self;
            session.start(audio);
        }

        /// Run one simulation tick with the queued input
        fn update(&mut self, dt: f32) {
            let Self {
                session,
                batch,
                audio,
                input,
                ..
            } = self;
            session.tick(input, dt, batch, audio);
            input.clear();
        }

        /// Present the last batched frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.batch.vertices()) {
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
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Aeternus starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        log::info!("Seed {}, starting at {:.2}s", settings.seed, settings.start_offset);
        let game = Rc::new(RefCell::new(Game::new(settings)));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone())?;
        setup_focus_release(game.clone())?;

        game.borrow_mut().start();
        request_animation_frame(game);

        log::info!("Aeternus running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        for (kind, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(action) = Action::from_key(&event.key()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                event.prevent_default();
                if pressed && event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                if pressed {
                    g.input.press(action);
                } else {
                    g.input.release(action);
                }
            });
            window.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Key-ups are lost while unfocused, so release every held action on
    /// blur. Music is muted until focus returns.
    fn setup_focus_release(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        let blurred = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = blurred.borrow_mut();
            for action in [Action::Up, Action::Down, Action::Left, Action::Right, Action::Slow] {
                g.input.release(action);
            }
            g.audio.set_muted(true);
            log::info!("Input released and music muted (window blur)");
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            game.borrow_mut().audio.set_muted(false);
        });
        window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            let dt = dt_between(g.last_time, time);
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use aeternus::Settings;
    use aeternus::audio::SilentAudio;
    use aeternus::clock::FrameClock;
    use aeternus::input::TickInput;
    use aeternus::renderer::VertexBatch;
    use aeternus::sim::{Session, TickOutcome};

    env_logger::init();
    log::info!("Aeternus (native) starting headless run...");

    let settings = Settings::load().for_headless();
    let run_length = settings.headless_seconds;
    let mut clock = FrameClock::new(settings.target_tps);
    let mut session = Session::new(settings);
    let mut batch = VertexBatch::new();
    let mut audio = SilentAudio::default();
    let input = TickInput::default();

    session.start(&mut audio);

    // First tick runs with dt = 0 so zero-delay openers fire at t = 0
    let mut dt = 0.0;
    let mut elapsed = 0.0;
    while elapsed < run_length {
        if session.tick(&input, dt, &mut batch, &mut audio) == TickOutcome::Quit {
            break;
        }
        dt = clock.wait();
        elapsed += dt;
    }

    log::info!(
        "Headless run finished: {} ticks, {} deaths, {} entities live",
        session.ticks,
        session.deaths,
        session.world.len()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
