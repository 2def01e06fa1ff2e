//! Starfall entry point
//!
//! Wasm builds expose a `mount`/`unmount` pair for the host page; mount
//! creates the canvas, GPU state and frame loop, unmount tears all of it
//! down again. Native builds run a headless simulation smoke pass.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_backdrop {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement};

    use starfall::Settings;
    use starfall::consts::FRAME_DT;
    use starfall::renderer::RenderState;
    use starfall::sim::{BackdropState, FrameInput};

    /// A window listener retained so teardown can unregister it
    struct Listener {
        event: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    /// Everything one mount owns: simulation, GPU state, DOM nodes and the
    /// listeners attached to the window
    struct Backdrop {
        state: BackdropState,
        render_state: RenderState,
        canvas: HtmlCanvasElement,
        container: Element,
        scroll_y: Rc<Cell<f32>>,
        resized: Rc<Cell<bool>>,
        listeners: Vec<Listener>,
        last_time: f64,
    }

    impl Backdrop {
        /// One animation frame: resize if flagged, tick, render
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(0.1)
            } else {
                FRAME_DT
            };
            self.last_time = time;

            if self.resized.replace(false) {
                self.apply_resize();
            }

            let input = FrameInput {
                scroll_y: self.scroll_y.get(),
                now_ms: js_sys::Date::now(),
            };
            self.state.tick(&input, dt);

            match self.render_state.render(&self.state, &self.state.settings) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn apply_resize(&mut self) {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let rect = self.container.get_bounding_client_rect();
            let width = (rect.width() * dpr) as u32;
            let height = (rect.height() * dpr) as u32;
            if width > 0 && height > 0 {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                self.render_state.resize(width, height);
            }
        }

        /// Unregister listeners, dispose simulation entities and detach the
        /// canvas. Dropping `self` afterwards releases every GPU handle.
        fn teardown(&mut self) {
            if let Some(window) = web_sys::window() {
                for listener in self.listeners.drain(..) {
                    let _ = window.remove_event_listener_with_callback(
                        listener.event,
                        listener.closure.as_ref().unchecked_ref(),
                    );
                }
            }
            self.state.dispose();
            let _ = self.container.remove_child(&self.canvas);
        }
    }

    /// Per-mount handles shared between the frame loop and unmount
    #[derive(Clone)]
    struct FrameCtx {
        backdrop: Rc<RefCell<Backdrop>>,
        running: Rc<Cell<bool>>,
        raf_id: Rc<Cell<Option<i32>>>,
    }

    thread_local! {
        static ACTIVE: RefCell<Option<FrameCtx>> = const { RefCell::new(None) };
    }

    pub async fn mount(container_id: &str) {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        // A second mount replaces the first
        unmount();

        let Some(window) = web_sys::window() else {
            log::warn!("No window; backdrop disabled");
            return;
        };
        let Some(document) = window.document() else {
            log::warn!("No document; backdrop disabled");
            return;
        };
        let Some(container) = document.get_element_by_id(container_id) else {
            log::warn!("Container #{container_id} not found; backdrop disabled");
            return;
        };

        // Canvas fills the container and sits behind its content
        let canvas: HtmlCanvasElement = match document
            .create_element("canvas")
            .ok()
            .and_then(|el| el.dyn_into().ok())
        {
            Some(canvas) => canvas,
            None => {
                log::warn!("Could not create canvas; backdrop disabled");
                return;
            }
        };
        let style = canvas.style();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("inset", "0");
        let _ = style.set_property("width", "100%");
        let _ = style.set_property("height", "100%");
        let _ = style.set_property("pointer-events", "none");
        if container.append_child(&canvas).is_err() {
            log::warn!("Could not attach canvas; backdrop disabled");
            return;
        }

        let dpr = window.device_pixel_ratio();
        let rect = container.get_bounding_client_rect();
        let width = ((rect.width() * dpr) as u32).max(1);
        let height = ((rect.height() * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);

        // GPU init: any failure leaves the page without a backdrop but
        // otherwise untouched
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::warn!("No GPU surface ({e}); backdrop disabled");
                let _ = container.remove_child(&canvas);
                return;
            }
        };
        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::warn!("No GPU adapter ({e}); backdrop disabled");
                let _ = container.remove_child(&canvas);
                return;
            }
        };
        let mut render_state = match RenderState::new(surface, &adapter, width, height).await {
            Ok(rs) => rs,
            Err(e) => {
                log::warn!("GPU device unavailable ({e}); backdrop disabled");
                let _ = container.remove_child(&canvas);
                return;
            }
        };

        let settings = Settings::load();
        let now_ms = js_sys::Date::now();
        let seed = now_ms as u64;
        let state = BackdropState::new(seed, now_ms, settings);
        render_state.upload_field(&state.field);
        log::info!("Backdrop mounted with seed {seed}");

        // Listeners write primitive scalars only; the frame tick consumes them
        let scroll_y = Rc::new(Cell::new(window.scroll_y().unwrap_or(0.0) as f32));
        let resized = Rc::new(Cell::new(false));
        let mut listeners = Vec::new();

        {
            let scroll_y = scroll_y.clone();
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    scroll_y.set(window.scroll_y().unwrap_or(0.0) as f32);
                }
            });
            let _ = window
                .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            listeners.push(Listener {
                event: "scroll",
                closure,
            });
        }
        {
            let resized = resized.clone();
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
                resized.set(true);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            listeners.push(Listener {
                event: "resize",
                closure,
            });
        }

        let ctx = FrameCtx {
            backdrop: Rc::new(RefCell::new(Backdrop {
                state,
                render_state,
                canvas,
                container,
                scroll_y,
                resized,
                listeners,
                last_time: 0.0,
            })),
            running: Rc::new(Cell::new(true)),
            raf_id: Rc::new(Cell::new(None)),
        };

        ACTIVE.with(|active| *active.borrow_mut() = Some(ctx.clone()));
        schedule_frame(ctx);
    }

    /// Tear down the active backdrop. Safe to call twice and safe when mount
    /// never completed.
    pub fn unmount() {
        let Some(ctx) = ACTIVE.with(|active| active.borrow_mut().take()) else {
            return;
        };

        ctx.running.set(false);
        if let (Some(id), Some(window)) = (ctx.raf_id.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        ctx.backdrop.borrow_mut().teardown();
        log::info!("Backdrop unmounted");
    }

    fn schedule_frame(ctx: FrameCtx) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let raf_id = ctx.raf_id.clone();
        let closure = Closure::once(move |time: f64| frame(ctx, time));
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => raf_id.set(Some(id)),
            Err(_) => log::warn!("requestAnimationFrame failed; frame loop stopped"),
        }
        closure.forget();
    }

    fn frame(ctx: FrameCtx, time: f64) {
        if !ctx.running.get() {
            return;
        }
        ctx.backdrop.borrow_mut().frame(time);
        schedule_frame(ctx);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn mount(container_id: String) {
    wasm_backdrop::mount(&container_id).await;
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    wasm_backdrop::unmount();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Wasm entry points are mount/unmount; this satisfies the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use starfall::Settings;
    use starfall::consts::FRAME_DT;
    use starfall::sim::{BackdropState, FrameInput};

    env_logger::init();
    log::info!("Starfall headless smoke run (10 s at 60 fps)");

    let mut settings = Settings::default();
    settings.spawn_frequency = 1.0;
    let mut state = BackdropState::new(42, 0.0, settings);

    for frame in 1..=600u32 {
        let input = FrameInput {
            scroll_y: (frame as f32) * 2.0,
            now_ms: f64::from(frame) * 1000.0 / 60.0,
        };
        state.tick(&input, FRAME_DT);
    }

    log::info!(
        "Done: {} spawned, {} alive, camera offset ({:.2}, {:.2})",
        state.spawned_total,
        state.shooting.len(),
        state.camera.current.x,
        state.camera.current.y,
    );
    assert!(state.spawned_total >= 9);
}
