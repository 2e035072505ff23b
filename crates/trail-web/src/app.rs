//! Page wiring: canvas, listeners, the frame loop and the exported config hook.

use crate::dom;
use crate::events;
use crate::frame::{self, FrameContext};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use trail_core::{apply_action, ControlAction, EffectConfig, Engine};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<FrameContext>>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("trail-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
        return Err(JsValue::from_str(&e.to_string()));
    }
    Ok(())
}

/// Replace the live config from TOML text. Invalid input leaves it untouched.
#[wasm_bindgen]
pub fn set_config_toml(text: &str) -> Result<(), JsValue> {
    let cfg = EffectConfig::from_toml_str(text).map_err(|e| JsValue::from_str(&e.to_string()))?;
    APP.with(|app| {
        if let Some(ctx) = app.borrow().as_ref() {
            ctx.borrow_mut().config = cfg;
        }
    });
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    let ctx2d = dom::context_2d(&canvas)?;
    let (width, height) = dom::sync_canvas_backing_size(&canvas);

    let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        engine: Engine::new(width, height, seed),
        config: EffectConfig::default(),
        paused: false,
        mic: None,
        canvas: canvas.clone(),
        ctx2d,
        last_instant: Instant::now(),
    }));
    APP.with(|app| *app.borrow_mut() = Some(frame_ctx.clone()));

    // Resize: keep backing store and engine buffers in step
    {
        let frame_ctx = frame_ctx.clone();
        let closure = Closure::wrap(Box::new(move || {
            let mut ctx = frame_ctx.borrow_mut();
            let (w, h) = dom::sync_canvas_backing_size(&ctx.canvas);
            ctx.resize(w, h);
        }) as Box<dyn FnMut()>);
        if let Some(w) = web::window() {
            w.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
                .ok();
        }
        closure.forget();
    }

    // Keyboard controls
    {
        let frame_ctx = frame_ctx.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            events::handle_global_keydown(&ev, &frame_ctx);
        }) as Box<dyn FnMut(_)>);
        document
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
    }

    // Microphone on demand; must follow a user gesture. Later clicks mute/unmute.
    {
        let frame_ctx = frame_ctx.clone();
        dom::add_click_listener(&document, "listen", move || {
            if frame_ctx.borrow().mic.is_some() {
                let mut ctx = frame_ctx.borrow_mut();
                let ctx = &mut *ctx;
                apply_action(ControlAction::ToggleAudio, &mut ctx.config, &mut ctx.paused);
                return;
            }
            let frame_ctx = frame_ctx.clone();
            spawn_local(async move {
                let (bass, treble) = {
                    let ctx = frame_ctx.borrow();
                    (ctx.config.bass_band, ctx.config.treble_band)
                };
                match crate::audio::start_microphone(bass, treble).await {
                    Ok(mic) => {
                        let mut ctx = frame_ctx.borrow_mut();
                        ctx.mic = Some(mic);
                        ctx.config.audio_enabled = true;
                    }
                    Err(e) => log::warn!("[audio] {e}; continuing without audio"),
                }
            });
        });
    }

    log::info!("[init] canvas {}x{}, seed {}", width, height, seed);
    frame::start_loop(frame_ctx);
    Ok(())
}
