use crate::audio::MicLevels;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use trail_core::{EffectConfig, Engine, LevelSource};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{Clamped, JsCast};
use web_sys as web;

/// Everything the page mutates between frames.
pub struct FrameContext {
    pub engine: Engine,
    pub config: EffectConfig,
    pub paused: bool,
    pub mic: Option<MicLevels>,

    pub canvas: web::HtmlCanvasElement,
    pub ctx2d: web::CanvasRenderingContext2d,

    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;

        if !self.paused {
            let levels = match self.mic.as_mut() {
                Some(mic) if self.config.audio_enabled => {
                    mic.set_bands(self.config.bass_band, self.config.treble_band);
                    mic.poll_levels()
                }
                _ => None,
            };
            self.engine.tick(dt, &self.config, levels);
        }
        self.present();
    }

    fn present(&self) {
        let frame = self.engine.frame();
        if frame.is_empty() {
            return;
        }
        let rgba = frame.to_rgba8();
        let image = match web::ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(rgba.as_raw().as_slice()),
            frame.width(),
            frame.height(),
        ) {
            Ok(img) => img,
            Err(e) => {
                log::warn!("[frame] ImageData error: {:?}", e);
                return;
            }
        };
        if let Err(e) = self.ctx2d.put_image_data(&image, 0.0, 0.0) {
            log::warn!("[frame] putImageData error: {:?}", e);
        }
    }

    /// Follow the canvas backing size after a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) != self.engine.viewport() {
            self.engine.resize(width, height);
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
