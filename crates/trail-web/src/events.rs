use crate::frame::FrameContext;
use std::cell::RefCell;
use std::rc::Rc;
use trail_core::{action_for_key, apply_action};
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, frame_ctx: &Rc<RefCell<FrameContext>>) {
    let key = ev.key();
    let Some(action) = action_for_key(&key) else {
        return;
    };
    ev.prevent_default();
    let mut ctx = frame_ctx.borrow_mut();
    let ctx = &mut *ctx;
    apply_action(action, &mut ctx.config, &mut ctx.paused);
}
