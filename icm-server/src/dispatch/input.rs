//! Per-client input registration (message types 22-25, 43-46, 58-59, 89-90).
//! Pure bookkeeping on `Client`; the actual event fan-out lives in
//! `crate::events`, which reads these flags back.

use icm_protocol::message::types;
use icm_protocol::payload::{read, RegisterKeyboardEvent, RegisterPointerEvent, SubscribeWindowEvents, UnsubscribeWindowEvents};

use crate::error::DispatchError;
use crate::ids::WindowId;

use super::{Ctx, OutFrame};

fn payload<T: bytemuck::Pod>(msg_type: u16, bytes: &[u8]) -> Result<T, DispatchError> {
    read(bytes).ok_or(DispatchError::PayloadTooSmall { msg_type })
}

fn client<'a>(ctx: &'a mut Ctx) -> &'a mut crate::registry::Client {
    let id = ctx.client;
    ctx.server.clients.iter_mut().find(|c| c.id == id).expect("dispatch is always called for a registered client")
}

pub fn register_pointer_event(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: RegisterPointerEvent = payload(types::REGISTER_POINTER_EVENT, bytes)?;
    let id = WindowId(p.window_id);
    if ctx.server.resolve(id).is_none() {
        return Err(DispatchError::TargetNotFound { kind: "window", id: p.window_id });
    }
    let c = client(ctx);
    c.registered_pointer = true;
    c.event_window_id = Some(id);
    Ok(Vec::new())
}

pub fn register_keyboard_event(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: RegisterKeyboardEvent = payload(types::REGISTER_KEYBOARD_EVENT, bytes)?;
    let id = WindowId(p.window_id);
    if ctx.server.resolve(id).is_none() {
        return Err(DispatchError::TargetNotFound { kind: "window", id: p.window_id });
    }
    let c = client(ctx);
    c.registered_keyboard = true;
    c.event_window_id = Some(id);
    Ok(Vec::new())
}

pub fn register_global_pointer_event(ctx: &mut Ctx) -> Result<Vec<OutFrame>, DispatchError> {
    client(ctx).global_pointer = true;
    Ok(Vec::new())
}

pub fn register_global_keyboard_event(ctx: &mut Ctx) -> Result<Vec<OutFrame>, DispatchError> {
    client(ctx).global_keyboard = true;
    Ok(Vec::new())
}

pub fn register_global_capture_mouse(ctx: &mut Ctx) -> Result<Vec<OutFrame>, DispatchError> {
    client(ctx).global_capture_mouse = true;
    Ok(Vec::new())
}

pub fn register_global_capture_keyboard(ctx: &mut Ctx) -> Result<Vec<OutFrame>, DispatchError> {
    client(ctx).global_capture_keyboard = true;
    Ok(Vec::new())
}

pub fn unregister_global_capture_mouse(ctx: &mut Ctx) -> Result<Vec<OutFrame>, DispatchError> {
    client(ctx).global_capture_mouse = false;
    Ok(Vec::new())
}

pub fn unregister_global_capture_keyboard(ctx: &mut Ctx) -> Result<Vec<OutFrame>, DispatchError> {
    client(ctx).global_capture_keyboard = false;
    Ok(Vec::new())
}

pub fn subscribe_window_events(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SubscribeWindowEvents = payload(types::SUBSCRIBE_WINDOW_EVENTS, bytes)?;
    client(ctx).window_event_mask |= p.mask;
    Ok(Vec::new())
}

pub fn unsubscribe_window_events(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: UnsubscribeWindowEvents = payload(types::UNSUBSCRIBE_WINDOW_EVENTS, bytes)?;
    client(ctx).window_event_mask &= !p.mask;
    Ok(Vec::new())
}
