//! Keybind and click-region registration (message types 33-34, 38-39).
//! Ownership is tracked by `ClientId` so `Server::cleanup_client` can strip
//! them all on disconnect (spec.md §8 property 1).

use icm_protocol::message::types;
use icm_protocol::payload::{read, RegisterClickRegion, RegisterKeybind, UnregisterClickRegion, UnregisterKeybind};

use crate::error::DispatchError;
use crate::ids::WindowId;
use crate::registry::{ClickRegion, Keybind, Rect};

use super::{Ctx, OutFrame};

fn payload<T: bytemuck::Pod>(msg_type: u16, bytes: &[u8]) -> Result<T, DispatchError> {
    read(bytes).ok_or(DispatchError::PayloadTooSmall { msg_type })
}

pub fn register_keybind(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: RegisterKeybind = payload(types::REGISTER_KEYBIND, bytes)?;
    let id = if p.keybind_id != 0 { p.keybind_id } else { ctx.server.alloc_keybind_id() };
    if ctx.server.keybinds.iter().any(|k| k.id == id) {
        return Err(DispatchError::ResourceExhausted("keybind_id already in use"));
    }
    ctx.server.keybinds.push(Keybind { id, modifiers: p.modifiers, keycode: p.keycode, owner: ctx.client });
    Ok(Vec::new())
}

pub fn unregister_keybind(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: UnregisterKeybind = payload(types::UNREGISTER_KEYBIND, bytes)?;
    let before = ctx.server.keybinds.len();
    ctx.server.keybinds.retain(|k| k.id != p.keybind_id);
    if ctx.server.keybinds.len() == before {
        return Err(DispatchError::TargetNotFound { kind: "keybind", id: p.keybind_id });
    }
    Ok(Vec::new())
}

pub fn register_click_region(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: RegisterClickRegion = payload(types::REGISTER_CLICK_REGION, bytes)?;
    let window_id = WindowId(p.window_id);
    if ctx.server.resolve(window_id).is_none() {
        return Err(DispatchError::TargetNotFound { kind: "window", id: p.window_id });
    }
    let id = if p.region_id != 0 { p.region_id } else { ctx.server.alloc_region_id() };
    if ctx.server.click_regions.iter().any(|r| r.id == id) {
        return Err(DispatchError::ResourceExhausted("region_id already in use"));
    }
    let rect = Rect { x: p.x, y: p.y, width: p.width, height: p.height };
    ctx.server.click_regions.push(ClickRegion { id, window_id, rect, owner: ctx.client });
    Ok(Vec::new())
}

pub fn unregister_click_region(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: UnregisterClickRegion = payload(types::UNREGISTER_CLICK_REGION, bytes)?;
    let before = ctx.server.click_regions.len();
    ctx.server.click_regions.retain(|r| r.id != p.region_id);
    if ctx.server.click_regions.len() == before {
        return Err(DispatchError::TargetNotFound { kind: "click_region", id: p.region_id });
    }
    Ok(Vec::new())
}
