//! Window lifecycle and placement handlers (message types 1-4, 32, 47-50,
//! 60-67) grounded on the `handle_create_window`/`handle_set_window_*`
//! family in the reference server.

use icm_protocol::message::types;
use icm_protocol::payload::{
    read, write, CreateWindow, DestroyWindow, FocusWindow, LowerWindow, RaiseWindow, SetLayer, SetWindow,
    SetWindowLayer, SetWindowMatrix, SetWindowOpacity, SetWindowParent, SetWindowPosition, SetWindowSize,
    SetWindowState, SetWindowTransform, SetWindowTransform3d, SetWindowVisible, WindowCreated, WindowDestroyed,
    WindowStateChanged,
};

use crate::error::DispatchError;
use crate::ids::{HostSurface, Layer, WindowId};
use crate::raster::draw_rect;
use crate::registry::Buffer;
use crate::transform::build_matrix;

use super::{Ctx, OutFrame};

fn payload<T: bytemuck::Pod>(msg_type: u16, bytes: &[u8]) -> Result<T, DispatchError> {
    read(bytes).ok_or(DispatchError::PayloadTooSmall { msg_type })
}

fn find_buffer<'a>(ctx: &'a mut Ctx, id: WindowId) -> Result<&'a mut Buffer, DispatchError> {
    ctx.server
        .buffer_mut(id)
        .ok_or(DispatchError::TargetNotFound { kind: "window", id: id.0 })
}

pub fn create_window(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: CreateWindow = payload(types::CREATE_WINDOW, bytes)?;
    let id = WindowId(p.window_id);
    if ctx.server.resolve(id).is_some() {
        return Err(DispatchError::ResourceExhausted("window_id already in use"));
    }

    let mut buf = Buffer::new(id, p.width, p.height, 0);
    buf.x = p.x;
    buf.y = p.y;
    buf.layer = Layer::from_wire(p.layer);
    draw_rect(&mut buf.pixels, p.width, p.height, 0, 0, p.width, p.height, p.color_rgba);

    let node = ctx.scene.buffer_create(buf.layer, &buf.pixels, p.width, p.height, buf.format);
    ctx.scene.set_position(node, p.x, p.y);
    buf.scene = Some(node);
    ctx.server.buffers.push(buf);

    let reply = WindowCreated { window_id: p.window_id, width: p.width, height: p.height, decorated: 0, focused: 0, _pad: [0; 2] };
    Ok(vec![OutFrame::broadcast(types::WINDOW_CREATED, write(&reply))])
}

pub fn destroy_window(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: DestroyWindow = payload(types::DESTROY_WINDOW, bytes)?;
    let id = WindowId(p.window_id);
    match ctx.server.resolve(id) {
        Some(HostSurface::Buffer) => {
            if let Some(buf) = ctx.server.destroy_buffer(id) {
                if let Some(node) = buf.scene {
                    ctx.scene.buffer_destroy(node);
                }
            }
        }
        Some(_) => {}
        None => return Err(DispatchError::TargetNotFound { kind: "window", id: p.window_id }),
    }
    ctx.server.cleanup_window(id);
    let reply = WindowDestroyed { window_id: p.window_id };
    Ok(vec![OutFrame::broadcast(types::WINDOW_DESTROYED, write(&reply))])
}

pub fn set_window(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindow = payload(types::SET_WINDOW, bytes)?;
    let id = WindowId(p.window_id);
    let node = find_buffer(ctx, id)?.scene;
    let buf = find_buffer(ctx, id)?;
    buf.x = p.x;
    buf.y = p.y;
    buf.width = p.width;
    buf.height = p.height;
    buf.dirty = true;
    if let Some(node) = node {
        ctx.scene.set_position(node, p.x, p.y);
        ctx.scene.set_dest_size(node, p.width as f32, p.height as f32);
    }
    Ok(Vec::new())
}

pub fn set_layer(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetLayer = payload(types::SET_LAYER, bytes)?;
    let id = WindowId(p.window_id);
    let layer = Layer::from_wire(p.layer);
    let node = find_buffer(ctx, id)?.scene;
    find_buffer(ctx, id)?.layer = layer;
    if let Some(node) = node {
        ctx.scene.reparent(node, layer);
    }
    Ok(Vec::new())
}

pub fn set_window_visible(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowVisible = payload(types::SET_WINDOW_VISIBLE, bytes)?;
    let id = WindowId(p.window_id);
    let visible = p.visible != 0;
    let node = find_buffer(ctx, id)?.scene;
    find_buffer(ctx, id)?.visible = visible;
    if let Some(node) = node {
        ctx.scene.set_enabled(node, visible);
    }
    Ok(Vec::new())
}

pub fn set_window_position(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowPosition = payload(types::SET_WINDOW_POSITION, bytes)?;
    let id = WindowId(p.window_id);
    let node = find_buffer(ctx, id)?.scene;
    let buf = find_buffer(ctx, id)?;
    buf.x = p.x;
    buf.y = p.y;
    if let Some(node) = node {
        ctx.scene.set_position(node, p.x, p.y);
    }
    Ok(Vec::new())
}

pub fn set_window_size(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowSize = payload(types::SET_WINDOW_SIZE, bytes)?;
    let id = WindowId(p.window_id);
    let node = find_buffer(ctx, id)?.scene;
    let buf = find_buffer(ctx, id)?;
    buf.width = p.width;
    buf.height = p.height;
    buf.dirty = true;
    if let Some(node) = node {
        ctx.scene.set_dest_size(node, p.width as f32, p.height as f32);
    }
    Ok(Vec::new())
}

pub fn set_window_opacity(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowOpacity = payload(types::SET_WINDOW_OPACITY, bytes)?;
    let id = WindowId(p.window_id);
    let buf = find_buffer(ctx, id)?;
    buf.opacity = p.opacity;
    let node = buf.scene;
    let effective = buf.effective_opacity();
    if let Some(node) = node {
        ctx.scene.set_opacity(node, effective);
    }
    Ok(Vec::new())
}

pub fn set_window_transform(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowTransform = payload(types::SET_WINDOW_TRANSFORM, bytes)?;
    let id = WindowId(p.window_id);
    let buf = find_buffer(ctx, id)?;
    buf.scale_x = p.scale_x;
    buf.scale_y = p.scale_y;
    buf.rotation = p.rotation;
    Ok(Vec::new())
}

pub fn set_window_layer(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowLayer = payload(types::SET_WINDOW_LAYER, bytes)?;
    let id = WindowId(p.window_id);
    let layer = Layer::from_wire(p.layer.max(0) as u32);
    let node = find_buffer(ctx, id)?.scene;
    find_buffer(ctx, id)?.layer = layer;
    if let Some(node) = node {
        ctx.scene.reparent(node, layer);
    }
    Ok(Vec::new())
}

pub fn raise_window(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: RaiseWindow = payload(types::RAISE_WINDOW, bytes)?;
    let id = WindowId(p.window_id);
    if let Some(node) = find_buffer(ctx, id)?.scene {
        ctx.scene.raise(node);
    }
    Ok(Vec::new())
}

pub fn lower_window(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: LowerWindow = payload(types::LOWER_WINDOW, bytes)?;
    let id = WindowId(p.window_id);
    if let Some(node) = find_buffer(ctx, id)?.scene {
        ctx.scene.lower(node);
    }
    Ok(Vec::new())
}

pub fn set_window_parent(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowParent = payload(types::SET_WINDOW_PARENT, bytes)?;
    let id = WindowId(p.window_id);
    let parent = if p.parent_id == 0 { None } else { Some(WindowId(p.parent_id)) };
    find_buffer(ctx, id)?.parent_id = parent;
    Ok(Vec::new())
}

pub fn set_window_transform_3d(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowTransform3d = payload(types::SET_WINDOW_TRANSFORM_3D, bytes)?;
    let id = WindowId(p.window_id);
    let node = find_buffer(ctx, id)?.scene;
    let buf = find_buffer(ctx, id)?;
    buf.translate = [p.translate_x, p.translate_y, p.translate_z];
    buf.rotate_3d = [p.rotate_x, p.rotate_y, p.rotate_z];
    buf.scale_x = p.scale_x;
    buf.scale_y = p.scale_y;
    buf.scale_z = p.scale_z;
    buf.matrix = build_matrix(buf.translate, buf.rotate_3d, [buf.scale_x, buf.scale_y, buf.scale_z]);
    buf.has_matrix = true;
    let matrix = buf.matrix;
    if let Some(node) = node {
        ctx.server.transform.set(node, matrix);
        ctx.scene.set_transform_matrix(node, matrix);
    }
    Ok(Vec::new())
}

pub fn set_window_matrix(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowMatrix = payload(types::SET_WINDOW_MATRIX, bytes)?;
    let id = WindowId(p.window_id);
    let node = find_buffer(ctx, id)?.scene;
    let buf = find_buffer(ctx, id)?;
    buf.matrix = p.matrix;
    buf.has_matrix = true;
    if let Some(node) = node {
        ctx.server.transform.set(node, p.matrix);
        ctx.scene.set_transform_matrix(node, p.matrix);
    }
    Ok(Vec::new())
}

/// Window state bitfield (spec.md §4.2 "window state"): minimized,
/// maximized, and fullscreen are independent bits, matching
/// `ICM_WINDOW_STATE_*` in the reference header.
pub const STATE_MINIMIZED: u32 = 1;
pub const STATE_MAXIMIZED: u32 = 2;
pub const STATE_FULLSCREEN: u32 = 4;

pub fn set_window_state(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowState = payload(types::SET_WINDOW_STATE, bytes)?;
    let id = WindowId(p.window_id);
    let buf = find_buffer(ctx, id)?;
    buf.minimized = p.state & STATE_MINIMIZED != 0;
    buf.maximized = p.state & STATE_MAXIMIZED != 0;
    buf.fullscreen = p.state & STATE_FULLSCREEN != 0;

    let mut out = Vec::new();
    for client in &ctx.server.clients {
        if client.window_event_mask & crate::registry::EVT_STATE != 0 {
            let msg = WindowStateChanged { window_id: p.window_id, state: p.state };
            out.push(OutFrame::to(client.id, types::WINDOW_STATE_CHANGED, write(&msg)));
        }
    }
    Ok(out)
}

pub fn focus_window(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: FocusWindow = payload(types::FOCUS_WINDOW, bytes)?;
    let id = WindowId(p.window_id);
    if ctx.server.resolve(id).is_none() {
        return Err(DispatchError::TargetNotFound { kind: "window", id: p.window_id });
    }
    if let Some(prev) = ctx.server.focused_window {
        if let Some(buf) = ctx.server.buffer_mut(prev) {
            buf.focused = false;
        }
    }
    if let Some(buf) = ctx.server.buffer_mut(id) {
        buf.focused = true;
    }
    ctx.server.focused_window = Some(id);
    Ok(Vec::new())
}
