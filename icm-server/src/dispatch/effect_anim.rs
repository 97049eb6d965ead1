//! Blur, pixel-effect, animation, and mesh-transform handlers (message
//! types 78-86), grounded on spec.md §4.6-§4.8.

use icm_protocol::message::types;
use icm_protocol::payload::{
    read, AnimateWindow, BlurWindow, ClearWindowMeshTransform, SetScreenEffect, SetWindowBlur, SetWindowEffect,
    SetWindowMeshTransform, StopAnimation, UpdateWindowMeshVerticesHead,
};
use icm_protocol::variable::{decode_mesh_vertices, unpack_equation};

use crate::animation::{start, AnimationTargets};
use crate::error::DispatchError;
use crate::ids::WindowId;

use super::{Ctx, OutFrame};

fn payload<T: bytemuck::Pod>(msg_type: u16, bytes: &[u8]) -> Result<T, DispatchError> {
    read(bytes).ok_or(DispatchError::PayloadTooSmall { msg_type })
}

/// Pushes `buf.effective_opacity()` to the scene so a blur toggle takes
/// visible effect immediately rather than waiting for the next animating
/// output frame (spec.md §4.4).
fn push_effective_opacity(ctx: &mut Ctx, id: WindowId) {
    if let Some(buf) = ctx.server.buffer(id) {
        let node = buf.scene;
        let effective = buf.effective_opacity();
        if let Some(node) = node {
            ctx.scene.set_opacity(node, effective);
        }
    }
}

pub fn set_window_blur(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowBlur = payload(types::SET_WINDOW_BLUR, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    buf.blur_enabled = p.enabled != 0;
    buf.blur_radius = p.blur_radius;
    push_effective_opacity(ctx, id);
    Ok(Vec::new())
}

pub fn blur_window(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: BlurWindow = payload(types::BLUR_WINDOW, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    buf.blur_enabled = !buf.blur_enabled;
    push_effective_opacity(ctx, id);
    Ok(Vec::new())
}

pub fn set_screen_effect(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetScreenEffect = payload(types::SET_SCREEN_EFFECT, bytes)?;
    ctx.server.screen_effect_enabled = p.enabled != 0;
    ctx.server.screen_effect_equation = unpack_equation(&p.equation);
    ctx.server.screen_effect_dirty = true;
    if !ctx.server.screen_effect_enabled {
        ctx.server.screen_effect_buffer = None;
        ctx.server.screen_effect_program = None;
    }
    Ok(Vec::new())
}

pub fn set_window_effect(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowEffect = payload(types::SET_WINDOW_EFFECT, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    buf.effect_enabled = p.enabled != 0;
    buf.equation = unpack_equation(&p.equation);
    buf.effect_dirty = true;
    buf.use_effect_buffer = buf.effect_enabled && !buf.equation.is_empty();
    buf.sync_effect_buffer();
    Ok(Vec::new())
}

pub fn animate_window(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: AnimateWindow = payload(types::ANIMATE_WINDOW, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    let targets = AnimationTargets {
        x: p.target_x,
        y: p.target_y,
        scale_x: p.target_scale_x,
        scale_y: p.target_scale_y,
        opacity: p.target_opacity,
        translate: [p.target_translate_x, p.target_translate_y, p.target_translate_z],
        rotate: [p.target_rotate_x, p.target_rotate_y, p.target_rotate_z],
        scale_z: p.target_scale_z,
    };
    start(buf, p.flags, p.duration_ms, targets);
    Ok(Vec::new())
}

pub fn stop_animation(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: StopAnimation = payload(types::STOP_ANIMATION, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    buf.animation.animating = false;
    Ok(Vec::new())
}

pub fn set_window_mesh_transform(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowMeshTransform = payload(types::SET_WINDOW_MESH_TRANSFORM, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    buf.mesh_width = p.mesh_width;
    buf.mesh_height = p.mesh_height;
    buf.mesh_vertices = vec![(0.0, 0.0); (p.mesh_width as usize) * (p.mesh_height as usize)];
    Ok(Vec::new())
}

pub fn clear_window_mesh_transform(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: ClearWindowMeshTransform = payload(types::CLEAR_WINDOW_MESH_TRANSFORM, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    buf.mesh_width = 0;
    buf.mesh_height = 0;
    buf.mesh_vertices.clear();
    Ok(Vec::new())
}

pub fn update_window_mesh_vertices(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let head_len = std::mem::size_of::<UpdateWindowMeshVerticesHead>();
    if bytes.len() < head_len {
        return Err(DispatchError::PayloadTooSmall { msg_type: types::UPDATE_WINDOW_MESH_VERTICES });
    }
    let head: UpdateWindowMeshVerticesHead = payload(types::UPDATE_WINDOW_MESH_VERTICES, &bytes[..head_len])?;
    let vertices = decode_mesh_vertices(&bytes[head_len..]);
    let id = WindowId(head.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: head.window_id })?;
    let expected = (buf.mesh_width as usize) * (buf.mesh_height as usize);
    if vertices.len() != expected {
        return Err(DispatchError::MeshSizeMismatch { got: vertices.len(), expected });
    }
    buf.mesh_vertices = vertices.into_iter().map(|v| (v.x, v.y)).collect();
    Ok(Vec::new())
}
