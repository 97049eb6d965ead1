//! Raster-drawing handlers (message types 6-7, 10-14, 28-31) — thin glue
//! between decoded payloads and `crate::raster`, grounded on the
//! `handle_draw_*` family in the reference server.

use icm_protocol::message::types;
use icm_protocol::payload::{
    read, BlitBuffer, ClearRects, DrawCircle, DrawImage, DrawLine, DrawPolygonHead, DrawRect, DrawTextHead,
    DrawUploadedImage,
};
use icm_protocol::variable::decode_points;

use crate::error::DispatchError;
use crate::ids::WindowId;
use crate::raster::blit_image;
use crate::raster::draw_rect as raster_draw_rect;
use crate::raster::draw_text as raster_draw_text;
use crate::raster::NoFontLayout;

use super::{Ctx, OutFrame};

fn payload<T: bytemuck::Pod>(msg_type: u16, bytes: &[u8]) -> Result<T, DispatchError> {
    read(bytes).ok_or(DispatchError::PayloadTooSmall { msg_type })
}

pub fn draw_rect(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: DrawRect = payload(types::DRAW_RECT, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    raster_draw_rect(&mut buf.pixels, buf.width, buf.height, p.x, p.y, p.width, p.height, p.color_rgba);
    buf.dirty = true;
    sync_scene(ctx, id);
    Ok(Vec::new())
}

pub fn clear_rects(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: ClearRects = payload(types::CLEAR_RECTS, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    buf.pixels.iter_mut().for_each(|b| *b = 0);
    buf.dirty = true;
    sync_scene(ctx, id);
    Ok(Vec::new())
}

pub fn draw_line(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: DrawLine = payload(types::DRAW_LINE, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    crate::raster::draw_line(&mut buf.pixels, buf.width, buf.height, p.x0, p.y0, p.x1, p.y1, p.color_rgba, p.thickness);
    buf.dirty = true;
    sync_scene(ctx, id);
    Ok(Vec::new())
}

pub fn draw_circle(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: DrawCircle = payload(types::DRAW_CIRCLE, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    crate::raster::draw_circle(&mut buf.pixels, buf.width, buf.height, p.cx, p.cy, p.radius, p.color_rgba, p.fill != 0);
    buf.dirty = true;
    sync_scene(ctx, id);
    Ok(Vec::new())
}

pub fn draw_polygon(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let head_len = std::mem::size_of::<DrawPolygonHead>();
    if bytes.len() < head_len {
        return Err(DispatchError::PayloadTooSmall { msg_type: types::DRAW_POLYGON });
    }
    let head: DrawPolygonHead = payload(types::DRAW_POLYGON, &bytes[..head_len])?;
    let points = decode_points(&bytes[head_len..]);
    if points.len() != head.num_points as usize {
        tracing::debug!(got = points.len(), expected = head.num_points, "draw_polygon: point count mismatch, using what decoded");
    }
    let id = WindowId(head.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: head.window_id })?;
    crate::raster::draw_polygon(&mut buf.pixels, buf.width, buf.height, &points, head.color_rgba, head.fill != 0);
    buf.dirty = true;
    sync_scene(ctx, id);
    Ok(Vec::new())
}

pub fn draw_image(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: DrawImage = payload(types::DRAW_IMAGE, bytes)?;
    let dst_id = WindowId(p.window_id);
    let src_id = WindowId(p.buffer_id);
    let src_pixels = ctx
        .server
        .buffer(src_id)
        .map(|b| (b.presented_pixels().to_vec(), b.width, b.height))
        .ok_or(DispatchError::TargetNotFound { kind: "buffer", id: p.buffer_id })?;
    let buf = ctx.server.buffer_mut(dst_id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    blit_image(
        &mut buf.pixels, buf.width, buf.height,
        &src_pixels.0, src_pixels.1, src_pixels.2,
        p.x, p.y, p.width, p.height, p.src_x, p.src_y, p.alpha,
    );
    buf.dirty = true;
    sync_scene(ctx, dst_id);
    Ok(Vec::new())
}

pub fn draw_uploaded_image(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: DrawUploadedImage = payload(types::DRAW_UPLOADED_IMAGE, bytes)?;
    let dst_id = WindowId(p.window_id);
    let image = ctx
        .server
        .image(p.image_id)
        .map(|img| (img.data.clone(), img.width, img.height))
        .ok_or(DispatchError::TargetNotFound { kind: "image", id: p.image_id })?;
    let buf = ctx.server.buffer_mut(dst_id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    blit_image(
        &mut buf.pixels, buf.width, buf.height,
        &image.0, image.1, image.2,
        p.x, p.y, p.width, p.height, p.src_x, p.src_y, p.alpha,
    );
    buf.dirty = true;
    sync_scene(ctx, dst_id);
    Ok(Vec::new())
}

pub fn blit_buffer(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: BlitBuffer = payload(types::BLIT_BUFFER, bytes)?;
    let src_id = WindowId(p.src_buffer_id);
    let dst_id = WindowId(p.dst_buffer_id);
    let src = ctx
        .server
        .buffer(src_id)
        .map(|b| (b.presented_pixels().to_vec(), b.width, b.height))
        .ok_or(DispatchError::TargetNotFound { kind: "buffer", id: p.src_buffer_id })?;
    let dst = ctx.server.buffer_mut(dst_id).ok_or(DispatchError::TargetNotFound { kind: "buffer", id: p.dst_buffer_id })?;
    crate::raster::blit_buffer(
        &mut dst.pixels, dst.width, dst.height,
        &src.0, src.1, src.2,
        p.src_x, p.src_y, p.dst_x, p.dst_y, p.width, p.height,
    );
    dst.dirty = true;
    sync_scene(ctx, dst_id);
    let _ = p.window_id;
    Ok(Vec::new())
}

pub fn draw_text(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let head_len = std::mem::size_of::<DrawTextHead>();
    if bytes.len() < head_len {
        return Err(DispatchError::PayloadTooSmall { msg_type: types::DRAW_TEXT });
    }
    let head: DrawTextHead = payload(types::DRAW_TEXT, &bytes[..head_len])?;
    let text = icm_protocol::variable::decode_text(&bytes[head_len..]);
    let id = WindowId(head.window_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: head.window_id })?;
    let mut layout = NoFontLayout;
    raster_draw_text(&mut layout, &mut buf.pixels, buf.width, buf.height, head.x, head.y, head.color_rgba, head.font_size, &text);
    buf.dirty = true;
    sync_scene(ctx, id);
    Ok(Vec::new())
}

/// Pushes freshly drawn pixels to the scene node when one exists (spec.md
/// §4.6: the server owns the software copy, the scene host owns the
/// on-screen one, and a draw call keeps them in lockstep).
fn sync_scene(ctx: &mut Ctx, id: WindowId) {
    if let Some(buf) = ctx.server.buffer(id) {
        if let Some(node) = buf.scene {
            let (w, h) = (buf.width, buf.height);
            let pixels = buf.presented_pixels().to_vec();
            ctx.scene.set_buffer(node, &pixels, w, h);
            ctx.scene.schedule_frame();
        }
    }
}
