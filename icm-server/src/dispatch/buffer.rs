//! Buffer and dmabuf lifecycle (message types 8-9, 17-21, 28-29), grounded
//! on `handle_import_dmabuf`/`handle_create_buffer` in the reference server.

use std::os::fd::OwnedFd;

use icm_protocol::message::types;
use icm_protocol::payload::{
    read, write, CreateBuffer, DestroyBuffer, DestroyImage, ExportDmabuf, ExportDmabufReply, ExportSurface,
    ImportDmabuf, ImportSurface, UploadImageHead, WindowCreated, WindowDestroyed,
};

use crate::error::DispatchError;
use crate::ids::WindowId;
use crate::registry::buffer::DmabufPlane;
use crate::registry::{Buffer, ExportedSurface, Image};

use super::{Ctx, OutFrame};

fn payload<T: bytemuck::Pod>(msg_type: u16, bytes: &[u8]) -> Result<T, DispatchError> {
    read(bytes).ok_or(DispatchError::PayloadTooSmall { msg_type })
}

/// Claims up to `num_planes` fds out of the frame's out-of-band descriptors
/// in plane order, matching the reference's `fd_index` convention where
/// `fd_index` is simply the position within the frame's fd array.
pub fn import_dmabuf(ctx: &mut Ctx, bytes: &[u8], mut fds: Vec<OwnedFd>) -> Result<Vec<OutFrame>, DispatchError> {
    let p: ImportDmabuf = payload(types::IMPORT_DMABUF, bytes)?;
    let id = WindowId(p.buffer_id);
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "buffer", id: p.buffer_id })?;

    let wire_planes = [p.plane0, p.plane1, p.plane2, p.plane3];
    let num_planes = (p.num_planes as usize).min(4).min(fds.len());
    buf.planes.clear();
    for wire in wire_planes.iter().take(num_planes) {
        let fd = fds.remove(0);
        let modifier = ((wire.modifier_hi as u64) << 32) | wire.modifier_lo as u64;
        buf.planes.push(DmabufPlane { fd, offset: wire.offset, stride: wire.stride, modifier });
    }
    buf.width = p.width.max(0) as u32;
    buf.height = p.height.max(0) as u32;
    buf.format = p.format;
    buf.dirty = true;
    Ok(Vec::new())
}

/// Hands back the planes a buffer currently owns, duplicating fds so the
/// client gets its own handle (spec.md §4.3 "export hands out a dup'd fd").
pub fn export_dmabuf(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: ExportDmabuf = payload(types::EXPORT_DMABUF, bytes)?;
    let id = WindowId(p.buffer_id);
    let buf = ctx.server.buffer(id).ok_or(DispatchError::TargetNotFound { kind: "buffer", id: p.buffer_id })?;

    let mut dup_fds = Vec::new();
    let mut wire_planes = [Default::default(); 4];
    for (i, plane) in buf.planes.iter().take(4).enumerate() {
        let dup = rustix::io::dup(&plane.fd).map_err(|_| DispatchError::ResourceExhausted("fd table full"))?;
        wire_planes[i].fd_index = i as i32;
        wire_planes[i].offset = plane.offset;
        wire_planes[i].stride = plane.stride;
        wire_planes[i].modifier_lo = (plane.modifier & 0xFFFF_FFFF) as u32;
        wire_planes[i].modifier_hi = (plane.modifier >> 32) as u32;
        dup_fds.push(dup);
    }

    let reply = ExportDmabufReply {
        buffer_id: p.buffer_id,
        width: buf.width as i32,
        height: buf.height as i32,
        format: buf.format,
        num_planes: buf.planes.len().min(4) as u32,
        plane0: wire_planes[0],
        plane1: wire_planes[1],
        plane2: wire_planes[2],
        plane3: wire_planes[3],
    };
    Ok(vec![OutFrame::to(ctx.client, types::EXPORT_DMABUF, write(&reply)).with_fds(dup_fds)])
}

pub fn export_surface(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: ExportSurface = payload(types::EXPORT_SURFACE, bytes)?;
    let id = WindowId(p.window_id);
    let (width, height, format) = ctx
        .server
        .buffer(id)
        .map(|b| (b.width, b.height, b.format))
        .ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    let target = Buffer::new(id, width, height, format);
    ctx.server.exported_surfaces.push(ExportedSurface { surface_id: p.surface_id, window_id: id, target });
    Ok(Vec::new())
}

pub fn import_surface(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: ImportSurface = payload(types::IMPORT_SURFACE, bytes)?;
    let id = WindowId(p.window_id);
    if ctx.server.resolve(id).is_some() {
        return Err(DispatchError::ResourceExhausted("window_id already in use"));
    }
    let mut buf = Buffer::new(id, p.width, p.height, 0);
    buf.x = p.x;
    buf.y = p.y;
    let node = ctx.scene.buffer_create(buf.layer, &buf.pixels, p.width, p.height, buf.format);
    ctx.scene.set_position(node, p.x, p.y);
    buf.scene = Some(node);
    ctx.server.buffers.push(buf);
    let _ = p.surface_id;
    Ok(Vec::new())
}

pub fn create_buffer(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: CreateBuffer = payload(types::CREATE_BUFFER, bytes)?;
    let id = WindowId(p.buffer_id);
    if ctx.server.resolve(id).is_some() {
        return Err(DispatchError::ResourceExhausted("buffer_id already in use"));
    }
    ctx.server.buffers.push(Buffer::new(id, p.width, p.height, p.format));
    let _ = p.usage_flags;

    let reply = WindowCreated { window_id: p.buffer_id, width: p.width, height: p.height, decorated: 0, focused: 0, _pad: [0; 2] };
    Ok(vec![OutFrame::broadcast(types::WINDOW_CREATED, write(&reply))])
}

pub fn destroy_buffer(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: DestroyBuffer = payload(types::DESTROY_BUFFER, bytes)?;
    let id = WindowId(p.buffer_id);
    let buf = ctx.server.destroy_buffer(id).ok_or(DispatchError::TargetNotFound { kind: "buffer", id: p.buffer_id })?;
    if let Some(node) = buf.scene {
        ctx.scene.buffer_destroy(node);
    }
    ctx.server.cleanup_window(id);

    let reply = WindowDestroyed { window_id: p.buffer_id };
    Ok(vec![OutFrame::broadcast(types::WINDOW_DESTROYED, write(&reply))])
}

pub fn upload_image(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let head_len = std::mem::size_of::<UploadImageHead>();
    if bytes.len() < head_len {
        return Err(DispatchError::PayloadTooSmall { msg_type: types::UPLOAD_IMAGE });
    }
    let head: UploadImageHead = payload(types::UPLOAD_IMAGE, &bytes[..head_len])?;
    let data = bytes[head_len..].to_vec();
    if ctx.server.images.iter().any(|i| i.id == head.image_id) {
        return Err(DispatchError::ResourceExhausted("image_id already in use"));
    }
    ctx.server.images.push(Image { id: head.image_id, width: head.width, height: head.height, format: head.format, data });
    let _ = head.data_size;
    Ok(Vec::new())
}

pub fn destroy_image(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: DestroyImage = payload(types::DESTROY_IMAGE, bytes)?;
    let before = ctx.server.images.len();
    ctx.server.images.retain(|i| i.id != p.image_id);
    if ctx.server.images.len() == before {
        return Err(DispatchError::TargetNotFound { kind: "image", id: p.image_id });
    }
    Ok(Vec::new())
}
