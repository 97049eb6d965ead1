//! Read-only queries (message types 21, 24-25, 41, 52-57, 68-77, 87),
//! grounded on the `handle_query_*` family in the reference server. Every
//! handler here replies only to the requesting client, never broadcasts.

use icm_protocol::message::types;
use icm_protocol::payload::{
    read, write, MonitorInfo, MonitorsDataHead, QueryBufferInfo, QueryBufferInfoReply, QueryCaptureKeyboard,
    QueryCaptureMouse, QueryToplevelWindows, QueryWindowAttributes, QueryWindowInfo, QueryWindowLayer,
    QueryWindowPosition, QueryWindowSize, QueryWindowState, RequestScreenCopy,
    ScreenDimensionsData, ToplevelWindowEntry, ToplevelWindowsDataHead, WindowAttributesData, WindowInfoData,
    WindowLayerData, WindowPositionData, WindowSizeData, WindowStateData,
};
use icm_protocol::variable::encode_records;
use itertools::Itertools;

use crate::error::DispatchError;
use crate::ids::WindowId;

use super::{Ctx, OutFrame};

fn payload<T: bytemuck::Pod>(msg_type: u16, bytes: &[u8]) -> Result<T, DispatchError> {
    read(bytes).ok_or(DispatchError::PayloadTooSmall { msg_type })
}

pub fn query_buffer_info(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: QueryBufferInfo = payload(types::QUERY_BUFFER_INFO, bytes)?;
    let id = WindowId(p.buffer_id);
    let buf = ctx.server.buffer(id).ok_or(DispatchError::TargetNotFound { kind: "buffer", id: p.buffer_id })?;
    let stride = buf.width * 4;
    let reply = QueryBufferInfoReply {
        buffer_id: p.buffer_id,
        width: buf.width as i32,
        height: buf.height as i32,
        format: buf.format,
        size: buf.pixels.len() as u32,
        stride,
        mmap_fd: -1,
    };
    Ok(vec![OutFrame::to(ctx.client, types::QUERY_BUFFER_INFO, write(&reply))])
}

/// No dedicated reply type is registered for the capture queries; the
/// answer is a 4-byte little-endian bool echoed back under the same
/// `msg_type` (spec.md §6's registry reserves request and reply codes
/// one-to-one everywhere except here).
fn bool_reply(client: u64, msg_type: u16, value: bool) -> OutFrame {
    OutFrame::to(client, msg_type, (value as u32).to_le_bytes().to_vec())
}

pub fn query_capture_mouse(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let _: QueryCaptureMouse = payload(types::QUERY_CAPTURE_MOUSE, bytes)?;
    let captured = ctx.server.clients.iter().any(|c| c.global_capture_mouse);
    Ok(vec![bool_reply(ctx.client, types::QUERY_CAPTURE_MOUSE, captured)])
}

pub fn query_capture_keyboard(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let _: QueryCaptureKeyboard = payload(types::QUERY_CAPTURE_KEYBOARD, bytes)?;
    let captured = ctx.server.clients.iter().any(|c| c.global_capture_keyboard);
    Ok(vec![bool_reply(ctx.client, types::QUERY_CAPTURE_KEYBOARD, captured)])
}

/// Enqueues the request rather than answering inline (spec.md §6's wire
/// table: screen copy is "deferred to frame"); `crate::frame::output_frame`
/// drains `screen_copy_requests` and sends `SCREEN_COPY_DATA` once per
/// output frame.
pub fn request_screen_copy(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: RequestScreenCopy = payload(types::REQUEST_SCREEN_COPY, bytes)?;
    let id = if p.request_id != 0 { p.request_id } else { ctx.server.alloc_screen_copy_id() };
    let rect = crate::registry::Rect { x: p.x, y: p.y, width: p.width, height: p.height };
    ctx.server.screen_copy_requests.push(crate::registry::ScreenCopyRequest { id, rect, owner: ctx.client });
    Ok(Vec::new())
}

pub fn query_window_position(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: QueryWindowPosition = payload(types::QUERY_WINDOW_POSITION, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    let reply = WindowPositionData { window_id: p.window_id, x: buf.x, y: buf.y };
    Ok(vec![OutFrame::to(ctx.client, types::WINDOW_POSITION_DATA, write(&reply))])
}

pub fn query_window_size(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: QueryWindowSize = payload(types::QUERY_WINDOW_SIZE, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    let reply = WindowSizeData { window_id: p.window_id, width: buf.width, height: buf.height };
    Ok(vec![OutFrame::to(ctx.client, types::WINDOW_SIZE_DATA, write(&reply))])
}

pub fn query_window_attributes(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: QueryWindowAttributes = payload(types::QUERY_WINDOW_ATTRIBUTES, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    let reply = WindowAttributesData {
        window_id: p.window_id,
        visible: buf.visible as u32,
        opacity: buf.opacity,
        scale_x: buf.scale_x,
        scale_y: buf.scale_y,
        rotation: buf.rotation,
    };
    Ok(vec![OutFrame::to(ctx.client, types::WINDOW_ATTRIBUTES_DATA, write(&reply))])
}

pub fn query_window_layer(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: QueryWindowLayer = payload(types::QUERY_WINDOW_LAYER, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    let reply = WindowLayerData {
        window_id: p.window_id,
        layer: buf.layer.to_wire() as i32,
        parent_id: buf.parent_id.map(|id| id.0).unwrap_or(0),
    };
    Ok(vec![OutFrame::to(ctx.client, types::WINDOW_LAYER_DATA, write(&reply))])
}

pub fn query_window_state(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: QueryWindowState = payload(types::QUERY_WINDOW_STATE, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    use crate::dispatch::window::{STATE_FULLSCREEN, STATE_MAXIMIZED, STATE_MINIMIZED};
    let mut state = 0u32;
    if buf.minimized {
        state |= STATE_MINIMIZED;
    }
    if buf.maximized {
        state |= STATE_MAXIMIZED;
    }
    if buf.fullscreen {
        state |= STATE_FULLSCREEN;
    }
    let reply = WindowStateData { window_id: p.window_id, state, focused: buf.focused as u32 };
    Ok(vec![OutFrame::to(ctx.client, types::WINDOW_STATE_DATA, write(&reply))])
}

pub fn query_screen_dimensions(ctx: &mut Ctx) -> Result<Vec<OutFrame>, DispatchError> {
    let reply = ScreenDimensionsData { total_width: ctx.server.screen_width, total_height: ctx.server.screen_height, scale: 1.0 };
    Ok(vec![OutFrame::to(ctx.client, types::SCREEN_DIMENSIONS_DATA, write(&reply))])
}

/// Synthesizes a single monitor spanning the whole screen (spec.md §4.11 —
/// a real compositor would enumerate the host's actual output set).
pub fn query_monitors(ctx: &mut Ctx) -> Result<Vec<OutFrame>, DispatchError> {
    let mut name = [0u8; 32];
    name[..7].copy_from_slice(b"primary");
    let monitor = MonitorInfo {
        x: 0,
        y: 0,
        width: ctx.server.screen_width,
        height: ctx.server.screen_height,
        physical_width: ctx.server.screen_width,
        physical_height: ctx.server.screen_height,
        refresh_rate: 60000,
        scale: 1.0,
        enabled: 1,
        primary: 1,
        _pad: [0; 2],
        name,
    };
    let head = MonitorsDataHead { num_monitors: 1 };
    let mut payload_bytes = write(&head);
    payload_bytes.extend_from_slice(&encode_records(&[monitor]));
    Ok(vec![OutFrame::to(ctx.client, types::MONITORS_DATA, payload_bytes)])
}

pub fn query_window_info(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: QueryWindowInfo = payload(types::QUERY_WINDOW_INFO, bytes)?;
    let id = WindowId(p.window_id);
    let buf = ctx.server.buffer(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    let reply = WindowInfoData {
        window_id: p.window_id,
        x: buf.x,
        y: buf.y,
        width: buf.width,
        height: buf.height,
        visible: buf.visible as u32,
        layer: buf.layer.to_wire() as i32,
        parent_id: buf.parent_id.map(|id| id.0).unwrap_or(0),
        pid: buf.pid,
    };
    Ok(vec![OutFrame::to(ctx.client, types::WINDOW_INFO_DATA, write(&reply))])
}

pub fn query_toplevel_windows(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: QueryToplevelWindows = payload(types::QUERY_TOPLEVEL_WINDOWS, bytes)?;
    let entries: Vec<ToplevelWindowEntry> = ctx
        .server
        .buffers
        .iter()
        .filter(|b| p.visible_only == 0 || b.visible)
        .sorted_by_key(|b| b.id.0)
        .map(|b| ToplevelWindowEntry { window_id: b.id.0, width: b.width, height: b.height, visible: b.visible as u8, focused: b.focused as u8, _pad: [0; 2] })
        .collect();
    let head = ToplevelWindowsDataHead { num_windows: entries.len() as u32 };
    let mut payload_bytes = write(&head);
    payload_bytes.extend_from_slice(&encode_records(&entries));
    Ok(vec![OutFrame::to(ctx.client, types::TOPLEVEL_WINDOWS_DATA, payload_bytes)])
}
