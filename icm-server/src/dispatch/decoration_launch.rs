//! Decoration toggling and process launch (message types 93-95).

use std::process::Command;

use icm_protocol::message::types;
use icm_protocol::payload::{read, RequestWindowDecorations, SetWindowDecorations};
use icm_protocol::variable::decode_text;

use crate::decoration;
use crate::error::DispatchError;
use crate::ids::WindowId;

use super::{Ctx, OutFrame};

fn payload<T: bytemuck::Pod>(msg_type: u16, bytes: &[u8]) -> Result<T, DispatchError> {
    read(bytes).ok_or(DispatchError::PayloadTooSmall { msg_type })
}

pub fn set_window_decorations(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: SetWindowDecorations = payload(types::SET_WINDOW_DECORATIONS, bytes)?;
    let id = WindowId(p.window_id);
    let defaults = ctx.server.decoration.clone();
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    buf.decorated = p.decorated != 0;
    decoration::render(buf, &defaults);
    Ok(Vec::new())
}

pub fn request_window_decorations(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: RequestWindowDecorations = payload(types::REQUEST_WINDOW_DECORATIONS, bytes)?;
    let id = WindowId(p.window_id);
    let defaults = ctx.server.decoration.clone();
    let buf = ctx.server.buffer_mut(id).ok_or(DispatchError::TargetNotFound { kind: "window", id: p.window_id })?;
    decoration::render(buf, &defaults);
    Ok(Vec::new())
}

/// Forks `/bin/sh -c <command>` per spec.md §6, detached from the server
/// (stdio inherited, no reaping beyond the OS default). Spawn failures are
/// local dispatch errors, not server crashes.
pub fn launch_app(_ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let head_len = std::mem::size_of::<icm_protocol::payload::LaunchAppHead>();
    if bytes.len() < head_len {
        return Err(DispatchError::PayloadTooSmall { msg_type: types::LAUNCH_APP });
    }
    let command = decode_text(&bytes[head_len..]);
    if command.trim().is_empty() {
        return Err(DispatchError::ResourceExhausted("empty launch command"));
    }

    match Command::new("/bin/sh").arg("-c").arg(&command).spawn() {
        Ok(child) => {
            tracing::debug!(pid = child.id(), %command, "launch_app: spawned");
            Ok(Vec::new())
        }
        Err(e) => {
            tracing::warn!(%command, error = %e, "launch_app: spawn failed");
            Err(DispatchError::ResourceExhausted("failed to spawn child process"))
        }
    }
}
