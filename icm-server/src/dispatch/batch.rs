//! Batch bracketing (message types 15-16). Per spec.md §4.10, batching is a
//! hint only — handlers inside a batch run exactly as they would outside
//! one; this just tracks the open/close state for consistency checks and
//! logging, matching the reference's `batch_id` bookkeeping.

use icm_protocol::message::types;
use icm_protocol::payload::{read, BatchBegin, BatchEnd};

use crate::error::DispatchError;

use super::{Ctx, OutFrame};

fn payload<T: bytemuck::Pod>(msg_type: u16, bytes: &[u8]) -> Result<T, DispatchError> {
    read(bytes).ok_or(DispatchError::PayloadTooSmall { msg_type })
}

pub fn batch_begin(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: BatchBegin = payload(types::BATCH_BEGIN, bytes)?;
    let client = ctx.client;
    let c = ctx.server.client_mut(client).expect("dispatch is always called for a registered client");
    if c.batching {
        tracing::debug!(batch_id = p.batch_id, "batch_begin while already batching, overwriting open batch");
    }
    c.batching = true;
    c.batch_id = p.batch_id;
    let _ = p.expected_commands;
    Ok(Vec::new())
}

pub fn batch_end(ctx: &mut Ctx, bytes: &[u8]) -> Result<Vec<OutFrame>, DispatchError> {
    let p: BatchEnd = payload(types::BATCH_END, bytes)?;
    let client = ctx.client;
    let c = ctx.server.client_mut(client).expect("dispatch is always called for a registered client");
    if !c.batching || c.batch_id != p.batch_id {
        return Err(DispatchError::TargetNotFound { kind: "batch", id: p.batch_id });
    }
    c.batching = false;
    Ok(Vec::new())
}
