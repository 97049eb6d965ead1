use thiserror::Error;

/// Failure kinds a dispatch handler can report. Per spec.md §7 these are all
/// local: the caller logs and moves on, the client is never disconnected for
/// a `DispatchError`. Only an I/O error on the connection itself (handled in
/// `crate::connection`, not here) triggers disconnect + cleanup.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("target not found: {kind} {id}")]
    TargetNotFound { kind: &'static str, id: u32 },
    #[error("payload too small for message type {msg_type}")]
    PayloadTooSmall { msg_type: u16 },
    #[error("mesh vertex count {got} does not match mesh_width*mesh_height={expected}")]
    MeshSizeMismatch { got: usize, expected: usize },
    #[error("resource exhausted: {0}")]
    ResourceExhausted(&'static str),
    #[error("unsupported message type {0}")]
    Unsupported(u16),
}
