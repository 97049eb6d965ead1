use thiserror::Error;

/// Errors surfaced while decoding a frame off the wire.
///
/// None of these are fatal to a connection by themselves — see
/// `spec.md` §7: framing errors trigger a resync, not a disconnect.
#[derive(Debug, Error)]
pub enum FramingError {
    #[error("frame length {0} out of range (must be 16..=65536)")]
    LengthOutOfRange(u32),
    #[error("message type {0} outside the registered range [1,100]")]
    TypeOutOfRange(u16),
    #[error("payload too small for declared message type {msg_type}: got {got}, need {need}")]
    PayloadTooSmall { msg_type: u16, got: usize, need: usize },
    #[error("num_fds {0} exceeds the per-message limit of 4")]
    TooManyFds(i32),
}
