use bytemuck::{Pod, Zeroable};

/// Fixed 16-byte frame header, little-endian on the wire.
///
/// Field order and widths mirror `struct icm_ipc_header` in the original
/// protocol header one-for-one.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Header {
    /// Total frame length including this header.
    pub length: u32,
    pub msg_type: u16,
    pub flags: u16,
    /// Client-assigned correlation token, echoed on replies.
    pub sequence: u32,
    /// Number of file descriptors carried out-of-band with this message.
    pub num_fds: i32,
}

pub const HEADER_LEN: usize = std::mem::size_of::<Header>();
pub const MAX_FRAME_LEN: u32 = 65_536;
pub const MAX_FDS_PER_MSG: i32 = 4;
/// Message type codes are currently registered up to 100 (spec.md §4.1).
pub const MAX_MSG_TYPE: u16 = 100;

impl Header {
    pub fn to_bytes(self) -> [u8; HEADER_LEN] {
        bytemuck::cast(self.to_le())
    }

    pub fn from_bytes(bytes: &[u8; HEADER_LEN]) -> Header {
        let raw: Header = bytemuck::cast(*bytes);
        raw.to_le()
    }

    /// Byte-swap all multi-byte fields. On little-endian hosts (the only
    /// ones this crate targets in practice) this is a no-op; kept explicit
    /// so the wire format stays correct if ever cross-compiled.
    #[cfg(target_endian = "big")]
    fn to_le(self) -> Header {
        Header {
            length: self.length.to_le(),
            msg_type: self.msg_type.to_le(),
            flags: self.flags.to_le(),
            sequence: self.sequence.to_le(),
            num_fds: self.num_fds.to_le(),
        }
    }

    #[cfg(not(target_endian = "big"))]
    fn to_le(self) -> Header {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_exactly_16_bytes() {
        assert_eq!(HEADER_LEN, 16);
    }

    #[test]
    fn round_trips_through_bytes() {
        let h = Header { length: 32, msg_type: 6, flags: 0, sequence: 42, num_fds: 1 };
        let bytes = h.to_bytes();
        assert_eq!(Header::from_bytes(&bytes), h);
    }
}
