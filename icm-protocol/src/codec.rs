//! Frame assembly: a per-client byte ring plus the resync state machine from
//! spec.md §4.1, and fd-carrying send/recv built on `rustix`'s ancillary
//! data support (the SCM_RIGHTS equivalent of `sendmsg`/`recvmsg`).

use std::collections::VecDeque;
use std::io;
use std::os::fd::{AsFd, OwnedFd};
use std::os::unix::net::UnixStream;

use rustix::net::{RecvAncillaryBuffer, RecvAncillaryMessage, RecvFlags, SendAncillaryBuffer, SendAncillaryMessage};

use crate::header::{Header, HEADER_LEN, MAX_FDS_PER_MSG, MAX_FRAME_LEN, MAX_MSG_TYPE};

pub const RING_CAPACITY: usize = 64 * 1024;

/// A fully decoded frame: header, payload bytes (excluding the header), and
/// any fds that arrived alongside it.
#[derive(Debug)]
pub struct RawFrame {
    pub header: Header,
    pub payload: Vec<u8>,
    pub fds: Vec<OwnedFd>,
}

/// Outcome of polling the ring for one frame.
pub enum PollOutcome {
    /// Not enough bytes buffered yet for a full frame.
    NeedMore,
    /// A complete, well-formed frame was extracted.
    Frame(RawFrame),
    /// A malformed header or out-of-range type was skipped; caller should
    /// log and keep polling — this is not a connection-level error.
    Resynced,
}

/// Per-client receive-side framing state: a 64 KiB accumulator plus a queue
/// of fds received but not yet claimed by a parsed frame.
///
/// Fds are attached to the next frame that declares `num_fds > 0`, under the
/// assumption (true of every message in the registry) that a client issues
/// one `sendmsg` per logical message, so bytes and fds for that message
/// arrive in the same `recvmsg` call.
pub struct RecvRing {
    buf: VecDeque<u8>,
    pending_fds: VecDeque<OwnedFd>,
}

impl Default for RecvRing {
    fn default() -> Self {
        Self::new()
    }
}

impl RecvRing {
    pub fn new() -> Self {
        RecvRing { buf: VecDeque::with_capacity(RING_CAPACITY), pending_fds: VecDeque::new() }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Reads as much as fits from `stream` via `recvmsg`, capturing any
    /// ancillary fds. Returns the number of payload bytes read (0 on a
    /// cleanly closed socket).
    pub fn fill_from(&mut self, stream: &UnixStream) -> io::Result<usize> {
        let mut chunk = [0u8; 4096];
        let mut iov = [std::io::IoSliceMut::new(&mut chunk)];
        let mut ancillary_storage = [0u8; rustix::cmsg_space!(ScmRights(MAX_FDS_PER_MSG as usize))];
        let mut ancillary = RecvAncillaryBuffer::new(&mut ancillary_storage);

        let result = rustix::net::recvmsg(stream.as_fd(), &mut iov, &mut ancillary, RecvFlags::empty())
            .map_err(io::Error::from)?;

        for msg in ancillary.drain() {
            if let RecvAncillaryMessage::ScmRights(fds) = msg {
                for fd in fds {
                    self.pending_fds.push_back(fd);
                }
            }
        }

        let n = result.bytes;
        if self.buf.len() + n > RING_CAPACITY {
            // Ring overflow: caller should treat this as an unrecoverable
            // I/O error and disconnect (spec.md §7).
            return Err(io::Error::new(io::ErrorKind::OutOfMemory, "client receive ring overflowed"));
        }
        self.buf.extend(chunk[..n].iter().copied());
        Ok(n)
    }

    /// Runs the resync/decode loop described in spec.md §4.1 once. Call
    /// repeatedly (e.g. in a `while let PollOutcome::Frame(..) = ...` style
    /// loop driven by the caller) until it returns `NeedMore`.
    pub fn poll_frame(&mut self) -> PollOutcome {
        if self.buf.len() < HEADER_LEN {
            return PollOutcome::NeedMore;
        }

        let header_bytes: [u8; HEADER_LEN] = {
            let mut b = [0u8; HEADER_LEN];
            for (i, byte) in self.buf.iter().take(HEADER_LEN).enumerate() {
                b[i] = *byte;
            }
            b
        };
        let header = Header::from_bytes(&header_bytes);

        if header.length < HEADER_LEN as u32 || header.length > MAX_FRAME_LEN {
            self.buf.pop_front();
            return PollOutcome::Resynced;
        }
        if header.msg_type == 0 || header.msg_type > MAX_MSG_TYPE {
            // Drop the whole declared frame, not just one byte, per spec.md
            // §4.1: "if type outside [1,100] drop and advance length".
            let advance = (header.length as usize).min(self.buf.len());
            self.buf.drain(..advance);
            return PollOutcome::Resynced;
        }
        if header.num_fds < 0 || header.num_fds > MAX_FDS_PER_MSG {
            self.buf.pop_front();
            return PollOutcome::Resynced;
        }

        let total = header.length as usize;
        if self.buf.len() < total {
            return PollOutcome::NeedMore;
        }

        let payload: Vec<u8> = self.buf.iter().skip(HEADER_LEN).take(total - HEADER_LEN).copied().collect();
        self.buf.drain(..total);

        let fds = (0..header.num_fds)
            .filter_map(|_| self.pending_fds.pop_front())
            .collect();

        PollOutcome::Frame(RawFrame { header, payload, fds })
    }
}

/// Sends a frame, attaching `fds` as SCM_RIGHTS ancillary data. Performs a
/// non-blocking partial-send loop per spec.md §4.1; on `WouldBlock` backs
/// off briefly and retries, any other error is propagated for the caller to
/// disconnect on.
pub fn send_frame(stream: &UnixStream, header: Header, payload: &[u8], fds: &[std::os::fd::BorrowedFd]) -> io::Result<()> {
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.extend_from_slice(&header.to_bytes());
    buf.extend_from_slice(payload);

    let mut sent = 0usize;
    let mut first = true;
    while sent < buf.len() {
        let iov = [std::io::IoSlice::new(&buf[sent..])];
        let mut ancillary_storage = [0u8; rustix::cmsg_space!(ScmRights(MAX_FDS_PER_MSG as usize))];
        let mut ancillary = SendAncillaryBuffer::new(&mut ancillary_storage);
        if first && !fds.is_empty() {
            ancillary.push(SendAncillaryMessage::ScmRights(fds));
        }

        match rustix::net::sendmsg(stream.as_fd(), &iov, &mut ancillary, rustix::net::SendFlags::empty()) {
            Ok(n) => {
                sent += n;
                first = false;
            }
            Err(rustix::io::Errno::AGAIN) => {
                std::thread::yield_now();
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_frame(ring: &mut RecvRing, header: Header, payload: &[u8]) {
        for b in header.to_bytes() {
            ring.buf.push_back(b);
        }
        for b in payload {
            ring.buf.push_back(*b);
        }
    }

    #[test]
    fn fifteen_bytes_do_not_dispatch() {
        let mut ring = RecvRing::new();
        for b in [0u8; 15] {
            ring.buf.push_back(b);
        }
        assert!(matches!(ring.poll_frame(), PollOutcome::NeedMore));
    }

    #[test]
    fn sixteenth_byte_completes_a_zero_payload_header() {
        let mut ring = RecvRing::new();
        let header = Header { length: 16, msg_type: 1, flags: 0, sequence: 0, num_fds: 0 };
        push_frame(&mut ring, header, &[]);
        match ring.poll_frame() {
            PollOutcome::Frame(f) => assert_eq!(f.header, header),
            _ => panic!("expected a frame"),
        }
    }

    #[test]
    fn zero_length_header_resyncs_by_one_byte() {
        let mut ring = RecvRing::new();
        let header = Header { length: 0, msg_type: 1, flags: 0, sequence: 0, num_fds: 0 };
        push_frame(&mut ring, header, &[]);
        let before = ring.len();
        assert!(matches!(ring.poll_frame(), PollOutcome::Resynced));
        assert_eq!(ring.len(), before - 1);
    }

    #[test]
    fn oversized_length_header_resyncs() {
        let mut ring = RecvRing::new();
        let header = Header { length: 100_000, msg_type: 1, flags: 0, sequence: 0, num_fds: 0 };
        push_frame(&mut ring, header, &[]);
        assert!(matches!(ring.poll_frame(), PollOutcome::Resynced));
    }

    #[test]
    fn type_outside_range_drops_whole_frame() {
        let mut ring = RecvRing::new();
        let header = Header { length: 20, msg_type: 500, flags: 0, sequence: 0, num_fds: 0 };
        push_frame(&mut ring, header, &[0u8; 4]);
        assert!(matches!(ring.poll_frame(), PollOutcome::Resynced));
        assert!(ring.is_empty());
    }
}
