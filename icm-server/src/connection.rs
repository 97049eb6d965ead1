//! Per-client framing plus the routing table from `ClientId` to its
//! `UnixStream`, grounded on the accept/dispatch loop shape in
//! `cosmic-panel-bin`'s `run()` — here adapted to a pull-style `service()`
//! a caller drives from its own event loop instead of owning one itself.

use std::collections::HashMap;
use std::io;
use std::os::unix::net::UnixStream;

use icm_protocol::codec::{send_frame, PollOutcome, RecvRing};
use icm_protocol::header::{Header, HEADER_LEN};

use crate::dispatch::{dispatch, Ctx, OutFrame, Recipient};
use crate::registry::{Client, ClientId, Server};
use crate::scene::SceneHost;

/// One client's socket plus its receive-side framing state.
pub struct Connection {
    pub client_id: ClientId,
    stream: UnixStream,
    ring: RecvRing,
}

impl Connection {
    pub fn new(client_id: ClientId, stream: UnixStream) -> io::Result<Connection> {
        stream.set_nonblocking(true)?;
        Ok(Connection { client_id, stream, ring: RecvRing::new() })
    }

    /// Pulls whatever bytes are currently available and dispatches every
    /// complete frame found. `Ok(0)` from the underlying read means the
    /// peer closed the connection — the caller must tear this connection
    /// down (spec.md §7: only an I/O error disconnects, never a
    /// `DispatchError`).
    fn service(&mut self, server: &mut Server, scene: &mut dyn SceneHost) -> io::Result<Vec<OutFrame>> {
        match self.ring.fill_from(&self.stream) {
            Ok(0) => return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "client closed connection")),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) => return Err(e),
        }

        let mut out = Vec::new();
        loop {
            match self.ring.poll_frame() {
                PollOutcome::NeedMore => break,
                PollOutcome::Resynced => {
                    tracing::debug!(client = self.client_id, "frame resync, skipping malformed bytes");
                }
                PollOutcome::Frame(frame) => {
                    let mut ctx = Ctx { server, scene, client: self.client_id };
                    match dispatch(&mut ctx, &frame.header, &frame.payload, frame.fds) {
                        Ok(frames) => out.extend(frames),
                        Err(e) => {
                            tracing::debug!(
                                client = self.client_id,
                                msg_type = icm_protocol::message::type_name(frame.header.msg_type),
                                error = %e,
                                "dispatch error",
                            );
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    fn send(&self, header: Header, payload: &[u8], fds: &[std::os::fd::BorrowedFd]) -> io::Result<()> {
        send_frame(&self.stream, header, payload, fds)
    }
}

/// Owns every live connection and routes dispatch output back out to the
/// right socket(s) (spec.md §5: single-threaded, no lock needed since this
/// and `Server` are only ever touched from the one event-loop thread).
pub struct ConnectionManager {
    connections: HashMap<ClientId, Connection>,
    next_client_id: ClientId,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        ConnectionManager::new()
    }
}

impl ConnectionManager {
    pub fn new() -> ConnectionManager {
        ConnectionManager { connections: HashMap::new(), next_client_id: 1 }
    }

    /// Registers a freshly accepted socket, allocating it a `ClientId` and
    /// pushing the matching `Client` into the registry.
    pub fn accept(&mut self, stream: UnixStream, server: &mut Server) -> io::Result<ClientId> {
        let id = self.next_client_id;
        self.next_client_id += 1;
        let conn = Connection::new(id, stream)?;
        server.clients.push(Client::new(id));
        self.connections.insert(id, conn);
        Ok(id)
    }

    /// Services one client's socket. Returns `false` once the connection
    /// has been torn down (either by an I/O error or because `client_id`
    /// wasn't registered), in which case `Server::cleanup_client` has
    /// already run.
    pub fn service(&mut self, client_id: ClientId, server: &mut Server, scene: &mut dyn SceneHost) -> bool {
        let Some(conn) = self.connections.get_mut(&client_id) else {
            return false;
        };
        match conn.service(server, scene) {
            Ok(frames) => {
                self.route(frames);
                true
            }
            Err(e) => {
                tracing::debug!(client = client_id, error = %e, "connection closed");
                self.connections.remove(&client_id);
                server.cleanup_client(client_id);
                false
            }
        }
    }

    /// Routes arbitrary handler output (used by `crate::events` and the
    /// animation tick, which aren't tied to any one client's `service`
    /// call) through the same send path.
    pub fn route(&mut self, frames: Vec<OutFrame>) {
        for frame in &frames {
            match frame.recipient {
                Recipient::Client(id) => self.send_to(id, frame),
                Recipient::Broadcast => {
                    for id in self.client_ids() {
                        self.send_to(id, frame);
                    }
                }
                Recipient::AllExcept(skip) => {
                    for id in self.client_ids() {
                        if id != skip {
                            self.send_to(id, frame);
                        }
                    }
                }
            }
        }
    }

    fn client_ids(&self) -> Vec<ClientId> {
        self.connections.keys().copied().collect()
    }

    fn send_to(&self, id: ClientId, frame: &OutFrame) {
        let Some(conn) = self.connections.get(&id) else {
            return;
        };
        let header = Header {
            length: (HEADER_LEN + frame.payload.len()) as u32,
            msg_type: frame.msg_type,
            flags: 0,
            sequence: 0,
            num_fds: frame.fds.len() as i32,
        };
        let fds: Vec<_> = frame.fds.iter().map(|fd| std::os::fd::AsFd::as_fd(fd)).collect();
        if let Err(e) = conn.send(header, &frame.payload, &fds) {
            tracing::debug!(client = id, error = %e, "send failed, will be cleaned up on next service()");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
