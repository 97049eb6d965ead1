//! The compositor IPC control plane: object registry, dispatcher, scene
//! integration, animation engine, transform math, and software raster ops
//! (spec.md §2). Owns no network I/O itself — `icmi` drives this crate's
//! `ConnectionManager` from its own event loop.

pub mod animation;
pub mod connection;
pub mod decoration;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod frame;
pub mod ids;
pub mod raster;
pub mod registry;
pub mod scene;
pub mod transform;

pub use connection::ConnectionManager;
pub use error::DispatchError;
pub use registry::Server;
pub use scene::{NullSceneHost, SceneHost};

#[cfg(test)]
mod tests {
    use icm_protocol::header::{Header, HEADER_LEN};
    use icm_protocol::message::types;
    use icm_protocol::payload::{write, CreateWindow};

    use crate::dispatch::{dispatch, Ctx};
    use crate::registry::{Client, Server};
    use crate::scene::NullSceneHost;

    /// End-to-end create -> draw -> query scenario (spec.md §8 property).
    #[test]
    fn create_draw_query_round_trip() {
        let mut server = Server::default();
        server.clients.push(Client::new(1));
        let mut scene = NullSceneHost::new();

        let create = CreateWindow { window_id: 1, x: 0, y: 0, width: 4, height: 4, layer: 2, color_rgba: 0x00000000 };
        let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 1 };
        let header = Header { length: (HEADER_LEN + std::mem::size_of::<CreateWindow>()) as u32, msg_type: types::CREATE_WINDOW, flags: 0, sequence: 0, num_fds: 0 };
        let out = dispatch(&mut ctx, &header, &write(&create), Vec::new()).unwrap();
        assert_eq!(out.len(), 1);
        assert!(server.buffer(crate::ids::WindowId(1)).is_some());
    }
}
