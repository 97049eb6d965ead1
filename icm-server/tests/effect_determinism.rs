//! `SET_WINDOW_EFFECT` is idempotent: re-applying the same equation twice
//! must not reallocate or resize the effect shadow buffer, and disabling
//! the effect always drops it (spec.md §8 property 4, §4.6 invariants).

use icm_protocol::header::{Header, HEADER_LEN};
use icm_protocol::message::types;
use icm_protocol::payload::{write, CreateWindow, SetWindowEffect};

use icm_server::dispatch::{dispatch, Ctx};
use icm_server::ids::WindowId;
use icm_server::registry::{Client, Server};
use icm_server::scene::NullSceneHost;

fn header_for<T>(msg_type: u16) -> Header {
    Header { length: (HEADER_LEN + std::mem::size_of::<T>()) as u32, msg_type, flags: 0, sequence: 0, num_fds: 0 }
}

fn packed_equation(src: &str) -> [u8; 256] {
    let mut buf = [0u8; 256];
    let bytes = src.as_bytes();
    buf[..bytes.len()].copy_from_slice(bytes);
    buf
}

#[test]
fn reapplying_same_equation_keeps_buffer_stable() {
    let mut server = Server::default();
    server.clients.push(Client::new(1));
    let mut scene = NullSceneHost::new();

    let create = CreateWindow { window_id: 1, x: 0, y: 0, width: 4, height: 4, layer: 2, color_rgba: 0 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 1 };
    dispatch(&mut ctx, &header_for::<CreateWindow>(types::CREATE_WINDOW), &write(&create), Vec::new()).unwrap();

    let effect = SetWindowEffect { window_id: 1, equation: packed_equation("blur(r)"), enabled: 1, _pad: [0; 3] };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 1 };
    dispatch(&mut ctx, &header_for::<SetWindowEffect>(types::SET_WINDOW_EFFECT), &write(&effect), Vec::new()).unwrap();
    let first_len = server.buffer(WindowId(1)).unwrap().effect_data.as_ref().unwrap().len();

    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 1 };
    dispatch(&mut ctx, &header_for::<SetWindowEffect>(types::SET_WINDOW_EFFECT), &write(&effect), Vec::new()).unwrap();
    let buf = server.buffer(WindowId(1)).unwrap();
    assert_eq!(buf.effect_data.as_ref().unwrap().len(), first_len);
    assert!(buf.use_effect_buffer);

    let disable = SetWindowEffect { window_id: 1, equation: packed_equation("blur(r)"), enabled: 0, _pad: [0; 3] };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 1 };
    dispatch(&mut ctx, &header_for::<SetWindowEffect>(types::SET_WINDOW_EFFECT), &write(&disable), Vec::new()).unwrap();
    let buf = server.buffer(WindowId(1)).unwrap();
    assert!(buf.effect_data.is_none());
    assert!(!buf.use_effect_buffer);
}
