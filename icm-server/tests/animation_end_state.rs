//! `ANIMATE_WINDOW` dispatched over the wire, ticked to completion, lands
//! exactly on the requested target with no residual `animating` flag
//! (spec.md §8 property 3).

use icm_protocol::header::{Header, HEADER_LEN};
use icm_protocol::message::types;
use icm_protocol::payload::{write, AnimateWindow, CreateWindow};

use icm_server::animation::tick;
use icm_server::dispatch::{dispatch, Ctx};
use icm_server::ids::WindowId;
use icm_server::registry::buffer::ANIM_POS;
use icm_server::registry::{Client, Server};
use icm_server::scene::NullSceneHost;

fn header_for<T>(msg_type: u16) -> Header {
    Header { length: (HEADER_LEN + std::mem::size_of::<T>()) as u32, msg_type, flags: 0, sequence: 0, num_fds: 0 }
}

#[test]
fn animation_converges_on_target() {
    let mut server = Server::default();
    server.clients.push(Client::new(3));
    let mut scene = NullSceneHost::new();

    let create = CreateWindow { window_id: 1, x: 0, y: 0, width: 8, height: 8, layer: 2, color_rgba: 0 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 3 };
    dispatch(&mut ctx, &header_for::<CreateWindow>(types::CREATE_WINDOW), &write(&create), Vec::new()).unwrap();

    let animate = AnimateWindow {
        window_id: 1,
        duration_ms: 100,
        flags: ANIM_POS,
        target_x: 200.0,
        target_y: 150.0,
        target_scale_x: 1.0,
        target_scale_y: 1.0,
        target_opacity: 1.0,
        target_translate_x: 0.0,
        target_translate_y: 0.0,
        target_translate_z: 0.0,
        target_rotate_x: 0.0,
        target_rotate_y: 0.0,
        target_rotate_z: 0.0,
        target_scale_z: 1.0,
    };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 3 };
    dispatch(&mut ctx, &header_for::<AnimateWindow>(types::ANIMATE_WINDOW), &write(&animate), Vec::new()).unwrap();

    let buf = server.buffer_mut(WindowId(1)).unwrap();
    tick(buf, 0);
    tick(buf, 50);
    tick(buf, 100);

    assert_eq!(buf.x, 200);
    assert_eq!(buf.y, 150);
    assert!(!buf.animation.animating);

    // Further ticks past completion must not move the buffer again.
    tick(buf, 500);
    assert_eq!(buf.x, 200);
    assert_eq!(buf.y, 150);
}
