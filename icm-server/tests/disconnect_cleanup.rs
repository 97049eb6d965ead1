//! A client's keybinds, click regions, and screen-copy requests are all
//! dropped on disconnect, and window-scoped registrations referencing it
//! are cleared (spec.md §8 property 1).

use icm_protocol::header::{Header, HEADER_LEN};
use icm_protocol::message::types;
use icm_protocol::payload::{write, CreateWindow, RegisterClickRegion, RegisterKeybind, RegisterPointerEvent, RequestScreenCopy};

use icm_server::dispatch::{dispatch, Ctx};
use icm_server::ids::WindowId;
use icm_server::registry::{Client, Server};
use icm_server::scene::NullSceneHost;

fn header_for<T>(msg_type: u16) -> Header {
    Header { length: (HEADER_LEN + std::mem::size_of::<T>()) as u32, msg_type, flags: 0, sequence: 0, num_fds: 0 }
}

#[test]
fn cleanup_client_strips_all_owned_registrations() {
    let mut server = Server::default();
    server.clients.push(Client::new(9));
    let mut scene = NullSceneHost::new();

    let create = CreateWindow { window_id: 1, x: 0, y: 0, width: 4, height: 4, layer: 2, color_rgba: 0 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 9 };
    dispatch(&mut ctx, &header_for::<CreateWindow>(types::CREATE_WINDOW), &write(&create), Vec::new()).unwrap();

    let keybind = RegisterKeybind { keybind_id: 0, modifiers: 1, keycode: 40 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 9 };
    dispatch(&mut ctx, &header_for::<RegisterKeybind>(types::REGISTER_KEYBIND), &write(&keybind), Vec::new()).unwrap();

    let region = RegisterClickRegion { window_id: 1, region_id: 0, x: 0, y: 0, width: 4, height: 4 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 9 };
    dispatch(&mut ctx, &header_for::<RegisterClickRegion>(types::REGISTER_CLICK_REGION), &write(&region), Vec::new()).unwrap();

    let pointer = RegisterPointerEvent { window_id: 1 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 9 };
    dispatch(&mut ctx, &header_for::<RegisterPointerEvent>(types::REGISTER_POINTER_EVENT), &write(&pointer), Vec::new()).unwrap();

    let screen_copy = RequestScreenCopy { request_id: 0, x: 0, y: 0, width: 4, height: 4 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 9 };
    dispatch(&mut ctx, &header_for::<RequestScreenCopy>(types::REQUEST_SCREEN_COPY), &write(&screen_copy), Vec::new()).unwrap();

    assert_eq!(server.keybinds.len(), 1);
    assert_eq!(server.click_regions.len(), 1);
    assert_eq!(server.screen_copy_requests.len(), 1);
    assert!(server.clients.iter().any(|c| c.id == 9 && c.registered_pointer));

    server.cleanup_client(9);

    assert!(server.keybinds.is_empty());
    assert!(server.click_regions.is_empty());
    assert!(server.screen_copy_requests.is_empty());
    assert!(!server.clients.iter().any(|c| c.id == 9));
    // The window itself is a registry entity, not a per-client one, and
    // outlives the disconnected client that created it.
    assert!(server.buffer(WindowId(1)).is_some());
}
