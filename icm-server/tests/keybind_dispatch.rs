//! Keybind registration and matching end to end (spec.md §8 property 2):
//! a registered keybind fires a `KEYBIND_EVENT` to its owner on key-down
//! and only on key-down, and unregistering removes it from matching.

use icm_protocol::header::{Header, HEADER_LEN};
use icm_protocol::message::types;
use icm_protocol::payload::{write, RegisterKeybind, UnregisterKeybind};

use icm_server::dispatch::{dispatch, Ctx};
use icm_server::events::{keyboard_event, POINTER_PRESSED, POINTER_RELEASED};
use icm_server::registry::{Client, Server};
use icm_server::scene::NullSceneHost;

fn header_for<T>(msg_type: u16) -> Header {
    Header { length: (HEADER_LEN + std::mem::size_of::<T>()) as u32, msg_type, flags: 0, sequence: 0, num_fds: 0 }
}

const MOD_SUPER: u32 = 1;
const KEY_D: u32 = 40;

#[test]
fn registered_keybind_fires_on_press_only() {
    let mut server = Server::default();
    server.clients.push(Client::new(7));
    let mut scene = NullSceneHost::new();

    let register = RegisterKeybind { keybind_id: 0, modifiers: MOD_SUPER, keycode: KEY_D };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 7 };
    dispatch(&mut ctx, &header_for::<RegisterKeybind>(types::REGISTER_KEYBIND), &write(&register), Vec::new()).unwrap();
    assert_eq!(server.keybinds.len(), 1);

    let release = keyboard_event(&server, 0, KEY_D, POINTER_RELEASED, MOD_SUPER);
    assert!(release.is_empty(), "release must not match a keybind");

    let press = keyboard_event(&server, 0, KEY_D, POINTER_PRESSED, MOD_SUPER);
    assert_eq!(press.len(), 1);
    assert_eq!(press[0].msg_type, types::KEYBIND_EVENT);
}

#[test]
fn unregistered_keybind_stops_matching() {
    let mut server = Server::default();
    server.clients.push(Client::new(7));
    let mut scene = NullSceneHost::new();

    let register = RegisterKeybind { keybind_id: 0, modifiers: MOD_SUPER, keycode: KEY_D };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 7 };
    dispatch(&mut ctx, &header_for::<RegisterKeybind>(types::REGISTER_KEYBIND), &write(&register), Vec::new()).unwrap();
    let id = server.keybinds[0].id;

    let unregister = UnregisterKeybind { keybind_id: id };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 7 };
    dispatch(&mut ctx, &header_for::<UnregisterKeybind>(types::UNREGISTER_KEYBIND), &write(&unregister), Vec::new()).unwrap();
    assert!(server.keybinds.is_empty());

    let press = keyboard_event(&server, 0, KEY_D, POINTER_PRESSED, MOD_SUPER);
    assert!(press.is_empty());
}
