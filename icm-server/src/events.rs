//! Event routing from the host seat into client notifications (spec.md
//! §4.9), grounded on the pointer/keyboard forwarding in
//! `xdg-shell-wrapper`'s seat handling: hit-test to find the target window,
//! then fan out to whichever clients asked to hear about it.

use icm_protocol::message::types;
use icm_protocol::payload::{write, ClickRegionEvent, KeybindEvent, KeyboardEvent, PointerEvent, WindowStateChanged, WindowTitleChanged};

use crate::dispatch::OutFrame;
use crate::ids::WindowId;
use crate::registry::{Server, EVT_STATE, EVT_TITLE};
use crate::scene::SceneHost;

pub const POINTER_RELEASED: u32 = 0;
pub const POINTER_PRESSED: u32 = 1;
pub const POINTER_MOTION: u32 = 2;

fn pointer_targets(server: &Server, window_id: WindowId) -> Vec<u64> {
    server
        .clients
        .iter()
        .filter(|c| c.global_pointer || (c.registered_pointer && c.event_window_id == Some(window_id)))
        .map(|c| c.id)
        .collect()
}

/// Hit-tests `(x, y)` against the scene and emits a `POINTER_EVENT` to every
/// interested client. Also matches click regions on a press (spec.md §4.9
/// "button press matches registered click regions, topmost wins").
pub fn pointer_event(server: &Server, scene: &dyn SceneHost, time: u32, button: u32, state: u32, x: f64, y: f64) -> Vec<OutFrame> {
    let Some(hit) = scene.hit_test(x, y) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let msg = PointerEvent { window_id: hit.window_id.0, time, button, state, x: hit.sx as i32, y: hit.sy as i32 };
    for client in pointer_targets(server, hit.window_id) {
        out.push(OutFrame::to(client, types::POINTER_EVENT, write(&msg)));
    }

    if state == POINTER_PRESSED {
        if let Some(region) = server
            .click_regions
            .iter()
            .filter(|r| r.window_id == hit.window_id && r.rect.contains(hit.sx as i32, hit.sy as i32))
            .last()
        {
            let ev = ClickRegionEvent { region_id: region.id, button, state };
            out.push(OutFrame::to(region.owner, types::CLICK_REGION_EVENT, write(&ev)));
        }
    }
    out
}

/// Forwards a key event to the focused window's listeners and matches
/// registered keybinds on key-down (spec.md §4.9).
pub fn keyboard_event(server: &Server, time: u32, keycode: u32, state: u32, modifiers: u32) -> Vec<OutFrame> {
    let mut out = Vec::new();
    if let Some(focused) = server.focused_window {
        let msg = KeyboardEvent { window_id: focused.0, time, keycode, state, modifiers };
        for client in &server.clients {
            if client.global_keyboard || (client.registered_keyboard && client.event_window_id == Some(focused)) {
                out.push(OutFrame::to(client.id, types::KEYBOARD_EVENT, write(&msg)));
            }
        }
    }

    if state == POINTER_PRESSED {
        for bind in server.keybinds.iter().filter(|k| k.modifiers == modifiers && k.keycode == keycode) {
            let ev = KeybindEvent { keybind_id: bind.id };
            out.push(OutFrame::to(bind.owner, types::KEYBIND_EVENT, write(&ev)));
        }
    }
    out
}

/// Notifies every client subscribed to `EVT_TITLE` for windows in general
/// (spec.md §3 "Client" window_event_mask is global, not per-window).
pub fn window_title_changed(server: &Server, window_id: WindowId) -> Vec<OutFrame> {
    let msg = WindowTitleChanged { window_id: window_id.0 };
    server
        .clients
        .iter()
        .filter(|c| c.window_event_mask & EVT_TITLE != 0)
        .map(|c| OutFrame::to(c.id, types::WINDOW_TITLE_CHANGED, write(&msg)))
        .collect()
}

pub fn window_state_changed(server: &Server, window_id: WindowId, state: u32) -> Vec<OutFrame> {
    let msg = WindowStateChanged { window_id: window_id.0, state };
    server
        .clients
        .iter()
        .filter(|c| c.window_event_mask & EVT_STATE != 0)
        .map(|c| OutFrame::to(c.id, types::WINDOW_STATE_CHANGED, write(&msg)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Client;
    use crate::scene::NullSceneHost;

    #[test]
    fn pointer_event_with_no_hit_produces_nothing() {
        let server = Server::default();
        let scene = NullSceneHost::new();
        let out = pointer_event(&server, &scene, 0, 0, POINTER_MOTION, 1.0, 1.0);
        assert!(out.is_empty());
    }

    #[test]
    fn keyboard_event_with_no_focus_produces_nothing() {
        let mut server = Server::default();
        server.clients.push(Client::new(1));
        let out = keyboard_event(&server, 0, 30, POINTER_PRESSED, 0);
        assert!(out.is_empty());
    }
}
