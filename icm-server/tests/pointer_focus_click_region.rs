//! Pointer routing and click-region matching (spec.md §8 property 5): a
//! press inside a registered region notifies the region's owner, and the
//! raw pointer event still reaches whichever client asked for it.

use icm_protocol::header::{Header, HEADER_LEN};
use icm_protocol::message::types;
use icm_protocol::payload::{write, CreateWindow, RegisterClickRegion, RegisterPointerEvent};

use icm_server::dispatch::{dispatch, Ctx};
use icm_server::events::{pointer_event, POINTER_PRESSED};
use icm_server::ids::{Layer, WindowId};
use icm_server::registry::{Client, Server};
use icm_server::scene::{HitTestResult, SceneHandle, SceneHost};

fn header_for<T>(msg_type: u16) -> Header {
    Header { length: (HEADER_LEN + std::mem::size_of::<T>()) as u32, msg_type, flags: 0, sequence: 0, num_fds: 0 }
}

/// Always reports the same hit, standing in for a real scene graph's
/// geometry test.
struct FixedHitScene {
    hit: Option<HitTestResult>,
}

impl SceneHost for FixedHitScene {
    fn buffer_create(&mut self, _layer: Layer, _pixels: &[u8], _width: u32, _height: u32, _format: u32) -> SceneHandle {
        SceneHandle(0)
    }
    fn buffer_destroy(&mut self, _node: SceneHandle) {}
    fn set_buffer(&mut self, _node: SceneHandle, _pixels: &[u8], _width: u32, _height: u32) {}
    fn set_position(&mut self, _node: SceneHandle, _x: i32, _y: i32) {}
    fn set_dest_size(&mut self, _node: SceneHandle, _width: f32, _height: f32) {}
    fn set_opacity(&mut self, _node: SceneHandle, _opacity: f32) {}
    fn set_transform_matrix(&mut self, _node: SceneHandle, _matrix: [f32; 16]) {}
    fn clear_transform_matrix(&mut self, _node: SceneHandle) {}
    fn reparent(&mut self, _node: SceneHandle, _layer: Layer) {}
    fn raise(&mut self, _node: SceneHandle) {}
    fn lower(&mut self, _node: SceneHandle) {}
    fn set_enabled(&mut self, _node: SceneHandle, _enabled: bool) {}
    fn hit_test(&self, _x: f64, _y: f64) -> Option<HitTestResult> {
        self.hit
    }
    fn schedule_frame(&mut self) {}
    fn screen_copy(&mut self, _x: u32, _y: u32, _width: u32, _height: u32) -> Option<Vec<u8>> {
        None
    }
}

#[test]
fn press_in_region_notifies_owner_and_pointer_listener() {
    let mut server = Server::default();
    server.clients.push(Client::new(1)); // click-region owner
    server.clients.push(Client::new(2)); // pointer listener
    let mut scene = FixedHitScene { hit: Some(HitTestResult { node: SceneHandle(0), window_id: WindowId(1), sx: 5.0, sy: 5.0 }) };

    let create = CreateWindow { window_id: 1, x: 0, y: 0, width: 10, height: 10, layer: 2, color_rgba: 0 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 1 };
    dispatch(&mut ctx, &header_for::<CreateWindow>(types::CREATE_WINDOW), &write(&create), Vec::new()).unwrap();

    let region = RegisterClickRegion { window_id: 1, region_id: 0, x: 0, y: 0, width: 10, height: 10 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 1 };
    dispatch(&mut ctx, &header_for::<RegisterClickRegion>(types::REGISTER_CLICK_REGION), &write(&region), Vec::new()).unwrap();

    let register_pointer = RegisterPointerEvent { window_id: 1 };
    let mut ctx = Ctx { server: &mut server, scene: &mut scene, client: 2 };
    dispatch(&mut ctx, &header_for::<RegisterPointerEvent>(types::REGISTER_POINTER_EVENT), &write(&register_pointer), Vec::new()).unwrap();

    let out = pointer_event(&server, &scene, 0, 0, POINTER_PRESSED, 5.0, 5.0);
    assert_eq!(out.len(), 2);
    assert!(out.iter().any(|f| f.msg_type == types::CLICK_REGION_EVENT && f.recipient == icm_server::dispatch::Recipient::Client(1)));
    assert!(out.iter().any(|f| f.msg_type == types::POINTER_EVENT && f.recipient == icm_server::dispatch::Recipient::Client(2)));
}
