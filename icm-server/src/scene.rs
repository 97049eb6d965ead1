//! The seam to the real compositor scene graph (spec.md §1, §6
//! "Scene-host interface"). Nothing in this crate reimplements a scene
//! graph; `SceneHost` is the collaborator contract the dispatcher and
//! animation tick drive, and `NullSceneHost` is a recording test double.

use crate::ids::{Layer, WindowId};

/// Opaque handle to a host scene node. Only `SceneHost` impls construct or
/// interpret its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandle(pub u64);

/// Result of a hit-test: the node found, the `window_id` it maps to, and
/// surface-local coordinates.
#[derive(Debug, Clone, Copy)]
pub struct HitTestResult {
    pub node: SceneHandle,
    pub window_id: WindowId,
    pub sx: f64,
    pub sy: f64,
}

/// Collaborator contract for the real scene graph (spec.md §6). Every method
/// corresponds one-to-one to an operation named there.
pub trait SceneHost {
    fn buffer_create(&mut self, layer: Layer, pixels: &[u8], width: u32, height: u32, format: u32) -> SceneHandle;
    fn buffer_destroy(&mut self, node: SceneHandle);
    fn set_buffer(&mut self, node: SceneHandle, pixels: &[u8], width: u32, height: u32);
    fn set_position(&mut self, node: SceneHandle, x: i32, y: i32);
    fn set_dest_size(&mut self, node: SceneHandle, width: f32, height: f32);
    fn set_opacity(&mut self, node: SceneHandle, opacity: f32);
    fn set_transform_matrix(&mut self, node: SceneHandle, matrix: [f32; 16]);
    fn clear_transform_matrix(&mut self, node: SceneHandle);
    fn reparent(&mut self, node: SceneHandle, layer: Layer);
    fn raise(&mut self, node: SceneHandle);
    fn lower(&mut self, node: SceneHandle);
    fn set_enabled(&mut self, node: SceneHandle, enabled: bool);

    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult>;

    fn schedule_frame(&mut self);

    /// Returns a screenshot of `rect` when the host can provide a real
    /// copy; `None` lets the caller synthesize a placeholder image instead
    /// (spec.md §6 "returns a synthetic image when the host cannot provide
    /// real copy").
    fn screen_copy(&mut self, x: u32, y: u32, width: u32, height: u32) -> Option<Vec<u8>>;
}

/// Records calls instead of acting on them — the collaborator used by unit
/// and integration tests in this crate in place of the real compositor.
#[derive(Debug, Default)]
pub struct NullSceneHost {
    pub next_handle: u64,
    pub calls: Vec<String>,
}

impl NullSceneHost {
    pub fn new() -> Self {
        NullSceneHost::default()
    }

    fn log(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
    }
}

impl SceneHost for NullSceneHost {
    fn buffer_create(&mut self, layer: Layer, _pixels: &[u8], width: u32, height: u32, _format: u32) -> SceneHandle {
        let handle = SceneHandle(self.next_handle);
        self.next_handle += 1;
        self.log(format!("create({layer:?}, {width}x{height})"));
        handle
    }

    fn buffer_destroy(&mut self, node: SceneHandle) {
        self.log(format!("destroy({node:?})"));
    }

    fn set_buffer(&mut self, node: SceneHandle, _pixels: &[u8], width: u32, height: u32) {
        self.log(format!("set_buffer({node:?}, {width}x{height})"));
    }

    fn set_position(&mut self, node: SceneHandle, x: i32, y: i32) {
        self.log(format!("set_position({node:?}, {x},{y})"));
    }

    fn set_dest_size(&mut self, node: SceneHandle, width: f32, height: f32) {
        self.log(format!("set_dest_size({node:?}, {width},{height})"));
    }

    fn set_opacity(&mut self, node: SceneHandle, opacity: f32) {
        self.log(format!("set_opacity({node:?}, {opacity})"));
    }

    fn set_transform_matrix(&mut self, node: SceneHandle, _matrix: [f32; 16]) {
        self.log(format!("set_matrix({node:?})"));
    }

    fn clear_transform_matrix(&mut self, node: SceneHandle) {
        self.log(format!("clear_matrix({node:?})"));
    }

    fn reparent(&mut self, node: SceneHandle, layer: Layer) {
        self.log(format!("reparent({node:?}, {layer:?})"));
    }

    fn raise(&mut self, node: SceneHandle) {
        self.log(format!("raise({node:?})"));
    }

    fn lower(&mut self, node: SceneHandle) {
        self.log(format!("lower({node:?})"));
    }

    fn set_enabled(&mut self, node: SceneHandle, enabled: bool) {
        self.log(format!("set_enabled({node:?}, {enabled})"));
    }

    fn hit_test(&self, _x: f64, _y: f64) -> Option<HitTestResult> {
        None
    }

    fn schedule_frame(&mut self) {
        self.log("schedule_frame".to_string());
    }

    fn screen_copy(&mut self, _x: u32, _y: u32, _width: u32, _height: u32) -> Option<Vec<u8>> {
        None
    }
}
