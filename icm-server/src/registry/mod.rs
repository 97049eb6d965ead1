pub mod buffer;
pub mod misc;

pub use buffer::{Buffer, DmabufPlane};
pub use misc::{
    Client, ClickRegion, ClientId, EVT_CREATED, EVT_DESTROYED, EVT_FOCUS, EVT_STATE, EVT_TITLE,
    ExportedSurface, Image, Keybind, Rect, ScreenCopyRequest,
};

use icm_config::DecorationDefaults;

use crate::ids::{HostSurface, WindowId};
use crate::transform::TransformRegistry;

/// Owns every entity table plus the ID counters (spec.md §3 "Server").
/// All five registry lists are insertion-ordered; lookup by ID is a linear
/// scan (spec.md §4.2 — cardinality is expected to stay small).
#[derive(Debug)]
pub struct Server {
    pub buffers: Vec<Buffer>,
    pub images: Vec<Image>,
    pub exported_surfaces: Vec<ExportedSurface>,
    pub keybinds: Vec<Keybind>,
    pub click_regions: Vec<ClickRegion>,
    pub screen_copy_requests: Vec<ScreenCopyRequest>,
    pub clients: Vec<Client>,

    /// Views/layer-surfaces arriving from the host collaborator, recorded
    /// only as `WindowId`s since their real state lives in the host scene.
    pub views: Vec<WindowId>,
    pub layer_surfaces: Vec<WindowId>,

    pub decoration: DecorationDefaults,

    pub screen_effect_enabled: bool,
    pub screen_effect_equation: String,
    pub screen_effect_buffer: Option<Vec<u8>>,
    pub screen_effect_dirty: bool,
    pub screen_effect_program: Option<icm_effect::Program>,
    pub screen_width: u32,
    pub screen_height: u32,

    pub focused_window: Option<WindowId>,

    pub transform: TransformRegistry,

    next_window_id: u32,
    next_image_id: u32,
    next_keybind_id: u32,
    next_region_id: u32,
    next_screen_copy_id: u32,
}

impl Default for Server {
    fn default() -> Self {
        Server::new(DecorationDefaults::default())
    }
}

impl Server {
    pub fn new(decoration: DecorationDefaults) -> Server {
        Server {
            buffers: Vec::new(),
            images: Vec::new(),
            exported_surfaces: Vec::new(),
            keybinds: Vec::new(),
            click_regions: Vec::new(),
            screen_copy_requests: Vec::new(),
            clients: Vec::new(),
            views: Vec::new(),
            layer_surfaces: Vec::new(),
            decoration,
            screen_effect_enabled: false,
            screen_effect_equation: String::new(),
            screen_effect_buffer: None,
            screen_effect_dirty: false,
            screen_effect_program: None,
            screen_width: 1920,
            screen_height: 1080,
            focused_window: None,
            transform: TransformRegistry::new(),
            next_window_id: 1,
            next_image_id: 1,
            next_keybind_id: 1,
            next_region_id: 1,
            next_screen_copy_id: 1,
        }
    }

    pub fn alloc_window_id(&mut self) -> WindowId {
        let id = WindowId(self.next_window_id);
        self.next_window_id += 1;
        id
    }

    pub fn alloc_image_id(&mut self) -> u32 {
        let id = self.next_image_id;
        self.next_image_id += 1;
        id
    }

    pub fn alloc_keybind_id(&mut self) -> u32 {
        let id = self.next_keybind_id;
        self.next_keybind_id += 1;
        id
    }

    pub fn alloc_region_id(&mut self) -> u32 {
        let id = self.next_region_id;
        self.next_region_id += 1;
        id
    }

    pub fn alloc_screen_copy_id(&mut self) -> u32 {
        let id = self.next_screen_copy_id;
        self.next_screen_copy_id += 1;
        id
    }

    /// The three-way `window_id` search consolidated behind one call
    /// (spec.md §9 "an implementation may merge them behind a common
    /// trait/variant").
    pub fn resolve(&self, id: WindowId) -> Option<HostSurface> {
        if self.buffers.iter().any(|b| b.id == id) {
            return Some(HostSurface::Buffer);
        }
        if self.views.iter().any(|v| *v == id) {
            return Some(HostSurface::View);
        }
        if self.layer_surfaces.iter().any(|v| *v == id) {
            return Some(HostSurface::LayerSurface);
        }
        None
    }

    pub fn buffer(&self, id: WindowId) -> Option<&Buffer> {
        self.buffers.iter().find(|b| b.id == id)
    }

    pub fn buffer_mut(&mut self, id: WindowId) -> Option<&mut Buffer> {
        self.buffers.iter_mut().find(|b| b.id == id)
    }

    pub fn image(&self, id: u32) -> Option<&Image> {
        self.images.iter().find(|i| i.id == id)
    }

    pub fn client_mut(&mut self, id: ClientId) -> Option<&mut Client> {
        self.clients.iter_mut().find(|c| c.id == id)
    }

    pub fn create_buffer(&mut self, width: u32, height: u32, format: u32) -> WindowId {
        let id = self.alloc_window_id();
        self.buffers.push(Buffer::new(id, width, height, format));
        id
    }

    /// Destroys a buffer, dropping owned pixel memory, dmabuf fds, and the
    /// scene node (the caller is responsible for telling the scene host to
    /// tear the node down before calling this, since that needs `SceneHost`).
    pub fn destroy_buffer(&mut self, id: WindowId) -> Option<Buffer> {
        let pos = self.buffers.iter().position(|b| b.id == id)?;
        Some(self.buffers.remove(pos))
    }

    /// Removes every keybind, click region, and screen-copy request owned by
    /// `client`, and clears its event registrations — the disconnect cascade
    /// from spec.md §3's invariants / §8 property 1.
    pub fn cleanup_client(&mut self, client: ClientId) {
        self.keybinds.retain(|k| k.owner != client);
        self.click_regions.retain(|r| r.owner != client);
        self.screen_copy_requests.retain(|r| r.owner != client);
        self.clients.retain(|c| c.id != client);
    }

    /// Clears window-scoped registrations and removes click regions for a
    /// window that just got unmapped (spec.md §3 invariants).
    pub fn cleanup_window(&mut self, id: WindowId) {
        for client in &mut self.clients {
            if client.event_window_id == Some(id) {
                client.registered_pointer = false;
                client.registered_keyboard = false;
            }
        }
        self.click_regions.retain(|r| r.window_id != id);
        if self.focused_window == Some(id) {
            self.focused_window = None;
        }
    }
}
