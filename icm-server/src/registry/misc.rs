use crate::ids::WindowId;
use crate::registry::buffer::Buffer;

pub type ClientId = u64;

/// Client-uploaded static pixel data (spec.md §3 "Image").
#[derive(Debug)]
pub struct Image {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub format: u32,
    pub data: Vec<u8>,
}

/// Placeholder render target for nested-compositing hand-off.
#[derive(Debug)]
pub struct ExportedSurface {
    pub surface_id: u32,
    pub window_id: WindowId,
    pub target: Buffer,
}

#[derive(Debug, Clone, Copy)]
pub struct Keybind {
    pub id: u32,
    pub modifiers: u32,
    pub keycode: u32,
    pub owner: ClientId,
}

#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x
            && py >= self.y
            && px < self.x + self.width as i32
            && py < self.y + self.height as i32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClickRegion {
    pub id: u32,
    pub window_id: WindowId,
    pub rect: Rect,
    pub owner: ClientId,
}

#[derive(Debug, Clone, Copy)]
pub struct ScreenCopyRequest {
    pub id: u32,
    pub rect: Rect,
    pub owner: ClientId,
}

/// Window lifecycle event mask bits (spec.md §3 "Client").
pub const EVT_CREATED: u32 = 1;
pub const EVT_DESTROYED: u32 = 2;
pub const EVT_TITLE: u32 = 4;
pub const EVT_STATE: u32 = 8;
pub const EVT_FOCUS: u32 = 16;

/// Per-client registration and batching state (spec.md §3 "Client"). The
/// socket itself and the read accumulator live in `crate::connection`; this
/// is the dispatch-visible half.
#[derive(Debug, Clone, Default)]
pub struct Client {
    pub id: ClientId,
    pub last_sequence: u32,

    pub batching: bool,
    pub batch_id: u32,

    pub registered_pointer: bool,
    pub registered_keyboard: bool,
    pub event_window_id: Option<WindowId>,

    pub global_pointer: bool,
    pub global_keyboard: bool,
    pub global_capture_mouse: bool,
    pub global_capture_keyboard: bool,

    pub window_event_mask: u32,
}

impl Client {
    pub fn new(id: ClientId) -> Client {
        Client { id, ..Default::default() }
    }
}
