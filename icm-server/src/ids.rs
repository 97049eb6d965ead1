/// The single monotonically increasing namespace shared by IPC buffers, XDG
/// views, and layer-shell surfaces (spec.md §3 "Window ID space").
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u32);

impl From<u32> for WindowId {
    fn from(v: u32) -> Self {
        WindowId(v)
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the three host-managed kinds a `WindowId` currently names.
/// Consolidates the "three-way search" spec.md §9 calls out — one
/// `Registry::resolve` replaces three hand-written list scans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostSurface {
    Buffer,
    View,
    LayerSurface,
}

/// One of five ordered scene subtrees a buffer's node can be parented under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Bg,
    Bottom,
    Normal,
    Top,
    Overlay,
}

impl Layer {
    pub fn from_wire(v: u32) -> Layer {
        match v {
            0 => Layer::Bg,
            1 => Layer::Bottom,
            3 => Layer::Top,
            4 => Layer::Overlay,
            _ => Layer::Normal,
        }
    }

    pub fn to_wire(self) -> u32 {
        match self {
            Layer::Bg => 0,
            Layer::Bottom => 1,
            Layer::Normal => 2,
            Layer::Top => 3,
            Layer::Overlay => 4,
        }
    }
}
