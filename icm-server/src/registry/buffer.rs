use std::os::fd::OwnedFd;

use icm_effect::Program;

use crate::ids::{Layer, WindowId};
use crate::scene::SceneHandle;

/// One plane of an imported DMA-BUF (spec.md §3, up to 4 per buffer).
#[derive(Debug)]
pub struct DmabufPlane {
    pub fd: OwnedFd,
    pub offset: u32,
    pub stride: u32,
    pub modifier: u64,
}

/// Per-buffer animation snapshot (spec.md §4.7). Interpolation targets for
/// every animatable component, plus the bitfield selecting which groups are
/// active for the current run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationState {
    pub animating: bool,
    pub flags: u32,
    pub start_ms: u64,
    pub duration_ms: u32,

    pub start_x: f32,
    pub start_y: f32,
    pub start_scale_x: f32,
    pub start_scale_y: f32,
    pub start_opacity: f32,
    pub start_translate: [f32; 3],
    pub start_rotate: [f32; 3],
    pub start_scale_z: f32,

    pub target_x: f32,
    pub target_y: f32,
    pub target_scale_x: f32,
    pub target_scale_y: f32,
    pub target_opacity: f32,
    pub target_translate: [f32; 3],
    pub target_rotate: [f32; 3],
    pub target_scale_z: f32,
}

pub const ANIM_POS: u32 = 1;
pub const ANIM_SCALE: u32 = 2;
pub const ANIM_OPACITY: u32 = 4;
pub const ANIM_TRANSLATE_3D: u32 = 8;
pub const ANIM_ROTATE_3D: u32 = 16;
pub const ANIM_SCALE_3D: u32 = 32;

/// The central drawable (spec.md §3 "Buffer").
#[derive(Debug)]
pub struct Buffer {
    pub id: WindowId,
    pub width: u32,
    pub height: u32,
    pub format: u32,

    pub x: i32,
    pub y: i32,

    pub pixels: Vec<u8>,
    pub planes: Vec<DmabufPlane>,

    pub visible: bool,
    pub dirty: bool,
    pub opacity: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation: f32,
    pub layer: Layer,
    pub parent_id: Option<WindowId>,
    pub minimized: bool,
    pub maximized: bool,
    pub fullscreen: bool,
    pub decorated: bool,
    pub focused: bool,

    pub matrix: [f32; 16],
    pub has_matrix: bool,

    pub translate: [f32; 3],
    pub rotate_3d: [f32; 3],
    pub scale_z: f32,

    pub effect_enabled: bool,
    pub equation: String,
    pub effect_dirty: bool,
    pub effect_data: Option<Vec<u8>>,
    pub use_effect_buffer: bool,
    /// Parsed from `equation` the next time `effect_dirty` is seen, so the
    /// output-frame tick doesn't reparse the same equation every frame.
    pub effect_program: Option<Program>,

    pub blur_enabled: bool,
    pub blur_radius: f32,

    pub animation: AnimationState,

    pub mesh_width: u32,
    pub mesh_height: u32,
    pub mesh_vertices: Vec<(f32, f32)>,

    pub pid: u32,

    pub scene: Option<SceneHandle>,
}

impl Buffer {
    pub fn new(id: WindowId, width: u32, height: u32, format: u32) -> Buffer {
        Buffer {
            id,
            width,
            height,
            format,
            x: 0,
            y: 0,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
            planes: Vec::new(),
            visible: true,
            dirty: true,
            opacity: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            layer: Layer::Normal,
            parent_id: None,
            minimized: false,
            maximized: false,
            fullscreen: false,
            decorated: false,
            focused: false,
            matrix: [0.0; 16],
            has_matrix: false,
            translate: [0.0; 3],
            rotate_3d: [0.0; 3],
            scale_z: 1.0,
            effect_enabled: false,
            equation: String::new(),
            effect_dirty: false,
            effect_data: None,
            use_effect_buffer: false,
            effect_program: None,
            blur_enabled: false,
            blur_radius: 0.0,
            animation: AnimationState::default(),
            mesh_width: 0,
            mesh_height: 0,
            mesh_vertices: Vec::new(),
            pid: 0,
            scene: None,
        }
    }

    pub fn dest_size(&self) -> (f32, f32) {
        (self.width as f32 * self.scale_x, self.height as f32 * self.scale_y)
    }

    /// Ensures `effect_data` exists and matches `pixels`' size iff the effect
    /// is enabled and the equation is non-empty (spec.md §3 invariants).
    pub fn sync_effect_buffer(&mut self) {
        let needed = self.effect_enabled && !self.equation.is_empty();
        let required_len = self.pixels.len();
        if !needed {
            self.effect_data = None;
            self.use_effect_buffer = false;
            return;
        }
        match &mut self.effect_data {
            Some(buf) if buf.len() == required_len => {}
            _ => self.effect_data = Some(vec![0u8; required_len]),
        }
    }

    /// Opacity actually pushed to the scene: `opacity` scaled by
    /// `1 - 0.05 * blur_radius` (clamped to `[0.5, 1]`) while blur is enabled
    /// (spec.md §4.4).
    pub fn effective_opacity(&self) -> f32 {
        if self.blur_enabled {
            let factor = (1.0 - 0.05 * self.blur_radius).clamp(0.5, 1.0);
            self.opacity * factor
        } else {
            self.opacity
        }
    }

    /// The byte array the scene should currently present: the effect shadow
    /// if active, else the logical pixels (spec.md §4.6).
    pub fn presented_pixels(&self) -> &[u8] {
        if self.use_effect_buffer {
            self.effect_data.as_deref().unwrap_or(&self.pixels)
        } else {
            &self.pixels
        }
    }
}
