//! Fixed-layout payload structs, one per message type that carries a
//! constant-size body. Field order matches `original_source/ipc_protocol.h`
//! one-for-one so the wire contract is unambiguous. Variable-length types
//! (polygon, upload-image, draw-text, mesh update, launch-app, monitors-data,
//! toplevel-windows-data, screen-copy-data) append a tail byte array after
//! their fixed head and are decoded in `crate::variable`.

use bytemuck::{Pod, Zeroable};

macro_rules! payload {
    ($name:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
        pub struct $name {
            $(pub $field: $ty,)*
        }
    };
}

payload!(CreateWindow { window_id: u32, x: i32, y: i32, width: u32, height: u32, layer: u32, color_rgba: u32 });
payload!(DestroyWindow { window_id: u32 });
payload!(SetWindow { window_id: u32, x: i32, y: i32, width: u32, height: u32 });
payload!(SetLayer { window_id: u32, layer: u32 });
payload!(DrawRect { window_id: u32, rect_id: u32, x: i32, y: i32, width: u32, height: u32, color_rgba: u32 });
payload!(ClearRects { window_id: u32 });

payload!(DmabufPlaneWire { fd_index: i32, offset: u32, stride: u32, modifier_lo: u32, modifier_hi: u32 });
payload!(ImportDmabuf {
    buffer_id: u32, width: i32, height: i32, format: u32, flags: u32, num_planes: u32,
    plane0: DmabufPlaneWire, plane1: DmabufPlaneWire, plane2: DmabufPlaneWire, plane3: DmabufPlaneWire,
});
payload!(ExportDmabuf { buffer_id: u32, flags: u32 });
payload!(ExportDmabufReply {
    buffer_id: u32, width: i32, height: i32, format: u32, num_planes: u32,
    plane0: DmabufPlaneWire, plane1: DmabufPlaneWire, plane2: DmabufPlaneWire, plane3: DmabufPlaneWire,
});

payload!(DrawLine { window_id: u32, x0: i32, y0: i32, x1: i32, y1: i32, color_rgba: u32, thickness: u32 });
payload!(DrawCircle { window_id: u32, cx: i32, cy: i32, radius: u32, color_rgba: u32, fill: u32 });
/// Fixed head of a DRAW_POLYGON message; point pairs follow as a tail.
payload!(DrawPolygonHead { window_id: u32, num_points: u32, color_rgba: u32, fill: u32 });
payload!(DrawImage {
    window_id: u32, buffer_id: u32, x: i32, y: i32, width: u32, height: u32,
    src_x: u32, src_y: u32, src_width: u32, src_height: u32, alpha: u8,
    _pad: [u8; 3],
});
payload!(BlitBuffer {
    window_id: u32, src_buffer_id: u32, dst_buffer_id: u32,
    src_x: i32, src_y: i32, dst_x: i32, dst_y: i32, width: u32, height: u32,
});

payload!(BatchBegin { batch_id: u32, expected_commands: u32 });
payload!(BatchEnd { batch_id: u32 });

payload!(ExportSurface { window_id: u32, surface_id: u32, flags: u32 });
payload!(ImportSurface { surface_id: u32, window_id: u32, x: i32, y: i32, width: u32, height: u32 });

payload!(CreateBuffer { buffer_id: u32, width: u32, height: u32, format: u32, usage_flags: u32 });
payload!(DestroyBuffer { buffer_id: u32 });
payload!(QueryBufferInfo { buffer_id: u32 });
payload!(QueryBufferInfoReply {
    buffer_id: u32, width: i32, height: i32, format: u32, size: u32, stride: u32, mmap_fd: i32,
});

payload!(RegisterPointerEvent { window_id: u32 });
payload!(RegisterKeyboardEvent { window_id: u32 });
payload!(QueryCaptureMouse { window_id: u32 });
payload!(QueryCaptureKeyboard { window_id: u32 });

payload!(PointerEvent { window_id: u32, time: u32, button: u32, state: u32, x: i32, y: i32 });
payload!(KeyboardEvent { window_id: u32, time: u32, keycode: u32, state: u32, modifiers: u32 });

/// Fixed head of UPLOAD_IMAGE; `data_size` bytes of RGBA pixel data follow.
payload!(UploadImageHead { image_id: u32, width: u32, height: u32, format: u32, data_size: u32 });
payload!(DestroyImage { image_id: u32 });
payload!(DrawUploadedImage {
    window_id: u32, image_id: u32, x: i32, y: i32, width: u32, height: u32,
    src_x: u32, src_y: u32, src_width: u32, src_height: u32, alpha: u8,
    _pad: [u8; 3],
});
/// Fixed head of DRAW_TEXT; a UTF-8 byte string follows (not NUL-terminated
/// on the wire — its length is `header.length - HEADER_LEN - size_of::<DrawTextHead>()`).
payload!(DrawTextHead { window_id: u32, x: i32, y: i32, color_rgba: u32, font_size: u32 });

payload!(SetWindowVisible { window_id: u32, visible: u8, _pad: [u8; 3] });

payload!(RegisterKeybind { keybind_id: u32, modifiers: u32, keycode: u32 });
payload!(UnregisterKeybind { keybind_id: u32 });
payload!(KeybindEvent { keybind_id: u32 });

payload!(WindowCreated { window_id: u32, width: u32, height: u32, decorated: u8, focused: u8, _pad: [u8; 2] });
payload!(WindowDestroyed { window_id: u32 });

payload!(RegisterClickRegion { window_id: u32, region_id: u32, x: i32, y: i32, width: u32, height: u32 });
payload!(UnregisterClickRegion { region_id: u32 });
payload!(ClickRegionEvent { region_id: u32, button: u32, state: u32 });

payload!(RequestScreenCopy { request_id: u32, x: u32, y: u32, width: u32, height: u32 });
/// Fixed head of SCREEN_COPY_DATA; `data_size` bytes of pixel data follow.
payload!(ScreenCopyDataHead { request_id: u32, width: u32, height: u32, format: u32, data_size: u32 });

payload!(SetWindowPosition { window_id: u32, x: i32, y: i32 });
payload!(SetWindowSize { window_id: u32, width: u32, height: u32 });

payload!(SetWindowOpacity { window_id: u32, opacity: f32 });
payload!(SetWindowTransform { window_id: u32, scale_x: f32, scale_y: f32, rotation: f32 });

payload!(QueryWindowPosition { window_id: u32 });
payload!(QueryWindowSize { window_id: u32 });
payload!(QueryWindowAttributes { window_id: u32 });
payload!(WindowPositionData { window_id: u32, x: i32, y: i32 });
payload!(WindowSizeData { window_id: u32, width: u32, height: u32 });
payload!(WindowAttributesData { window_id: u32, visible: u32, opacity: f32, scale_x: f32, scale_y: f32, rotation: f32 });

payload!(SetWindowLayer { window_id: u32, layer: i32 });
payload!(RaiseWindow { window_id: u32 });
payload!(LowerWindow { window_id: u32 });
payload!(SetWindowParent { window_id: u32, parent_id: u32 });

payload!(SetWindowTransform3d {
    window_id: u32,
    translate_x: f32, translate_y: f32, translate_z: f32,
    rotate_x: f32, rotate_y: f32, rotate_z: f32,
    scale_x: f32, scale_y: f32, scale_z: f32,
});
payload!(SetWindowMatrix { window_id: u32, matrix: [f32; 16] });

payload!(SetWindowState { window_id: u32, state: u32 });
payload!(FocusWindow { window_id: u32 });
payload!(BlurWindow { window_id: u32 });

payload!(QueryWindowLayer { window_id: u32 });
payload!(QueryWindowState { window_id: u32 });
payload!(WindowLayerData { window_id: u32, layer: i32, parent_id: u32 });
payload!(WindowStateData { window_id: u32, state: u32, focused: u32 });

payload!(ScreenDimensionsData { total_width: u32, total_height: u32, scale: f32 });

/// Fixed-size monitor descriptor; `MONITORS_DATA`'s tail is `num_monitors` of these.
payload!(MonitorInfo {
    x: i32, y: i32, width: u32, height: u32,
    physical_width: u32, physical_height: u32, refresh_rate: u32, scale: f32,
    enabled: u8, primary: u8, _pad: [u8; 2],
    name: [u8; 32],
});
payload!(MonitorsDataHead { num_monitors: u32 });

payload!(QueryWindowInfo { window_id: u32 });
payload!(WindowInfoData {
    window_id: u32, x: i32, y: i32, width: u32, height: u32,
    visible: u32, layer: i32, parent_id: u32, pid: u32,
});

payload!(SetWindowBlur { window_id: u32, blur_radius: f32, enabled: u8, _pad: [u8; 3] });
/// `equation` is a fixed 256-byte NUL-padded buffer, matching the C struct exactly.
payload!(SetScreenEffect { equation: [u8; 256], enabled: u8, _pad: [u8; 3] });
payload!(SetWindowEffect { window_id: u32, equation: [u8; 256], enabled: u8, _pad: [u8; 3] });

payload!(AnimateWindow {
    window_id: u32, duration_ms: u32,
    target_x: f32, target_y: f32,
    target_scale_x: f32, target_scale_y: f32,
    target_opacity: f32,
    target_translate_x: f32, target_translate_y: f32, target_translate_z: f32,
    target_rotate_x: f32, target_rotate_y: f32, target_rotate_z: f32,
    target_scale_z: f32,
    flags: u32,
});
payload!(StopAnimation { window_id: u32 });

payload!(SetWindowMeshTransform { window_id: u32, mesh_width: u32, mesh_height: u32 });
payload!(ClearWindowMeshTransform { window_id: u32 });
/// Fixed head of UPDATE_WINDOW_MESH_VERTICES; `mesh_width*mesh_height` (x,y)
/// float pairs follow.
payload!(UpdateWindowMeshVerticesHead { window_id: u32 });

payload!(QueryToplevelWindows { visible_only: u8, _pad: [u8; 3] });
payload!(ToplevelWindowsDataHead { num_windows: u32 });
payload!(ToplevelWindowEntry {
    window_id: u32, width: u32, height: u32, visible: u8, focused: u8, _pad: [u8; 2],
});
payload!(SubscribeWindowEvents { mask: u32 });
payload!(UnsubscribeWindowEvents { mask: u32 });
payload!(WindowTitleChanged { window_id: u32 });
payload!(WindowStateChanged { window_id: u32, state: u32 });

payload!(SetWindowDecorations { window_id: u32, decorated: u8, _pad: [u8; 3] });
payload!(RequestWindowDecorations { window_id: u32 });

/// Fixed head of LAUNCH_APP; a shell command string follows as the tail.
payload!(LaunchAppHead { flags: u32 });

/// Safe, bounds-checked view over a fixed payload type `T` from a raw byte
/// slice. Returns `None` (never panics) if `bytes` is shorter than `T`.
pub fn read<T: Pod>(bytes: &[u8]) -> Option<T> {
    bytemuck::try_pod_read_unaligned(bytes.get(..std::mem::size_of::<T>())?).ok()
}

pub fn write<T: Pod>(value: &T) -> Vec<u8> {
    bytemuck::bytes_of(value).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_rect_round_trips() {
        let p = DrawRect { window_id: 7, rect_id: 1, x: 0, y: 0, width: 2, height: 2, color_rgba: 0xFF0000FF };
        let bytes = write(&p);
        let back: DrawRect = read(&bytes).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn short_buffer_returns_none() {
        let bytes = [0u8; 3];
        assert!(read::<DrawRect>(&bytes).is_none());
    }
}
