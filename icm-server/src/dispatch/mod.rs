//! Dispatches one decoded frame to the handler for its `msg_type`, grounded
//! on the `switch (header.type)` in `handle_message` in the reference
//! server. Each handler group lives in its own module, split along the same
//! lines as the message registry in spec.md §6.

pub mod batch;
pub mod buffer;
pub mod decoration_launch;
pub mod draw;
pub mod effect_anim;
pub mod input;
pub mod keybind_region;
pub mod query;
pub mod window;

use std::os::fd::OwnedFd;

use icm_protocol::header::Header;
use icm_protocol::message::types;

use crate::error::DispatchError;
use crate::registry::{ClientId, Server};
use crate::scene::SceneHost;

/// Who an outbound frame is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Client(ClientId),
    Broadcast,
    AllExcept(ClientId),
}

/// A message a handler wants sent out, queued for `crate::connection` to
/// actually write to the right socket(s).
#[derive(Debug)]
pub struct OutFrame {
    pub recipient: Recipient,
    pub msg_type: u16,
    pub payload: Vec<u8>,
    pub fds: Vec<OwnedFd>,
}

impl OutFrame {
    pub fn to(recipient: ClientId, msg_type: u16, payload: Vec<u8>) -> OutFrame {
        OutFrame { recipient: Recipient::Client(recipient), msg_type, payload, fds: Vec::new() }
    }

    pub fn broadcast(msg_type: u16, payload: Vec<u8>) -> OutFrame {
        OutFrame { recipient: Recipient::Broadcast, msg_type, payload, fds: Vec::new() }
    }

    pub fn with_fds(mut self, fds: Vec<OwnedFd>) -> OutFrame {
        self.fds = fds;
        self
    }
}

/// Borrowed handles a handler needs: the registry, the scene-host
/// collaborator, and which client sent the frame being handled.
pub struct Ctx<'a> {
    pub server: &'a mut Server,
    pub scene: &'a mut dyn SceneHost,
    pub client: ClientId,
}

/// Routes one frame to its handler. `fds` are the out-of-band descriptors
/// that arrived with the frame (only `IMPORT_DMABUF` currently consumes
/// them). Returns the out-bound frames the handler produced; a
/// `DispatchError` is always local to this one message (spec.md §7) and
/// never tears down the connection.
pub fn dispatch(ctx: &mut Ctx, header: &Header, payload: &[u8], fds: Vec<OwnedFd>) -> Result<Vec<OutFrame>, DispatchError> {
    use types::*;

    match header.msg_type {
        CREATE_WINDOW => window::create_window(ctx, payload),
        DESTROY_WINDOW => window::destroy_window(ctx, payload),
        SET_WINDOW => window::set_window(ctx, payload),
        SET_LAYER => window::set_layer(ctx, payload),
        SET_ATTACHMENTS => Err(DispatchError::Unsupported(SET_ATTACHMENTS)),

        DRAW_RECT => draw::draw_rect(ctx, payload),
        CLEAR_RECTS => draw::clear_rects(ctx, payload),
        DRAW_LINE => draw::draw_line(ctx, payload),
        DRAW_CIRCLE => draw::draw_circle(ctx, payload),
        DRAW_POLYGON => draw::draw_polygon(ctx, payload),
        DRAW_IMAGE => draw::draw_image(ctx, payload),
        BLIT_BUFFER => draw::blit_buffer(ctx, payload),
        DRAW_TEXT => draw::draw_text(ctx, payload),

        IMPORT_DMABUF => buffer::import_dmabuf(ctx, payload, fds),
        EXPORT_DMABUF => buffer::export_dmabuf(ctx, payload),

        BATCH_BEGIN => batch::batch_begin(ctx, payload),
        BATCH_END => batch::batch_end(ctx, payload),

        EXPORT_SURFACE => buffer::export_surface(ctx, payload),
        IMPORT_SURFACE => buffer::import_surface(ctx, payload),

        CREATE_BUFFER => buffer::create_buffer(ctx, payload),
        DESTROY_BUFFER => buffer::destroy_buffer(ctx, payload),
        QUERY_BUFFER_INFO => query::query_buffer_info(ctx, payload),

        REGISTER_POINTER_EVENT => input::register_pointer_event(ctx, payload),
        REGISTER_KEYBOARD_EVENT => input::register_keyboard_event(ctx, payload),
        QUERY_CAPTURE_MOUSE => query::query_capture_mouse(ctx, payload),
        QUERY_CAPTURE_KEYBOARD => query::query_capture_keyboard(ctx, payload),
        REGISTER_GLOBAL_POINTER_EVENT => input::register_global_pointer_event(ctx),
        REGISTER_GLOBAL_KEYBOARD_EVENT => input::register_global_keyboard_event(ctx),
        REGISTER_GLOBAL_CAPTURE_MOUSE => input::register_global_capture_mouse(ctx),
        REGISTER_GLOBAL_CAPTURE_KEYBOARD => input::register_global_capture_keyboard(ctx),
        UNREGISTER_GLOBAL_CAPTURE_MOUSE => input::unregister_global_capture_mouse(ctx),
        UNREGISTER_GLOBAL_CAPTURE_KEYBOARD => input::unregister_global_capture_keyboard(ctx),

        UPLOAD_IMAGE => buffer::upload_image(ctx, payload),
        DESTROY_IMAGE => buffer::destroy_image(ctx, payload),
        DRAW_UPLOADED_IMAGE => draw::draw_uploaded_image(ctx, payload),

        SET_WINDOW_VISIBLE => window::set_window_visible(ctx, payload),

        REGISTER_KEYBIND => keybind_region::register_keybind(ctx, payload),
        UNREGISTER_KEYBIND => keybind_region::unregister_keybind(ctx, payload),

        REGISTER_CLICK_REGION => keybind_region::register_click_region(ctx, payload),
        UNREGISTER_CLICK_REGION => keybind_region::unregister_click_region(ctx, payload),

        REQUEST_SCREEN_COPY => query::request_screen_copy(ctx, payload),

        SET_WINDOW_POSITION => window::set_window_position(ctx, payload),
        SET_WINDOW_SIZE => window::set_window_size(ctx, payload),
        SET_WINDOW_OPACITY => window::set_window_opacity(ctx, payload),
        SET_WINDOW_TRANSFORM => window::set_window_transform(ctx, payload),

        COMPOSITOR_SHUTDOWN => Ok(vec![OutFrame::broadcast(COMPOSITOR_SHUTDOWN, Vec::new())]),

        QUERY_WINDOW_POSITION => query::query_window_position(ctx, payload),
        QUERY_WINDOW_SIZE => query::query_window_size(ctx, payload),
        QUERY_WINDOW_ATTRIBUTES => query::query_window_attributes(ctx, payload),

        SET_WINDOW_LAYER => window::set_window_layer(ctx, payload),
        RAISE_WINDOW => window::raise_window(ctx, payload),
        LOWER_WINDOW => window::lower_window(ctx, payload),
        SET_WINDOW_PARENT => window::set_window_parent(ctx, payload),

        SET_WINDOW_TRANSFORM_3D => window::set_window_transform_3d(ctx, payload),
        SET_WINDOW_MATRIX => window::set_window_matrix(ctx, payload),

        SET_WINDOW_STATE => window::set_window_state(ctx, payload),
        FOCUS_WINDOW => window::focus_window(ctx, payload),

        QUERY_WINDOW_LAYER => query::query_window_layer(ctx, payload),
        QUERY_WINDOW_STATE => query::query_window_state(ctx, payload),

        QUERY_SCREEN_DIMENSIONS => query::query_screen_dimensions(ctx),
        QUERY_MONITORS => query::query_monitors(ctx),

        QUERY_WINDOW_INFO => query::query_window_info(ctx, payload),

        SET_WINDOW_BLUR => effect_anim::set_window_blur(ctx, payload),
        SET_SCREEN_EFFECT => effect_anim::set_screen_effect(ctx, payload),
        SET_WINDOW_EFFECT => effect_anim::set_window_effect(ctx, payload),

        ANIMATE_WINDOW => effect_anim::animate_window(ctx, payload),
        STOP_ANIMATION => effect_anim::stop_animation(ctx, payload),
        BLUR_WINDOW => effect_anim::blur_window(ctx, payload),

        SET_WINDOW_MESH_TRANSFORM => effect_anim::set_window_mesh_transform(ctx, payload),
        CLEAR_WINDOW_MESH_TRANSFORM => effect_anim::clear_window_mesh_transform(ctx, payload),
        UPDATE_WINDOW_MESH_VERTICES => effect_anim::update_window_mesh_vertices(ctx, payload),

        QUERY_TOPLEVEL_WINDOWS => query::query_toplevel_windows(ctx, payload),
        SUBSCRIBE_WINDOW_EVENTS => input::subscribe_window_events(ctx, payload),
        UNSUBSCRIBE_WINDOW_EVENTS => input::unsubscribe_window_events(ctx, payload),

        SET_WINDOW_DECORATIONS => decoration_launch::set_window_decorations(ctx, payload),
        REQUEST_WINDOW_DECORATIONS => decoration_launch::request_window_decorations(ctx, payload),

        LAUNCH_APP => decoration_launch::launch_app(ctx, payload),

        other => Err(DispatchError::Unsupported(other)),
    }
}
