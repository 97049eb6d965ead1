/// Stable wire-contract message type codes (spec.md §6).
///
/// Kept as plain `u16` constants rather than a closed `enum` — new codes can
/// be registered by servers newer than a given client (spec.md §9 "forward
/// compat"), and the dispatcher must skip unknown ones rather than reject
/// the connection.
pub mod types {
    pub const CREATE_WINDOW: u16 = 1;
    pub const DESTROY_WINDOW: u16 = 2;
    pub const SET_WINDOW: u16 = 3;
    pub const SET_LAYER: u16 = 4;
    pub const SET_ATTACHMENTS: u16 = 5;
    pub const DRAW_RECT: u16 = 6;
    pub const CLEAR_RECTS: u16 = 7;

    pub const IMPORT_DMABUF: u16 = 8;
    pub const EXPORT_DMABUF: u16 = 9;

    pub const DRAW_LINE: u16 = 10;
    pub const DRAW_CIRCLE: u16 = 11;
    pub const DRAW_POLYGON: u16 = 12;
    pub const DRAW_IMAGE: u16 = 13;
    pub const BLIT_BUFFER: u16 = 14;

    pub const BATCH_BEGIN: u16 = 15;
    pub const BATCH_END: u16 = 16;

    pub const EXPORT_SURFACE: u16 = 17;
    pub const IMPORT_SURFACE: u16 = 18;

    pub const CREATE_BUFFER: u16 = 19;
    pub const DESTROY_BUFFER: u16 = 20;
    pub const QUERY_BUFFER_INFO: u16 = 21;

    pub const REGISTER_POINTER_EVENT: u16 = 22;
    pub const REGISTER_KEYBOARD_EVENT: u16 = 23;
    pub const QUERY_CAPTURE_MOUSE: u16 = 24;
    pub const QUERY_CAPTURE_KEYBOARD: u16 = 25;

    pub const POINTER_EVENT: u16 = 26;
    pub const KEYBOARD_EVENT: u16 = 27;

    pub const UPLOAD_IMAGE: u16 = 28;
    pub const DESTROY_IMAGE: u16 = 29;
    pub const DRAW_UPLOADED_IMAGE: u16 = 30;
    pub const DRAW_TEXT: u16 = 31;

    pub const SET_WINDOW_VISIBLE: u16 = 32;

    pub const REGISTER_KEYBIND: u16 = 33;
    pub const UNREGISTER_KEYBIND: u16 = 34;
    pub const KEYBIND_EVENT: u16 = 35;

    pub const WINDOW_CREATED: u16 = 36;
    pub const WINDOW_DESTROYED: u16 = 37;

    pub const REGISTER_CLICK_REGION: u16 = 38;
    pub const UNREGISTER_CLICK_REGION: u16 = 39;
    pub const CLICK_REGION_EVENT: u16 = 40;

    pub const REQUEST_SCREEN_COPY: u16 = 41;
    pub const SCREEN_COPY_DATA: u16 = 42;

    pub const REGISTER_GLOBAL_POINTER_EVENT: u16 = 43;
    pub const REGISTER_GLOBAL_KEYBOARD_EVENT: u16 = 44;
    pub const REGISTER_GLOBAL_CAPTURE_MOUSE: u16 = 45;
    pub const REGISTER_GLOBAL_CAPTURE_KEYBOARD: u16 = 46;

    pub const SET_WINDOW_POSITION: u16 = 47;
    pub const SET_WINDOW_SIZE: u16 = 48;

    pub const SET_WINDOW_OPACITY: u16 = 49;
    pub const SET_WINDOW_TRANSFORM: u16 = 50;

    pub const COMPOSITOR_SHUTDOWN: u16 = 51;

    pub const QUERY_WINDOW_POSITION: u16 = 52;
    pub const QUERY_WINDOW_SIZE: u16 = 53;
    pub const QUERY_WINDOW_ATTRIBUTES: u16 = 54;
    pub const WINDOW_POSITION_DATA: u16 = 55;
    pub const WINDOW_SIZE_DATA: u16 = 56;
    pub const WINDOW_ATTRIBUTES_DATA: u16 = 57;

    pub const UNREGISTER_GLOBAL_CAPTURE_KEYBOARD: u16 = 58;
    pub const UNREGISTER_GLOBAL_CAPTURE_MOUSE: u16 = 59;

    pub const SET_WINDOW_LAYER: u16 = 60;
    pub const RAISE_WINDOW: u16 = 61;
    pub const LOWER_WINDOW: u16 = 62;
    pub const SET_WINDOW_PARENT: u16 = 63;

    pub const SET_WINDOW_TRANSFORM_3D: u16 = 64;
    pub const SET_WINDOW_MATRIX: u16 = 65;

    pub const SET_WINDOW_STATE: u16 = 66;
    pub const FOCUS_WINDOW: u16 = 67;

    pub const QUERY_WINDOW_LAYER: u16 = 68;
    pub const QUERY_WINDOW_STATE: u16 = 69;
    pub const WINDOW_LAYER_DATA: u16 = 70;
    pub const WINDOW_STATE_DATA: u16 = 71;

    pub const QUERY_SCREEN_DIMENSIONS: u16 = 72;
    pub const SCREEN_DIMENSIONS_DATA: u16 = 73;
    pub const QUERY_MONITORS: u16 = 74;
    pub const MONITORS_DATA: u16 = 75;

    pub const QUERY_WINDOW_INFO: u16 = 76;
    pub const WINDOW_INFO_DATA: u16 = 77;

    pub const SET_WINDOW_BLUR: u16 = 78;
    pub const SET_SCREEN_EFFECT: u16 = 79;
    pub const SET_WINDOW_EFFECT: u16 = 80;

    pub const ANIMATE_WINDOW: u16 = 81;
    pub const STOP_ANIMATION: u16 = 82;
    pub const BLUR_WINDOW: u16 = 83;

    pub const SET_WINDOW_MESH_TRANSFORM: u16 = 84;
    pub const CLEAR_WINDOW_MESH_TRANSFORM: u16 = 85;
    pub const UPDATE_WINDOW_MESH_VERTICES: u16 = 86;

    pub const QUERY_TOPLEVEL_WINDOWS: u16 = 87;
    pub const TOPLEVEL_WINDOWS_DATA: u16 = 88;
    pub const SUBSCRIBE_WINDOW_EVENTS: u16 = 89;
    pub const UNSUBSCRIBE_WINDOW_EVENTS: u16 = 90;

    pub const WINDOW_TITLE_CHANGED: u16 = 91;
    pub const WINDOW_STATE_CHANGED: u16 = 92;

    pub const SET_WINDOW_DECORATIONS: u16 = 93;
    pub const REQUEST_WINDOW_DECORATIONS: u16 = 94;

    pub const LAUNCH_APP: u16 = 95;
}

/// Returns a short debug name for a message type, if it is registered.
/// Used only for logging — never part of the wire contract.
pub fn type_name(t: u16) -> &'static str {
    use types::*;
    match t {
        CREATE_WINDOW => "CREATE_WINDOW",
        DESTROY_WINDOW => "DESTROY_WINDOW",
        SET_WINDOW => "SET_WINDOW",
        SET_LAYER => "SET_LAYER",
        SET_ATTACHMENTS => "SET_ATTACHMENTS",
        DRAW_RECT => "DRAW_RECT",
        CLEAR_RECTS => "CLEAR_RECTS",
        IMPORT_DMABUF => "IMPORT_DMABUF",
        EXPORT_DMABUF => "EXPORT_DMABUF",
        DRAW_LINE => "DRAW_LINE",
        DRAW_CIRCLE => "DRAW_CIRCLE",
        DRAW_POLYGON => "DRAW_POLYGON",
        DRAW_IMAGE => "DRAW_IMAGE",
        BLIT_BUFFER => "BLIT_BUFFER",
        BATCH_BEGIN => "BATCH_BEGIN",
        BATCH_END => "BATCH_END",
        EXPORT_SURFACE => "EXPORT_SURFACE",
        IMPORT_SURFACE => "IMPORT_SURFACE",
        CREATE_BUFFER => "CREATE_BUFFER",
        DESTROY_BUFFER => "DESTROY_BUFFER",
        QUERY_BUFFER_INFO => "QUERY_BUFFER_INFO",
        REGISTER_POINTER_EVENT => "REGISTER_POINTER_EVENT",
        REGISTER_KEYBOARD_EVENT => "REGISTER_KEYBOARD_EVENT",
        QUERY_CAPTURE_MOUSE => "QUERY_CAPTURE_MOUSE",
        QUERY_CAPTURE_KEYBOARD => "QUERY_CAPTURE_KEYBOARD",
        POINTER_EVENT => "POINTER_EVENT",
        KEYBOARD_EVENT => "KEYBOARD_EVENT",
        UPLOAD_IMAGE => "UPLOAD_IMAGE",
        DESTROY_IMAGE => "DESTROY_IMAGE",
        DRAW_UPLOADED_IMAGE => "DRAW_UPLOADED_IMAGE",
        DRAW_TEXT => "DRAW_TEXT",
        SET_WINDOW_VISIBLE => "SET_WINDOW_VISIBLE",
        REGISTER_KEYBIND => "REGISTER_KEYBIND",
        UNREGISTER_KEYBIND => "UNREGISTER_KEYBIND",
        KEYBIND_EVENT => "KEYBIND_EVENT",
        WINDOW_CREATED => "WINDOW_CREATED",
        WINDOW_DESTROYED => "WINDOW_DESTROYED",
        REGISTER_CLICK_REGION => "REGISTER_CLICK_REGION",
        UNREGISTER_CLICK_REGION => "UNREGISTER_CLICK_REGION",
        CLICK_REGION_EVENT => "CLICK_REGION_EVENT",
        REQUEST_SCREEN_COPY => "REQUEST_SCREEN_COPY",
        SCREEN_COPY_DATA => "SCREEN_COPY_DATA",
        REGISTER_GLOBAL_POINTER_EVENT => "REGISTER_GLOBAL_POINTER_EVENT",
        REGISTER_GLOBAL_KEYBOARD_EVENT => "REGISTER_GLOBAL_KEYBOARD_EVENT",
        REGISTER_GLOBAL_CAPTURE_MOUSE => "REGISTER_GLOBAL_CAPTURE_MOUSE",
        REGISTER_GLOBAL_CAPTURE_KEYBOARD => "REGISTER_GLOBAL_CAPTURE_KEYBOARD",
        SET_WINDOW_POSITION => "SET_WINDOW_POSITION",
        SET_WINDOW_SIZE => "SET_WINDOW_SIZE",
        SET_WINDOW_OPACITY => "SET_WINDOW_OPACITY",
        SET_WINDOW_TRANSFORM => "SET_WINDOW_TRANSFORM",
        COMPOSITOR_SHUTDOWN => "COMPOSITOR_SHUTDOWN",
        QUERY_WINDOW_POSITION => "QUERY_WINDOW_POSITION",
        QUERY_WINDOW_SIZE => "QUERY_WINDOW_SIZE",
        QUERY_WINDOW_ATTRIBUTES => "QUERY_WINDOW_ATTRIBUTES",
        WINDOW_POSITION_DATA => "WINDOW_POSITION_DATA",
        WINDOW_SIZE_DATA => "WINDOW_SIZE_DATA",
        WINDOW_ATTRIBUTES_DATA => "WINDOW_ATTRIBUTES_DATA",
        UNREGISTER_GLOBAL_CAPTURE_KEYBOARD => "UNREGISTER_GLOBAL_CAPTURE_KEYBOARD",
        UNREGISTER_GLOBAL_CAPTURE_MOUSE => "UNREGISTER_GLOBAL_CAPTURE_MOUSE",
        SET_WINDOW_LAYER => "SET_WINDOW_LAYER",
        RAISE_WINDOW => "RAISE_WINDOW",
        LOWER_WINDOW => "LOWER_WINDOW",
        SET_WINDOW_PARENT => "SET_WINDOW_PARENT",
        SET_WINDOW_TRANSFORM_3D => "SET_WINDOW_TRANSFORM_3D",
        SET_WINDOW_MATRIX => "SET_WINDOW_MATRIX",
        SET_WINDOW_STATE => "SET_WINDOW_STATE",
        FOCUS_WINDOW => "FOCUS_WINDOW",
        QUERY_WINDOW_LAYER => "QUERY_WINDOW_LAYER",
        QUERY_WINDOW_STATE => "QUERY_WINDOW_STATE",
        WINDOW_LAYER_DATA => "WINDOW_LAYER_DATA",
        WINDOW_STATE_DATA => "WINDOW_STATE_DATA",
        QUERY_SCREEN_DIMENSIONS => "QUERY_SCREEN_DIMENSIONS",
        SCREEN_DIMENSIONS_DATA => "SCREEN_DIMENSIONS_DATA",
        QUERY_MONITORS => "QUERY_MONITORS",
        MONITORS_DATA => "MONITORS_DATA",
        QUERY_WINDOW_INFO => "QUERY_WINDOW_INFO",
        WINDOW_INFO_DATA => "WINDOW_INFO_DATA",
        SET_WINDOW_BLUR => "SET_WINDOW_BLUR",
        SET_SCREEN_EFFECT => "SET_SCREEN_EFFECT",
        SET_WINDOW_EFFECT => "SET_WINDOW_EFFECT",
        ANIMATE_WINDOW => "ANIMATE_WINDOW",
        STOP_ANIMATION => "STOP_ANIMATION",
        BLUR_WINDOW => "BLUR_WINDOW",
        SET_WINDOW_MESH_TRANSFORM => "SET_WINDOW_MESH_TRANSFORM",
        CLEAR_WINDOW_MESH_TRANSFORM => "CLEAR_WINDOW_MESH_TRANSFORM",
        UPDATE_WINDOW_MESH_VERTICES => "UPDATE_WINDOW_MESH_VERTICES",
        QUERY_TOPLEVEL_WINDOWS => "QUERY_TOPLEVEL_WINDOWS",
        TOPLEVEL_WINDOWS_DATA => "TOPLEVEL_WINDOWS_DATA",
        SUBSCRIBE_WINDOW_EVENTS => "SUBSCRIBE_WINDOW_EVENTS",
        UNSUBSCRIBE_WINDOW_EVENTS => "UNSUBSCRIBE_WINDOW_EVENTS",
        WINDOW_TITLE_CHANGED => "WINDOW_TITLE_CHANGED",
        WINDOW_STATE_CHANGED => "WINDOW_STATE_CHANGED",
        SET_WINDOW_DECORATIONS => "SET_WINDOW_DECORATIONS",
        REQUEST_WINDOW_DECORATIONS => "REQUEST_WINDOW_DECORATIONS",
        LAUNCH_APP => "LAUNCH_APP",
        _ => "UNKNOWN",
    }
}
