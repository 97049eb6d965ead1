//! Server-side title bar and border drawing (spec.md §4.5 "Decoration
//! renderer"), grounded on `render_window_decorations` in the reference
//! implementation: a title bar strip across the top, then a border frame,
//! skipping the region the title bar already covers.

use crate::raster::draw_rect;
use crate::registry::Buffer;
use icm_config::DecorationDefaults;

/// Repaints `buffer`'s decoration into its own pixel array using
/// `defaults`, picking the focused/unfocused color by `buffer.focused`.
/// A no-op if decorations are disabled or both measurements are zero.
pub fn render(buffer: &mut Buffer, defaults: &DecorationDefaults) {
    if !defaults.enabled || !buffer.decorated {
        return;
    }
    if defaults.border_width == 0 && defaults.title_height == 0 {
        return;
    }

    let color = if buffer.focused { defaults.color_focused } else { defaults.color_unfocused };
    let width = buffer.width;
    let height = buffer.height;

    if defaults.title_height > 0 {
        draw_rect(&mut buffer.pixels, width, height, 0, 0, width, defaults.title_height, color);
    }

    if defaults.border_width > 0 {
        let bw = defaults.border_width;
        if defaults.title_height == 0 {
            draw_rect(&mut buffer.pixels, width, height, 0, 0, width, bw, color);
        }
        draw_rect(&mut buffer.pixels, width, height, 0, height.saturating_sub(bw) as i32, width, bw, color);
        draw_rect(&mut buffer.pixels, width, height, 0, 0, bw, height, color);
        draw_rect(&mut buffer.pixels, width, height, width.saturating_sub(bw) as i32, 0, bw, height, color);
    }

    buffer.dirty = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::WindowId;

    #[test]
    fn disabled_decorations_leave_pixels_untouched() {
        let mut buffer = Buffer::new(WindowId(1), 10, 10, 0);
        buffer.decorated = true;
        let before = buffer.pixels.clone();
        render(&mut buffer, &DecorationDefaults { enabled: false, ..DecorationDefaults::default() });
        assert_eq!(buffer.pixels, before);
    }

    #[test]
    fn title_bar_paints_top_rows() {
        let mut buffer = Buffer::new(WindowId(1), 10, 10, 0);
        buffer.decorated = true;
        let defaults = DecorationDefaults { title_height: 2, border_width: 0, ..DecorationDefaults::default() };
        render(&mut buffer, &defaults);
        assert_eq!(buffer.pixels[3], defaults.color_unfocused as u8 & 0xFF);
        assert!(buffer.dirty);
    }
}
