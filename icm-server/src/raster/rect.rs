use super::unpack_color;

/// Clamps `(x,y,width,height)` to the buffer and alpha-blends `color` into
/// every covered cell (spec.md §4.5 "Rect fill").
pub fn draw_rect(pixels: &mut [u8], buf_width: u32, buf_height: u32, x: i32, y: i32, width: u32, height: u32, color: u32) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    if x0 as u32 >= buf_width || y0 as u32 >= buf_height {
        return;
    }
    let x1 = ((x + width as i32).max(0) as u32).min(buf_width);
    let y1 = ((y + height as i32).max(0) as u32).min(buf_height);
    if x1 <= x0 as u32 || y1 <= y0 as u32 {
        return;
    }

    let (r, g, b, a) = unpack_color(color);
    for row in y0 as u32..y1 {
        for col in x0 as u32..x1 {
            let idx = ((row * buf_width + col) * 4) as usize;
            if a == 255 {
                pixels[idx] = r;
                pixels[idx + 1] = g;
                pixels[idx + 2] = b;
                pixels[idx + 3] = a;
            } else if a > 0 {
                let alpha = a as f32 / 255.0;
                pixels[idx] = (pixels[idx] as f32 * (1.0 - alpha) + r as f32 * alpha) as u8;
                pixels[idx + 1] = (pixels[idx + 1] as f32 * (1.0 - alpha) + g as f32 * alpha) as u8;
                pixels[idx + 2] = (pixels[idx + 2] as f32 * (1.0 - alpha) + b as f32 * alpha) as u8;
                pixels[idx + 3] = a.max(pixels[idx + 3]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_outside_buffer_changes_nothing() {
        let mut pixels = vec![0u8; 4 * 4 * 4];
        let before = pixels.clone();
        draw_rect(&mut pixels, 4, 4, 10, 10, 2, 2, 0xFF0000FF);
        assert_eq!(pixels, before);
    }

    #[test]
    fn opaque_fill_writes_exact_bytes() {
        let mut pixels = vec![0u8; 4 * 2 * 4];
        draw_rect(&mut pixels, 4, 2, 0, 0, 2, 2, 0xFF0000FF);
        assert_eq!(&pixels[0..4], &[0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(&pixels[4..8], &[0xFF, 0x00, 0x00, 0xFF]);
        assert_eq!(&pixels[16..20], &[0xFF, 0x00, 0x00, 0xFF]); // row 1, col 0
    }
}
