use super::blend_pixel;

/// Bresenham line, no anti-aliasing; `thickness` is accepted but ignored
/// (spec.md §4.5 "Line" — "thickness parameter ignored in the reference
/// semantics").
pub fn draw_line(pixels: &mut [u8], width: u32, height: u32, x0: i32, y0: i32, x1: i32, y1: i32, color: u32, _thickness: u32) {
    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut x = x0;
    let mut y = y0;
    loop {
        blend_pixel(pixels, width, height, x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_fills_every_column() {
        let mut pixels = vec![0u8; 5 * 1 * 4];
        draw_line(&mut pixels, 5, 1, 0, 0, 4, 0, 0xFF0000FF, 1);
        for col in 0..5 {
            assert_eq!(pixels[col * 4], 0xFF);
        }
    }

    #[test]
    fn single_point_line_writes_one_pixel() {
        let mut pixels = vec![0u8; 2 * 2 * 4];
        draw_line(&mut pixels, 2, 2, 1, 1, 1, 1, 0x00FF00FF, 1);
        assert_eq!(&pixels[(1 * 2 + 1) * 4..(1 * 2 + 1) * 4 + 4], &[0x00, 0xFF, 0x00, 0xFF]);
    }
}
