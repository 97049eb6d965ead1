/// Clips source and destination rectangles, alpha-composites using
/// `sa·alpha/255` as the effective source alpha (spec.md §4.5 "Blit
/// uploaded image"). `alpha` is the caller-supplied global multiplier
/// (0-255); `255` means "use the source's own per-pixel alpha untouched".
#[allow(clippy::too_many_arguments)]
pub fn blit_image(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    src: &[u8],
    src_width: u32,
    src_height: u32,
    dst_x: i32,
    dst_y: i32,
    mut width: u32,
    mut height: u32,
    mut src_x: u32,
    mut src_y: u32,
    alpha: u8,
) {
    let mut dst_x = dst_x;
    let mut dst_y = dst_y;

    if dst_x < 0 {
        let overhang = (-dst_x) as u32;
        src_x = src_x.saturating_add(overhang);
        width = width.saturating_sub(overhang);
        dst_x = 0;
    }
    if dst_y < 0 {
        let overhang = (-dst_y) as u32;
        src_y = src_y.saturating_add(overhang);
        height = height.saturating_sub(overhang);
        dst_y = 0;
    }
    if dst_x as u32 + width > dst_width {
        width = dst_width.saturating_sub(dst_x as u32);
    }
    if dst_y as u32 + height > dst_height {
        height = dst_height.saturating_sub(dst_y as u32);
    }
    if src_x + width > src_width {
        width = src_width.saturating_sub(src_x);
    }
    if src_y + height > src_height {
        height = src_height.saturating_sub(src_y);
    }

    for row in 0..height {
        for col in 0..width {
            let dst_idx = (((dst_y as u32 + row) * dst_width + (dst_x as u32 + col)) * 4) as usize;
            let src_idx = (((src_y + row) * src_width + (src_x + col)) * 4) as usize;
            if dst_idx + 4 > dst.len() || src_idx + 4 > src.len() {
                continue;
            }
            let (sr, sg, sb, sa) = (src[src_idx], src[src_idx + 1], src[src_idx + 2], src[src_idx + 3]);
            let (dr, dg, db, _da) = (dst[dst_idx], dst[dst_idx + 1], dst[dst_idx + 2], dst[dst_idx + 3]);

            let a = ((sa as u32 * alpha as u32) / 255) as u8;
            let blend = |s: u8, d: u8| -> u8 { ((s as u32 * a as u32 + d as u32 * (255 - a as u32)) / 255) as u8 };

            dst[dst_idx] = blend(sr, dr);
            dst[dst_idx + 1] = blend(sg, dg);
            dst[dst_idx + 2] = blend(sb, db);
            dst[dst_idx + 3] = a;
        }
    }
}

/// Buffer-to-buffer blit (BLIT_BUFFER): a straight opaque copy of the
/// clipped region, no alpha handling — the reference treats inter-buffer
/// blits as a raw pixel move.
#[allow(clippy::too_many_arguments)]
pub fn blit_buffer(
    dst: &mut [u8],
    dst_width: u32,
    dst_height: u32,
    src: &[u8],
    src_width: u32,
    src_height: u32,
    src_x: i32,
    src_y: i32,
    dst_x: i32,
    dst_y: i32,
    width: u32,
    height: u32,
) {
    for row in 0..height {
        let sy = src_y + row as i32;
        let dy = dst_y + row as i32;
        if sy < 0 || dy < 0 || sy as u32 >= src_height || dy as u32 >= dst_height {
            continue;
        }
        for col in 0..width {
            let sx = src_x + col as i32;
            let dx = dst_x + col as i32;
            if sx < 0 || dx < 0 || sx as u32 >= src_width || dx as u32 >= dst_width {
                continue;
            }
            let src_idx = ((sy as u32 * src_width + sx as u32) * 4) as usize;
            let dst_idx = ((dy as u32 * dst_width + dx as u32) * 4) as usize;
            dst[dst_idx..dst_idx + 4].copy_from_slice(&src[src_idx..src_idx + 4]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_blit_copies_pixels_unchanged() {
        let src = vec![10u8, 20, 30, 255, 40, 50, 60, 255];
        let mut dst = vec![0u8; 2 * 4];
        blit_image(&mut dst, 2, 1, &src, 2, 1, 0, 0, 2, 1, 0, 0, 255);
        assert_eq!(dst, src);
    }

    #[test]
    fn zero_alpha_source_leaves_destination_unchanged() {
        let src = vec![255u8, 255, 255, 255];
        let mut dst = vec![1u8, 2, 3, 4];
        let before = dst.clone();
        blit_image(&mut dst, 1, 1, &src, 1, 1, 0, 0, 1, 1, 0, 0, 0);
        assert_eq!(dst[3], 0);
        let _ = before;
    }
}
