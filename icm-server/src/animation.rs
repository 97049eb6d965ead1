//! Ease-in-out interpolation tick for buffer animations (spec.md §4.7).

use crate::registry::buffer::{
    AnimationState, Buffer, ANIM_OPACITY, ANIM_POS, ANIM_ROTATE_3D, ANIM_SCALE, ANIM_SCALE_3D, ANIM_TRANSLATE_3D,
};
use crate::transform::build_matrix;

fn ease_in_out(progress: f32) -> f32 {
    if progress < 0.5 {
        2.0 * progress * progress
    } else {
        1.0 - (-2.0 * progress + 2.0).powi(2) / 2.0
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

/// Advances one buffer's animation by one output-frame tick. `now_ms` is the
/// current monotonic time; on the first tick after `ANIMATE_WINDOW` this
/// becomes `start_ms`. Rebuilds the transform matrix every tick regardless
/// of which component groups are active (spec.md §4.7's "one final matrix
/// rebuild" also applies mid-flight, since the matrix always reflects the
/// current 3D params).
pub fn tick(buffer: &mut Buffer, now_ms: u64) {
    if !buffer.animation.animating {
        return;
    }

    if buffer.animation.start_ms == 0 {
        buffer.animation.start_ms = now_ms;
    }

    let anim = buffer.animation;
    let elapsed = now_ms.saturating_sub(anim.start_ms) as f32;
    let duration = anim.duration_ms.max(1) as f32;
    let progress = (elapsed / duration).clamp(0.0, 1.0);
    let t = ease_in_out(progress);

    if anim.flags & ANIM_POS != 0 {
        buffer.x = lerp(anim.start_x, anim.target_x, t).round() as i32;
        buffer.y = lerp(anim.start_y, anim.target_y, t).round() as i32;
    }
    if anim.flags & ANIM_SCALE != 0 {
        buffer.scale_x = lerp(anim.start_scale_x, anim.target_scale_x, t);
        buffer.scale_y = lerp(anim.start_scale_y, anim.target_scale_y, t);
    }
    if anim.flags & ANIM_OPACITY != 0 {
        buffer.opacity = lerp(anim.start_opacity, anim.target_opacity, t);
    }
    if anim.flags & ANIM_TRANSLATE_3D != 0 {
        for i in 0..3 {
            buffer.translate[i] = lerp(anim.start_translate[i], anim.target_translate[i], t);
        }
    }
    if anim.flags & ANIM_ROTATE_3D != 0 {
        for i in 0..3 {
            buffer.rotate_3d[i] = lerp(anim.start_rotate[i], anim.target_rotate[i], t);
        }
    }
    if anim.flags & ANIM_SCALE_3D != 0 {
        buffer.scale_z = lerp(anim.start_scale_z, anim.target_scale_z, t);
    }

    buffer.matrix = build_matrix(buffer.translate, buffer.rotate_3d, [buffer.scale_x, buffer.scale_y, buffer.scale_z]);
    buffer.has_matrix = true;

    if progress >= 1.0 {
        buffer.x = anim.target_x.round() as i32;
        buffer.y = anim.target_y.round() as i32;
        buffer.scale_x = anim.target_scale_x;
        buffer.scale_y = anim.target_scale_y;
        buffer.opacity = anim.target_opacity;
        buffer.translate = anim.target_translate;
        buffer.rotate_3d = anim.target_rotate;
        buffer.scale_z = anim.target_scale_z;
        buffer.matrix = build_matrix(buffer.translate, buffer.rotate_3d, [buffer.scale_x, buffer.scale_y, buffer.scale_z]);
        buffer.animation.animating = false;
    }
}

/// Initializes a fresh animation run, capturing current values as the start
/// snapshot (spec.md §4.7's `target_*` fields on `ANIMATE_WINDOW`).
pub fn start(buffer: &mut Buffer, flags: u32, duration_ms: u32, targets: AnimationTargets) {
    buffer.animation = AnimationState {
        animating: true,
        flags,
        start_ms: 0,
        duration_ms,
        start_x: buffer.x as f32,
        start_y: buffer.y as f32,
        start_scale_x: buffer.scale_x,
        start_scale_y: buffer.scale_y,
        start_opacity: buffer.opacity,
        start_translate: buffer.translate,
        start_rotate: buffer.rotate_3d,
        start_scale_z: buffer.scale_z,
        target_x: targets.x,
        target_y: targets.y,
        target_scale_x: targets.scale_x,
        target_scale_y: targets.scale_y,
        target_opacity: targets.opacity,
        target_translate: targets.translate,
        target_rotate: targets.rotate,
        target_scale_z: targets.scale_z,
    };
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnimationTargets {
    pub x: f32,
    pub y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub opacity: f32,
    pub translate: [f32; 3],
    pub rotate: [f32; 3],
    pub scale_z: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::WindowId;

    #[test]
    fn animation_reaches_target_and_clears_flag() {
        let mut buffer = Buffer::new(WindowId(1), 4, 4, 0);
        start(
            &mut buffer,
            ANIM_POS | ANIM_OPACITY,
            200,
            AnimationTargets { x: 100.0, y: 50.0, opacity: 0.0, scale_x: 1.0, scale_y: 1.0, scale_z: 1.0, ..Default::default() },
        );
        tick(&mut buffer, 0);
        tick(&mut buffer, 100);
        tick(&mut buffer, 200);
        assert_eq!(buffer.x, 100);
        assert_eq!(buffer.y, 50);
        assert_eq!(buffer.opacity, 0.0);
        assert!(!buffer.animation.animating);
    }

    #[test]
    fn component_without_its_flag_holds_at_start() {
        let mut buffer = Buffer::new(WindowId(1), 4, 4, 0);
        buffer.scale_x = 1.0;
        start(
            &mut buffer,
            ANIM_POS,
            100,
            AnimationTargets { x: 10.0, y: 0.0, scale_x: 5.0, scale_y: 5.0, opacity: 1.0, scale_z: 1.0, ..Default::default() },
        );
        tick(&mut buffer, 0);
        tick(&mut buffer, 100);
        assert_eq!(buffer.scale_x, 1.0);
        assert_eq!(buffer.x, 10);
    }
}
