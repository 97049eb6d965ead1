//! The output-frame tick (spec.md §6 "Output frame callback ticks
//! animations, runs screen effect, commits, then processes screen-copy
//! requests"). `icmi` drives this once per scheduled frame; nothing here
//! touches the network, only `Server` and the `SceneHost` collaborator.

use icm_effect::{run_pixel_effect, Program};
use icm_protocol::message::types;
use icm_protocol::payload::{write, ScreenCopyDataHead};

use crate::animation::tick;
use crate::dispatch::OutFrame;
use crate::registry::Server;
use crate::scene::SceneHost;

fn reparse_if_dirty(enabled: bool, equation: &str, dirty: &mut bool, program: &mut Option<Program>) {
    if !*dirty {
        return;
    }
    *program = if enabled && !equation.is_empty() { Some(Program::parse(equation)) } else { None };
    *dirty = false;
}

/// Advances one output frame: ticks every animating buffer, re-evaluates
/// dirty pixel-effect equations, pushes updated scene state, and answers
/// any screen-copy requests queued since the last frame.
pub fn output_frame(server: &mut Server, scene: &mut dyn SceneHost, now_ms: u64, time_seconds: f64) -> Vec<OutFrame> {
    reparse_if_dirty(
        server.screen_effect_enabled,
        &server.screen_effect_equation,
        &mut server.screen_effect_dirty,
        &mut server.screen_effect_program,
    );

    for buf in &mut server.buffers {
        let was_animating = buf.animation.animating;
        if was_animating {
            tick(buf, now_ms);
        }

        reparse_if_dirty(buf.effect_enabled, &buf.equation, &mut buf.effect_dirty, &mut buf.effect_program);

        if buf.use_effect_buffer {
            if let (Some(program), Some(data)) = (&buf.effect_program, &mut buf.effect_data) {
                data.copy_from_slice(&buf.pixels);
                run_pixel_effect(data, buf.width, buf.height, program, time_seconds);
            }
        }

        if let Some(node) = buf.scene {
            if was_animating {
                scene.set_position(node, buf.x, buf.y);
                scene.set_dest_size(node, buf.width as f32 * buf.scale_x, buf.height as f32 * buf.scale_y);
                scene.set_opacity(node, buf.effective_opacity());
                if buf.has_matrix {
                    scene.set_transform_matrix(node, buf.matrix);
                }
            }
            if was_animating || buf.use_effect_buffer {
                scene.set_buffer(node, buf.presented_pixels(), buf.width, buf.height);
            }
        }
    }

    scene.schedule_frame();

    server
        .screen_copy_requests
        .drain(..)
        .map(|req| {
            let data = scene
                .screen_copy(req.rect.x as u32, req.rect.y as u32, req.rect.width, req.rect.height)
                .unwrap_or_else(|| vec![0u8; (req.rect.width as usize) * (req.rect.height as usize) * 4]);
            let head = ScreenCopyDataHead { request_id: req.id, width: req.rect.width, height: req.rect.height, format: 0, data_size: data.len() as u32 };
            let mut payload_bytes = write(&head);
            payload_bytes.extend_from_slice(&data);
            OutFrame::to(req.owner, types::SCREEN_COPY_DATA, payload_bytes)
        })
        .collect()
}
