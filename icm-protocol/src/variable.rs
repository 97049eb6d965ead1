//! Helpers for the variable-length message types: a fixed head (see
//! `crate::payload`) followed by a tail whose length is implied by the
//! frame's total `length` minus header and head sizes.

use bytemuck::Pod;

/// A point pair as carried in a DRAW_POLYGON tail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

pub fn decode_points(tail: &[u8]) -> Vec<Point> {
    tail.chunks_exact(8)
        .map(|c| Point {
            x: i32::from_le_bytes(c[0..4].try_into().unwrap()),
            y: i32::from_le_bytes(c[4..8].try_into().unwrap()),
        })
        .collect()
}

pub fn encode_points(points: &[Point]) -> Vec<u8> {
    let mut out = Vec::with_capacity(points.len() * 8);
    for p in points {
        out.extend_from_slice(&p.x.to_le_bytes());
        out.extend_from_slice(&p.y.to_le_bytes());
    }
    out
}

/// A vertex offset as carried in an UPDATE_WINDOW_MESH_VERTICES tail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshVertex {
    pub x: f32,
    pub y: f32,
}

pub fn decode_mesh_vertices(tail: &[u8]) -> Vec<MeshVertex> {
    tail.chunks_exact(8)
        .map(|c| MeshVertex {
            x: f32::from_le_bytes(c[0..4].try_into().unwrap()),
            y: f32::from_le_bytes(c[4..8].try_into().unwrap()),
        })
        .collect()
}

pub fn encode_mesh_vertices(vertices: &[MeshVertex]) -> Vec<u8> {
    let mut out = Vec::with_capacity(vertices.len() * 8);
    for v in vertices {
        out.extend_from_slice(&v.x.to_le_bytes());
        out.extend_from_slice(&v.y.to_le_bytes());
    }
    out
}

/// Decodes a fixed array of `Pod` records packed back-to-back (monitors,
/// toplevel windows).
pub fn decode_records<T: Pod>(tail: &[u8], count: usize) -> Vec<T> {
    let size = std::mem::size_of::<T>();
    (0..count)
        .filter_map(|i| tail.get(i * size..(i + 1) * size))
        .filter_map(|chunk| bytemuck::try_pod_read_unaligned(chunk).ok())
        .collect()
}

pub fn encode_records<T: Pod>(records: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * std::mem::size_of::<T>());
    for r in records {
        out.extend_from_slice(bytemuck::bytes_of(r));
    }
    out
}

/// Decodes a UTF-8 tail (DRAW_TEXT, LAUNCH_APP), lossily replacing invalid
/// sequences rather than failing the whole frame.
pub fn decode_text(tail: &[u8]) -> String {
    String::from_utf8_lossy(tail).into_owned()
}

/// Truncates or NUL-pads an equation string into the wire's fixed 256-byte
/// buffer, matching `struct icm_msg_set_screen_effect`.
pub fn pack_equation(text: &str) -> [u8; 256] {
    let mut buf = [0u8; 256];
    let bytes = text.as_bytes();
    let n = bytes.len().min(255);
    buf[..n].copy_from_slice(&bytes[..n]);
    buf
}

pub fn unpack_equation(buf: &[u8; 256]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_round_trip() {
        let pts = vec![Point { x: 1, y: 2 }, Point { x: -3, y: 4 }];
        let bytes = encode_points(&pts);
        assert_eq!(decode_points(&bytes), pts);
    }

    #[test]
    fn equation_round_trips_through_fixed_buffer() {
        let eq = "r = r * 0.8; g = g * 0.8; b = b * 0.8";
        let packed = pack_equation(eq);
        assert_eq!(unpack_equation(&packed), eq);
    }

    #[test]
    fn equation_longer_than_buffer_is_truncated_not_panicking() {
        let eq = "x".repeat(500);
        let packed = pack_equation(&eq);
        assert_eq!(unpack_equation(&packed).len(), 255);
    }
}
