use serde::{Deserialize, Serialize};

/// Server-side title bar and border defaults applied to new windows until a
/// client overrides them with `SET_WINDOW_DECORATIONS`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DecorationDefaults {
    pub enabled: bool,
    pub border_width: u32,
    pub title_height: u32,
    /// Packed RGBA, matching the wire format's `color_rgba` (spec.md §4.2).
    pub color_focused: u32,
    pub color_unfocused: u32,
}

impl Default for DecorationDefaults {
    fn default() -> Self {
        DecorationDefaults {
            enabled: true,
            border_width: 2,
            title_height: 30,
            color_focused: 0x3366FFFF,
            color_unfocused: 0x888888FF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let d = DecorationDefaults::default();
        assert_eq!(d.border_width, 2);
        assert_eq!(d.title_height, 30);
        assert_eq!(d.color_focused, 0x3366FFFF);
        assert_eq!(d.color_unfocused, 0x888888FF);
        assert!(d.enabled);
    }
}
