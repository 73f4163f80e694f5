//! Colour lookups owned by the simulation
//!
//! Colours here are derived state: blocks recolour when their lives change or
//! when the Timewarp palette flips, and the ball's display colour follows the
//! highest-priority active effect.

use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 0xFF,
        }
    }

    /// Linear 0-1 components for GPU upload
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Block ramp indexed by `lives - 1` (1 life = brightest)
pub const BLOCK_RAMP: [Rgba; 6] = [
    Rgba::hex(0xE52165),
    Rgba::hex(0xC11E5D),
    Rgba::hex(0x9D1C56),
    Rgba::hex(0x79194E),
    Rgba::hex(0x551646),
    Rgba::hex(0x31143F),
];

/// Ramp used while the Timewarp palette is active
pub const BLOCK_RAMP_ALT: [Rgba; 6] = [
    Rgba::hex(0x9B6BFF),
    Rgba::hex(0x8457E6),
    Rgba::hex(0x6D44CC),
    Rgba::hex(0x5733B3),
    Rgba::hex(0x412399),
    Rgba::hex(0x2C1680),
];

pub const NEUTRAL: Rgba = Rgba::hex(0x828282);

pub const BALL: Rgba = Rgba::hex(0xF5F5F5);
pub const PADDLE: Rgba = Rgba::hex(0xE86794);
pub const PADDLE_TIMEWARP: Rgba = Rgba::hex(0x8457E6);

pub const LIFE: Rgba = Rgba::hex(0x8B1B52);
pub const SPEED: Rgba = Rgba::hex(0xECEDAB);
pub const GROWTH: Rgba = Rgba::hex(0xACEDAB);
pub const GHOST: Rgba = Rgba::hex(0xA8E6F0);
pub const TIMEWARP: Rgba = Rgba::hex(0xB19CFF);
pub const DAMAGE: Rgba = Rgba::hex(0xFF5A36);

/// Colour for a block with the given lives
///
/// Lives outside `1..=6` fall back to [`NEUTRAL`].
pub fn block_color(lives: i32, alternate: bool) -> Rgba {
    let ramp = if alternate { &BLOCK_RAMP_ALT } else { &BLOCK_RAMP };
    match usize::try_from(lives) {
        Ok(n) if (1..=ramp.len()).contains(&n) => ramp[n - 1],
        _ => NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_color_ramp() {
        assert_eq!(block_color(1, false), Rgba::hex(0xE52165));
        assert_eq!(block_color(6, false), Rgba::hex(0x31143F));
        assert_ne!(block_color(3, false), block_color(3, true));
    }

    #[test]
    fn test_block_color_out_of_range() {
        assert_eq!(block_color(0, false), NEUTRAL);
        assert_eq!(block_color(7, true), NEUTRAL);
        assert_eq!(block_color(-2, false), NEUTRAL);
    }

    #[test]
    fn test_hex_and_f32() {
        let c = Rgba::hex(0xFF8000);
        assert_eq!((c.r, c.g, c.b, c.a), (255, 128, 0, 255));
        let f = c.to_f32();
        assert!((f[0] - 1.0).abs() < 1e-6);
        assert!(f[2].abs() < 1e-6);
    }
}
