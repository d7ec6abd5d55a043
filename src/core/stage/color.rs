//=========================================================================
// Colors
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== ColorRGB ============================================================

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorRGB {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorRGB {
    pub const BLACK: ColorRGB = ColorRGB::new(0, 0, 0);
    pub const WHITE: ColorRGB = ColorRGB::new(255, 255, 255);
    pub const GRAY: ColorRGB = ColorRGB::new(127, 127, 127);
    pub const RED: ColorRGB = ColorRGB::new(255, 0, 0);
    pub const GREEN: ColorRGB = ColorRGB::new(0, 255, 0);
    pub const BLUE: ColorRGB = ColorRGB::new(0, 0, 255);
    pub const YELLOW: ColorRGB = ColorRGB::new(255, 255, 0);
    pub const ORANGE: ColorRGB = ColorRGB::new(255, 127, 0);
    pub const PURPLE: ColorRGB = ColorRGB::new(127, 64, 255);
    pub const PINK: ColorRGB = ColorRGB::new(255, 192, 203);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a packed `0xRRGGBB` value. Higher bits are ignored.
    pub const fn from_rgb(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Packs this color as `0xRRGGBB`.
    pub const fn rgb(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Linear interpolation toward `target`, `t` clamped to `0..=1`.
    pub fn lerp(&self, target: ColorRGB, t: f32) -> ColorRGB {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        ColorRGB::new(mix(self.r, target.r), mix(self.g, target.g), mix(self.b, target.b))
    }
}

impl Default for ColorRGB {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Formats as uppercase hex, e.g. `#FF0000`.
impl fmt::Display for ColorRGB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
