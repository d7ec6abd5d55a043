//=========================================================================
// Canvas
//=========================================================================
//
// Logical drawing surface the stage is laid out on.
//
// The canvas size is independent of the physical window. Renderers map
// canvas pixels to screen pixels; the core only uses the canvas bounds
// to decide which nodes are visible.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::geometry::Rect;

//=== GraphicsMode ========================================================

/// Graphics capabilities requested from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsMode {
    /// Layered 2D graphics only.
    #[default]
    Mode2D,

    /// 2D layers drawn on top of a 3D world.
    Mode3D,
}

//=== Canvas ==============================================================

/// Logical canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
}

impl Canvas {
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Self { width: 1, height: 1 };
        canvas.resize(width, height);
        canvas
    }

    /// Changes the canvas size.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) {
        assert!(
            width > 0 && height > 0,
            "Invalid canvas dimensions: {}x{}",
            width,
            height
        );
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Visible area in canvas coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
