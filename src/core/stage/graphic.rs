//=========================================================================
// 2D Graphics
//=========================================================================
//
// Drawable node kinds that can be placed on stage layers.
//
// Architecture:
//   Graphic2D
//     ├─ Sprite     → named animations, driven by a StateMachine<String>
//     ├─ Primitive  → Shape + color + stroke
//     └─ Text       → content + FontFace + Align
//
// The set of node kinds is closed. Renderers match on `Graphic2D`
// instead of inspecting runtime types, so adding a kind is a compile
// error everywhere it is not handled.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::color::ColorRGB;
use super::geometry::{Rect, Shape};
use crate::core::fsm::StateMachine;

//=== Transform ===========================================================

/// Placement and appearance of a 2D node.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub visible: bool,
    pub position: Vec2,
    rotation: f32,
    scale: Vec2,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    alpha: f32,
    pub mask_color: Option<ColorRGB>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            visible: true,
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            flip_horizontal: false,
            flip_vertical: false,
            alpha: 1.0,
            mask_color: None,
        }
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    pub fn add_position(&mut self, dx: f32, dy: f32) {
        self.position += Vec2::new(dx, dy);
    }

    /// Sets the rotation in degrees, normalized to `(-360, 360)`.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees % 360.0;
    }

    pub fn add_rotation(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation.to_radians()
    }

    /// Sets a uniform scale factor, `1.0` being the original size.
    pub fn set_scale(&mut self, scale: f32) {
        self.set_scale_xy(scale, scale);
    }

    /// Negative factors are clamped to zero; use the flip flags instead.
    pub fn set_scale_xy(&mut self, x: f32, y: f32) {
        self.scale = Vec2::new(x.max(0.0), y.max(0.0));
    }

    /// Scale including flips, so flipped axes report a negative factor.
    pub fn scale(&self) -> Vec2 {
        Vec2::new(
            if self.flip_horizontal { -self.scale.x } else { self.scale.x },
            if self.flip_vertical { -self.scale.y } else { self.scale.y },
        )
    }

    /// Opacity clamped to `0..=1`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

//=== Image & Animation ===================================================

/// Reference to a loaded image, or a region of one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.source, self.width, self.height)
    }
}

/// Sequence of images, each shown for its own frame time.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    frames: Vec<(Image, f32)>,
    looping: bool,
}

impl Animation {
    /// Animation with a single static frame.
    pub fn still(image: Image) -> Self {
        Self {
            frames: vec![(image, 0.0)],
            looping: false,
        }
    }

    /// Animation where every frame is shown for `frame_time` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `images` is empty or `frame_time` is negative.
    pub fn new(images: Vec<Image>, frame_time: f32, looping: bool) -> Self {
        assert!(!images.is_empty(), "Animation does not contain any frames");

        let mut animation = Self {
            frames: Vec::with_capacity(images.len()),
            looping,
        };
        for image in images {
            animation.add_frame(image, frame_time);
        }
        animation
    }

    /// # Panics
    ///
    /// Panics if `frame_time` is negative.
    pub fn add_frame(&mut self, image: Image, frame_time: f32) {
        assert!(frame_time >= 0.0, "Invalid frame time: {}", frame_time);
        self.frames.push((image, frame_time));
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Total length of one playthrough. Single-frame animations have no length.
    pub fn duration(&self) -> f32 {
        if self.frames.len() <= 1 {
            return 0.0;
        }
        self.frames.iter().map(|(_, time)| time).sum()
    }

    /// Frame shown `time` seconds after the animation started.
    ///
    /// Non-looping animations hold their last frame.
    pub fn frame_at_time(&self, time: f32) -> &Image {
        if self.frames.len() == 1 {
            return &self.frames[0].0;
        }

        let duration = self.duration();
        let mut remaining = if self.looping && duration > 0.0 {
            time % duration
        } else {
            time
        };

        for (image, frame_time) in &self.frames {
            remaining -= frame_time;
            if remaining < 0.0 {
                return image;
            }
        }

        &self.frames[self.frames.len() - 1].0
    }
}

//=== Sprite ==============================================================

/// Graphics state a sprite starts in.
pub const DEFAULT_GRAPHICS: &str = "default";

/// Image-based node with named animation states.
///
/// Switching graphics goes through a queued [`StateMachine`], so a change
/// requested during a frame is shown from the next stage update onward.
pub struct Sprite {
    pub transform: Transform,
    graphics: HashMap<String, Animation>,
    state: StateMachine<String>,
}

impl Sprite {
    /// Creates a sprite showing `animation` in its default state.
    pub fn new(animation: Animation) -> Self {
        let mut graphics = HashMap::new();
        graphics.insert(DEFAULT_GRAPHICS.to_string(), animation);

        Self {
            transform: Transform::new(),
            graphics,
            state: StateMachine::new(DEFAULT_GRAPHICS.to_string()),
        }
    }

    /// Creates a sprite showing a single static image.
    pub fn from_image(image: Image) -> Self {
        Self::new(Animation::still(image))
    }

    /// Registers graphics for a named state.
    ///
    /// # Panics
    ///
    /// Panics if the sprite already has graphics for `state`.
    pub fn add_graphics(&mut self, state: impl Into<String>, animation: Animation) {
        let state = state.into();
        assert!(
            !self.graphics.contains_key(&state),
            "Sprite already contains graphics for {}",
            state
        );
        self.graphics.insert(state, animation);
    }

    /// Switches to the graphics registered for `state`, starting from the
    /// first frame. Does nothing if that state is already shown.
    ///
    /// # Panics
    ///
    /// Panics if no graphics were registered for `state`.
    pub fn change_graphics(&mut self, state: &str) {
        assert!(
            self.graphics.contains_key(state),
            "Sprite does not contain graphics for {}",
            state
        );

        let state = state.to_string();
        if self.state.is_active(&state) && self.state.queued_states().next().is_none() {
            return;
        }
        self.state.force_state(state);
    }

    /// Restarts the current animation from its first frame.
    pub fn reset_current_graphics(&mut self) {
        self.state.reset_active_state();
    }

    pub fn has_graphics(&self, state: &str) -> bool {
        self.graphics.contains_key(state)
    }

    pub fn current_state(&self) -> &str {
        self.state.active_state()
    }

    /// Image shown for the current state at the current animation time.
    pub fn current_graphics(&self) -> &Image {
        let time = self.state.active_state_timer().time();
        self.graphics
            .get(self.state.active_state())
            .or_else(|| self.graphics.get(DEFAULT_GRAPHICS))
            .map(|animation| animation.frame_at_time(time))
            .unwrap_or_else(|| panic!("Sprite does not contain any graphics"))
    }

    pub fn update(&mut self, delta_time: f32) {
        self.state.update(delta_time);
    }

    /// Screen area covered by the current image, centered on the position.
    pub fn bounds(&self) -> Rect {
        let image = self.current_graphics();
        let scale = self.transform.scale().abs();
        let width = (image.width as f32 * scale.x).max(1.0);
        let height = (image.height as f32 * scale.y).max(1.0);
        Rect::around(self.transform.position, width, height)
    }
}

impl fmt::Debug for Sprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sprite")
            .field("transform", &self.transform)
            .field("state", &self.state.active_state())
            .field("graphics", &self.graphics.len())
            .finish()
    }
}

//=== Primitive ===========================================================

/// Filled or stroked shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub transform: Transform,
    pub shape: Shape,
    pub color: ColorRGB,
    pub stroke: f32,
}

impl Primitive {
    pub fn new(shape: Shape, color: ColorRGB) -> Self {
        Self {
            transform: Transform::new(),
            shape,
            color,
            stroke: 1.0,
        }
    }

    /// Shape moved to the primitive's position, as it appears on the canvas.
    pub fn displayed_shape(&self) -> Shape {
        self.shape.reposition(self.transform.position)
    }

    pub fn bounds(&self) -> Rect {
        self.displayed_shape().bounding_box()
    }
}

//=== Text ================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Font family, size and color used to render text.
#[derive(Debug, Clone, PartialEq)]
pub struct FontFace {
    pub family: String,
    pub size: f32,
    pub color: ColorRGB,
}

impl FontFace {
    pub fn new(family: impl Into<String>, size: f32, color: ColorRGB) -> Self {
        Self {
            family: family.into(),
            size,
            color,
        }
    }

    /// Distance between baselines of consecutive lines.
    pub fn line_height(&self) -> f32 {
        (self.size * 1.8).round()
    }
}

/// Possibly multi-line text label.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub transform: Transform,
    content: String,
    pub font: FontFace,
    pub align: Align,
}

impl Text {
    pub fn new(content: impl Into<String>, font: FontFace, align: Align) -> Self {
        Self {
            transform: Transform::new(),
            content: content.into(),
            font,
            align,
        }
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }

    /// Approximate area, assuming each glyph is as wide as the font size.
    pub fn bounds(&self) -> Rect {
        let columns = self.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        let rows = self.lines().count().max(1);
        Rect::new(
            self.transform.position.x,
            self.transform.position.y,
            self.font.size * columns as f32,
            self.font.line_height() * rows as f32,
        )
    }
}

//=== Graphic2D ===========================================================

/// Any node that can be placed on a 2D stage layer.
#[derive(Debug)]
pub enum Graphic2D {
    Sprite(Sprite),
    Primitive(Primitive),
    Text(Text),
}

impl Graphic2D {
    pub fn transform(&self) -> &Transform {
        match self {
            Graphic2D::Sprite(sprite) => &sprite.transform,
            Graphic2D::Primitive(primitive) => &primitive.transform,
            Graphic2D::Text(text) => &text.transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            Graphic2D::Sprite(sprite) => &mut sprite.transform,
            Graphic2D::Primitive(primitive) => &mut primitive.transform,
            Graphic2D::Text(text) => &mut text.transform,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.transform().visible
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Graphic2D::Sprite(sprite) => sprite.bounds(),
            Graphic2D::Primitive(primitive) => primitive.bounds(),
            Graphic2D::Text(text) => text.bounds(),
        }
    }

    /// Advances node-local animation. Only sprites animate.
    pub fn update(&mut self, delta_time: f32) {
        if let Graphic2D::Sprite(sprite) = self {
            sprite.update(delta_time);
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Graphic2D::Sprite(_) => "Sprite",
            Graphic2D::Primitive(_) => "Primitive",
            Graphic2D::Text(_) => "Text",
        }
    }
}

impl fmt::Display for Graphic2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Graphic2D::Sprite(sprite) => write!(f, "Sprite [{}]", sprite.current_graphics()),
            Graphic2D::Primitive(primitive) => write!(f, "Primitive [{}]", primitive.shape.kind()),
            Graphic2D::Text(text) => write!(f, "Text [{}]", text.content),
        }
    }
}

impl From<Sprite> for Graphic2D {
    fn from(sprite: Sprite) -> Self {
        Graphic2D::Sprite(sprite)
    }
}

impl From<Primitive> for Graphic2D {
    fn from(primitive: Primitive) -> Self {
        Graphic2D::Primitive(primitive)
    }
}

impl From<Text> for Graphic2D {
    fn from(text: Text) -> Self {
        Graphic2D::Text(text)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
