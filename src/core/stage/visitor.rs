//=========================================================================
// Stage Visitor
//=========================================================================
//
// Callback contract a renderer implements to draw stage content.
//
// Visit order (see `Stage::visit`):
//   pre_visit_stage → draw_background → visit_world (3D only)
//     → per layer:  pre_visit_layer
//         → per node: pre_visit_graphic → draw_* (if visible) → post_visit_graphic
//       post_visit_layer
//   → post_visit_stage
//
// The stage depends only on this trait, never on a concrete renderer.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::color::ColorRGB;
use super::geometry::{Circle, Line, Polygon, Rect};
use super::graphic::{Graphic2D, Primitive, Sprite, Text};
use super::layer::Layer;
use super::world::World3D;
use super::{NodeId, Stage};

//=== StageVisitor ========================================================

/// Renderer-side consumer of stage content.
///
/// Only the draw callbacks are required. Structural hooks default to
/// doing nothing.
pub trait StageVisitor {
    fn pre_visit_stage(&mut self, _stage: &Stage) {}

    fn post_visit_stage(&mut self, _stage: &Stage) {}

    fn pre_visit_layer(&mut self, _layer: &Layer) {}

    fn post_visit_layer(&mut self, _layer: &Layer) {}

    /// Called for every node on a visited layer, visible or not.
    fn pre_visit_graphic(&mut self, _node: NodeId, _graphic: &Graphic2D, _visible: bool) {}

    fn post_visit_graphic(&mut self, _node: NodeId, _graphic: &Graphic2D) {}

    /// Called before any layer when the stage has a 3D world.
    fn visit_world(&mut self, _world: &World3D) {}

    fn draw_background(&mut self, color: ColorRGB);

    fn draw_sprite(&mut self, sprite: &Sprite);

    fn draw_line(&mut self, primitive: &Primitive, line: &Line);

    fn draw_rect(&mut self, primitive: &Primitive, rect: &Rect);

    fn draw_circle(&mut self, primitive: &Primitive, circle: &Circle);

    fn draw_polygon(&mut self, primitive: &Primitive, polygon: &Polygon);

    fn draw_text(&mut self, text: &Text);
}

//=== DrawStats ===========================================================

/// Number of draw callbacks issued during one visit, per node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    pub sprites: usize,
    pub primitives: usize,
    pub texts: usize,
}

impl DrawStats {
    pub fn total(&self) -> usize {
        self.sprites + self.primitives + self.texts
    }
}

//=== CollectingVisitor ===================================================

/// Headless visitor that records every callback as a line of text.
///
/// Useful for running the frame loop without a display and for asserting
/// draw order in tests.
#[derive(Debug, Default)]
pub struct CollectingVisitor {
    calls: Vec<String>,
}

impl CollectingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// Only the draw callbacks, without structural hooks.
    pub fn draws(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter(|call| call.starts_with("draw"))
            .map(String::as_str)
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl StageVisitor for CollectingVisitor {
    fn pre_visit_stage(&mut self, stage: &Stage) {
        self.calls.push(format!("pre_visit_stage {}", stage.canvas()));
    }

    fn post_visit_stage(&mut self, _stage: &Stage) {
        self.calls.push("post_visit_stage".to_string());
    }

    fn pre_visit_layer(&mut self, layer: &Layer) {
        self.calls.push(format!("pre_visit_layer {}", layer.name()));
    }

    fn post_visit_layer(&mut self, layer: &Layer) {
        self.calls.push(format!("post_visit_layer {}", layer.name()));
    }

    fn pre_visit_graphic(&mut self, _node: NodeId, graphic: &Graphic2D, visible: bool) {
        self.calls.push(format!("pre_visit_graphic {} visible={}", graphic, visible));
    }

    fn post_visit_graphic(&mut self, _node: NodeId, graphic: &Graphic2D) {
        self.calls.push(format!("post_visit_graphic {}", graphic));
    }

    fn visit_world(&mut self, world: &World3D) {
        self.calls.push(format!("visit_world {}", world));
    }

    fn draw_background(&mut self, color: ColorRGB) {
        self.calls.push(format!("draw_background {}", color));
    }

    fn draw_sprite(&mut self, sprite: &Sprite) {
        self.calls.push(format!("draw_sprite {}", sprite.current_graphics().source));
    }

    fn draw_line(&mut self, _primitive: &Primitive, line: &Line) {
        self.calls.push(format!("draw_line {} {}", line.start, line.end));
    }

    fn draw_rect(&mut self, _primitive: &Primitive, rect: &Rect) {
        self.calls.push(format!("draw_rect {}", rect));
    }

    fn draw_circle(&mut self, _primitive: &Primitive, circle: &Circle) {
        self.calls.push(format!("draw_circle {} r={}", circle.center, circle.radius));
    }

    fn draw_polygon(&mut self, _primitive: &Primitive, polygon: &Polygon) {
        self.calls.push(format!("draw_polygon {} points", polygon.points.len()));
    }

    fn draw_text(&mut self, text: &Text) {
        self.calls.push(format!("draw_text {}", text.content()));
    }
}
