//=========================================================================
// Stage System
//=========================================================================
//
// Renderer-agnostic model of the drawable content of a frame.
//
// Architecture:
//   Stage
//     ├─ Layer*  → NodeId* → Graphic2D (Sprite | Primitive | Text)
//     ├─ World3D → PolygonModel*         (Mode3D only)
//     └─ StageObserver*                  (retained-mode sync)
//
// Flow:
//   scenes mutate Stage → observers notified → Stage::visit(StageVisitor)
//
//=========================================================================

//=== Module Declarations =================================================

mod canvas;
mod color;
mod geometry;
mod graphic;
mod layer;
mod observer;
#[allow(clippy::module_inception)]
mod stage;
mod visitor;
mod world;

//=== Public API ==========================================================

pub use canvas::{Canvas, GraphicsMode};
pub use color::ColorRGB;
pub use geometry::{Circle, Line, Polygon, Rect, SegmentedLine, Shape};
pub use graphic::{
    Align, Animation, FontFace, Graphic2D, Image, Primitive, Sprite, Text, Transform,
    DEFAULT_GRAPHICS,
};
pub use layer::Layer;
pub use observer::{ChannelObserver, ObserverId, StageEvent, StageObserver};
pub use stage::{NodeId, Stage, DEFAULT_LAYER};
pub use visitor::{CollectingVisitor, DrawStats, StageVisitor};
pub use world::{DirectionalLight, ModelId, PolygonModel, Transform3D, World3D};
