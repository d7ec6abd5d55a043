//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use proscenium::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine
pub use crate::engine::{Engine, EngineBuilder, EngineError, EngineHandle, Renderer, TickControl};

// State machines
pub use crate::core::fsm::{FiniteStateMachine, SimpleState, State, StateMachine, Timer};

// Scene system
pub use crate::core::scene::{Agent, Scene, SceneContext, SceneId, SceneManager, SubScene};

// Stage
pub use crate::core::stage::{
    Canvas, ColorRGB, CollectingVisitor, Graphic2D, GraphicsMode, NodeId, Primitive, Rect, Shape,
    Sprite, Stage, StageVisitor, Text,
};

// Input
pub use crate::core::input::{InputDevice, InputEvent, KeyCode, Modifiers, PointerButton};

// Media
pub use crate::core::media::{AssetHandle, MediaError, MediaLoader, Network};
