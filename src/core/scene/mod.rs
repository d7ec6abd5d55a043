//=========================================================================
// Scene System
//=========================================================================
//
// Scene lifecycle: one active scene tree plus independent global scenes.
//
// Architecture:
//   SceneManager
//     └─ SceneContext
//          ├─ SceneGraph (arena)
//          │    ├─ active root ─→ sub-scenes (attach order) ─→ ...
//          │    ├─ pending root (applied at the next frame boundary)
//          │    └─ global scenes
//          ├─ Stage
//          └─ InputDevice / MediaLoader / Network / FrameStats
//
// Flow per frame:
//   apply pending scene → Stage::update() → active tree → global scenes
//
//=========================================================================

//=== Module Declarations =================================================

mod context;
mod scene_graph;
mod scene_manager;
mod sub_scene;

//=== Public API ==========================================================

pub use context::SceneContext;
pub use scene_graph::SceneId;
pub use scene_manager::SceneManager;
pub use sub_scene::{AgentScene, SubScene};

//=== Scene Trait =========================================================

/// Unit of behavior with a lifetime.
///
/// A scene is either the root of the active tree, a sub-scene nested
/// under another scene, or a global scene. Every callback receives the
/// [`SceneContext`] explicitly.
///
/// # Minimal Implementation
///
/// Only `update()` is required:
///
/// ```rust
/// # use proscenium::prelude::*;
/// struct Title;
///
/// impl Scene for Title {
///     fn update(&mut self, context: &mut SceneContext, _delta_time: f32) {
///         if context.input().is_pointer_pressed() {
///             context.quit();
///         }
///     }
/// }
/// ```
pub trait Scene {
    /// Called once when the scene becomes active.
    ///
    /// For a requested root scene this happens at the next frame
    /// boundary. Sub-scenes attached to a running scene start right away.
    fn start(&mut self, _context: &mut SceneContext) {}

    /// Called every frame while active. `delta_time` is in seconds.
    fn update(&mut self, context: &mut SceneContext, delta_time: f32);

    /// Called once when the scene stops, whether it completed, was
    /// detached, or its parent went away.
    fn end(&mut self, _context: &mut SceneContext) {}

    /// Sub-scenes and global scenes are removed once this returns `true`.
    ///
    /// Ignored for the root scene, which only ends on a scene change.
    fn is_completed(&self) -> bool {
        false
    }
}

//=== Agent Trait =========================================================

/// Scene logic that does not need the context.
///
/// Any `FnMut(f32)` closure is an agent that never completes.
pub trait Agent {
    fn update(&mut self, delta_time: f32);

    fn is_completed(&self) -> bool {
        false
    }
}

impl<F: FnMut(f32)> Agent for F {
    fn update(&mut self, delta_time: f32) {
        self(delta_time)
    }
}
