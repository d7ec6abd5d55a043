//=========================================================================
// Proscenium - Library Root
//
// Runtime core of a multimedia application framework: scene lifecycle,
// a renderer-agnostic stage, and state machine building blocks.
//
// Responsibilities:
// - Expose the frame loop facade (`Engine`, `EngineBuilder`)
// - Expose the core systems for scenes and renderer backends
// - Stay independent of any windowing or graphics backend
//
// Typical usage:
// ```no_run
// use proscenium::prelude::*;
//
// struct Intro;
//
// impl Scene for Intro {
//     fn update(&mut self, _context: &mut SceneContext, _delta_time: f32) {}
// }
//
// let mut renderer = CollectingVisitor::new();
// EngineBuilder::new()
//     .build()
//     .init(|manager| {
//         manager.change_scene(Intro);
//     })
//     .run(&mut renderer)
//     .unwrap();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds scenes, stage, state machines and the collaborator
// contracts. Renderer backends implement `core::stage::StageVisitor`.
//
pub mod core;
pub mod prelude;

//--- Engine --------------------------------------------------------------
//
// `engine` drives the SceneManager at a fixed rate and hands the stage to
// a `Renderer` every frame.
//
mod engine;

//--- Public Exports ------------------------------------------------------

pub use engine::{
    Engine, EngineBuilder, EngineError, EngineHandle, Renderer, RendererError, TickControl,
};
