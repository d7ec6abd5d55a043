//=========================================================================
// Core Systems
//
// Renderer-independent runtime: what is playing, what is visible, and
// how time flows through the application.
//
// Layers (leaves first):
//   fsm    → Timer, State, FiniteStateMachine, StateMachine
//   stage  → Stage, layers, 2D graphics, World3D, StageVisitor
//   input  → InputDevice contract, StateTracker
//   media  → MediaLoader / Network contracts, AssetHandle
//   stats  → FrameStats
//   scene  → Scene, SceneContext, SceneManager
//
// Everything here runs on the thread that drives the frame loop. Scenes
// reach collaborators only through the SceneContext they are handed.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod fsm;
pub mod input;
pub mod media;
pub mod scene;
pub mod stage;
pub mod stats;

//=== Public API ==========================================================

pub use fsm::{FiniteStateMachine, MachineState, SimpleState, State, StateMachine, Timer};
pub use scene::{Agent, Scene, SceneContext, SceneId, SceneManager, SubScene};
pub use stage::{Stage, StageVisitor};
