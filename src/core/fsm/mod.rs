//=========================================================================
// State Machines & Timers
//=========================================================================
//
// Reusable building blocks for time-boxed, interruptible behavior.
//
// Architecture:
//   Timer               → elapsed time toward a duration, fires once
//   State<T>            → named state, optional duration + successor
//   FiniteStateMachine  → one active state out of a registered set
//   StateMachine<S>     → queued transitions applied on update
//
// None of these hold references back into the scene graph. They are
// owned and ticked by whichever scene or stage node embeds them.
//
//=========================================================================

//=== Module Declarations =================================================

mod finite_state_machine;
mod state;
mod state_machine;
mod timer;

//=== Public API ==========================================================

pub use finite_state_machine::FiniteStateMachine;
pub use state::{SimpleState, State};
pub use state_machine::{MachineState, StateMachine};
pub use timer::{CompletionAction, FrameAction, Timer};
