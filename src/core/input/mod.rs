//=========================================================================
// Input
//=========================================================================
//
// Contract through which scenes poll keyboard and pointer input.
//
// Architecture:
//   frame loop ──InputEvent batch──> InputDevice::process_frame()
//   scene      ──query───────────> InputDevice (pointer, keys)
//
// The core never polls hardware itself. It forwards whatever events the
// embedding application collected and exposes the device to scenes
// through their SceneContext.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, PointerButton};
pub use state_tracker::StateTracker;

//=== External Dependencies ===============================================

use glam::Vec2;

//=== InputDevice =========================================================

/// Pointer and keyboard state for the current frame.
pub trait InputDevice {
    /// Digests the events collected since the previous frame.
    ///
    /// Devices that poll hardware directly can ignore the batch.
    fn process_frame(&mut self, _events: &[InputEvent]) {}

    /// Last known pointer position in canvas coordinates.
    fn pointer(&self) -> Option<Vec2>;

    /// Primary pointer went down during this frame.
    fn is_pointer_pressed(&self) -> bool;

    /// Primary pointer went up during this frame.
    fn is_pointer_released(&self) -> bool;

    fn is_keyboard_available(&self) -> bool;

    fn is_key_pressed(&self, key: KeyCode) -> bool;

    fn is_key_released(&self, key: KeyCode) -> bool;
}

//=== NullInputDevice =====================================================

/// Device that never reports any input.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullInputDevice;

impl InputDevice for NullInputDevice {
    fn pointer(&self) -> Option<Vec2> {
        None
    }

    fn is_pointer_pressed(&self) -> bool {
        false
    }

    fn is_pointer_released(&self) -> bool {
        false
    }

    fn is_keyboard_available(&self) -> bool {
        false
    }

    fn is_key_pressed(&self, _key: KeyCode) -> bool {
        false
    }

    fn is_key_released(&self, _key: KeyCode) -> bool {
        false
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
