//=========================================================================
// Input Event Types
//=========================================================================
//
// Portable representation of keyboard and pointer input.
//
// Whatever polls the physical devices (a window toolkit, a browser
// bridge, a test script) translates its native events into these types
// and hands them to an `InputDevice` once per frame.
//
// Event Flow:
// ```text
// Native events (window / browser / test)
//         ↓
//    InputEvent (this module)
//         ↓
//    InputDevice::process_frame()
//         ↓
//    Scene queries (is_key_pressed, pointer, ...)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== PointerButton =======================================================

/// Button that produced a pointer event.
///
/// Touch input reports every touch as `Primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button, or a touch.
    Primary,

    /// Right mouse button.
    Secondary,

    /// Wheel click.
    Middle,

    /// Side buttons and anything else.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key, independent of keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Navigation -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// Key the native layer could not map.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier keys held while an event occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Command on macOS.
    pub ctrl: bool,
    /// Alt, or Option on macOS.
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

//=== InputEvent ==========================================================

/// One input event, in canvas coordinates where a position is involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown { key: KeyCode, modifiers: Modifiers },

    KeyUp { key: KeyCode, modifiers: Modifiers },

    PointerPressed { button: PointerButton, position: Vec2 },

    PointerReleased { button: PointerButton, position: Vec2 },

    PointerMoved { position: Vec2 },

    /// Event the native layer could not map. Ignored by input devices.
    Unidentified,
}

impl InputEvent {
    /// Pointer position carried by this event, if any.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            Self::PointerPressed { position, .. }
            | Self::PointerReleased { position, .. }
            | Self::PointerMoved { position } => Some(*position),
            _ => None,
        }
    }
}
