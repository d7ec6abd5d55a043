//=========================================================================
// State Tracker
//=========================================================================
//
// Default `InputDevice`: derives per-frame input state from event batches.
//
// Architecture:
//   InputEvent batch → process_frame() → held sets + frame deltas → query
//
// Frame lifecycle:
//   process_frame(events) = clear frame deltas, then apply events in order
//
// "Pressed" and "released" only hold for the frame in which the
// transition happened; "held" persists across frames.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, PointerButton};
use super::InputDevice;

//=== StateTracker ========================================================

/// Keyboard and pointer state built from [`InputEvent`]s.
#[derive(Debug, Default)]
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_held: HashSet<KeyCode>,
    buttons_held: HashSet<PointerButton>,
    pointer: Option<Vec2>,
    modifiers: Modifiers,
    keyboard_seen: bool,

    //--- Frame Deltas (reset by process_frame) ---------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<PointerButton>,
    buttons_released: HashSet<PointerButton>,
    pointer_delta: Vec2,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.pointer_delta = Vec2::ZERO;
    }

    fn apply(&mut self, event: &InputEvent) {
        if let Some(position) = event.position() {
            if let Some(previous) = self.pointer {
                self.pointer_delta += position - previous;
            }
            self.pointer = Some(position);
        }

        match *event {
            InputEvent::KeyDown { key, modifiers } => {
                self.keyboard_seen = true;
                self.modifiers = modifiers;
                // Repeated KeyDown while held is not a new press
                if self.keys_held.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            InputEvent::KeyUp { key, modifiers } => {
                self.keyboard_seen = true;
                self.modifiers = modifiers;
                if self.keys_held.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
            InputEvent::PointerPressed { button, .. } => {
                if self.buttons_held.insert(button) {
                    self.buttons_pressed.insert(button);
                }
            }
            InputEvent::PointerReleased { button, .. } => {
                if self.buttons_held.remove(&button) {
                    self.buttons_released.insert(button);
                }
            }
            InputEvent::PointerMoved { .. } | InputEvent::Unidentified => {}
        }
    }

    //--- Extended Queries -------------------------------------------------

    /// Returns `true` while the key is held down.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn is_button_pressed(&self, button: PointerButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn is_button_held(&self, button: PointerButton) -> bool {
        self.buttons_held.contains(&button)
    }

    pub fn is_button_released(&self, button: PointerButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Pointer movement during the last processed frame.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_delta
    }

    /// Modifier state reported by the most recent key event.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn keys_held(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_held.iter()
    }
}

//--- InputDevice ---------------------------------------------------------

impl InputDevice for StateTracker {
    fn process_frame(&mut self, events: &[InputEvent]) {
        self.clear_frame();
        for event in events {
            self.apply(event);
        }
    }

    fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    fn is_pointer_pressed(&self) -> bool {
        self.is_button_pressed(PointerButton::Primary)
    }

    fn is_pointer_released(&self) -> bool {
        self.is_button_released(PointerButton::Primary)
    }

    fn is_keyboard_available(&self) -> bool {
        self.keyboard_seen
    }

    fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
