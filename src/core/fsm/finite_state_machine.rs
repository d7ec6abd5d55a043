//=========================================================================
// Finite State Machine
//=========================================================================
//
// Tracks exactly one active state out of a fixed, registered set.
//
// Architecture:
//   register(state)* → update(dt) → [timed auto-advance] → active_state()
//
// The first registered state becomes active. Timed states move to their
// declared successor once their duration has elapsed. Consumers poll the
// active state; the machine never notifies anyone.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::State;

//=== FiniteStateMachine ==================================================

/// State machine over a registered set of named [`State`]s.
///
/// # Examples
///
/// ```
/// use proscenium::core::fsm::{FiniteStateMachine, State};
///
/// let mut fsm = FiniteStateMachine::new();
/// fsm.register(State::timed("intro", 2.0, "menu", ()));
/// fsm.register(State::permanent("menu", ()));
///
/// fsm.update(1.0);
/// fsm.update(1.0);
/// assert_eq!(fsm.active_state_name(), "menu");
/// assert_eq!(fsm.active_state_time(), 0.0);
/// ```
#[derive(Debug)]
pub struct FiniteStateMachine<T> {
    possible_states: HashMap<String, State<T>>,
    registration_order: Vec<String>,
    active: Option<String>,
    active_state_time: f32,
}

impl<T> FiniteStateMachine<T> {
    pub fn new() -> Self {
        Self {
            possible_states: HashMap::new(),
            registration_order: Vec::new(),
            active: None,
            active_state_time: 0.0,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a possible state. The first registered state becomes the
    /// active state.
    ///
    /// # Panics
    ///
    /// Panics if a state with the same name is already registered.
    pub fn register(&mut self, state: State<T>) {
        let name = state.name().to_string();

        assert!(
            !self.possible_states.contains_key(&name),
            "Finite state machine already contains state: {}",
            name
        );

        self.possible_states.insert(name.clone(), state);
        self.registration_order.push(name.clone());

        if self.active.is_none() {
            self.active = Some(name);
            self.active_state_time = 0.0;
        }
    }

    //--- Transitions ------------------------------------------------------

    /// Changes the active state.
    ///
    /// Does nothing if the requested state is already active, otherwise
    /// resets the elapsed time. Accepts a state name or a [`State`].
    ///
    /// # Panics
    ///
    /// Panics if the requested state was never registered.
    pub fn change_state(&mut self, requested: impl AsRef<str>) {
        let requested = requested.as_ref();

        assert!(
            self.possible_states.contains_key(requested),
            "Not a possible state: {}",
            requested
        );

        if self.active.as_deref() == Some(requested) {
            return;
        }

        debug!("FSM: {:?} -> {}", self.active, requested);

        self.active = Some(requested.to_string());
        self.active_state_time = 0.0;
    }

    /// Advances the elapsed time and performs timed auto-advance.
    ///
    /// # Panics
    ///
    /// Panics if no state has been registered yet, or if a timed state
    /// names a successor that was never registered.
    pub fn update(&mut self, delta_time: f32) {
        let (duration, next) = {
            let state = self.active_state();
            (state.duration(), state.next().map(str::to_string))
        };

        self.active_state_time += delta_time;

        if duration > 0.0 && self.active_state_time >= duration {
            if let Some(next) = next {
                self.change_state(next);
            }
        }
    }

    /// Restarts the elapsed time of the active state.
    pub fn reset_active_state(&mut self) {
        self.active_state_time = 0.0;
    }

    //--- Queries ----------------------------------------------------------

    /// # Panics
    ///
    /// Panics if the machine is not in an active state.
    pub fn active_state(&self) -> &State<T> {
        self.active
            .as_ref()
            .and_then(|name| self.possible_states.get(name))
            .unwrap_or_else(|| panic!("Finite state machine is not in an active state"))
    }

    pub fn active_state_name(&self) -> &str {
        self.active_state().name()
    }

    pub fn active_payload(&self) -> &T {
        self.active_state().payload()
    }

    /// Seconds spent in the active state.
    pub fn active_state_time(&self) -> f32 {
        self.active_state_time
    }

    /// Registered states in registration order.
    pub fn possible_states(&self) -> impl Iterator<Item = &State<T>> {
        self.registration_order
            .iter()
            .filter_map(|name| self.possible_states.get(name))
    }

    /// # Panics
    ///
    /// Panics if no state with this name was registered.
    pub fn possible_state(&self, name: &str) -> &State<T> {
        self.possible_states
            .get(name)
            .unwrap_or_else(|| panic!("Not a possible state: {}", name))
    }

    pub fn has_possible_state(&self, name: &str) -> bool {
        self.possible_states.contains_key(name)
    }
}

impl<T> Default for FiniteStateMachine<T> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
