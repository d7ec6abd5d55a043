//=========================================================================
// State
//=========================================================================
//
// Immutable description of one state in a state machine.
//
// A state is identified by its name. Timed states (duration > 0) name
// the state that follows them; permanent states (duration == 0) stay
// active until something else changes the machine.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::hash::{Hash, Hasher};

//=== State ===============================================================

/// One named state, optionally time-boxed, carrying an arbitrary payload.
///
/// Equality and hashing only consider the name, so two states with the
/// same name but different payloads compare equal.
///
/// # Examples
///
/// ```
/// use proscenium::core::fsm::State;
///
/// let idle = State::permanent("idle", ());
/// let jump = State::timed("jump", 0.5, "idle", ());
///
/// assert_eq!(jump.next(), Some("idle"));
/// assert!(idle.next().is_none());
/// ```
#[derive(Clone)]
pub struct State<T> {
    name: String,
    duration: f32,
    next: Option<String>,
    payload: T,
}

/// State without a payload.
pub type SimpleState = State<()>;

impl<T> State<T> {
    /// Creates a state from its parts.
    ///
    /// # Panics
    ///
    /// - If `name` is empty
    /// - If `duration` is negative or NaN
    /// - If a timed state does not name a successor, or a permanent
    ///   state does
    pub fn new(name: impl Into<String>, duration: f32, next: Option<String>, payload: T) -> Self {
        let name = name.into();

        assert!(!name.is_empty(), "Invalid state name: state names cannot be empty");
        assert!(duration >= 0.0, "Invalid duration for state {}: {}", name, duration);
        assert!(
            (duration > 0.0) == next.is_some(),
            "State {} must name a next state if and only if it has a duration",
            name
        );

        Self {
            name,
            duration,
            next,
            payload,
        }
    }

    /// State that remains active until it is changed externally.
    pub fn permanent(name: impl Into<String>, payload: T) -> Self {
        Self::new(name, 0.0, None, payload)
    }

    /// State that is active for `duration` seconds and then moves to `next`.
    pub fn timed(name: impl Into<String>, duration: f32, next: impl Into<String>, payload: T) -> Self {
        Self::new(name, duration, Some(next.into()), payload)
    }

    //--- Accessors --------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Name of the state that follows this one, if this state is timed.
    pub fn next(&self) -> Option<&str> {
        self.next.as_deref()
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn is_timed(&self) -> bool {
        self.duration > 0.0
    }
}

//--- Trait Implementations -----------------------------------------------

impl<T> PartialEq for State<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for State<T> {}

impl<T> Hash for State<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<T> AsRef<str> for State<T> {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl<T> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("duration", &self.duration)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_uses_name_only() {
        let a = State::permanent("walk", 1);
        let b = State::permanent("walk", 2);
        let c = State::permanent("run", 1);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn timed_state_names_successor() {
        let state: SimpleState = State::timed("attack", 0.75, "idle", ());

        assert!(state.is_timed());
        assert_eq!(state.duration(), 0.75);
        assert_eq!(state.next(), Some("idle"));
        assert_eq!(state.to_string(), "attack");
    }

    #[test]
    fn permanent_state_has_no_successor() {
        let state = State::permanent("idle", "payload");

        assert!(!state.is_timed());
        assert_eq!(state.next(), None);
        assert_eq!(*state.payload(), "payload");
    }

    #[test]
    #[should_panic(expected = "Invalid state name")]
    fn empty_name_panics() {
        State::permanent("", ());
    }

    #[test]
    #[should_panic(expected = "Invalid duration")]
    fn negative_duration_panics() {
        State::new("broken", -1.0, Some("idle".to_string()), ());
    }

    #[test]
    #[should_panic(expected = "must name a next state")]
    fn timed_state_without_successor_panics() {
        State::new("broken", 1.0, None, ());
    }

    #[test]
    #[should_panic(expected = "must name a next state")]
    fn permanent_state_with_successor_panics() {
        State::new("broken", 0.0, Some("idle".to_string()), ());
    }
}
