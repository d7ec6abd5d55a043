//=========================================================================
// State Machine (queued transitions)
//=========================================================================
//
// State machine where transitions are requested and applied on the next
// frame update rather than immediately.
//
// Architecture:
//   request_state(s) → queue → update(dt) → [pop completed head] → active
//
// Frame update:
//   1. Pop the active state if it has completed
//   2. Advance the active state's timer and its own update hook
//   3. Pop again if the state completed during this update
//
// A state is completed when its timer has expired, or when it is
// interruptible and another state is already waiting behind it. An empty
// queue falls back to the default state.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::fmt;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{State, Timer};

//=== MachineState ========================================================

/// Value that can be used as a state in a [`StateMachine`].
///
/// States that carry their own per-frame behavior override [`update`],
/// which the machine calls while the state is active.
///
/// [`update`]: MachineState::update
pub trait MachineState: Clone + PartialEq + fmt::Debug {
    /// Called once per frame while this state is active.
    fn update(&mut self, _delta_time: f32) {}
}

impl MachineState for &'static str {}

impl MachineState for String {}

impl<T: Clone> MachineState for State<T> {}

//=== QueuedState =========================================================

struct QueuedState<S> {
    state: S,
    timer: Timer,
    interruptible: bool,
}

impl<S: MachineState> QueuedState<S> {
    fn indefinite(state: S) -> Self {
        Self {
            state,
            timer: Timer::indefinite(),
            interruptible: true,
        }
    }

    fn is_completed(&self, has_successor: bool) -> bool {
        self.timer.is_completed() || (self.interruptible && has_successor)
    }
}

//=== StateMachine ========================================================

type TransitionPredicate<S> = Box<dyn Fn(&S, &S) -> bool>;

/// Queue-based state machine with optional transition rules.
///
/// # Examples
///
/// ```
/// use proscenium::core::fsm::StateMachine;
///
/// let mut machine = StateMachine::new("idle");
/// assert!(machine.request_state("attack", 0.5));
///
/// // Requested states only become active during update.
/// assert_eq!(*machine.active_state(), "idle");
/// machine.update(0.25);
/// assert_eq!(*machine.active_state(), "attack");
///
/// machine.update(0.25);
/// assert_eq!(*machine.active_state(), "idle");
/// ```
pub struct StateMachine<S: MachineState> {
    default_state: S,
    active: QueuedState<S>,
    queue: VecDeque<QueuedState<S>>,
    previous: Option<S>,
    predicate: TransitionPredicate<S>,
}

impl<S: MachineState> StateMachine<S> {
    /// Creates a machine that starts in, and falls back to, `default_state`.
    ///
    /// All transitions are allowed until [`allow_transitions`] is called.
    ///
    /// [`allow_transitions`]: Self::allow_transitions
    pub fn new(default_state: S) -> Self {
        Self {
            active: QueuedState::indefinite(default_state.clone()),
            default_state,
            queue: VecDeque::new(),
            previous: None,
            predicate: Box::new(|_, _| true),
        }
    }

    //--- Transition Rules -------------------------------------------------

    /// Replaces the rule used by [`request_state`](Self::request_state).
    pub fn allow_transitions<F>(&mut self, predicate: F)
    where
        F: Fn(&S, &S) -> bool + 'static,
    {
        self.predicate = Box::new(predicate);
    }

    /// Only allows the listed `(from, to)` transitions.
    ///
    /// # Panics
    ///
    /// Panics if `allowed` is empty.
    pub fn allow_transition_list(&mut self, allowed: &[(S, S)])
    where
        S: 'static,
    {
        assert!(!allowed.is_empty(), "Transition allow-list cannot be empty");

        let allowed = allowed.to_vec();
        self.predicate = Box::new(move |from, to| {
            allowed.iter().any(|(f, t)| f == from && t == to)
        });
    }

    //--- Requests ---------------------------------------------------------

    /// Requests a transition to `state`.
    ///
    /// A `duration` of zero keeps the state active until a successor is
    /// requested. A positive duration keeps it active for exactly that
    /// long, without interruption. Returns `false` if the transition was
    /// rejected.
    pub fn request_state(&mut self, state: S, duration: f32) -> bool {
        self.request_state_with(state, duration, duration == 0.0)
    }

    /// Like [`request_state`](Self::request_state), with explicit control
    /// over whether a queued successor may interrupt the state.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative.
    pub fn request_state_with(&mut self, state: S, duration: f32, interruptible: bool) -> bool {
        let tail = self.tail_state();

        if *tail == state || !(self.predicate)(tail, &state) {
            debug!("State machine rejected transition {:?} -> {:?}", tail, state);
            return false;
        }

        let timer = if duration == 0.0 {
            Timer::indefinite()
        } else {
            Timer::new(duration)
        };

        self.queue.push_back(QueuedState {
            state,
            timer,
            interruptible,
        });
        true
    }

    /// Replaces all queued states with `state`, bypassing the transition
    /// rules. Takes effect on the next update even if the active state is
    /// not interruptible.
    pub fn force_state(&mut self, state: S) {
        self.queue.clear();
        self.queue.push_back(QueuedState::indefinite(state));
        self.active.interruptible = true;
    }

    //--- Frame Update -----------------------------------------------------

    pub fn update(&mut self, delta_time: f32) {
        self.advance_if_completed();

        self.active.timer.update(delta_time);
        self.active.state.update(delta_time);

        self.advance_if_completed();
    }

    /// Rewinds the active state's timer without changing state.
    pub fn reset_active_state(&mut self) {
        self.active.timer.reset();
    }

    fn advance_if_completed(&mut self) {
        if !self.active.is_completed(!self.queue.is_empty()) {
            return;
        }

        let next = self
            .queue
            .pop_front()
            .unwrap_or_else(|| QueuedState::indefinite(self.default_state.clone()));

        let finished = std::mem::replace(&mut self.active, next);
        self.previous = Some(finished.state);
    }

    fn tail_state(&self) -> &S {
        self.queue
            .back()
            .map(|queued| &queued.state)
            .unwrap_or(&self.active.state)
    }

    //--- Queries ----------------------------------------------------------

    pub fn active_state(&self) -> &S {
        &self.active.state
    }

    /// Timer of the active state. The default state runs an indefinite timer.
    pub fn active_state_timer(&self) -> &Timer {
        &self.active.timer
    }

    pub fn is_active(&self, state: &S) -> bool {
        self.active.state == *state
    }

    /// State that was active before the current one, if any.
    pub fn previous_state(&self) -> Option<&S> {
        self.previous.as_ref()
    }

    pub fn default_state(&self) -> &S {
        &self.default_state
    }

    /// States waiting to become active, in order.
    pub fn queued_states(&self) -> impl Iterator<Item = &S> {
        self.queue.iter().map(|queued| &queued.state)
    }
}

impl<S: MachineState> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("active", &self.active.state)
            .field("timer", &self.active.timer)
            .field("queue", &self.queued_states().collect::<Vec<_>>())
            .field("default", &self.default_state)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
