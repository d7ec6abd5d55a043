//=========================================================================
// Timer
//=========================================================================
//
// Counts elapsed time toward a fixed duration.
//
// Lifecycle:
//   new(duration) → update(dt)* → completed → (reset → update(dt)*)
//
// The playhead only moves forward and is clamped to the duration.
// Completion actions fire exactly once per run, on the update that
// first reaches the duration. A zero-length timer fires them on its
// first update.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Timer ===============================================================

/// Callback invoked once when a timer completes.
pub type CompletionAction = Box<dyn FnMut()>;

/// Callback invoked every frame while a timer is running.
pub type FrameAction = Box<dyn FnMut(f32)>;

/// Time-boxed counter with completion callbacks.
///
/// Timers are simpler than keyframe timelines: the playhead moves forward
/// every frame until the duration has been reached, then stays there.
///
/// # Examples
///
/// ```
/// use proscenium::core::fsm::Timer;
///
/// let mut timer = Timer::new(2.0);
/// timer.update(1.5);
/// assert!(!timer.is_completed());
/// timer.update(1.5);
/// assert!(timer.is_completed());
/// assert_eq!(timer.time(), 2.0);
/// ```
pub struct Timer {
    position: f32,
    duration: f32,
    fired: bool,
    frame_actions: Vec<FrameAction>,
    completion_actions: Vec<CompletionAction>,
}

impl Timer {
    //--- Construction -----------------------------------------------------

    /// Creates a timer that completes after `duration` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative or NaN.
    pub fn new(duration: f32) -> Self {
        assert!(duration >= 0.0, "Invalid timer duration: {}", duration);

        Self {
            position: 0.0,
            duration,
            fired: false,
            frame_actions: Vec::new(),
            completion_actions: Vec::new(),
        }
    }

    /// Creates a timer with a single completion action attached.
    pub fn with_completion<F>(duration: f32, action: F) -> Self
    where
        F: FnMut() + 'static,
    {
        let mut timer = Self::new(duration);
        timer.attach_completion(action);
        timer
    }

    /// Returns a timer that runs indefinitely and never completes.
    pub fn indefinite() -> Self {
        Self::new(f32::MAX)
    }

    /// Returns a timer with zero duration, permanently considered completed.
    pub fn completed() -> Self {
        Self::new(0.0)
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances the playhead by `delta_time` seconds.
    ///
    /// Does nothing once the completion actions have fired. Frame actions
    /// receive the raw delta, completion actions run in attachment order.
    pub fn update(&mut self, delta_time: f32) {
        if self.fired {
            return;
        }

        self.position = (self.position + delta_time.max(0.0)).min(self.duration);

        for action in &mut self.frame_actions {
            action(delta_time);
        }

        if self.is_completed() {
            self.fire_completion();
        }
    }

    /// Moves the playhead to the end of the timer.
    ///
    /// Completion actions only run when `fire_actions` is set and they
    /// have not fired yet during this run.
    pub fn complete(&mut self, fire_actions: bool) {
        self.position = self.duration;

        if fire_actions && !self.fired {
            self.fire_completion();
        } else {
            self.fired = true;
        }
    }

    /// Rewinds the playhead so the timer can run again.
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.fired = false;
    }

    /// Moves the playhead, clamped to `0..=duration`.
    ///
    /// Setting the playhead does not fire completion actions; they run on
    /// the next `update`.
    pub fn set_time(&mut self, time: f32) {
        self.position = time.clamp(0.0, self.duration);
    }

    fn fire_completion(&mut self) {
        self.fired = true;

        for action in &mut self.completion_actions {
            action();
        }
    }

    //--- Actions ----------------------------------------------------------

    /// Attaches a callback that runs on every update until completion.
    pub fn attach_frame_update<F>(&mut self, action: F)
    where
        F: FnMut(f32) + 'static,
    {
        self.frame_actions.push(Box::new(action));
    }

    /// Attaches a callback that runs once when the timer completes.
    pub fn attach_completion<F>(&mut self, action: F)
    where
        F: FnMut() + 'static,
    {
        self.completion_actions.push(Box::new(action));
    }

    //--- Queries ----------------------------------------------------------

    /// Current playhead position in seconds.
    pub fn time(&self) -> f32 {
        self.position
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_completed(&self) -> bool {
        self.position >= self.duration
    }

    /// Returns `true` for timers created with [`Timer::indefinite`].
    pub fn is_indefinite(&self) -> bool {
        self.duration == f32::MAX
    }

    /// Fraction of the duration that has elapsed.
    ///
    /// A zero-length timer reports `0.0`.
    pub fn ratio(&self) -> f32 {
        if self.duration == 0.0 {
            return 0.0;
        }
        self.position / self.duration
    }
}

//--- Trait Implementations -----------------------------------------------

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("position", &self.position)
            .field("duration", &self.duration)
            .field("fired", &self.fired)
            .field("frame_actions", &self.frame_actions.len())
            .field("completion_actions", &self.completion_actions.len())
            .finish()
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_indefinite() {
            write!(f, "{:.1}", self.position)
        } else {
            write!(f, "{:.1} / {:.1}", self.position, self.duration)
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    const EPSILON: f32 = 0.001;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let handle = Rc::clone(&count);
        (count, move || handle.set(handle.get() + 1))
    }

    #[test]
    fn tracks_time_and_clamps_to_duration() {
        let mut timer = Timer::new(2.0);
        assert_eq!(timer.time(), 0.0);
        assert!(!timer.is_completed());

        timer.update(1.5);
        assert!((timer.time() - 1.5).abs() < EPSILON);
        assert!(!timer.is_completed());

        timer.update(1.5);
        assert_eq!(timer.time(), 2.0);
        assert!(timer.is_completed());

        timer.update(1.0);
        assert_eq!(timer.time(), 2.0);
        assert!(timer.is_completed());
    }

    #[test]
    fn completion_actions_fire_exactly_once() {
        let (count, action) = counter();
        let mut timer = Timer::with_completion(1.0, action);

        timer.update(0.5);
        assert_eq!(count.get(), 0);

        timer.update(0.5);
        timer.update(3.0);
        timer.update(0.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn zero_duration_timer_fires_on_first_update() {
        let (count, action) = counter();
        let mut timer = Timer::with_completion(0.0, action);

        assert!(timer.is_completed());
        timer.update(0.0);
        timer.update(1.0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn completion_actions_run_in_attachment_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut timer = Timer::new(1.0);

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            timer.attach_completion(move || log.borrow_mut().push(name));
        }

        timer.update(1.0);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn frame_actions_run_until_completed() {
        let total = Rc::new(Cell::new(0.0f32));
        let mut timer = Timer::new(1.0);
        let sink = Rc::clone(&total);
        timer.attach_frame_update(move |dt| sink.set(sink.get() + dt));

        timer.update(0.4);
        timer.update(0.6);
        timer.update(0.5);

        assert!((total.get() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn complete_without_actions() {
        let (count, action) = counter();
        let mut timer = Timer::with_completion(5.0, action);

        timer.complete(false);
        timer.update(1.0);

        assert!(timer.is_completed());
        assert_eq!(timer.time(), 5.0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn complete_with_actions() {
        let (count, action) = counter();
        let mut timer = Timer::with_completion(5.0, action);

        timer.complete(true);
        timer.complete(true);

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn reset_allows_timer_to_fire_again() {
        let (count, action) = counter();
        let mut timer = Timer::with_completion(1.0, action);

        timer.update(1.0);
        timer.reset();
        assert_eq!(timer.time(), 0.0);
        assert!(!timer.is_completed());

        timer.update(1.0);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn set_time_is_clamped() {
        let mut timer = Timer::new(10.0);

        timer.set_time(-1.0);
        assert_eq!(timer.time(), 0.0);

        timer.set_time(3.0);
        assert_eq!(timer.time(), 3.0);

        timer.set_time(12.0);
        assert_eq!(timer.time(), 10.0);
    }

    #[test]
    fn ratio() {
        let mut timer = Timer::new(4.0);
        timer.update(1.0);
        assert!((timer.ratio() - 0.25).abs() < EPSILON);

        assert_eq!(Timer::completed().ratio(), 0.0);
    }

    #[test]
    fn indefinite_timer_never_completes() {
        let mut timer = Timer::indefinite();
        for _ in 0..1000 {
            timer.update(1000.0);
        }
        assert!(!timer.is_completed());
        assert!(timer.is_indefinite());
    }

    #[test]
    fn display_format() {
        let mut timer = Timer::new(2.0);
        timer.update(1.0);
        assert_eq!(timer.to_string(), "1.0 / 2.0");
    }

    #[test]
    #[should_panic(expected = "Invalid timer duration")]
    fn negative_duration_panics() {
        Timer::new(-1.0);
    }

    #[test]
    #[should_panic(expected = "Invalid timer duration")]
    fn nan_duration_panics() {
        Timer::new(f32::NAN);
    }
}
