//=========================================================================
// Signal Collector
//=========================================================================
//
// Drains control signals sent through an `EngineHandle`, bounded per
// frame so a flood of input cannot starve the frame loop.
//
// Architecture:
//   Receiver<EngineSignal> → collect_frame() → input events → TickControl
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== TickControl =========================================================

/// Frame loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EngineSignal ========================================================

#[derive(Debug, Clone)]
pub(crate) enum EngineSignal {
    /// Input events gathered by the embedding application.
    Input(Vec<InputEvent>),

    /// Stop after the current frame.
    Quit,
}

//=== EngineHandle ========================================================

/// Thread-safe remote control for a running [`Engine`](super::Engine).
///
/// Clone it freely. Every method returns `false` once the engine is gone.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: Sender<EngineSignal>,
}

impl EngineHandle {
    pub(crate) fn new(sender: Sender<EngineSignal>) -> Self {
        Self { sender }
    }

    /// Queues input for the next frame. Empty batches are not sent.
    ///
    /// Blocks while the control channel is full.
    pub fn send_input(&self, events: Vec<InputEvent>) -> bool {
        if events.is_empty() {
            return true;
        }
        self.sender.send(EngineSignal::Input(events)).is_ok()
    }

    /// Asks the frame loop to stop after the current frame.
    pub fn request_quit(&self) -> bool {
        self.sender.send(EngineSignal::Quit).is_ok()
    }
}

//=== SignalCollector =====================================================

const MAX_SIGNALS_PER_FRAME: usize = 100;

pub(crate) struct SignalCollector {
    receiver: Receiver<EngineSignal>,
    events: Vec<InputEvent>,
}

impl SignalCollector {
    pub(crate) fn new(receiver: Receiver<EngineSignal>) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(16),
        }
    }

    /// Collects pending signals (bounded to prevent starvation).
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.events.clear();
        let mut drained = 0;

        while drained < MAX_SIGNALS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(EngineSignal::Input(batch)) => {
                    self.events.extend(batch);
                    drained += 1;
                }
                Ok(EngineSignal::Quit) => return TickControl::Exit,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_SIGNALS_PER_FRAME {
            warn!("Control channel backlog: drained {} signals this frame", drained);
        }

        TickControl::Continue
    }

    /// Input events collected this frame, in arrival order.
    pub(crate) fn events(&self) -> &[InputEvent] {
        &self.events
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, Modifiers};
    use crossbeam_channel::unbounded;
    use glam::Vec2;

    fn key(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<EngineSignal>();
        let mut collector = SignalCollector::new(rx);

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert!(collector.events().is_empty());
    }

    #[test]
    fn collect_concatenates_batches_in_order() {
        let (tx, rx) = unbounded();
        let handle = EngineHandle::new(tx);
        let mut collector = SignalCollector::new(rx);

        handle.send_input(vec![key(KeyCode::KeyA)]);
        handle.send_input(vec![InputEvent::PointerMoved {
            position: Vec2::new(10.0, 20.0),
        }]);

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert_eq!(collector.events().len(), 2);
        assert_eq!(collector.events()[0], key(KeyCode::KeyA));
    }

    #[test]
    fn collect_clears_previous_events() {
        let (tx, rx) = unbounded();
        let handle = EngineHandle::new(tx);
        let mut collector = SignalCollector::new(rx);

        handle.send_input(vec![key(KeyCode::Space)]);
        collector.collect_frame();
        assert_eq!(collector.events().len(), 1);

        collector.collect_frame();
        assert!(collector.events().is_empty());
    }

    #[test]
    fn collect_returns_exit_on_quit() {
        let (tx, rx) = unbounded();
        let handle = EngineHandle::new(tx);
        let mut collector = SignalCollector::new(rx);

        assert!(handle.request_quit());

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<EngineSignal>();
        let mut collector = SignalCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let handle = EngineHandle::new(tx);
        let mut collector = SignalCollector::new(rx);

        for _ in 0..MAX_SIGNALS_PER_FRAME + 5 {
            handle.send_input(vec![key(KeyCode::KeyW)]);
        }

        collector.collect_frame();
        assert_eq!(collector.events().len(), MAX_SIGNALS_PER_FRAME);

        collector.collect_frame();
        assert_eq!(collector.events().len(), 5);
    }

    #[test]
    fn empty_input_is_not_sent() {
        let (tx, rx) = unbounded::<EngineSignal>();
        let handle = EngineHandle::new(tx);

        assert!(handle.send_input(Vec::new()));
        assert!(rx.is_empty());
    }

    #[test]
    fn handle_reports_dropped_engine() {
        let (tx, rx) = unbounded::<EngineSignal>();
        let handle = EngineHandle::new(tx);
        drop(rx);

        assert!(!handle.request_quit());
        assert!(!handle.send_input(vec![key(KeyCode::KeyQ)]));
    }
}
