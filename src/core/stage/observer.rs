//=========================================================================
// Stage Observers
//=========================================================================
//
// Publish/subscribe protocol that keeps renderers in sync with the stage.
//
// Architecture:
//   Stage mutation → StageEvent → every subscribed StageObserver
//
// Retained-mode renderers mirror the stage by listening to these events.
// Immediate-mode renderers ignore them and walk the stage with a
// StageVisitor each frame instead.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;
use log::warn;

//=== Internal Dependencies ===============================================

use super::world::ModelId;
use super::NodeId;

//=== ObserverId ==========================================================

/// Subscription handle returned by [`Stage::subscribe`](super::Stage::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(super) u64);

//=== StageEvent ==========================================================

/// Change notification published by the stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEvent {
    /// A 2D layer was created on top of all existing layers.
    LayerAdded { layer: String },

    /// A node was appended to a layer.
    NodeAdded { layer: String, node: NodeId },

    /// A node was taken off a layer.
    NodeRemoved { layer: String, node: NodeId },

    /// A model was added to the 3D world.
    ModelAdded { model: ModelId },

    /// A model was removed from the 3D world.
    ModelRemoved { model: ModelId },

    /// Every layer, node and model was dropped in one operation.
    ///
    /// No per-node removal events are sent for a clear.
    Cleared,
}

//=== StageObserver =======================================================

/// Receives [`StageEvent`]s from a stage it is subscribed to.
///
/// Closures taking `&StageEvent` implement this trait directly.
pub trait StageObserver {
    fn notify(&mut self, event: &StageEvent);
}

impl<F> StageObserver for F
where
    F: FnMut(&StageEvent),
{
    fn notify(&mut self, event: &StageEvent) {
        self(event)
    }
}

//=== ChannelObserver =====================================================

/// Forwards stage events over a crossbeam channel.
///
/// Used when the consumer lives on another thread, such as a renderer
/// that uploads stage changes to the GPU. Events are dropped once the
/// receiving side has gone away.
pub struct ChannelObserver {
    sender: Sender<StageEvent>,
    disconnected: bool,
}

impl ChannelObserver {
    pub fn new(sender: Sender<StageEvent>) -> Self {
        Self {
            sender,
            disconnected: false,
        }
    }
}

impl StageObserver for ChannelObserver {
    fn notify(&mut self, event: &StageEvent) {
        if self.disconnected {
            return;
        }

        if self.sender.send(event.clone()).is_err() {
            warn!("Stage event receiver disconnected, dropping further events");
            self.disconnected = true;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
