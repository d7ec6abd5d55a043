//=========================================================================
// Media & Network Contracts
//=========================================================================
//
// Collaborator interfaces scenes use for asset loading and transport.
//
// Architecture:
//   scene ──load_image()──> MediaLoader ──> AssetHandle<T> (pending)
//                                             ↑
//   loader thread ──AssetSender<T>::resolve()─┘  (crossbeam channel)
//
// Nothing here blocks. A scene keeps the handle and polls it on later
// frames until the value (or an error) arrives.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

//=== Internal Dependencies ===============================================

use crate::core::stage::Image;

//=== MediaError ==========================================================

/// Failure to load an asset or complete a network request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// No resource exists at the requested location.
    NotFound(String),

    /// The collaborator cannot handle this kind of request.
    Unsupported(String),

    /// Reading or transferring the resource failed.
    Io(String),

    /// The producer went away before delivering a result.
    Disconnected,
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(location) => write!(f, "Resource not found: {}", location),
            Self::Unsupported(what) => write!(f, "Unsupported request: {}", what),
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Disconnected => write!(f, "Asset producer disconnected"),
        }
    }
}

impl std::error::Error for MediaError {}

//=== AssetHandle =========================================================

enum AssetState<T> {
    Pending(Receiver<Result<T, MediaError>>),
    Ready(T),
    Failed(MediaError),
}

/// Result of an asynchronous load that may not have arrived yet.
pub struct AssetHandle<T> {
    state: AssetState<T>,
}

/// Producer side of a pending [`AssetHandle`].
pub struct AssetSender<T> {
    sender: Sender<Result<T, MediaError>>,
}

impl<T> AssetHandle<T> {
    //--- Construction -----------------------------------------------------

    /// Creates an unresolved handle together with the sender that resolves it.
    ///
    /// The sender is `Send` when `T` is, so it can be moved to a loader
    /// thread.
    pub fn pending() -> (AssetSender<T>, Self) {
        let (sender, receiver) = bounded(1);
        (
            AssetSender { sender },
            Self {
                state: AssetState::Pending(receiver),
            },
        )
    }

    pub fn ready(value: T) -> Self {
        Self {
            state: AssetState::Ready(value),
        }
    }

    pub fn failed(error: MediaError) -> Self {
        Self {
            state: AssetState::Failed(error),
        }
    }

    //--- Polling ----------------------------------------------------------

    /// Picks up a delivered result, if any. Returns `true` once resolved.
    pub fn poll(&mut self) -> bool {
        let AssetState::Pending(receiver) = &self.state else {
            return true;
        };

        let next = match receiver.try_recv() {
            Ok(Ok(value)) => AssetState::Ready(value),
            Ok(Err(error)) => AssetState::Failed(error),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => AssetState::Failed(MediaError::Disconnected),
        };

        self.state = next;
        true
    }

    /// The loaded value, polling first.
    pub fn get(&mut self) -> Option<&T> {
        self.poll();
        match &self.state {
            AssetState::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The load failure, polling first.
    pub fn error(&mut self) -> Option<&MediaError> {
        self.poll();
        match &self.state {
            AssetState::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, AssetState::Pending(_))
    }

    /// Consumes a resolved handle. Returns `None` while still pending.
    pub fn into_result(mut self) -> Option<Result<T, MediaError>> {
        self.poll();
        match self.state {
            AssetState::Pending(_) => None,
            AssetState::Ready(value) => Some(Ok(value)),
            AssetState::Failed(error) => Some(Err(error)),
        }
    }
}

impl<T> fmt::Debug for AssetHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            AssetState::Pending(_) => "pending",
            AssetState::Ready(_) => "ready",
            AssetState::Failed(_) => "failed",
        };
        f.debug_struct("AssetHandle").field("state", &state).finish()
    }
}

impl<T> AssetSender<T> {
    /// Delivers the value. Returns `false` if the handle was dropped.
    pub fn resolve(self, value: T) -> bool {
        self.sender.send(Ok(value)).is_ok()
    }

    /// Delivers a failure. Returns `false` if the handle was dropped.
    pub fn fail(self, error: MediaError) -> bool {
        self.sender.send(Err(error)).is_ok()
    }
}

//=== Collaborator Contracts ==============================================

/// Loads media files referenced by path.
pub trait MediaLoader {
    fn load_image(&mut self, path: &str) -> AssetHandle<Image>;

    fn load_text(&mut self, path: &str) -> AssetHandle<String>;
}

/// HTTP-style request transport.
pub trait Network {
    fn get(&mut self, url: &str) -> AssetHandle<String>;

    fn post(&mut self, url: &str, body: &str) -> AssetHandle<String>;
}

//=== Null Collaborators ==================================================

/// Loader for applications that have no media backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMediaLoader;

impl MediaLoader for NullMediaLoader {
    fn load_image(&mut self, path: &str) -> AssetHandle<Image> {
        AssetHandle::failed(MediaError::Unsupported(format!("image {}", path)))
    }

    fn load_text(&mut self, path: &str) -> AssetHandle<String> {
        AssetHandle::failed(MediaError::Unsupported(format!("text {}", path)))
    }
}

/// Network for applications that never go online.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNetwork;

impl Network for NullNetwork {
    fn get(&mut self, url: &str) -> AssetHandle<String> {
        AssetHandle::failed(MediaError::Unsupported(format!("GET {}", url)))
    }

    fn post(&mut self, url: &str, _body: &str) -> AssetHandle<String> {
        AssetHandle::failed(MediaError::Unsupported(format!("POST {}", url)))
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
