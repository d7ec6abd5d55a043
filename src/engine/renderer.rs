//=========================================================================
// Renderer Contract & Errors
//=========================================================================
//
// A renderer is a `StageVisitor` that can also put the finished frame on
// screen. The engine visits the stage with it once per frame and then
// calls `present()`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::stage::{CollectingVisitor, StageVisitor};

//=== Renderer ============================================================

pub trait Renderer: StageVisitor {
    /// Short backend name, shown in debug information.
    fn name(&self) -> &str;

    /// Displays the frame drawn during the last visit.
    fn present(&mut self) -> Result<(), RendererError> {
        Ok(())
    }
}

/// Headless rendering: callbacks are recorded, nothing is displayed.
impl Renderer for CollectingVisitor {
    fn name(&self) -> &str {
        "Headless"
    }
}

//=== RendererError =======================================================

/// Failure of a rendering backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererError {
    /// The backend could not display the frame.
    Presentation(String),

    /// The graphics context went away (window closed, device lost).
    ContextLost,
}

impl fmt::Display for RendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presentation(e) => write!(f, "Frame presentation failed: {}", e),
            Self::ContextLost => write!(f, "Graphics context lost"),
        }
    }
}

impl std::error::Error for RendererError {}

//=== EngineError =========================================================

/// Reason the frame loop stopped abnormally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    Renderer(RendererError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renderer(e) => write!(f, "Renderer error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Renderer(e) => Some(e),
        }
    }
}

impl From<RendererError> for EngineError {
    fn from(error: RendererError) -> Self {
        Self::Renderer(error)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn collecting_visitor_is_headless_renderer() {
        let mut renderer = CollectingVisitor::new();

        assert_eq!(renderer.name(), "Headless");
        assert_eq!(renderer.present(), Ok(()));
    }

    #[test]
    fn engine_error_wraps_renderer_error() {
        let error = EngineError::from(RendererError::Presentation("swapchain".to_string()));

        assert_eq!(
            error.to_string(),
            "Renderer error: Frame presentation failed: swapchain"
        );
        assert!(error.source().is_some());
    }
}
