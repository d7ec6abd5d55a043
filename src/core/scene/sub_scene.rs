//=========================================================================
// Sub-Scene Helpers
//=========================================================================
//
// Ready-made `Scene` implementations for short-lived scene parts.
//
//   SubScene   = closure + Timer (completes when the timer does)
//   AgentScene = Agent adapted to the Scene contract
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::{Agent, Scene, SceneContext};
use crate::core::fsm::Timer;

//=== SubScene ============================================================

type SubSceneLogic = Box<dyn FnMut(&mut SceneContext, f32)>;

/// Closure-driven sub-scene with an optional time limit.
pub struct SubScene {
    logic: SubSceneLogic,
    timer: Timer,
}

impl SubScene {
    /// Runs `logic` every frame until the parent ends or it is detached.
    pub fn new(logic: impl FnMut(&mut SceneContext, f32) + 'static) -> Self {
        Self {
            logic: Box::new(logic),
            timer: Timer::indefinite(),
        }
    }

    /// Runs `logic` every frame and completes after `duration` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `duration` is negative.
    pub fn timed(duration: f32, logic: impl FnMut(&mut SceneContext, f32) + 'static) -> Self {
        Self {
            logic: Box::new(logic),
            timer: Timer::new(duration),
        }
    }

    /// Sub-scene that does nothing but wait.
    pub fn delay(duration: f32) -> Self {
        Self::timed(duration, |_, _| {})
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }
}

impl Scene for SubScene {
    fn update(&mut self, context: &mut SceneContext, delta_time: f32) {
        (self.logic)(context, delta_time);
        self.timer.update(delta_time);
    }

    fn is_completed(&self) -> bool {
        self.timer.is_completed()
    }
}

impl fmt::Debug for SubScene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubScene").field("timer", &self.timer).finish_non_exhaustive()
    }
}

//=== AgentScene ==========================================================

/// Wraps an [`Agent`] so it can be attached like any other scene.
#[derive(Debug)]
pub struct AgentScene<A> {
    agent: A,
}

impl<A: Agent> AgentScene<A> {
    pub fn new(agent: A) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &A {
        &self.agent
    }
}

impl<A: Agent> Scene for AgentScene<A> {
    fn update(&mut self, _context: &mut SceneContext, delta_time: f32) {
        self.agent.update(delta_time);
    }

    fn is_completed(&self) -> bool {
        self.agent.is_completed()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
