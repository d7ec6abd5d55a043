//=========================================================================
// Frame Statistics
//=========================================================================
//
// Smoothed performance measurements collected by the frame loop.
//
// Each frame contributes its frame time, update time and render time.
// Values are exponentially weighted so the overlay does not flicker;
// the very first frame seeds the averages directly.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::BTreeMap;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use crate::core::stage::DrawStats;

//=== FrameStats ==========================================================

/// Weight of the running average against the newest sample.
const WEIGHT: f32 = 0.9;

#[derive(Debug, Clone)]
pub struct FrameStats {
    target_framerate: f32,
    framerate: f32,
    update_time_ms: f32,
    render_time_ms: f32,
    frames: u64,
    draws: DrawStats,
    counters: BTreeMap<String, u64>,
}

impl FrameStats {
    pub fn new(target_framerate: f32) -> Self {
        Self {
            target_framerate,
            framerate: 0.0,
            update_time_ms: 0.0,
            render_time_ms: 0.0,
            frames: 0,
            draws: DrawStats::default(),
            counters: BTreeMap::new(),
        }
    }

    //--- Recording --------------------------------------------------------

    /// Folds one completed frame into the averages.
    ///
    /// A zero `frame_time` leaves the framerate untouched.
    pub fn record_frame(&mut self, frame_time: Duration, update_time: Duration, render_time: Duration) {
        let update_ms = update_time.as_secs_f32() * 1000.0;
        let render_ms = render_time.as_secs_f32() * 1000.0;
        let seconds = frame_time.as_secs_f32();

        if self.frames == 0 {
            if seconds > 0.0 {
                self.framerate = 1.0 / seconds;
            }
            self.update_time_ms = update_ms;
            self.render_time_ms = render_ms;
        } else {
            if seconds > 0.0 {
                self.framerate = smooth(self.framerate, 1.0 / seconds);
            }
            self.update_time_ms = smooth(self.update_time_ms, update_ms);
            self.render_time_ms = smooth(self.render_time_ms, render_ms);
        }

        self.frames += 1;
    }

    pub fn record_draws(&mut self, draws: DrawStats) {
        self.draws = draws;
    }

    /// Increments a named instrumentation counter.
    pub fn count(&mut self, name: &str) {
        self.add_to_counter(name, 1);
    }

    pub fn add_to_counter(&mut self, name: &str, amount: u64) {
        *self.counters.entry(name.to_string()).or_insert(0) += amount;
    }

    pub fn reset_counters(&mut self) {
        self.counters.clear();
    }

    //--- Queries ----------------------------------------------------------

    pub fn target_framerate(&self) -> f32 {
        self.target_framerate
    }

    pub fn framerate(&self) -> f32 {
        self.framerate
    }

    /// Average update time in milliseconds.
    pub fn update_time_ms(&self) -> f32 {
        self.update_time_ms
    }

    /// Average render time in milliseconds.
    pub fn render_time_ms(&self) -> f32 {
        self.render_time_ms
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Draw counts of the most recent render.
    pub fn draws(&self) -> DrawStats {
        self.draws
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Counters sorted by name.
    pub fn counters(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counters.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(60.0)
    }
}

fn smooth(average: f32, sample: f32) -> f32 {
    WEIGHT * average + (1.0 - WEIGHT) * sample
}

//=========================================================================
// Unit Tests
//=========================================================================
