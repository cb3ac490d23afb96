//! Pointer gesture interpretation
//!
//! While the pointer is down, every movement is a *rub* that grows the
//! charging booger. On release, the velocity across the recent sample window
//! decides between a *flick* (launch) and a plain *release*.
//!
//! Velocity is the displacement between the oldest and newest samples in the
//! window divided by their time span. Cruder than a least-squares fit, but
//! good enough for a finger.

use std::collections::VecDeque;

use glam::Vec2;

use crate::settings::GestureTuning;

/// Receives classified gestures
pub trait GestureHandler {
    /// Pointer moved `distance` pixels while held
    fn on_rub(&mut self, distance: f32);
    /// Released fast enough to throw (velocity in px/s)
    fn on_flick(&mut self, velocity: Vec2, speed: f32);
    /// Released without a flick
    fn on_release(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Rubbing,
}

/// How a drag ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEnd {
    Flick { velocity: Vec2, speed: f32 },
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    pub pos: Vec2,
    pub time_ms: f64,
}

/// Hard cap on retained samples, on top of the time window
const MAX_SAMPLES: usize = 64;

#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    tuning: GestureTuning,
    state: GestureState,
    start_ms: f64,
    last_pos: Vec2,
    rub_distance: f32,
    history: VecDeque<DragSample>,
}

impl GestureInterpreter {
    pub fn new(tuning: GestureTuning) -> Self {
        Self {
            tuning,
            state: GestureState::Idle,
            start_ms: 0.0,
            last_pos: Vec2::ZERO,
            rub_distance: 0.0,
            history: VecDeque::with_capacity(MAX_SAMPLES),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Total rub distance of the current drag
    pub fn rub_distance(&self) -> f32 {
        self.rub_distance
    }

    /// When the current drag started
    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    pub fn history(&self) -> impl Iterator<Item = &DragSample> {
        self.history.iter()
    }

    /// Pointer down
    pub fn start_drag(&mut self, pos: Vec2, now_ms: f64) {
        self.state = GestureState::Rubbing;
        self.start_ms = now_ms;
        self.last_pos = pos;
        self.rub_distance = 0.0;
        self.history.clear();
        self.history.push_back(DragSample { pos, time_ms: now_ms });
    }

    /// Pointer moved while down. Ignored when idle.
    pub fn update_drag<H: GestureHandler>(&mut self, pos: Vec2, now_ms: f64, handler: &mut H) {
        if self.state != GestureState::Rubbing {
            return;
        }

        let delta = pos.distance(self.last_pos);
        self.last_pos = pos;
        self.record(pos, now_ms);

        if delta > 0.0 {
            self.rub_distance += delta;
            handler.on_rub(delta);
        }
    }

    /// Pointer up. Emits exactly one of flick/release when a drag was active;
    /// otherwise just resets.
    pub fn end_drag<H: GestureHandler>(
        &mut self,
        pos: Vec2,
        now_ms: f64,
        handler: &mut H,
    ) -> Option<GestureEnd> {
        if self.state != GestureState::Rubbing {
            self.reset();
            return None;
        }

        self.record(pos, now_ms);
        let end = self.classify();
        match end {
            GestureEnd::Flick { velocity, speed } => handler.on_flick(velocity, speed),
            GestureEnd::Release => handler.on_release(),
        }
        self.reset();
        Some(end)
    }

    /// Abandon any drag without emitting anything
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
        self.rub_distance = 0.0;
        self.history.clear();
    }

    fn record(&mut self, pos: Vec2, now_ms: f64) {
        self.history.push_back(DragSample { pos, time_ms: now_ms });
        let window = self.tuning.history_window_ms;
        while let Some(oldest) = self.history.front() {
            if now_ms - oldest.time_ms < window && self.history.len() <= MAX_SAMPLES {
                break;
            }
            self.history.pop_front();
        }
    }

    /// Window velocity from oldest to newest sample
    fn classify(&self) -> GestureEnd {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return GestureEnd::Release;
        };
        let dt_secs = ((last.time_ms - first.time_ms) / 1000.0) as f32;
        if self.history.len() < 2 || dt_secs <= 0.0 {
            return GestureEnd::Release;
        }

        let velocity = (last.pos - first.pos) / dt_secs;
        let speed = velocity.length();
        if speed > self.tuning.flick_threshold {
            GestureEnd::Flick { velocity, speed }
        } else {
            GestureEnd::Release
        }
    }
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(GestureTuning::default())
    }
}
