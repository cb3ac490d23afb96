//! Round lifecycle: menu -> playing -> game over -> playing ...
//!
//! Owns the simulation context and gesture interpreter, routes pointer input
//! while a round is playing, and settles score, high score and commentary
//! when the timer runs out.
//!
//! Commentary is asynchronous. Finishing a round hands out a
//! [`CommentaryRequest`] tagged with the round's generation; whatever answers
//! it later calls [`RoundController::deliver_commentary`]. Answers for an
//! older round, or a second answer for the same round, are dropped.

use glam::Vec2;

use crate::commentary::{self, CommentaryConfig};
use crate::error::CommentaryError;
use crate::highscores::HighScore;
use crate::settings::{InputMode, Settings};
use crate::sim::{FrameSnapshot, FrameStatus, GestureInterpreter, SimEvent, SimState, tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Menu,
    Playing,
    GameOver,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::Menu => "menu",
            RoundPhase::Playing => "playing",
            RoundPhase::GameOver => "game over",
        }
    }
}

/// A commentary request the platform layer should fulfil
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentaryRequest {
    pub generation: u64,
    pub score: u64,
}

/// Commentary shown on the game-over screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommentaryStatus {
    #[default]
    Idle,
    Loading,
    Ready(String),
}

/// Outcome of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub score: u64,
    /// RNG seed the round was played with, enough to replay it
    pub seed: u64,
    pub high_score: u64,
    pub new_high_score: bool,
}

pub struct RoundController {
    phase: RoundPhase,
    sim: SimState,
    gesture: GestureInterpreter,
    high_score: HighScore,
    commentary_config: CommentaryConfig,
    commentary: CommentaryStatus,
    pending_request: Option<CommentaryRequest>,
    /// Bumped on every round start
    generation: u64,
    last_summary: Option<RoundSummary>,
}

impl RoundController {
    pub fn new(
        settings: Settings,
        high_score: HighScore,
        commentary_config: CommentaryConfig,
    ) -> Self {
        let settings = settings.validated();
        Self {
            phase: RoundPhase::Menu,
            gesture: GestureInterpreter::new(settings.gesture.clone()),
            sim: SimState::new(settings, 0),
            high_score,
            commentary_config,
            commentary: CommentaryStatus::Idle,
            pending_request: None,
            generation: 0,
            last_summary: None,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u64 {
        self.sim.score
    }

    pub fn time_remaining(&self) -> f32 {
        self.sim.time_remaining
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn commentary(&self) -> &CommentaryStatus {
        &self.commentary
    }

    pub fn is_loading_commentary(&self) -> bool {
        self.commentary == CommentaryStatus::Loading
    }

    pub fn last_summary(&self) -> Option<RoundSummary> {
        self.last_summary
    }

    pub fn input_mode(&self) -> InputMode {
        self.sim.settings.input_mode
    }

    pub fn settings(&self) -> &Settings {
        &self.sim.settings
    }

    /// Switch input scheme between rounds
    pub fn set_input_mode(&mut self, mode: InputMode) -> bool {
        if self.phase == RoundPhase::Playing {
            return false;
        }
        self.sim.settings.input_mode = mode;
        true
    }

    /// Read-only simulation state (tests, debugging)
    pub fn sim(&self) -> &SimState {
        &self.sim
    }

    /// Start (or restart) a round. Ignored while a round is playing.
    pub fn start(&mut self, now_ms: f64, seed: u64) -> bool {
        if self.phase == RoundPhase::Playing {
            return false;
        }
        self.generation += 1;
        self.sim.reset(now_ms, seed);
        self.gesture.reset();
        self.commentary = CommentaryStatus::Idle;
        self.pending_request = None;
        self.set_phase(RoundPhase::Playing);
        self.sim.events.push(SimEvent::ScoreChanged { score: 0 });
        self.sim.events.push(SimEvent::TimeChanged {
            remaining: self.sim.time_remaining,
        });
        log::info!("Round {} started (seed {})", self.generation, seed);
        true
    }

    /// Run one animation frame. No-op outside a round.
    pub fn frame(&mut self, now_ms: f64) -> FrameStatus {
        if self.phase != RoundPhase::Playing {
            return FrameStatus::Ended;
        }
        let status = tick(&mut self.sim, now_ms);
        if status == FrameStatus::Ended {
            self.finish_round();
        }
        status
    }

    fn set_phase(&mut self, phase: RoundPhase) {
        log::debug!("Phase {} -> {}", self.phase.as_str(), phase.as_str());
        self.phase = phase;
    }

    fn finish_round(&mut self) {
        self.set_phase(RoundPhase::GameOver);
        self.gesture.reset();
        self.sim.physics.clear();

        let score = self.sim.score;
        let new_high_score = self.high_score.record(score);
        if new_high_score {
            log::info!("New high score: {}", score);
            if let Err(e) = self.high_score.save() {
                log::warn!("Could not save high score: {}", e);
            }
        }
        self.last_summary = Some(RoundSummary {
            score,
            seed: self.sim.seed,
            high_score: self.high_score.best(),
            new_high_score,
        });
        log::info!("Round {} over with {} points", self.generation, score);

        if self.commentary_config.has_credential() {
            self.commentary = CommentaryStatus::Loading;
            self.pending_request = Some(CommentaryRequest {
                generation: self.generation,
                score,
            });
        } else {
            self.commentary = CommentaryStatus::Ready(commentary::resolve(Err(
                CommentaryError::MissingCredential,
            )));
        }
    }

    /// Commentary request waiting to be sent, at most once per round
    pub fn take_commentary_request(&mut self) -> Option<CommentaryRequest> {
        self.pending_request.take()
    }

    pub fn commentary_config(&self) -> &CommentaryConfig {
        &self.commentary_config
    }

    /// Apply a commentary answer. Returns false if it was stale or duplicate.
    pub fn deliver_commentary(
        &mut self,
        generation: u64,
        result: Result<String, CommentaryError>,
    ) -> bool {
        if generation != self.generation || self.commentary != CommentaryStatus::Loading {
            log::debug!(
                "Dropping commentary for round {} (current {})",
                generation,
                self.generation
            );
            return false;
        }
        self.commentary = CommentaryStatus::Ready(commentary::resolve(result));
        true
    }

    /// Pointer pressed at field coordinates
    pub fn pointer_down(&mut self, pos: Vec2, now_ms: f64) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        match self.sim.settings.input_mode {
            InputMode::Flick => {
                self.sim.begin_charge(pos);
                self.gesture.start_drag(pos, now_ms);
            }
            InputMode::DirectAim => {
                self.sim.aim(pos.x);
                self.sim.fire_direct();
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Vec2, now_ms: f64) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        match self.sim.settings.input_mode {
            InputMode::Flick => {
                self.sim.drag_charge(pos);
                self.gesture.update_drag(pos, now_ms, &mut self.sim);
            }
            InputMode::DirectAim => self.sim.aim(pos.x),
        }
    }

    pub fn pointer_up(&mut self, pos: Vec2, now_ms: f64) {
        if self.phase != RoundPhase::Playing {
            self.gesture.reset();
            return;
        }
        if self.sim.settings.input_mode == InputMode::Flick {
            self.gesture.end_drag(pos, now_ms, &mut self.sim);
        }
    }

    /// Events since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.sim.drain_events()
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.sim)
    }
}
