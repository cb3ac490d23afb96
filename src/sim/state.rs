//! Entity model and the per-round simulation context
//!
//! Everything the frame loop mutates lives in [`SimState`]. It is cleared
//! and re-seeded at the start of every round.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::BoogerPhysics;
use super::spawner::Spawner;
use crate::consts::*;
use crate::settings::Settings;

/// Bug species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BugKind {
    Fly,
    Mosquito,
    Ladybug,
    Bee,
    Moth,
    GoldenBeetle,
}

/// Fixed per-species attributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BugProfile {
    pub radius: f32,
    /// Horizontal speed in pixels per frame
    pub speed: f32,
    pub points: u64,
    /// Wobble angular speed (radians per millisecond)
    pub wobble_speed: f32,
    pub color: u32,
}

impl BugKind {
    pub const ALL: [BugKind; 6] = [
        BugKind::Fly,
        BugKind::Mosquito,
        BugKind::Ladybug,
        BugKind::Bee,
        BugKind::Moth,
        BugKind::GoldenBeetle,
    ];

    pub fn profile(self) -> BugProfile {
        let (radius, speed, points, wobble_speed, color) = match self {
            BugKind::Fly => (15.0, 2.0, 10, 0.005, COLOR_FLY),
            BugKind::Mosquito => (10.0, 7.0, 50, 0.01, COLOR_MOSQUITO),
            BugKind::Ladybug => (12.0, 4.0, 30, 0.005, COLOR_LADYBUG),
            BugKind::Bee => (13.0, 5.0, 80, 0.02, COLOR_BEE),
            BugKind::Moth => (18.0, 1.5, 20, 0.015, COLOR_MOTH),
            BugKind::GoldenBeetle => (12.0, 12.0, 500, 0.002, COLOR_GOLDEN_BEETLE),
        };
        BugProfile {
            radius,
            speed,
            points,
            wobble_speed,
            color,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BugKind::Fly => "fly",
            BugKind::Mosquito => "mosquito",
            BugKind::Ladybug => "ladybug",
            BugKind::Bee => "bee",
            BugKind::Moth => "moth",
            BugKind::GoldenBeetle => "goldenBeetle",
        }
    }

    /// Color of the hit explosion
    pub fn splat_color(self) -> u32 {
        match self {
            BugKind::GoldenBeetle => COLOR_GOLDEN_SPLAT,
            _ => COLOR_SPLAT,
        }
    }
}

/// A target crossing the field horizontally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: u32,
    pub pos: Vec2,
    /// `vel.x` is nonzero and points inward from the entry edge
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
    pub kind: BugKind,
    pub points: u64,
    pub wobble_offset: f32,
    pub wobble_speed: f32,
}

impl Bug {
    /// Moving toward the left edge
    pub fn heading_left(&self) -> bool {
        self.vel.x < 0.0
    }
}

/// The player's projectile, either charging under the pointer or in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booger {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
    pub rotation: f32,
    /// 1.0 for flicked boogers, 0.0 for direct-aim shots
    #[serde(default = "default_gravity_scale")]
    pub gravity_scale: f32,
}

fn default_gravity_scale() -> f32 {
    1.0
}

impl Booger {
    pub fn new(id: u32, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            color: COLOR_BOOGER,
            rotation: 0.0,
            gravity_scale: 1.0,
        }
    }
}

/// A cosmetic splat fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub radius: f32,
    pub color: u32,
    /// 0-1, decreases every frame
    pub life: f32,
}

impl Particle {
    /// Advance one frame
    pub fn tick(&mut self, decay: f32) {
        self.pos += self.vel;
        self.life -= decay;
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Things that happened during a frame or input call, drained by the round
/// controller and forwarded to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SimEvent {
    ScoreChanged { score: u64 },
    TimeChanged { remaining: f32 },
    BugSquashed { kind: BugKind, points: u64, pos: Vec2 },
    /// Charging booger burst from over-rubbing
    Nosebleed,
    BoogerLaunched { speed: f32 },
    TimeUp,
}

/// Per-round simulation context
#[derive(Debug, Clone)]
pub struct SimState {
    pub settings: Settings,
    /// Seed of the current round
    pub seed: u64,
    pub rng: Pcg32,
    pub score: u64,
    /// Seconds left in the round, never negative
    pub time_remaining: f32,
    pub bugs: Vec<Bug>,
    /// In-flight boogers
    pub boogers: Vec<Booger>,
    pub particles: Vec<Particle>,
    /// Owns the charging booger
    pub physics: BoogerPhysics,
    pub spawner: Spawner,
    /// Timestamp of the previous frame (ms)
    pub last_frame_ms: f64,
    /// Timestamp of the current frame (ms), drives bug wobble
    pub now_ms: f64,
    /// Direct-aim launcher position
    pub launcher_x: f32,
    pub events: Vec<SimEvent>,
    next_id: u32,
}

impl SimState {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.validated();
        Self {
            physics: BoogerPhysics::new(settings.physics.clone()),
            spawner: Spawner::new(settings.spawn.interval_ms),
            time_remaining: settings.round_duration_secs,
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            bugs: Vec::new(),
            boogers: Vec::new(),
            particles: Vec::new(),
            last_frame_ms: 0.0,
            now_ms: 0.0,
            launcher_x: FIELD_WIDTH / 2.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Start a fresh round at `now_ms`
    pub fn reset(&mut self, now_ms: f64, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.score = 0;
        self.time_remaining = self.settings.round_duration_secs;
        self.bugs.clear();
        self.boogers.clear();
        self.particles.clear();
        self.physics.clear();
        self.spawner.reset(now_ms);
        self.last_frame_ms = now_ms;
        self.now_ms = now_ms;
        self.launcher_x = FIELD_WIDTH / 2.0;
        self.events.clear();
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_positive() {
        for kind in BugKind::ALL {
            let p = kind.profile();
            assert!(p.radius > 0.0);
            assert!(p.speed > 0.0);
            assert!(p.points > 0);
        }
        assert_eq!(BugKind::GoldenBeetle.profile().points, 500);
        assert_eq!(BugKind::Fly.profile().speed, 2.0);
    }

    #[test]
    fn test_particle_dies_after_twenty_frames() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -1.0),
            radius: 3.0,
            color: COLOR_SPLAT,
            life: 1.0,
        };
        let mut frames = 0;
        while p.is_alive() {
            p.tick(PARTICLE_DECAY);
            frames += 1;
        }
        assert!((19..=21).contains(&frames));
        assert!((p.pos.x - frames as f32).abs() < 1e-3);
    }

    #[test]
    fn test_reset_clears_round() {
        let mut state = SimState::new(Settings::default(), 7);
        state.score = 120;
        state.time_remaining = 3.0;
        let id = state.next_entity_id();
        state.boogers.push(Booger::new(id, Vec2::ZERO, 10.0));
        state.events.push(SimEvent::Nosebleed);

        state.reset(5000.0, 8);
        assert_eq!(state.score, 0);
        assert_eq!(state.time_remaining, ROUND_DURATION_SECS);
        assert!(state.boogers.is_empty());
        assert!(state.events.is_empty());
        assert_eq!(state.last_frame_ms, 5000.0);
        assert_eq!(state.next_entity_id(), 1);
    }
}
