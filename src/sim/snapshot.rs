//! Read-only view of a frame for the presentation layer

use glam::Vec2;
use serde::Serialize;

use super::state::{BugKind, SimState};
use crate::settings::InputMode;

#[derive(Debug, Clone, Serialize)]
pub struct BugSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    pub kind: BugKind,
    /// Drawn mirrored when flying left
    pub facing_left: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoogerSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    pub rotation: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticleSprite {
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    /// Particle life, 0-1
    pub alpha: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub score: u64,
    pub time_remaining: f32,
    pub bugs: Vec<BugSprite>,
    pub charging: Option<BoogerSprite>,
    pub boogers: Vec<BoogerSprite>,
    pub particles: Vec<ParticleSprite>,
    /// Launcher x in direct-aim mode
    pub launcher_x: Option<f32>,
}

impl FrameSnapshot {
    pub fn capture(state: &SimState) -> Self {
        let booger_sprite = |b: &super::state::Booger| BoogerSprite {
            pos: b.pos,
            radius: b.radius,
            color: b.color,
            rotation: b.rotation,
        };

        Self {
            score: state.score,
            time_remaining: state.time_remaining,
            bugs: state
                .bugs
                .iter()
                .map(|bug| BugSprite {
                    pos: bug.pos,
                    radius: bug.radius,
                    color: bug.color,
                    kind: bug.kind,
                    facing_left: bug.heading_left(),
                })
                .collect(),
            charging: state.physics.charging().map(booger_sprite),
            boogers: state.boogers.iter().map(booger_sprite).collect(),
            particles: state
                .particles
                .iter()
                .map(|p| ParticleSprite {
                    pos: p.pos,
                    radius: p.radius,
                    color: p.color,
                    alpha: p.life.clamp(0.0, 1.0),
                })
                .collect(),
            launcher_x: (state.settings.input_mode == InputMode::DirectAim)
                .then_some(state.launcher_x),
        }
    }
}
