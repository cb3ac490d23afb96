//! Booger Blaster - rub a booger, flick it at bugs
//!
//! Core modules:
//! - `sim`: Simulation core (gestures, projectile physics, spawning, frame loop)
//! - `round`: Menu / playing / game-over state machine
//! - `commentary`: Post-game AI commentary boundary
//! - `highscores`: Persisted best score
//! - `settings`: Data-driven tuning
//! - `renderer`: Canvas 2D presentation (wasm only)

pub mod commentary;
pub mod error;
pub mod highscores;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod round;
pub mod settings;
pub mod sim;

pub use commentary::CommentaryConfig;
pub use error::{CommentaryError, StorageError};
pub use highscores::HighScore;
pub use round::{RoundController, RoundPhase};
pub use settings::{InputMode, Settings};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (logical pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Round length in seconds
    pub const ROUND_DURATION_SECS: f32 = 30.0;
    /// Frame gaps above this are treated as a timing reset (tab was hidden)
    pub const MAX_FRAME_GAP_MS: f64 = 1000.0;

    /// Time between bug spawns
    pub const SPAWN_INTERVAL_MS: f64 = 800.0;
    /// Bugs enter the top half of the field, offset down by this much
    pub const SPAWN_TOP_MARGIN: f32 = 50.0;
    /// Bugs are removed this far past the edge they fly toward
    pub const BUG_DESPAWN_MARGIN: f32 = 50.0;
    /// Peak per-frame vertical bob of a bug
    pub const WOBBLE_AMPLITUDE: f32 = 0.5;

    /// Charging booger growth
    pub const BOOGER_MIN_RADIUS: f32 = 10.0;
    pub const BOOGER_MAX_RADIUS: f32 = 40.0;
    /// Radius gained per pixel rubbed
    pub const BOOGER_GROWTH_RATE: f32 = 0.05;
    /// Accumulated rub distance that triggers a nosebleed
    pub const MAX_RUB_STRESS: f32 = 1000.0;

    /// Ballistics (pixels/s², radians/s)
    pub const GRAVITY: f32 = 800.0;
    pub const BOOGER_SPIN_RATE: f32 = 10.0;

    /// Projectile removal margins past the field edges
    pub const BOOGER_BOTTOM_MARGIN: f32 = 50.0;
    pub const BOOGER_SIDE_MARGIN: f32 = 100.0;
    pub const BOOGER_TOP_MARGIN: f32 = 100.0;

    /// Gesture classification
    pub const FLICK_THRESHOLD: f32 = 300.0;
    pub const GESTURE_WINDOW_MS: f64 = 300.0;

    /// Hit explosion
    pub const EXPLOSION_PARTICLES: usize = 8;
    /// Particle velocity components are drawn from [-SPREAD/2, SPREAD/2) px/frame
    pub const EXPLOSION_SPREAD: f32 = 8.0;
    /// Life lost per frame (about 20 frames at 60 Hz)
    pub const PARTICLE_DECAY: f32 = 0.05;

    /// Direct-aim launcher
    pub const LAUNCHER_Y_OFFSET: f32 = 70.0;
    pub const LAUNCHER_EDGE_CLAMP: f32 = 20.0;
    pub const DIRECT_SHOT_RADIUS: f32 = 6.0;
    pub const DIRECT_SHOT_SPEED: f32 = 720.0;

    /// Colors (0xRRGGBB)
    pub const COLOR_BOOGER: u32 = 0xbef264;
    pub const COLOR_SPLAT: u32 = 0xa3e635;
    pub const COLOR_GOLDEN_SPLAT: u32 = 0xfde047;
    pub const COLOR_FLY: u32 = 0x1e293b;
    pub const COLOR_MOSQUITO: u32 = 0x991b1b;
    pub const COLOR_LADYBUG: u32 = 0xdc2626;
    pub const COLOR_BEE: u32 = 0xfbbf24;
    pub const COLOR_MOTH: u32 = 0x94a3b8;
    pub const COLOR_GOLDEN_BEETLE: u32 = 0xfacc15;
}

/// Format a 0xRRGGBB color as a CSS hex string
pub fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0xff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(consts::COLOR_BOOGER), "#bef264");
        assert_eq!(css_color(0x0000ff), "#0000ff");
    }
}
