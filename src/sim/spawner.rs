//! Bug spawning
//!
//! One uniform roll picks the species through fixed cumulative breakpoints;
//! rarer bugs are faster and worth more.

use glam::Vec2;
use rand::Rng;

use super::state::{Bug, BugKind};
use crate::consts::*;

/// Map a roll in [0, 1) to a species.
///
/// Top 3% golden beetle, then 12% bee, 15% ladybug, 15% moth, 20% mosquito,
/// and the remaining 35% fly.
pub fn kind_for_roll(roll: f32) -> BugKind {
    if roll > 0.97 {
        BugKind::GoldenBeetle
    } else if roll > 0.85 {
        BugKind::Bee
    } else if roll > 0.70 {
        BugKind::Ladybug
    } else if roll > 0.55 {
        BugKind::Moth
    } else if roll > 0.35 {
        BugKind::Mosquito
    } else {
        BugKind::Fly
    }
}

/// Build a bug just outside a random side edge, heading inward
pub fn spawn_bug<R: Rng>(rng: &mut R, id: u32) -> Bug {
    let kind = kind_for_roll(rng.random::<f32>());
    let profile = kind.profile();

    let y = rng.random::<f32>() * (FIELD_HEIGHT / 2.0) + SPAWN_TOP_MARGIN;
    let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let x = if direction > 0.0 {
        -profile.radius
    } else {
        FIELD_WIDTH + profile.radius
    };
    let wobble_offset = rng.random::<f32>() * std::f32::consts::TAU;

    Bug {
        id,
        pos: Vec2::new(x, y),
        vel: Vec2::new(profile.speed * direction, 0.0),
        radius: profile.radius,
        color: profile.color,
        kind,
        points: profile.points,
        wobble_offset,
        wobble_speed: profile.wobble_speed,
    }
}

/// Spawn cadence
#[derive(Debug, Clone)]
pub struct Spawner {
    interval_ms: f64,
    last_spawn_ms: f64,
}

impl Spawner {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_spawn_ms: 0.0,
        }
    }

    /// Restart the interval from `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        self.last_spawn_ms = now_ms;
    }

    /// Strictly more than one interval since the last spawn
    pub fn due(&self, now_ms: f64) -> bool {
        now_ms - self.last_spawn_ms > self.interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashMap;

    #[test]
    fn test_breakpoints() {
        assert_eq!(kind_for_roll(0.0), BugKind::Fly);
        assert_eq!(kind_for_roll(0.35), BugKind::Fly);
        assert_eq!(kind_for_roll(0.36), BugKind::Mosquito);
        assert_eq!(kind_for_roll(0.56), BugKind::Moth);
        assert_eq!(kind_for_roll(0.71), BugKind::Ladybug);
        assert_eq!(kind_for_roll(0.86), BugKind::Bee);
        assert_eq!(kind_for_roll(0.98), BugKind::GoldenBeetle);
        assert_eq!(kind_for_roll(0.999_999), BugKind::GoldenBeetle);
    }

    #[test]
    fn test_frequencies_converge() {
        let mut rng = Pcg32::seed_from_u64(2024);
        let n = 200_000;
        let mut counts: HashMap<BugKind, usize> = HashMap::new();
        for i in 0..n {
            *counts.entry(spawn_bug(&mut rng, i).kind).or_default() += 1;
        }
        let expected = [
            (BugKind::GoldenBeetle, 0.03),
            (BugKind::Bee, 0.12),
            (BugKind::Ladybug, 0.15),
            (BugKind::Moth, 0.15),
            (BugKind::Mosquito, 0.20),
            (BugKind::Fly, 0.35),
        ];
        for (kind, p) in expected {
            let freq = *counts.get(&kind).unwrap_or(&0) as f64 / n as f64;
            assert!((freq - p).abs() < 0.01, "{:?}: {} vs {}", kind, freq, p);
        }
    }

    #[test]
    fn test_spawn_enters_inward() {
        let mut rng = Pcg32::seed_from_u64(5);
        for i in 0..500 {
            let bug = spawn_bug(&mut rng, i);
            assert!(bug.vel.x != 0.0);
            assert_eq!(bug.vel.y, 0.0);
            if bug.vel.x > 0.0 {
                assert_eq!(bug.pos.x, -bug.radius);
            } else {
                assert_eq!(bug.pos.x, FIELD_WIDTH + bug.radius);
            }
            assert!(bug.pos.y >= SPAWN_TOP_MARGIN);
            assert!(bug.pos.y <= FIELD_HEIGHT / 2.0 + SPAWN_TOP_MARGIN);
            assert!((0.0..=std::f32::consts::TAU).contains(&bug.wobble_offset));
            assert_eq!(bug.points, bug.kind.profile().points);
        }
    }

    #[test]
    fn test_spawner_interval() {
        let mut spawner = Spawner::new(SPAWN_INTERVAL_MS);
        spawner.reset(1000.0);
        assert!(!spawner.due(1800.0));
        assert!(spawner.due(1800.5));
        spawner.reset(1800.5);
        assert!(!spawner.due(2000.0));
    }

    proptest! {
        #[test]
        fn prop_every_roll_maps_to_one_kind(roll in 0.0f32..1.0) {
            let kind = kind_for_roll(roll);
            prop_assert!(BugKind::ALL.contains(&kind));
        }
    }
}
