//! Per-frame simulation loop
//!
//! Called once per animation frame while a round is playing. Bug and particle
//! motion is per frame, booger ballistics are per second.

use glam::Vec2;
use rand::Rng;

use super::collision::{booger_hits_bug, booger_out_of_bounds, bug_out_of_bounds};
use super::gesture::GestureHandler;
use super::physics::GrowOutcome;
use super::spawner::spawn_bug;
use super::state::{Particle, SimEvent, SimState};
use crate::consts::*;

/// Whether the caller should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    /// Round is over (or not running); don't schedule another frame
    Ended,
}

/// Advance the round to `now_ms` (animation frame timestamp)
pub fn tick(state: &mut SimState, now_ms: f64) -> FrameStatus {
    // 1. Frame timing. A huge gap means the tab was hidden: resync, don't step.
    let elapsed_ms = (now_ms - state.last_frame_ms).max(0.0);
    state.last_frame_ms = now_ms;
    state.now_ms = now_ms;
    if elapsed_ms > MAX_FRAME_GAP_MS {
        log::debug!("Skipping frame after {:.0} ms gap", elapsed_ms);
        return FrameStatus::Continue;
    }
    let dt = (elapsed_ms / 1000.0) as f32;

    // 2. Round timer
    state.time_remaining -= dt;
    if state.time_remaining <= 0.0 {
        state.time_remaining = 0.0;
        state.events.push(SimEvent::TimeChanged { remaining: 0.0 });
        state.events.push(SimEvent::TimeUp);
        return FrameStatus::Ended;
    }
    state.events.push(SimEvent::TimeChanged {
        remaining: state.time_remaining,
    });

    // 3. Spawning
    if state.spawner.due(now_ms) {
        state.spawner.reset(now_ms);
        let id = state.next_entity_id();
        let bug = spawn_bug(&mut state.rng, id);
        log::trace!("Spawned {} #{} at {:?}", bug.kind.as_str(), bug.id, bug.pos);
        state.bugs.push(bug);
    }

    // 4. Booger ballistics
    state.physics.update(dt, &mut state.boogers);

    // 5. Bugs fly across with a sinusoidal bob
    for bug in &mut state.bugs {
        bug.pos.x += bug.vel.x;
        // Phase in f64: ms timestamps outgrow f32 precision on long-lived tabs
        let phase = now_ms * bug.wobble_speed as f64 + bug.wobble_offset as f64;
        bug.pos.y += phase.sin() as f32 * WOBBLE_AMPLITUDE;
    }
    state.bugs.retain(|bug| !bug_out_of_bounds(bug));

    // 6. Booger vs bug. Reverse order so removal keeps indices valid.
    for i in (0..state.boogers.len()).rev() {
        if booger_out_of_bounds(state.boogers[i].pos) {
            state.boogers.swap_remove(i);
            continue;
        }

        let hit = state
            .bugs
            .iter()
            .position(|bug| booger_hits_bug(&state.boogers[i], bug));
        if let Some(j) = hit {
            let bug = state.bugs.swap_remove(j);
            state.boogers.swap_remove(i);
            spawn_explosion(state, bug.pos, bug.kind.splat_color());
            state.score += bug.points;
            log::debug!(
                "Squashed {} for {} (score {})",
                bug.kind.as_str(),
                bug.points,
                state.score
            );
            state.events.push(SimEvent::BugSquashed {
                kind: bug.kind,
                points: bug.points,
                pos: bug.pos,
            });
            state.events.push(SimEvent::ScoreChanged { score: state.score });
        }
    }

    // 7. Particles
    let decay = state.settings.particle_decay;
    for particle in &mut state.particles {
        particle.tick(decay);
    }
    state.particles.retain(Particle::is_alive);

    FrameStatus::Continue
}

/// Burst of splat particles at a hit
fn spawn_explosion(state: &mut SimState, pos: Vec2, color: u32) {
    let half = EXPLOSION_SPREAD / 2.0;
    for _ in 0..EXPLOSION_PARTICLES {
        let vel = Vec2::new(
            state.rng.random_range(-half..half),
            state.rng.random_range(-half..half),
        );
        state.particles.push(Particle {
            pos,
            vel,
            radius: state.rng.random_range(2.0..6.0),
            color,
            life: 1.0,
        });
    }
}

impl SimState {
    /// Pointer down in flick mode: start a booger unless one is charging
    pub fn begin_charge(&mut self, pos: Vec2) {
        if self.physics.is_charging() {
            return;
        }
        let id = self.next_entity_id();
        self.physics.create_booger(id, pos);
    }

    /// Charging booger follows the pointer
    pub fn drag_charge(&mut self, pos: Vec2) {
        self.physics.track(pos);
    }

    /// Move the direct-aim launcher
    pub fn aim(&mut self, x: f32) {
        self.launcher_x = x.clamp(LAUNCHER_EDGE_CLAMP, FIELD_WIDTH - LAUNCHER_EDGE_CLAMP);
    }

    /// Direct-aim shot: a small booger straight up, unaffected by gravity
    pub fn fire_direct(&mut self) {
        let id = self.next_entity_id();
        let origin = Vec2::new(self.launcher_x, FIELD_HEIGHT - LAUNCHER_Y_OFFSET);
        self.physics.create_booger(id, origin);
        let velocity = Vec2::new(0.0, -DIRECT_SHOT_SPEED);
        if let Some(mut booger) = self.physics.launch_booger(velocity, DIRECT_SHOT_SPEED) {
            booger.radius = DIRECT_SHOT_RADIUS;
            booger.gravity_scale = 0.0;
            booger.rotation = self.rng.random::<f32>() * std::f32::consts::TAU;
            self.boogers.push(booger);
            self.events.push(SimEvent::BoogerLaunched {
                speed: DIRECT_SHOT_SPEED,
            });
        }
    }
}

impl GestureHandler for SimState {
    fn on_rub(&mut self, distance: f32) {
        if self.physics.grow_booger(distance) == GrowOutcome::Nosebleed {
            log::debug!("Nosebleed! Rubbed past {}", self.physics.tuning().max_rub_stress);
            self.events.push(SimEvent::Nosebleed);
        }
    }

    fn on_flick(&mut self, velocity: Vec2, speed: f32) {
        if let Some(booger) = self.physics.launch_booger(velocity, speed) {
            self.boogers.push(booger);
            self.events.push(SimEvent::BoogerLaunched { speed });
        }
    }

    fn on_release(&mut self) {
        // A booger that wasn't flicked is dropped, not thrown
        self.physics.discard();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{Booger, Bug, BugKind};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn started(seed: u64) -> SimState {
        let mut state = SimState::new(Settings::default(), seed);
        state.reset(10_000.0, seed);
        state
    }

    fn bug(id: u32, kind: BugKind, pos: Vec2, vel_x: f32) -> Bug {
        let p = kind.profile();
        Bug {
            id,
            pos,
            vel: Vec2::new(vel_x, 0.0),
            radius: p.radius,
            color: p.color,
            kind,
            points: p.points,
            wobble_offset: 0.0,
            wobble_speed: 0.0,
        }
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut state = started(1);
        let mut now = 10_000.0;
        for _ in 0..40 {
            now += FRAME_MS / 2.0;
            assert_eq!(tick(&mut state, now), FrameStatus::Continue);
        }
        // ~333 ms in
        assert!(state.bugs.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_spawns_after_interval() {
        let mut state = started(2);
        let mut now = 10_000.0;
        while now < 10_000.0 + SPAWN_INTERVAL_MS + 20.0 {
            now += FRAME_MS;
            tick(&mut state, now);
        }
        assert_eq!(state.bugs.len(), 1);
    }

    #[test]
    fn test_timer_counts_down_and_ends_once() {
        let mut state = started(3);
        let mut now = 10_000.0;
        let mut last = state.time_remaining;
        let mut ended_at = None;
        for frame in 0..2000 {
            now += FRAME_MS;
            let status = tick(&mut state, now);
            assert!(state.time_remaining <= last);
            assert!(state.time_remaining >= 0.0);
            last = state.time_remaining;
            if status == FrameStatus::Ended {
                ended_at = Some(frame);
                break;
            }
        }
        let frames = ended_at.expect("round should end");
        // 30 s at 60 fps
        assert!((1795..=1805).contains(&frames));
        assert_eq!(state.time_remaining, 0.0);
        let events = state.drain_events();
        assert_eq!(events.last(), Some(&SimEvent::TimeUp));
        assert_eq!(events.iter().filter(|e| **e == SimEvent::TimeUp).count(), 1);
    }

    #[test]
    fn test_large_gap_skips_frame() {
        let mut state = started(4);
        let id = state.next_entity_id();
        state.bugs.push(bug(id, BugKind::Fly, Vec2::new(100.0, 100.0), 2.0));
        let status = tick(&mut state, 10_000.0 + 5_000.0);
        assert_eq!(status, FrameStatus::Continue);
        assert_eq!(state.time_remaining, ROUND_DURATION_SECS);
        assert_eq!(state.bugs[0].pos.x, 100.0);
        assert_eq!(state.last_frame_ms, 15_000.0);
        // Next normal frame advances from the resynced time
        tick(&mut state, 15_000.0 + FRAME_MS);
        assert!(state.time_remaining < ROUND_DURATION_SECS);
        assert_eq!(state.bugs[0].pos.x, 102.0);
    }

    #[test]
    fn test_hit_scores_and_removes_both() {
        let mut state = started(5);
        let bug_id = state.next_entity_id();
        state.bugs.push(bug(bug_id, BugKind::Bee, Vec2::new(300.0, 200.0), 0.0));
        let booger_id = state.next_entity_id();
        let mut booger = Booger::new(booger_id, Vec2::new(300.0, 210.0), 10.0);
        booger.gravity_scale = 0.0;
        state.boogers.push(booger);

        tick(&mut state, 10_000.0 + FRAME_MS);
        assert!(state.bugs.is_empty());
        assert!(state.boogers.is_empty());
        assert_eq!(state.score, 80);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        assert!(state.particles.iter().all(|p| p.color == COLOR_SPLAT));
        let events = state.drain_events();
        assert!(events.contains(&SimEvent::ScoreChanged { score: 80 }));
        assert!(events.iter().any(|e| matches!(
            e,
            SimEvent::BugSquashed { kind: BugKind::Bee, points: 80, .. }
        )));
    }

    #[test]
    fn test_golden_beetle_splats_gold() {
        let mut state = started(5);
        let bug_id = state.next_entity_id();
        state.bugs.push(bug(bug_id, BugKind::GoldenBeetle, Vec2::new(300.0, 200.0), 0.0));
        let booger_id = state.next_entity_id();
        let mut booger = Booger::new(booger_id, Vec2::new(300.0, 205.0), 10.0);
        booger.gravity_scale = 0.0;
        state.boogers.push(booger);

        tick(&mut state, 10_000.0 + FRAME_MS);
        assert_eq!(state.score, 500);
        assert_eq!(state.particles.len(), EXPLOSION_PARTICLES);
        assert!(state.particles.iter().all(|p| p.color == COLOR_GOLDEN_SPLAT));
    }

    #[test]
    fn test_bug_wobble_offset() {
        let mut state = started(7);
        let mut b = bug(1, BugKind::Fly, Vec2::new(300.0, 200.0), 2.0);
        b.wobble_speed = 0.005;
        b.wobble_offset = 1.2;
        state.bugs.push(b);

        let now = 10_000.0 + FRAME_MS;
        tick(&mut state, now);
        let expected = 200.0 + (now * 0.005 + 1.2_f32 as f64).sin() as f32 * 0.5;
        let moved = &state.bugs[0];
        assert!((moved.pos.x - 302.0).abs() < 1e-4);
        assert!((moved.pos.y - expected).abs() < 1e-4);
        // Offset actually shifts the phase
        assert!((moved.pos.y - (200.0 + (now * 0.005).sin() as f32 * 0.5)).abs() > 1e-3);
    }

    #[test]
    fn test_bug_wobble_keeps_precision_late() {
        // About a day after page load
        let start = 8.64e7;
        let mut state = SimState::new(Settings::default(), 8);
        state.reset(start, 8);
        let mut b = bug(1, BugKind::Fly, Vec2::new(300.0, 200.0), 2.0);
        b.wobble_speed = 0.005;
        state.bugs.push(b);

        let now = start + FRAME_MS;
        tick(&mut state, now);
        let expected = 200.0 + (now * 0.005).sin() as f32 * 0.5;
        assert!((state.bugs[0].pos.y - expected).abs() < 1e-4);
    }

    #[test]
    fn test_one_booger_one_bug() {
        let mut state = started(6);
        for _ in 0..2 {
            let id = state.next_entity_id();
            state.bugs.push(bug(id, BugKind::Fly, Vec2::new(300.0, 200.0), 0.0));
        }
        let id = state.next_entity_id();
        let mut booger = Booger::new(id, Vec2::new(300.0, 200.0), 10.0);
        booger.gravity_scale = 0.0;
        state.boogers.push(booger);

        tick(&mut state, 10_000.0 + FRAME_MS);
        assert_eq!(state.bugs.len(), 1);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_offscreen_booger_removed() {
        let mut state = started(7);
        let id = state.next_entity_id();
        state.boogers.push(Booger::new(id, Vec2::new(400.0, 660.0), 10.0));
        tick(&mut state, 10_000.0 + FRAME_MS);
        assert!(state.boogers.is_empty());
    }

    #[test]
    fn test_bug_despawns_past_far_edge() {
        let mut state = started(8);
        let id = state.next_entity_id();
        state.bugs.push(bug(id, BugKind::GoldenBeetle, Vec2::new(845.0, 100.0), 12.0));
        let id = state.next_entity_id();
        state.bugs.push(bug(id, BugKind::Fly, Vec2::new(-45.0, 100.0), 2.0));
        tick(&mut state, 10_000.0 + FRAME_MS);
        assert_eq!(state.bugs.len(), 1);
        assert_eq!(state.bugs[0].kind, BugKind::Fly);
    }

    #[test]
    fn test_particles_fade_out() {
        let mut state = started(9);
        spawn_explosion(&mut state, Vec2::new(50.0, 50.0), COLOR_SPLAT);
        for p in &state.particles {
            assert!(p.vel.x.abs() <= EXPLOSION_SPREAD / 2.0);
            assert!((2.0..6.0).contains(&p.radius));
        }
        let mut now = 10_000.0;
        for _ in 0..25 {
            now += FRAME_MS;
            tick(&mut state, now);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_gesture_handler_charge_and_flick() {
        let mut state = started(10);
        state.begin_charge(Vec2::new(400.0, 500.0));
        state.on_rub(100.0);
        assert!((state.physics.charging().unwrap().radius - 15.0).abs() < 1e-4);
        state.on_flick(Vec2::new(0.0, -900.0), 900.0);
        assert!(!state.physics.is_charging());
        assert_eq!(state.boogers.len(), 1);
        assert_eq!(state.boogers[0].vel, Vec2::new(0.0, -900.0));
    }

    #[test]
    fn test_release_drops_booger() {
        let mut state = started(11);
        state.begin_charge(Vec2::new(400.0, 500.0));
        state.on_release();
        assert!(!state.physics.is_charging());
        assert!(state.boogers.is_empty());
    }

    #[test]
    fn test_nosebleed_event() {
        let mut state = started(12);
        state.begin_charge(Vec2::new(400.0, 500.0));
        state.on_rub(MAX_RUB_STRESS + 1.0);
        assert!(!state.physics.is_charging());
        assert_eq!(state.drain_events(), vec![SimEvent::Nosebleed]);
    }

    #[test]
    fn test_begin_charge_keeps_existing() {
        let mut state = started(13);
        state.begin_charge(Vec2::new(1.0, 1.0));
        let id = state.physics.charging().unwrap().id;
        state.begin_charge(Vec2::new(2.0, 2.0));
        assert_eq!(state.physics.charging().unwrap().id, id);
    }

    #[test]
    fn test_direct_shot_flies_straight() {
        let mut state = started(14);
        state.aim(5.0);
        assert_eq!(state.launcher_x, LAUNCHER_EDGE_CLAMP);
        state.aim(250.0);
        state.fire_direct();
        assert_eq!(state.boogers.len(), 1);
        let start_y = state.boogers[0].pos.y;
        tick(&mut state, 10_000.0 + 100.0);
        let b = &state.boogers[0];
        assert_eq!(b.pos.x, 250.0);
        assert!((start_y - b.pos.y - 72.0).abs() < 1e-2);
        assert_eq!(b.radius, DIRECT_SHOT_RADIUS);
    }
}
