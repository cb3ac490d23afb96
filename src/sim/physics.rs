//! Booger charging and ballistics
//!
//! At most one booger charges at a time. Launching moves it out of the
//! charging slot; the caller owns the in-flight collection.

use glam::Vec2;

use super::state::Booger;
use crate::settings::PhysicsTuning;

/// Result of rubbing the charging booger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowOutcome {
    Ok,
    /// Rubbed too hard: the booger is gone
    Nosebleed,
}

#[derive(Debug, Clone)]
pub struct BoogerPhysics {
    tuning: PhysicsTuning,
    charging: Option<Booger>,
    rub_stress: f32,
}

impl BoogerPhysics {
    pub fn new(tuning: PhysicsTuning) -> Self {
        Self {
            tuning,
            charging: None,
            rub_stress: 0.0,
        }
    }

    pub fn tuning(&self) -> &PhysicsTuning {
        &self.tuning
    }

    pub fn charging(&self) -> Option<&Booger> {
        self.charging.as_ref()
    }

    pub fn is_charging(&self) -> bool {
        self.charging.is_some()
    }

    /// Rub distance accumulated since the last create/clear
    pub fn rub_stress(&self) -> f32 {
        self.rub_stress
    }

    /// Start a new charging booger at minimum size.
    ///
    /// Replaces any booger already charging; callers only create when the
    /// slot is empty.
    pub fn create_booger(&mut self, id: u32, pos: Vec2) -> &Booger {
        self.rub_stress = 0.0;
        self.charging
            .insert(Booger::new(id, pos, self.tuning.min_radius))
    }

    /// Keep the charging booger under the pointer
    pub fn track(&mut self, pos: Vec2) {
        if let Some(booger) = self.charging.as_mut() {
            booger.pos = pos;
        }
    }

    /// Grow the charging booger by a rub of `amount` pixels
    pub fn grow_booger(&mut self, amount: f32) -> GrowOutcome {
        let Some(booger) = self.charging.as_mut() else {
            return GrowOutcome::Ok;
        };

        self.rub_stress += amount;
        if self.rub_stress > self.tuning.max_rub_stress {
            self.charging = None;
            return GrowOutcome::Nosebleed;
        }

        booger.radius = (booger.radius + amount * self.tuning.growth_rate)
            .clamp(self.tuning.min_radius, self.tuning.max_radius);
        GrowOutcome::Ok
    }

    /// Throw the charging booger with the flick velocity, 1:1.
    ///
    /// Returns the booger for the caller's in-flight list; the charging slot
    /// is empty afterwards.
    pub fn launch_booger(&mut self, velocity: Vec2, speed: f32) -> Option<Booger> {
        let mut booger = self.charging.take()?;
        booger.vel = velocity;
        self.rub_stress = 0.0;
        log::debug!(
            "Booger {} launched at {:.0} px/s (radius {:.1})",
            booger.id,
            speed,
            booger.radius
        );
        Some(booger)
    }

    /// Drop the charging booger without launching it
    pub fn discard(&mut self) -> Option<Booger> {
        self.rub_stress = 0.0;
        self.charging.take()
    }

    /// Advance in-flight boogers by `dt` seconds (semi-implicit Euler)
    pub fn update(&self, dt: f32, boogers: &mut [Booger]) {
        let drag = (1.0 - self.tuning.air_drag * dt).max(0.0);
        for booger in boogers.iter_mut() {
            booger.vel.y += self.tuning.gravity * booger.gravity_scale * dt;
            if self.tuning.air_drag > 0.0 {
                booger.vel *= drag;
            }
            booger.pos += booger.vel * dt;
            booger.rotation += self.tuning.spin_rate * dt;
        }
    }

    /// Forget the charging booger and stress (round start)
    pub fn clear(&mut self) {
        self.charging = None;
        self.rub_stress = 0.0;
    }
}
