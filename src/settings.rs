//! Game settings and tuning
//!
//! Persisted in LocalStorage. Defaults mirror [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::StorageError;

/// How pointer input turns into shots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputMode {
    /// Press to start a booger, rub to grow it, flick to throw it
    #[default]
    Flick,
    /// Move to aim a launcher at the bottom, press to fire straight up
    DirectAim,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Flick => "Flick",
            InputMode::DirectAim => "Direct Aim",
        }
    }
}

/// Rub/flick classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureTuning {
    /// Release speed (px/s) above which a release counts as a flick
    pub flick_threshold: f32,
    /// How far back (ms) pointer samples are kept for velocity estimation
    pub history_window_ms: f64,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            flick_threshold: FLICK_THRESHOLD,
            history_window_ms: GESTURE_WINDOW_MS,
        }
    }
}

/// Booger growth and ballistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub min_radius: f32,
    pub max_radius: f32,
    /// Radius gained per pixel rubbed
    pub growth_rate: f32,
    /// Rub distance that bursts the booger
    pub max_rub_stress: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Linear drag coefficient (1/s), 0 disables
    pub air_drag: f32,
    /// Spin of in-flight boogers (rad/s)
    pub spin_rate: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            min_radius: BOOGER_MIN_RADIUS,
            max_radius: BOOGER_MAX_RADIUS,
            growth_rate: BOOGER_GROWTH_RATE,
            max_rub_stress: MAX_RUB_STRESS,
            gravity: GRAVITY,
            air_drag: 0.0,
            spin_rate: BOOGER_SPIN_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub interval_ms: f64,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval_ms: SPAWN_INTERVAL_MS,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub input_mode: InputMode,
    pub round_duration_secs: f32,
    /// Particle life lost per frame
    pub particle_decay: f32,
    pub gesture: GestureTuning,
    pub physics: PhysicsTuning,
    pub spawn: SpawnTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Flick,
            round_duration_secs: ROUND_DURATION_SECS,
            particle_decay: PARTICLE_DECAY,
            gesture: GestureTuning::default(),
            physics: PhysicsTuning::default(),
            spawn: SpawnTuning::default(),
        }
    }
}

impl Settings {
    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = mode;
        self
    }

    /// Repair values a hand-edited save could break
    pub fn validated(mut self) -> Self {
        let defaults = Settings::default();
        if !(self.round_duration_secs > 0.0) {
            self.round_duration_secs = defaults.round_duration_secs;
        }
        if !(self.particle_decay > 0.0) {
            self.particle_decay = defaults.particle_decay;
        }
        if !(self.spawn.interval_ms > 0.0) {
            self.spawn.interval_ms = defaults.spawn.interval_ms;
        }
        if !(self.gesture.history_window_ms > 0.0) {
            self.gesture.history_window_ms = defaults.gesture.history_window_ms;
        }
        if !(self.gesture.flick_threshold > 0.0) {
            self.gesture.flick_threshold = defaults.gesture.flick_threshold;
        }
        let p = &mut self.physics;
        if !(p.min_radius > 0.0) {
            p.min_radius = defaults.physics.min_radius;
        }
        if !(p.max_radius >= p.min_radius) {
            p.max_radius = p.min_radius.max(defaults.physics.max_radius);
        }
        if !(p.growth_rate > 0.0) {
            p.growth_rate = defaults.physics.growth_rate;
        }
        if !(p.max_rub_stress > 0.0) {
            p.max_rub_stress = defaults.physics.max_rub_stress;
        }
        if !p.gravity.is_finite() {
            p.gravity = defaults.physics.gravity;
        }
        if !p.spin_rate.is_finite() {
            p.spin_rate = defaults.physics.spin_rate;
        }
        p.air_drag = if p.air_drag.is_finite() { p.air_drag.max(0.0) } else { 0.0 };
        self
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "booger_blaster_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Settings>(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings.validated();
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        let json =
            serde_json::to_string(self).map_err(|e| StorageError::Serialize(e.to_string()))?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), StorageError> {
        // No-op for native
        Ok(())
    }
}
