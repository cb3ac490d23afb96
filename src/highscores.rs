//! Best score
//!
//! Persisted to LocalStorage as a plain decimal string.

use crate::error::StorageError;

/// Best score seen on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "booger-blaster-highscore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Strictly better than the stored best
    pub fn beaten_by(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished round's score. Returns true if it is a new best.
    pub fn record(&mut self, score: u64) -> bool {
        if !self.beaten_by(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Parse a stored value; anything unreadable counts as zero
    pub fn parse(stored: &str) -> Self {
        Self::new(stored.trim().parse().unwrap_or(0))
    }

    /// Load high score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(stored)) = storage.get_item(Self::STORAGE_KEY) {
                let score = Self::parse(&stored);
                log::info!("Loaded high score {}", score.best);
                return score;
            }
        }

        log::info!("No high score found, starting fresh");
        Self::default()
    }

    /// Save high score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        storage
            .set_item(Self::STORAGE_KEY, &self.best.to_string())
            .map_err(|e| StorageError::Write(format!("{:?}", e)))?;
        log::info!("High score saved ({})", self.best);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_when_beaten() {
        let mut hs = HighScore::new(100);
        assert!(!hs.record(100));
        assert!(!hs.record(40));
        assert_eq!(hs.best(), 100);
        assert!(hs.record(101));
        assert_eq!(hs.best(), 101);
    }

    #[test]
    fn test_parse_defaults_to_zero() {
        assert_eq!(HighScore::parse("1250").best(), 1250);
        assert_eq!(HighScore::parse(" 42\n").best(), 42);
        assert_eq!(HighScore::parse("").best(), 0);
        assert_eq!(HighScore::parse("lots").best(), 0);
        assert_eq!(HighScore::parse("-5").best(), 0);
    }
}
