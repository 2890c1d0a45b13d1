//! Persisted best score
//!
//! A single integer: read once at application start, rewritten only when a
//! finished round beats it.

/// The best score seen on this machine
#[derive(Debug, Clone, Copy, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "splat_dodge_highscore";

    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Whether a finished round's score would set a new best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.best
    }

    /// Record a finished round. Returns true when it set a new best, in which
    /// case the value is persisted immediately.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    /// Load the stored best from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = raw.parse::<u64>() {
                    log::info!("Loaded high score: {}", best);
                    return Self { best };
                }
            }
        }

        log::info!("No stored high score, starting fresh");
        Self::new()
    }

    /// Save the best to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.best.to_string());
            log::info!("High score saved: {}", self.best);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
