//! High score persistence
//!
//! The shell owns a [`ScoreStore`] and writes through it whenever the
//! simulation reports a new personal best. Storage backing differs per
//! platform: LocalStorage in the browser, a small JSON file for the native
//! runner, memory for tests. A store that fails to read yields 0 rather than
//! an error; losing a high score is not worth crashing over.

use serde::{Deserialize, Serialize};

/// Versioned JSON envelope shared by the file and LocalStorage stores
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScoreRecord {
    version: u32,
    high_score: u32,
}

const RECORD_VERSION: u32 = 1;

/// Where the best score lives between runs
pub trait ScoreStore {
    fn high_score(&self) -> u32;
    fn set_high_score(&mut self, score: u32);
}

/// In-memory store for tests and as a fallback when storage is unavailable
#[derive(Debug, Default)]
pub struct MemoryScores {
    best: u32,
}

impl ScoreStore for MemoryScores {
    fn high_score(&self) -> u32 {
        self.best
    }

    fn set_high_score(&mut self, score: u32) {
        self.best = score;
    }
}

/// JSON file store for the native build
#[cfg(not(target_arch = "wasm32"))]
pub struct FileScores {
    path: std::path::PathBuf,
    best: u32,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileScores {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        let path = path.into();
        let best = Self::read(&path).unwrap_or_else(|e| {
            log::info!("No saved high score at {}: {e}", path.display());
            0
        });
        Self { path, best }
    }

    fn read(path: &std::path::Path) -> std::io::Result<u32> {
        let json = std::fs::read_to_string(path)?;
        let record: ScoreRecord = serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(record.high_score)
    }

    fn write(&self) -> std::io::Result<()> {
        let record = ScoreRecord {
            version: RECORD_VERSION,
            high_score: self.best,
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ScoreStore for FileScores {
    fn high_score(&self) -> u32 {
        self.best
    }

    fn set_high_score(&mut self, score: u32) {
        self.best = score;
        if let Err(e) = self.write() {
            log::warn!("Failed to save high score: {e}");
        } else {
            log::info!("High score saved ({score})");
        }
    }
}

/// LocalStorage store for the browser build
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageScores {
    best: u32,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageScores {
    const STORAGE_KEY: &'static str = "scorp_attack_highscore";

    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(record) = serde_json::from_str::<ScoreRecord>(&json) {
                    log::info!("Loaded high score: {}", record.high_score);
                    return Self {
                        best: record.high_score,
                    };
                }
            }
        }

        log::info!("No saved high score, starting fresh");
        Self::default()
    }

    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let record = ScoreRecord {
                version: RECORD_VERSION,
                high_score: self.best,
            };
            if let Ok(json) = serde_json::to_string(&record) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High score saved ({})", self.best);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageScores {
    fn high_score(&self) -> u32 {
        self.best
    }

    fn set_high_score(&mut self, score: u32) {
        self.best = score;
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryScores::default();
        assert_eq!(store.high_score(), 0);
        store.set_high_score(4200);
        assert_eq!(store.high_score(), 4200);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = std::env::temp_dir().join("scorp_attack_test_scores");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("highscore.json");
        let _ = std::fs::remove_file(&path);

        let mut store = FileScores::new(&path);
        assert_eq!(store.high_score(), 0);
        store.set_high_score(9000);

        let reloaded = FileScores::new(&path);
        assert_eq!(reloaded.high_score(), 9000);

        let _ = std::fs::remove_file(&path);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_tolerates_corrupt_file() {
        let dir = std::env::temp_dir().join("scorp_attack_test_scores");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("corrupt.json");
        std::fs::write(&path, "not json {{").unwrap();

        let store = FileScores::new(&path);
        assert_eq!(store.high_score(), 0);

        let _ = std::fs::remove_file(&path);
    }
}
