//! Persistent settings, loaded from `galactatec.ron` at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "galactatec.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Difficulty tier index, 0 = Easy, 1 = Normal, 2 = Hard.
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    /// Background music volume in [0, 1].
    #[serde(default = "default_volume")]
    pub music_volume: f32,
    /// Battlefield size in logical pixels.
    #[serde(default = "default_world_width")]
    pub world_width: f32,
    #[serde(default = "default_world_height")]
    pub world_height: f32,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,
    /// How long a key press keeps a direction held when the terminal
    /// does not report key releases.
    #[serde(default = "default_hold_ticks")]
    pub key_hold_ticks: u64,
    /// Root of the bundled images and sounds.
    #[serde(default = "default_asset_dir")]
    pub asset_dir: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_difficulty() -> u8 {
    1
}
fn default_volume() -> f32 {
    0.5
}
fn default_world_width() -> f32 {
    900.0
}
fn default_world_height() -> f32 {
    700.0
}
fn default_tick_rate() -> u32 {
    60
}
fn default_hold_ticks() -> u64 {
    8
}
fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}
fn default_log_file() -> PathBuf {
    PathBuf::from("galactatec.log")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            music_volume: default_volume(),
            world_width: default_world_width(),
            world_height: default_world_height(),
            tick_rate_hz: default_tick_rate(),
            key_hold_ticks: default_hold_ticks(),
            asset_dir: default_asset_dir(),
            log_file: default_log_file(),
        }
    }
}

impl Settings {
    /// Load from `galactatec.ron` in the working directory. A missing or
    /// invalid file gives the defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(data) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match ron::from_str::<Settings>(&data) {
            Ok(s) => s.sanitized(),
            Err(e) => {
                log::warn!("Invalid settings at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write settings to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {}", e),
        }
    }

    /// Clamp out-of-range values a hand-edited file might contain.
    fn sanitized(mut self) -> Self {
        if self.difficulty > 2 {
            log::warn!("Difficulty {} out of range, using Normal", self.difficulty);
            self.difficulty = default_difficulty();
        }
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        if self.tick_rate_hz == 0 {
            self.tick_rate_hz = default_tick_rate();
        }
        if !usable_extent(self.world_width) {
            log::warn!("World width {} unusable, using {}", self.world_width, default_world_width());
            self.world_width = default_world_width();
        }
        if !usable_extent(self.world_height) {
            log::warn!("World height {} unusable, using {}", self.world_height, default_world_height());
            self.world_height = default_world_height();
        }
        self
    }
}

/// Non-positive or non-finite sizes cannot be sampled or drawn. Small
/// finite sizes pass here and are rejected when a game starts.
fn usable_extent(v: f32) -> bool {
    v.is_finite() && v >= 1.0
}

pub fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("galactatec-{}-{}.ron", name, std::process::id()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let s = Settings::load_from(&scratch("missing"));
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = scratch("roundtrip");
        let mut s = Settings::default();
        s.difficulty = 2;
        s.music_volume = 0.8;
        s.save_to(&path);
        let loaded = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.difficulty, 2);
        assert!((loaded.music_volume - 0.8).abs() < 1e-6);
    }

    #[test]
    fn partial_file_fills_defaults_and_clamps() {
        let path = scratch("partial");
        std::fs::write(&path, "(difficulty: 7, music_volume: 3.0)").unwrap();
        let loaded = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.difficulty, 1);
        assert_eq!(loaded.music_volume, 1.0);
        assert_eq!(loaded.world_width, 900.0);
    }

    #[test]
    fn non_finite_world_size_falls_back() {
        let path = scratch("inf-world");
        std::fs::write(&path, "(world_width: inf, world_height: -5.0)").unwrap();
        let loaded = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.world_width, 900.0);
        assert_eq!(loaded.world_height, 700.0);
    }

    #[test]
    fn small_world_passes_through() {
        let path = scratch("small-world");
        std::fs::write(&path, "(world_width: 8.0)").unwrap();
        let loaded = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded.world_width, 8.0);
    }

    #[test]
    fn garbage_file_gives_defaults() {
        let path = scratch("garbage");
        std::fs::write(&path, "not ron at all {{").unwrap();
        let loaded = Settings::load_from(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, Settings::default());
    }
}
