//! Where assets are looked up. Every lookup yields an ordered list of
//! candidate paths; callers try them in order and fall back when none works.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::audio::SoundCue;

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "wav"];

pub fn is_supported_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Keep the favourite tracks that exist and have a playable extension.
pub fn valid_tracks(tracks: &[PathBuf]) -> Vec<PathBuf> {
    tracks
        .iter()
        .filter(|p| {
            if !p.is_file() {
                log::warn!("Favourite track missing: {}", p.display());
                false
            } else if !is_supported_audio(p) {
                log::warn!("Favourite track has an unsupported format: {}", p.display());
                false
            } else {
                true
            }
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone)]
pub struct AssetCatalog {
    root: PathBuf,
}

impl AssetCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The player's own image first, then the bundled ones.
    pub fn ship_candidates(&self, player_image: Option<&Path>) -> Vec<PathBuf> {
        let images = self.root.join("images");
        player_image
            .map(Path::to_path_buf)
            .into_iter()
            .chain([images.join("player_ship.png"), images.join("player_ship.jpg")])
            .collect()
    }

    pub fn cue_candidates(&self, cue: SoundCue) -> Vec<PathBuf> {
        let stem = match cue {
            SoundCue::Move => "move",
            SoundCue::Shot => "shot",
        };
        let sounds = self.root.join("sounds");
        ["wav", "ogg", "mp3"]
            .iter()
            .map(|ext| sounds.join(format!("{}.{}", stem, ext)))
            .collect()
    }

    pub fn bundled_tracks(&self) -> Vec<PathBuf> {
        let sounds = self.root.join("sounds");
        AUDIO_EXTENSIONS
            .iter()
            .map(|ext| sounds.join(format!("background.{}", ext)))
            .collect()
    }

    /// Bundled tracks present on disk. Played while no game is running.
    pub fn shell_tracks(&self) -> Vec<PathBuf> {
        self.bundled_tracks().into_iter().filter(|p| p.is_file()).collect()
    }

    /// Background music chain: the valid favourites starting from a random
    /// one, then the bundled tracks. An empty chain means silence.
    pub fn track_candidates<R: Rng + ?Sized>(&self, favourites: &[PathBuf], rng: &mut R) -> Vec<PathBuf> {
        let mut chain = valid_tracks(favourites);
        if !chain.is_empty() {
            let start = rng.gen_range(0..chain.len());
            chain.rotate_left(start);
        }
        chain.extend(self.shell_tracks());
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("galactatec-assets-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(dir.join("sounds")).unwrap();
        dir
    }

    #[test]
    fn audio_extensions_are_case_insensitive() {
        assert!(is_supported_audio(Path::new("a/b/Track.OGG")));
        assert!(is_supported_audio(Path::new("x.mp3")));
        assert!(!is_supported_audio(Path::new("x.mp4")));
        assert!(!is_supported_audio(Path::new("noext")));
    }

    #[test]
    fn player_image_comes_first() {
        let cat = AssetCatalog::new("assets");
        let c = cat.ship_candidates(Some(Path::new("/home/me/ship.png")));
        assert_eq!(c[0], PathBuf::from("/home/me/ship.png"));
        assert_eq!(c.len(), 3);
        assert_eq!(cat.ship_candidates(None).len(), 2);
    }

    #[test]
    fn invalid_favourites_are_dropped_and_bundled_follow() {
        let dir = scratch_dir("chain");
        let good = dir.join("fav.ogg");
        let bad_ext = dir.join("fav.txt");
        std::fs::write(&good, b"x").unwrap();
        std::fs::write(&bad_ext, b"x").unwrap();
        std::fs::write(dir.join("sounds").join("background.wav"), b"x").unwrap();

        let cat = AssetCatalog::new(&dir);
        let mut rng = StdRng::seed_from_u64(42);
        let chain = cat.track_candidates(&[bad_ext, dir.join("missing.mp3"), good.clone()], &mut rng);
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(chain, vec![good, dir.join("sounds").join("background.wav")]);
    }

    #[test]
    fn no_tracks_means_empty_chain() {
        let cat = AssetCatalog::new("/nonexistent/galactatec");
        let mut rng = StdRng::seed_from_u64(1);
        assert!(cat.track_candidates(&[], &mut rng).is_empty());
    }
}
