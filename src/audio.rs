//! Sound effects and background music. Every failure here is logged and
//! swallowed; the game never stops because a sound could not play.

use std::path::{Path, PathBuf};

use crate::assets::{is_supported_audio, AssetCatalog};
use crate::error::AssetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Move,
    Shot,
}

impl SoundCue {
    pub fn all() -> &'static [SoundCue] {
        &[SoundCue::Move, SoundCue::Shot]
    }
}

/// Output device abstraction.
pub trait AudioBackend {
    fn load_cue(&mut self, cue: SoundCue, path: &Path) -> Result<(), AssetError>;
    fn play_cue(&mut self, cue: SoundCue) -> Result<(), AssetError>;
    /// Start looping `path`, replacing any current track.
    fn play_music(&mut self, path: &Path, volume: f32) -> Result<(), AssetError>;
    fn set_music_volume(&mut self, volume: f32);
    fn pause_music(&mut self);
    fn resume_music(&mut self);
    fn stop_music(&mut self);
}

fn check_file(path: &Path) -> Result<(), AssetError> {
    if !path.is_file() {
        return Err(AssetError::NotFound(path.to_path_buf()));
    }
    if !is_supported_audio(path) {
        return Err(AssetError::UnsupportedFormat(path.to_path_buf()));
    }
    Ok(())
}

/// Accepts the same files a real device would, plays nothing.
#[derive(Debug, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn load_cue(&mut self, _cue: SoundCue, path: &Path) -> Result<(), AssetError> {
        check_file(path)
    }

    fn play_cue(&mut self, _cue: SoundCue) -> Result<(), AssetError> {
        Ok(())
    }

    fn play_music(&mut self, path: &Path, _volume: f32) -> Result<(), AssetError> {
        check_file(path)
    }

    fn set_music_volume(&mut self, _volume: f32) {}
    fn pause_music(&mut self) {}
    fn resume_music(&mut self) {}
    fn stop_music(&mut self) {}
}

#[cfg(feature = "sound")]
mod device {
    use std::collections::HashMap;
    use std::path::Path;

    use kira::{
        manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
        sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
        tween::Tween,
    };

    use super::{check_file, AudioBackend, SoundCue};
    use crate::error::AssetError;

    pub struct KiraBackend {
        manager: AudioManager,
        cues: HashMap<SoundCue, StaticSoundData>,
        music: Option<StaticSoundHandle>,
    }

    impl KiraBackend {
        pub fn new() -> Result<Self, AssetError> {
            let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
                .map_err(|e| AssetError::DeviceUnavailable(e.to_string()))?;
            Ok(Self { manager, cues: HashMap::new(), music: None })
        }

        fn decode(path: &Path) -> Result<StaticSoundData, AssetError> {
            check_file(path)?;
            StaticSoundData::from_file(path).map_err(|e| AssetError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    }

    impl AudioBackend for KiraBackend {
        fn load_cue(&mut self, cue: SoundCue, path: &Path) -> Result<(), AssetError> {
            let data = Self::decode(path)?;
            self.cues.insert(cue, data);
            Ok(())
        }

        fn play_cue(&mut self, cue: SoundCue) -> Result<(), AssetError> {
            if let Some(data) = self.cues.get(&cue) {
                self.manager
                    .play(data.clone())
                    .map_err(|e| AssetError::DeviceUnavailable(e.to_string()))?;
            }
            Ok(())
        }

        fn play_music(&mut self, path: &Path, volume: f32) -> Result<(), AssetError> {
            let data = Self::decode(path)?;
            let settings = StaticSoundSettings::new().loop_region(..).volume(volume as f64);
            self.stop_music();
            let handle = self
                .manager
                .play(data.with_settings(settings))
                .map_err(|e| AssetError::DeviceUnavailable(e.to_string()))?;
            self.music = Some(handle);
            Ok(())
        }

        fn set_music_volume(&mut self, volume: f32) {
            if let Some(h) = &mut self.music {
                let _ = h.set_volume(volume as f64, Tween::default());
            }
        }

        fn pause_music(&mut self) {
            if let Some(h) = &mut self.music {
                let _ = h.pause(Tween::default());
            }
        }

        fn resume_music(&mut self) {
            if let Some(h) = &mut self.music {
                let _ = h.resume(Tween::default());
            }
        }

        fn stop_music(&mut self) {
            if let Some(mut h) = self.music.take() {
                let _ = h.stop(Tween::default());
            }
        }
    }
}

/// Audio state owned by the application root and lent to screens.
pub struct AudioContext {
    backend: Box<dyn AudioBackend>,
    volume: f32,
    track: Option<PathBuf>,
    paused: bool,
}

impl AudioContext {
    pub fn new(backend: Box<dyn AudioBackend>, volume: f32) -> Self {
        Self {
            backend,
            volume: volume.clamp(0.0, 1.0),
            track: None,
            paused: false,
        }
    }

    /// The device backend when compiled with `sound`, silence otherwise or
    /// when the device cannot be opened.
    pub fn open(volume: f32) -> Self {
        #[cfg(feature = "sound")]
        {
            match device::KiraBackend::new() {
                Ok(b) => return Self::new(Box::new(b), volume),
                Err(e) => log::warn!("Audio device unavailable, running silent: {}", e),
            }
        }
        Self::new(Box::new(SilentBackend), volume)
    }

    /// Load each cue from the first candidate that works.
    pub fn load_cues(&mut self, catalog: &AssetCatalog) {
        for &cue in SoundCue::all() {
            let loaded = catalog.cue_candidates(cue).iter().any(|path| {
                match self.backend.load_cue(cue, path) {
                    Ok(()) => true,
                    Err(AssetError::NotFound(_)) => false,
                    Err(e) => {
                        log::warn!("Sound effect rejected: {}", e);
                        false
                    }
                }
            });
            if !loaded {
                log::info!("No sound for {:?}, it will be silent", cue);
            }
        }
    }

    pub fn play_cue(&mut self, cue: SoundCue) {
        if let Err(e) = self.backend.play_cue(cue) {
            log::warn!("Could not play {:?}: {}", cue, e);
        }
    }

    /// Start the first track in `chain` that plays. Returns it, or `None`
    /// when the whole chain failed and music stays silent.
    pub fn play_chain(&mut self, chain: &[PathBuf]) -> Option<PathBuf> {
        for path in chain {
            match self.backend.play_music(path, self.volume) {
                Ok(()) => {
                    log::info!("Background track: {}", path.display());
                    self.track = Some(path.clone());
                    self.paused = false;
                    return Some(path.clone());
                }
                Err(e) => log::warn!("Background track failed: {}", e),
            }
        }
        self.track = None;
        None
    }

    pub fn track(&self) -> Option<&Path> {
        self.track.as_deref()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.backend.set_music_volume(self.volume);
    }

    pub fn adjust_volume(&mut self, delta: f32) -> f32 {
        // Round to one decimal so repeated steps land on 0.1 multiples.
        self.set_volume(((self.volume + delta) * 10.0).round() / 10.0);
        self.volume
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause_music(&mut self) {
        if self.track.is_some() && !self.paused {
            self.backend.pause_music();
            self.paused = true;
        }
    }

    pub fn resume_music(&mut self) {
        if self.paused {
            self.backend.resume_music();
            self.paused = false;
        }
    }

    pub fn stop_music(&mut self) {
        self.backend.stop_music();
        self.track = None;
        self.paused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records calls; fails music for paths containing "broken".
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl AudioBackend for Recorder {
        fn load_cue(&mut self, cue: SoundCue, _path: &Path) -> Result<(), AssetError> {
            self.0.borrow_mut().push(format!("load {:?}", cue));
            Ok(())
        }
        fn play_cue(&mut self, cue: SoundCue) -> Result<(), AssetError> {
            Err(AssetError::DeviceUnavailable(format!("{:?}", cue)))
        }
        fn play_music(&mut self, path: &Path, _volume: f32) -> Result<(), AssetError> {
            if path.to_string_lossy().contains("broken") {
                return Err(AssetError::Decode { path: path.into(), reason: "bad".into() });
            }
            self.0.borrow_mut().push(format!("music {}", path.display()));
            Ok(())
        }
        fn set_music_volume(&mut self, v: f32) {
            self.0.borrow_mut().push(format!("volume {:.1}", v));
        }
        fn pause_music(&mut self) {
            self.0.borrow_mut().push("pause".into());
        }
        fn resume_music(&mut self) {
            self.0.borrow_mut().push("resume".into());
        }
        fn stop_music(&mut self) {
            self.0.borrow_mut().push("stop".into());
        }
    }

    fn ctx() -> (AudioContext, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (AudioContext::new(Box::new(Recorder(log.clone())), 0.5), log)
    }

    #[test]
    fn chain_skips_failing_tracks() {
        let (mut audio, log) = ctx();
        let chain = vec![PathBuf::from("broken.ogg"), PathBuf::from("ok.ogg")];
        assert_eq!(audio.play_chain(&chain), Some(PathBuf::from("ok.ogg")));
        assert_eq!(log.borrow().last().map(String::as_str), Some("music ok.ogg"));
    }

    #[test]
    fn empty_chain_is_silence() {
        let (mut audio, _) = ctx();
        assert_eq!(audio.play_chain(&[]), None);
        assert!(audio.track().is_none());
    }

    #[test]
    fn cue_failure_is_swallowed() {
        let (mut audio, _) = ctx();
        audio.play_cue(SoundCue::Shot);
    }

    #[test]
    fn volume_steps_are_clamped() {
        let (mut audio, _) = ctx();
        for _ in 0..8 {
            audio.adjust_volume(0.1);
        }
        assert_eq!(audio.volume(), 1.0);
        for _ in 0..3 {
            audio.adjust_volume(-0.1);
        }
        assert!((audio.volume() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn pause_only_when_a_track_plays() {
        let (mut audio, log) = ctx();
        audio.pause_music();
        assert!(!audio.is_paused());
        audio.play_chain(&[PathBuf::from("a.ogg")]);
        audio.pause_music();
        audio.pause_music();
        audio.resume_music();
        let calls: Vec<_> = log.borrow().iter().filter(|c| *c == "pause" || *c == "resume").cloned().collect();
        assert_eq!(calls, vec!["pause", "resume"]);
    }

    #[test]
    fn silent_backend_validates_files() {
        let mut b = SilentBackend;
        assert!(matches!(
            b.play_music(Path::new("/nope/track.ogg"), 0.5),
            Err(AssetError::NotFound(_))
        ));
    }
}
