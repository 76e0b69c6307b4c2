use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::account::{CodeMailer, LogMailer, MemoryDirectory, PlayerDirectory};
use crate::assets::AssetCatalog;
use crate::audio::AudioContext;
use crate::config::Settings;
use crate::display::{Display, DisplayConfig, SHELL_CAPTION};
use crate::game::input::{first_gamepad, Gamepad, GamepadHub, InputEvent, PadSnapshot};
use crate::game::starfield::Starfield;
use crate::game::Difficulty;
use crate::notify::{BannerBoard, Notifier};
use crate::screens::difficulty::DifficultySelect;
use crate::screens::gameplay::Gameplay;
use crate::screens::login::Login;
use crate::screens::menu::{GameMenu, MainMenu, PlayerHub};
use crate::screens::player2::Player2Setup;
use crate::screens::profile::{EditProfile, Profile};
use crate::screens::register::Register;
use crate::screens::{next_screen, Crew, RenderContext, Screen, ScreenKind, Services, Transition};

/// The active screen. Exactly one exists at a time.
pub enum ScreenState {
    MainMenu(MainMenu),
    Login(Login),
    Register(Register),
    PlayerHub(PlayerHub),
    Profile(Profile),
    EditProfile(EditProfile),
    GameMenu(GameMenu),
    DifficultySelect(DifficultySelect),
    Player2Setup(Player2Setup),
    Gameplay(Box<Gameplay>),
}

impl ScreenState {
    pub fn screen(&self) -> &dyn Screen {
        match self {
            ScreenState::MainMenu(s) => s,
            ScreenState::Login(s) => s,
            ScreenState::Register(s) => s,
            ScreenState::PlayerHub(s) => s,
            ScreenState::Profile(s) => s,
            ScreenState::EditProfile(s) => s,
            ScreenState::GameMenu(s) => s,
            ScreenState::DifficultySelect(s) => s,
            ScreenState::Player2Setup(s) => s,
            ScreenState::Gameplay(s) => &**s,
        }
    }

    fn screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            ScreenState::MainMenu(s) => s,
            ScreenState::Login(s) => s,
            ScreenState::Register(s) => s,
            ScreenState::PlayerHub(s) => s,
            ScreenState::Profile(s) => s,
            ScreenState::EditProfile(s) => s,
            ScreenState::GameMenu(s) => s,
            ScreenState::DifficultySelect(s) => s,
            ScreenState::Player2Setup(s) => s,
            ScreenState::Gameplay(s) => &mut **s,
        }
    }

    pub fn kind(&self) -> ScreenKind {
        self.screen().kind()
    }

    pub fn is_gameplay(&self) -> bool {
        matches!(self, ScreenState::Gameplay(_))
    }
}

/// Collaborators owned by the application root and lent to screens.
pub struct Shell {
    pub settings: Settings,
    settings_path: Option<PathBuf>,
    pub audio: AudioContext,
    pub banner: BannerBoard,
    directory: Box<dyn PlayerDirectory>,
    mailer: Box<dyn CodeMailer>,
    pub catalog: AssetCatalog,
    pub display: Display,
    pad: Option<Box<dyn Gamepad>>,
    pad_state: PadSnapshot,
    rng: StdRng,
    exact_keys: bool,
}

impl Shell {
    fn services(&mut self, now: Instant) -> Services<'_> {
        Services {
            audio: &mut self.audio,
            banner: &mut self.banner,
            directory: &mut *self.directory,
            mailer: &mut *self.mailer,
            settings: &self.settings,
            catalog: &self.catalog,
            pad: &self.pad_state,
            pad_name: self.pad.as_deref().map(|p| p.name()),
            rng: &mut self.rng,
            now,
            exact_keys: self.exact_keys,
        }
    }

    fn persist(&self) {
        if let Some(path) = &self.settings_path {
            self.settings.save_to(path);
        }
    }

    /// Menu music. Silent when no bundled track is on disk.
    fn play_music(&mut self) {
        let chain = self.catalog.shell_tracks();
        if self.audio.play_chain(&chain).is_none() {
            log::debug!("No shell music under {}", self.catalog.root().display());
        }
    }
}

pub struct App {
    pub should_quit: bool,
    screen: ScreenState,
    crew: Crew,
    shell: Shell,
    backdrop: Starfield,
}

impl App {
    /// `exact_keys` tells whether the terminal reports key releases.
    pub fn new(settings: Settings, audio: AudioContext, hub: &mut dyn GamepadHub, exact_keys: bool) -> Self {
        let mut rng = StdRng::from_entropy();
        let catalog = AssetCatalog::new(settings.asset_dir.clone());
        let mut audio = audio;
        audio.load_cues(&catalog);
        let backdrop = Starfield::new(&mut rng, settings.world_width, settings.world_height);
        let crew = Crew {
            difficulty: Difficulty::from_index(settings.difficulty).unwrap_or_default(),
            ..Crew::default()
        };
        let pad = first_gamepad(hub);
        let mut app = Self {
            should_quit: false,
            screen: ScreenState::MainMenu(MainMenu::new()),
            crew,
            shell: Shell {
                settings,
                settings_path: None,
                audio,
                banner: BannerBoard::new(Instant::now()),
                directory: Box::new(MemoryDirectory::new()),
                mailer: Box::new(LogMailer),
                catalog,
                display: Display::new(DisplayConfig::default()),
                pad,
                pad_state: PadSnapshot::default(),
                rng,
                exact_keys,
            },
            backdrop,
        };
        app.shell.play_music();
        app
    }

    /// Write settings changes (difficulty, volume) back to `path`.
    pub fn persist_settings(mut self, path: PathBuf) -> Self {
        self.shell.settings_path = Some(path);
        self
    }

    pub fn with_directory(mut self, directory: Box<dyn PlayerDirectory>) -> Self {
        self.shell.directory = directory;
        self
    }

    pub fn with_mailer(mut self, mailer: Box<dyn CodeMailer>) -> Self {
        self.shell.mailer = mailer;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.shell.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    pub fn crew(&self) -> &Crew {
        &self.crew
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn backdrop(&self) -> &Starfield {
        &self.backdrop
    }

    pub fn take_title(&mut self) -> Option<String> {
        self.shell.display.take_title()
    }

    pub fn render_context(&self, now: Instant) -> RenderContext {
        RenderContext { now, volume: self.shell.audio.volume() }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C always quits
        if key.kind != KeyEventKind::Release
            && key.code == KeyCode::Char('c')
            && key.modifiers.contains(KeyModifiers::CONTROL)
        {
            self.should_quit = true;
            return;
        }
        // Only gameplay tracks releases
        if key.kind == KeyEventKind::Release && !self.screen.is_gameplay() {
            return;
        }
        self.dispatch(&InputEvent::Key(key), now);
    }

    pub fn on_tick(&mut self, dt: Duration, now: Instant) {
        self.shell.banner.tick(now);
        self.shell.pad_state = match self.shell.pad.as_mut() {
            Some(pad) => pad.poll(),
            None => PadSnapshot::default(),
        };
        let presses: Vec<InputEvent> = self.shell.pad_state.events().collect();
        for ev in presses {
            self.dispatch(&ev, now);
            if self.should_quit {
                return;
            }
        }

        let t = self.screen.screen_mut().update(dt, &mut self.shell.services(now));
        self.apply(t, now);

        if !self.screen.is_gameplay() {
            self.backdrop.advance(&mut self.shell.rng, dt);
        }
    }

    fn dispatch(&mut self, ev: &InputEvent, now: Instant) {
        let t = self.screen.screen_mut().handle_input(ev, &mut self.shell.services(now));
        self.apply(t, now);
    }

    fn apply(&mut self, transition: Transition, now: Instant) {
        match transition {
            Transition::Stay => return,
            Transition::Quit => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }
        let from = self.screen.kind();
        let Some(to) = next_screen(from, &transition) else {
            log::warn!("Ignoring {:?} on {:?}", transition, from);
            return;
        };
        log::info!("Screen {:?} -> {:?}", from, to);

        match transition {
            Transition::LoggedIn(player) => {
                self.crew.player = Some(player);
                self.crew.player_two = None;
            }
            Transition::LoggedOut => {
                self.crew.player = None;
                self.crew.player_two = None;
            }
            Transition::ProfileSaved(player) => self.crew.player = Some(player),
            Transition::PlayerTwoSet(alias) => self.crew.player_two = Some(alias),
            Transition::DifficultyChosen(d) => {
                self.crew.difficulty = d;
                self.shell.settings.difficulty = d.index();
                self.shell.persist();
            }
            _ => {}
        }

        if to == ScreenKind::Gameplay {
            self.open_gameplay(now);
            return;
        }

        let next = self.build(to);
        let previous = std::mem::replace(&mut self.screen, next);
        if let ScreenState::Gameplay(gameplay) = previous {
            self.close_gameplay(*gameplay);
        }
    }

    fn build(&self, kind: ScreenKind) -> ScreenState {
        let crew = self.crew.clone();
        match kind {
            ScreenKind::MainMenu => ScreenState::MainMenu(MainMenu::new()),
            ScreenKind::Login => ScreenState::Login(Login::new()),
            ScreenKind::Register => ScreenState::Register(Register::new()),
            ScreenKind::PlayerHub => ScreenState::PlayerHub(PlayerHub::new(crew)),
            ScreenKind::Profile => ScreenState::Profile(Profile::new(crew)),
            ScreenKind::EditProfile => ScreenState::EditProfile(EditProfile::new(crew)),
            ScreenKind::GameMenu => ScreenState::GameMenu(GameMenu::new(crew)),
            ScreenKind::DifficultySelect => ScreenState::DifficultySelect(DifficultySelect::new(&crew)),
            ScreenKind::Player2Setup => ScreenState::Player2Setup(Player2Setup::new(crew)),
            // Opened through `open_gameplay`; a plain build lands on the selector.
            ScreenKind::Gameplay => ScreenState::DifficultySelect(DifficultySelect::new(&crew)),
        }
    }

    /// Enter fullscreen and start the engine. If the engine cannot start the
    /// display is restored and the difficulty selector stays up.
    fn open_gameplay(&mut self, now: Instant) {
        let scope = self.shell.display.enter(DisplayConfig {
            caption: format!("{} - {}", SHELL_CAPTION, self.crew.difficulty.title()),
            fullscreen: true,
        });
        let crew = self.crew.clone();
        let opened = Gameplay::open(&crew, &mut self.shell.services(now), scope);
        match opened {
            Ok(gameplay) => self.screen = ScreenState::Gameplay(Box::new(gameplay)),
            Err((e, scope)) => {
                log::error!("Gameplay could not start: {}", e);
                self.shell.display.restore(scope);
                self.shell.banner.error(&format!("Cannot start the game: {}", e));
                self.screen = ScreenState::DifficultySelect(DifficultySelect::new(&crew));
            }
        }
    }

    fn close_gameplay(&mut self, gameplay: Gameplay) {
        self.shell.audio.stop_music();
        self.shell.play_music();
        self.shell.display.restore(gameplay.into_scope());
        self.shell.settings.music_volume = self.shell.audio.volume();
        self.shell.persist();
    }

    /// Give back anything gameplay borrowed before the process exits.
    pub fn shutdown(&mut self) {
        let previous = std::mem::replace(&mut self.screen, ScreenState::MainMenu(MainMenu::new()));
        if let ScreenState::Gameplay(gameplay) = previous {
            self.close_gameplay(*gameplay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::NoGamepads;

    fn app() -> App {
        let settings = Settings::default();
        let audio = AudioContext::open(settings.music_volume);
        App::new(settings, audio, &mut NoGamepads, false).with_seed(7)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
    }

    #[test]
    fn starts_on_main_menu() {
        let app = app();
        assert_eq!(app.screen().kind(), ScreenKind::MainMenu);
        assert!(!app.shell().display.config().fullscreen);
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen().kind(), ScreenKind::Login);
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now());
        assert!(app.should_quit);
    }

    #[test]
    fn releases_are_dropped_outside_gameplay() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        app.on_key(key, Instant::now());
        assert_eq!(app.screen().kind(), ScreenKind::MainMenu);
    }
}
