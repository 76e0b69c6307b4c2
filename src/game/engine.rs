//! Session controller: owns the arena and the two logical players, turns
//! raw input into ship intents and runs the per-tick loop.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::Rng;
use ratatui::layout::{self, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;

use super::arena::{Arena, FrameReport, Id};
use super::canvas::DotCanvas;
use super::difficulty::Difficulty;
use super::entity::{Rect, Ship, SHIP_SPEED};
use super::hud;
use super::input::{InputEvent, KeyboardState, PadSnapshot};
use super::session::{GameSession, InputBinding, PowerUp};
use super::spawner::Spawner;
use super::sprite::{Sprite, SHIP_SIZE};
use super::starfield::Starfield;
use crate::assets::AssetCatalog;
use crate::audio::{AudioContext, SoundCue};
use crate::error::EngineError;
use crate::notify::Severity;

pub const FIRE_COOLDOWN_TICKS: u32 = 8;
pub const RAPID_FIRE_COOLDOWN_TICKS: u32 = 3;
pub const VOLUME_STEP: f32 = 0.1;
/// Ship spawn height as a fraction of the arena height.
const SPAWN_HEIGHT: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Initializing,
    Running,
    Paused,
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseEntry {
    Resume,
    VolumeDown,
    VolumeUp,
    Exit,
}

impl PauseEntry {
    pub fn all() -> &'static [PauseEntry] {
        &[PauseEntry::Resume, PauseEntry::VolumeDown, PauseEntry::VolumeUp, PauseEntry::Exit]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PauseEntry::Resume => "Resume",
            PauseEntry::VolumeDown => "Volume -",
            PauseEntry::VolumeUp => "Volume +",
            PauseEntry::Exit => "Exit",
        }
    }
}

/// What a game needs to know about the people playing it.
#[derive(Debug, Clone)]
pub struct GameSetup {
    pub player_one: String,
    pub player_two: String,
    pub ship_image: Option<PathBuf>,
    pub favourite_tracks: Vec<PathBuf>,
    pub difficulty: Difficulty,
    pub binding: InputBinding,
}

/// Tunables taken from the settings file.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub world_width: f32,
    pub world_height: f32,
    pub key_hold_ticks: u32,
    /// The terminal reports key releases.
    pub exact_keys: bool,
}

pub struct Engine {
    state: EngineState,
    session: GameSession,
    arena: Arena,
    ship: Option<Id<Ship>>,
    sprite: Sprite,
    spawner: Spawner,
    starfield: Starfield,
    keyboard: KeyboardState,
    tracks: Vec<PathBuf>,
    fire_cooldown: u32,
    pause_selected: usize,
    game_over: bool,
    notices: Vec<(String, Severity)>,
}

impl Engine {
    pub fn new<R: Rng + ?Sized>(
        setup: GameSetup,
        config: EngineConfig,
        catalog: &AssetCatalog,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        let (w, h) = (config.world_width, config.world_height);
        let size = SHIP_SIZE as f32;
        if !(w.is_finite() && h.is_finite()) || w < size || h < size {
            return Err(EngineError::Unavailable(format!(
                "battlefield {}x{} cannot hold a ship",
                w, h
            )));
        }
        let bounds = Rect::new(0.0, 0.0, w, h);

        let mut session = GameSession::new(setup.player_one, setup.player_two, setup.difficulty);
        session.binding = setup.binding;
        let sprite = Sprite::resolve(&catalog.ship_candidates(setup.ship_image.as_deref()));
        let tracks = catalog.track_candidates(&setup.favourite_tracks, rng);
        log::info!(
            "Engine initializing: difficulty {:?}, {} track candidate(s), input {:?}",
            session.difficulty,
            tracks.len(),
            session.binding
        );

        let mut engine = Self {
            state: EngineState::Initializing,
            spawner: Spawner::new(session.difficulty),
            session,
            arena: Arena::new(bounds),
            ship: None,
            sprite,
            starfield: Starfield::new(rng, w, h),
            keyboard: KeyboardState::new(config.exact_keys, config.key_hold_ticks),
            tracks,
            fire_cooldown: 0,
            pause_selected: 0,
            game_over: false,
            notices: Vec::new(),
        };
        engine.spawn_ship();
        Ok(engine)
    }

    /// Start the music and begin running.
    pub fn start(&mut self, audio: &mut AudioContext) {
        if self.state != EngineState::Initializing {
            return;
        }
        self.session.track = audio.play_chain(&self.tracks);
        self.set_state(EngineState::Running);
    }

    fn set_state(&mut self, state: EngineState) {
        if self.state != state {
            log::info!("Engine {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn ship(&self) -> Option<Id<Ship>> {
        self.ship
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn pause_selected(&self) -> usize {
        self.pause_selected
    }

    /// Messages for the banner since the last call.
    pub fn take_notices(&mut self) -> Vec<(String, Severity)> {
        std::mem::take(&mut self.notices)
    }

    fn spawn_ship(&mut self) {
        self.arena.remove_ships();
        let b = self.arena.bounds();
        let ship = Ship::new(
            b.center_x(),
            b.top() + b.h * SPAWN_HEIGHT,
            SHIP_SPEED,
            self.session.active_slot(),
            self.sprite.clone(),
        );
        self.ship = Some(self.arena.add_ship(ship));
    }

    fn fire(&mut self, audio: &mut AudioContext) {
        if self.fire_cooldown > 0 {
            return;
        }
        let Some(ship) = self.ship else { return };
        if self.arena.fire_from(ship).is_some() {
            audio.play_cue(SoundCue::Shot);
            self.fire_cooldown = if self.session.active().power_ups.contains(&PowerUp::RapidFire) {
                RAPID_FIRE_COOLDOWN_TICKS
            } else {
                FIRE_COOLDOWN_TICKS
            };
        }
    }

    fn pause(&mut self, audio: &mut AudioContext) {
        self.pause_selected = 0;
        self.keyboard.clear();
        audio.pause_music();
        self.set_state(EngineState::Paused);
    }

    fn resume(&mut self, audio: &mut AudioContext) {
        audio.resume_music();
        self.set_state(EngineState::Running);
    }

    fn exit(&mut self, audio: &mut AudioContext) {
        audio.stop_music();
        self.arena.clear_hostiles();
        self.arena.remove_ships();
        self.ship = None;
        self.set_state(EngineState::Exited);
    }

    fn volume_key(&mut self, ev: &InputEvent, audio: &mut AudioContext) -> bool {
        let delta = if ev.is_key(KeyCode::Char('+')) || ev.is_key(KeyCode::Char('=')) {
            VOLUME_STEP
        } else if ev.is_key(KeyCode::Char('-')) {
            -VOLUME_STEP
        } else {
            return false;
        };
        let v = audio.adjust_volume(delta);
        log::debug!("Music volume {:.1}", v);
        true
    }

    pub fn handle_input(&mut self, ev: &InputEvent, audio: &mut AudioContext) {
        match self.state {
            EngineState::Initializing | EngineState::Exited => {}
            EngineState::Paused => self.handle_paused(ev, audio),
            EngineState::Running => self.handle_running(ev, audio),
        }
    }

    fn handle_running(&mut self, ev: &InputEvent, audio: &mut AudioContext) {
        if self.game_over {
            if ev.is_confirm() {
                self.exit(audio);
            }
            return;
        }
        if ev.is_menu_toggle() {
            self.pause(audio);
            return;
        }
        if let InputEvent::Key(key) = ev {
            if self.keyboard.handle(key) {
                return;
            }
        }
        if ev.is_fire() {
            self.fire(audio);
            return;
        }
        if self.volume_key(ev, audio) {
            return;
        }
        if ev.is_key(KeyCode::Char('l')) || ev.is_key(KeyCode::Char('L')) {
            log::debug!("Debug: life removed");
            self.session.active_mut().lose_life();
            self.after_life_lost();
        } else if ev.is_key(KeyCode::Char('b')) || ev.is_key(KeyCode::Char('B')) {
            log::debug!("Debug: shield granted");
            self.session.active_mut().power_ups.insert(PowerUp::Shield);
        }
    }

    fn handle_paused(&mut self, ev: &InputEvent, audio: &mut AudioContext) {
        let n = PauseEntry::all().len();
        if ev.is_menu_toggle() {
            self.resume(audio);
        } else if ev.is_key(KeyCode::Up) {
            self.pause_selected = (self.pause_selected + n - 1) % n;
        } else if ev.is_key(KeyCode::Down) {
            self.pause_selected = (self.pause_selected + 1) % n;
        } else if ev.is_confirm() {
            match PauseEntry::all()[self.pause_selected] {
                PauseEntry::Resume => self.resume(audio),
                PauseEntry::VolumeDown => {
                    audio.adjust_volume(-VOLUME_STEP);
                }
                PauseEntry::VolumeUp => {
                    audio.adjust_volume(VOLUME_STEP);
                }
                PauseEntry::Exit => self.exit(audio),
            }
        } else {
            self.volume_key(ev, audio);
        }
    }

    /// One fixed step. Does nothing unless running.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: Duration,
        now: Instant,
        pad: &PadSnapshot,
        audio: &mut AudioContext,
        rng: &mut R,
    ) {
        if self.state != EngineState::Running || self.game_over {
            return;
        }
        self.starfield.advance(rng, dt);
        let directions = self.keyboard.directions().or(pad.directions());
        self.keyboard.tick();
        self.fire_cooldown = self.fire_cooldown.saturating_sub(1);

        let bounds = self.arena.bounds();
        if let Some(enemy) = self.spawner.tick(rng, bounds, self.arena.enemies().len()) {
            self.arena.add_enemy(enemy);
        }
        let report = self.arena.update(directions, now);
        self.apply(report, audio);
    }

    fn apply(&mut self, report: FrameReport, audio: &mut AudioContext) {
        if report.escaped > 0 {
            log::debug!("{} enemy(s) slipped past the bottom edge", report.escaped);
        }
        for cue in &report.cues {
            audio.play_cue(*cue);
        }
        for kill in &report.kills {
            let player = self.session.player_mut(kill.owner);
            if let Some(pu) = player.record_kill() {
                let msg = format!("{} earned {}", player.name, pu.label());
                log::info!("{}", msg);
                self.notices.push((msg, Severity::Success));
            }
        }
        let mut life_lost = false;
        for hit in &report.hits {
            life_lost |= self.session.player_mut(hit.owner).take_damage(hit.damage);
        }
        if life_lost {
            self.after_life_lost();
        }
    }

    /// Clear the field and respawn, hand over the turn, or end the game.
    fn after_life_lost(&mut self) {
        self.arena.clear_hostiles();
        self.spawner.reset();
        self.keyboard.clear();
        if !self.session.active().is_out() {
            self.spawn_ship();
            return;
        }
        if let Some(slot) = self.session.pass_turn() {
            let msg = format!("{}, your turn", self.session.active().name);
            log::info!("Turn passes to player {:?}", slot);
            self.notices.push((msg, Severity::Info));
            self.spawn_ship();
        } else {
            log::info!("Game over");
            self.arena.remove_ships();
            self.ship = None;
            self.game_over = true;
        }
    }

    pub fn render(&self, frame: &mut Frame, area: layout::Rect, volume: f32) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(80, 255, 80)))
            .title(" Galactatec ")
            .title_style(Style::default().fg(Color::Rgb(100, 255, 100)).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(4), Constraint::Length(1)])
            .split(inner);

        frame.render_widget(Paragraph::new(hud::status_line(&self.session)), chunks[0]);

        let field = chunks[1];
        if field.width > 0 && field.height > 0 {
            let mut canvas = DotCanvas::new(
                field.width as usize,
                field.height as usize,
                self.arena.bounds(),
                Color::Rgb(5, 7, 22),
            );
            self.starfield.draw(&mut canvas);
            self.arena.draw(&mut canvas);
            frame.render_widget(Paragraph::new(canvas.into_lines()), field);
        }

        if self.game_over {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    " GAME OVER - Enter to leave ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ))),
                chunks[2],
            );
            hud::render_game_over(frame, field, &self.session);
        } else {
            frame.render_widget(Paragraph::new(hud::help_line()), chunks[2]);
            if self.state == EngineState::Paused {
                hud::render_pause_overlay(frame, field, self.pause_selected, volume);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioBackend, SilentBackend};
    use crate::error::AssetError;
    use std::cell::Cell;
    use std::path::Path;
    use std::rc::Rc;
    use crate::game::entity::PlayerSlot;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> GameSetup {
        GameSetup {
            player_one: "NOVA".into(),
            player_two: "ORION".into(),
            ship_image: None,
            favourite_tracks: vec![],
            difficulty: Difficulty::Normal,
            binding: InputBinding::KeyboardOnly,
        }
    }

    fn config() -> EngineConfig {
        EngineConfig { world_width: 900.0, world_height: 700.0, key_hold_ticks: 8, exact_keys: false }
    }

    fn running() -> (Engine, AudioContext, StdRng) {
        let mut rng = StdRng::seed_from_u64(42);
        let mut audio = AudioContext::new(Box::new(SilentBackend), 0.5);
        let mut e = Engine::new(setup(), config(), &AssetCatalog::new("/nonexistent"), &mut rng).unwrap();
        e.start(&mut audio);
        (e, audio, rng)
    }

    fn key(c: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(c, KeyModifiers::NONE))
    }

    #[test]
    fn ship_spawns_at_seventy_percent_height() {
        let (e, _, _) = running();
        let ship = e.arena().ships().get(e.ship().unwrap()).unwrap();
        assert_eq!(ship.rect.center_x(), 450.0);
        assert_eq!(ship.rect.center_y(), 490.0);
        assert_eq!(e.state(), EngineState::Running);
    }

    #[test]
    fn degenerate_world_is_unavailable() {
        let mut rng = StdRng::seed_from_u64(1);
        let cfg = EngineConfig { world_width: 10.0, ..config() };
        let res = Engine::new(setup(), cfg, &AssetCatalog::new("/nonexistent"), &mut rng);
        assert!(matches!(res, Err(EngineError::Unavailable(_))));
    }

    #[test]
    fn fire_is_rate_limited_by_cooldown() {
        let (mut e, mut audio, _) = running();
        e.handle_input(&key(KeyCode::Char(' ')), &mut audio);
        e.handle_input(&key(KeyCode::Char(' ')), &mut audio);
        assert_eq!(e.arena().projectiles().len(), 1);
    }

    #[test]
    fn pause_freezes_the_world() {
        let (mut e, mut audio, mut rng) = running();
        e.handle_input(&key(KeyCode::Char(' ')), &mut audio);
        e.handle_input(&key(KeyCode::Esc), &mut audio);
        assert_eq!(e.state(), EngineState::Paused);
        let before = e.arena().projectiles().values().next().unwrap().rect;
        for _ in 0..5 {
            e.tick(Duration::from_millis(16), Instant::now(), &PadSnapshot::default(), &mut audio, &mut rng);
        }
        assert_eq!(e.arena().projectiles().values().next().unwrap().rect, before);
        e.handle_input(&InputEvent::PadButton(7), &mut audio);
        assert_eq!(e.state(), EngineState::Running);
    }

    #[test]
    fn overlay_volume_and_exit() {
        let (mut e, mut audio, _) = running();
        e.handle_input(&key(KeyCode::Esc), &mut audio);
        e.handle_input(&key(KeyCode::Down), &mut audio);
        e.handle_input(&key(KeyCode::Enter), &mut audio);
        assert!((audio.volume() - 0.4).abs() < 1e-6);
        e.handle_input(&key(KeyCode::Up), &mut audio);
        e.handle_input(&key(KeyCode::Up), &mut audio);
        assert_eq!(PauseEntry::all()[e.pause_selected()], PauseEntry::Exit);
        e.handle_input(&key(KeyCode::Enter), &mut audio);
        assert_eq!(e.state(), EngineState::Exited);
    }

    #[test]
    fn losing_all_lives_hands_over_then_ends() {
        let (mut e, mut audio, _) = running();
        for _ in 0..3 {
            e.handle_input(&key(KeyCode::Char('l')), &mut audio);
        }
        assert_eq!(e.session().active_slot(), PlayerSlot::Two);
        assert!(!e.is_game_over());
        let ship = e.arena().ships().get(e.ship().unwrap()).unwrap();
        assert_eq!(ship.owner, PlayerSlot::Two);
        assert_eq!(e.take_notices().len(), 1);

        for _ in 0..3 {
            e.handle_input(&key(KeyCode::Char('L')), &mut audio);
        }
        assert!(e.is_game_over());
        assert!(e.ship().is_none());
        e.handle_input(&InputEvent::PadButton(0), &mut audio);
        assert_eq!(e.state(), EngineState::Exited);
    }

    /// Counts move cues; everything else is silent.
    struct MoveCounter(Rc<Cell<u32>>);

    impl AudioBackend for MoveCounter {
        fn load_cue(&mut self, _cue: SoundCue, _path: &Path) -> Result<(), AssetError> {
            Ok(())
        }
        fn play_cue(&mut self, cue: SoundCue) -> Result<(), AssetError> {
            if cue == SoundCue::Move {
                self.0.set(self.0.get() + 1);
            }
            Ok(())
        }
        fn play_music(&mut self, path: &Path, _volume: f32) -> Result<(), AssetError> {
            Err(AssetError::NotFound(path.to_path_buf()))
        }
        fn set_music_volume(&mut self, _volume: f32) {}
        fn pause_music(&mut self) {}
        fn resume_music(&mut self) {}
        fn stop_music(&mut self) {}
    }

    #[test]
    fn move_sound_follows_the_tick_clock() {
        let moves = Rc::new(Cell::new(0));
        let mut rng = StdRng::seed_from_u64(42);
        let mut audio = AudioContext::new(Box::new(MoveCounter(moves.clone())), 0.5);
        let mut e = Engine::new(setup(), config(), &AssetCatalog::new("/nonexistent"), &mut rng).unwrap();
        e.start(&mut audio);

        let pad = PadSnapshot { axes: vec![0.9, 0.0], pressed: vec![] };
        let t0 = Instant::now();
        for ms in [0, 50, 99] {
            e.tick(Duration::from_millis(16), t0 + Duration::from_millis(ms), &pad, &mut audio, &mut rng);
        }
        assert_eq!(moves.get(), 1);
        e.tick(Duration::from_millis(16), t0 + Duration::from_millis(100), &pad, &mut audio, &mut rng);
        assert_eq!(moves.get(), 2);
    }

    #[test]
    fn pad_axis_moves_the_ship() {
        let (mut e, mut audio, mut rng) = running();
        let pad = PadSnapshot { axes: vec![0.9, 0.0], pressed: vec![] };
        for _ in 0..10 {
            e.tick(Duration::from_millis(16), Instant::now(), &pad, &mut audio, &mut rng);
        }
        let ship = e.arena().ships().get(e.ship().unwrap()).unwrap();
        assert_eq!(ship.rect.center_x(), 510.0);
    }
}
