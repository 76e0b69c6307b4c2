//! Application screens and the transition table between them.

pub mod difficulty;
pub mod form;
pub mod gameplay;
pub mod login;
pub mod menu;
pub mod player2;
pub mod profile;
pub mod recovery;
pub mod register;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use ratatui::prelude::*;

use crate::account::{CodeMailer, Player, PlayerDirectory};
use crate::assets::AssetCatalog;
use crate::audio::AudioContext;
use crate::config::Settings;
use crate::game::input::{InputEvent, PadSnapshot};
use crate::game::Difficulty;
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    MainMenu,
    Login,
    Register,
    PlayerHub,
    Profile,
    EditProfile,
    GameMenu,
    DifficultySelect,
    Player2Setup,
    Gameplay,
}

impl ScreenKind {
    pub fn title(&self) -> &'static str {
        match self {
            ScreenKind::MainMenu => "Main Menu",
            ScreenKind::Login => "Log In",
            ScreenKind::Register => "Register",
            ScreenKind::PlayerHub => "Hangar",
            ScreenKind::Profile => "Profile",
            ScreenKind::EditProfile => "Edit Profile",
            ScreenKind::GameMenu => "Game",
            ScreenKind::DifficultySelect => "Difficulty",
            ScreenKind::Player2Setup => "Player 2",
            ScreenKind::Gameplay => "Battle",
        }
    }
}

/// What a screen asks the shell to do after an input.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Stay,
    Back,
    Quit,
    OpenLogin,
    OpenRegister,
    Registered,
    LoggedIn(Player),
    LoggedOut,
    Play,
    ViewProfile,
    EditProfile,
    ProfileSaved(Player),
    StartGame,
    SetupPlayerTwo,
    PlayerTwoSet(String),
    DifficultyChosen(Difficulty),
    ExitGameplay,
}

/// The screen that follows `from` on `transition`. `None` means the
/// transition is not valid there and the current screen stays.
pub fn next_screen(from: ScreenKind, transition: &Transition) -> Option<ScreenKind> {
    use ScreenKind as K;
    use Transition as T;
    let to = match (from, transition) {
        (K::MainMenu, T::OpenLogin) => K::Login,
        (K::MainMenu, T::OpenRegister) => K::Register,
        (K::Login, T::LoggedIn(_)) => K::PlayerHub,
        (K::Login, T::Back) => K::MainMenu,
        (K::Register, T::Registered | T::Back) => K::MainMenu,
        (K::PlayerHub, T::Play) => K::GameMenu,
        (K::PlayerHub, T::ViewProfile) => K::Profile,
        (K::PlayerHub, T::EditProfile) => K::EditProfile,
        (K::PlayerHub, T::LoggedOut | T::Back) => K::MainMenu,
        (K::Profile, T::Back) => K::PlayerHub,
        (K::Profile, T::EditProfile) => K::EditProfile,
        (K::EditProfile, T::ProfileSaved(_) | T::Back) => K::PlayerHub,
        (K::GameMenu, T::StartGame) => K::DifficultySelect,
        (K::GameMenu, T::SetupPlayerTwo) => K::Player2Setup,
        (K::GameMenu, T::Back) => K::PlayerHub,
        (K::Player2Setup, T::PlayerTwoSet(_) | T::Back) => K::GameMenu,
        (K::DifficultySelect, T::DifficultyChosen(_)) => K::Gameplay,
        (K::DifficultySelect, T::Back) => K::GameMenu,
        (K::Gameplay, T::ExitGameplay) => K::DifficultySelect,
        _ => return None,
    };
    Some(to)
}

/// Context carried from screen to screen: who is logged in and what they
/// chose so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Crew {
    pub player: Option<Player>,
    pub player_two: Option<String>,
    pub difficulty: Difficulty,
}

impl Crew {
    pub fn player_name(&self) -> &str {
        self.player.as_ref().map(|p| p.display_name()).unwrap_or("PLAYER 1")
    }

    pub fn player_two_name(&self) -> &str {
        self.player_two.as_deref().unwrap_or("PLAYER 2")
    }
}

/// Collaborators lent to the active screen for one call.
pub struct Services<'a> {
    pub audio: &'a mut AudioContext,
    pub banner: &'a mut dyn Notifier,
    pub directory: &'a mut dyn PlayerDirectory,
    pub mailer: &'a mut dyn CodeMailer,
    pub settings: &'a Settings,
    pub catalog: &'a AssetCatalog,
    pub pad: &'a PadSnapshot,
    /// Name of the bound joystick, if any.
    pub pad_name: Option<&'a str>,
    pub rng: &'a mut StdRng,
    pub now: Instant,
    pub exact_keys: bool,
}

/// Read-only state a screen may show.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    pub now: Instant,
    pub volume: f32,
}

pub trait Screen {
    fn kind(&self) -> ScreenKind;
    fn handle_input(&mut self, ev: &InputEvent, svc: &mut Services) -> Transition;
    fn update(&mut self, _dt: Duration, _svc: &mut Services) -> Transition {
        Transition::Stay
    }
    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext);
}

/// Vertical list of choices with a wrapping cursor.
#[derive(Debug, Clone)]
pub struct MenuList {
    items: Vec<&'static str>,
    selected: usize,
}

impl MenuList {
    pub fn new(items: Vec<&'static str>) -> Self {
        Self { items, selected: 0 }
    }

    pub fn items(&self) -> &[&'static str] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, idx: usize) {
        if idx < self.items.len() {
            self.selected = idx;
        }
    }

    /// Moves the cursor on Up/Down. Returns the chosen index on confirm.
    pub fn handle(&mut self, ev: &InputEvent) -> Option<usize> {
        let n = self.items.len();
        if n == 0 {
            return None;
        }
        if ev.is_key(KeyCode::Up) {
            self.selected = (self.selected + n - 1) % n;
        } else if ev.is_key(KeyCode::Down) {
            self.selected = (self.selected + 1) % n;
        } else if ev.is_confirm() {
            return Some(self.selected);
        }
        None
    }
}
