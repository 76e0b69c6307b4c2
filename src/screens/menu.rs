use ratatui::prelude::*;

use super::{Crew, MenuList, RenderContext, Screen, ScreenKind, Services, Transition};
use crate::game::input::InputEvent;
use crate::ui::{home, widgets};

pub struct MainMenu {
    menu: MenuList,
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenu {
    pub fn new() -> Self {
        Self { menu: MenuList::new(vec!["Log in", "Register", "Exit"]) }
    }
}

impl Screen for MainMenu {
    fn kind(&self) -> ScreenKind {
        ScreenKind::MainMenu
    }

    fn handle_input(&mut self, ev: &InputEvent, _svc: &mut Services) -> Transition {
        match self.menu.handle(ev) {
            Some(0) => Transition::OpenLogin,
            Some(1) => Transition::OpenRegister,
            Some(_) => Transition::Quit,
            None => Transition::Stay,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) {
        home::render_home(frame, area, &self.menu);
    }
}

/// Landing screen after login.
pub struct PlayerHub {
    crew: Crew,
    menu: MenuList,
}

impl PlayerHub {
    pub fn new(crew: Crew) -> Self {
        Self {
            crew,
            menu: MenuList::new(vec!["Play", "View profile", "Edit profile", "Log out"]),
        }
    }
}

impl Screen for PlayerHub {
    fn kind(&self) -> ScreenKind {
        ScreenKind::PlayerHub
    }

    fn handle_input(&mut self, ev: &InputEvent, _svc: &mut Services) -> Transition {
        if ev.is_menu_toggle() {
            return Transition::LoggedOut;
        }
        match self.menu.handle(ev) {
            Some(0) => Transition::Play,
            Some(1) => Transition::ViewProfile,
            Some(2) => Transition::EditProfile,
            Some(_) => Transition::LoggedOut,
            None => Transition::Stay,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) {
        let header = vec![Line::from(vec![
            Span::styled("Welcome, ", Style::default().fg(widgets::DIM)),
            Span::styled(
                self.crew.player_name().to_string(),
                Style::default().fg(widgets::ACCENT).add_modifier(Modifier::BOLD),
            ),
        ])];
        widgets::render_menu(frame, area, "Hangar", header, &self.menu);
    }
}

pub struct GameMenu {
    crew: Crew,
    menu: MenuList,
}

impl GameMenu {
    pub fn new(crew: Crew) -> Self {
        Self {
            crew,
            menu: MenuList::new(vec!["Start game", "Player 2 setup", "Back"]),
        }
    }
}

impl Screen for GameMenu {
    fn kind(&self) -> ScreenKind {
        ScreenKind::GameMenu
    }

    fn handle_input(&mut self, ev: &InputEvent, _svc: &mut Services) -> Transition {
        if ev.is_menu_toggle() {
            return Transition::Back;
        }
        match self.menu.handle(ev) {
            Some(0) => Transition::StartGame,
            Some(1) => Transition::SetupPlayerTwo,
            Some(_) => Transition::Back,
            None => Transition::Stay,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) {
        let header = vec![
            Line::from(Span::styled(
                format!("Player 1: {}", self.crew.player_name()),
                Style::default().fg(Color::Rgb(180, 180, 200)),
            )),
            Line::from(Span::styled(
                format!("Player 2: {}", self.crew.player_two_name()),
                Style::default().fg(Color::Rgb(180, 180, 200)),
            )),
        ];
        widgets::render_menu(frame, area, "Game", header, &self.menu);
    }
}
