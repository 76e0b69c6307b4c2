use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::form::{Form, FormAction, TextField};
use super::register::parse_profile;
use super::{Crew, RenderContext, Screen, ScreenKind, Services, Transition};
use crate::game::input::InputEvent;
use crate::ui::widgets;

/// Read-only view of the logged-in player.
pub struct Profile {
    crew: Crew,
}

impl Profile {
    pub fn new(crew: Crew) -> Self {
        Self { crew }
    }
}

impl Screen for Profile {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Profile
    }

    fn handle_input(&mut self, ev: &InputEvent, _svc: &mut Services) -> Transition {
        if ev.is_menu_toggle() || ev.is_confirm() {
            Transition::Back
        } else if ev.is_key(KeyCode::Char('e')) || ev.is_key(KeyCode::Char('E')) {
            Transition::EditProfile
        } else {
            Transition::Stay
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) {
        let popup = widgets::centered_rect(area, 64, 16);
        frame.render_widget(Clear, popup);
        let block = widgets::panel("Profile", widgets::FRAME);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let label = Style::default().fg(widgets::DIM);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        let row = |k: &str, v: String| {
            Line::from(vec![Span::styled(format!("  {:<12}", k), label), Span::styled(v, value)])
        };

        let mut lines = vec![Line::from("")];
        match &self.crew.player {
            Some(p) => {
                lines.push(row("Alias", p.alias.clone()));
                lines.push(row("Full name", p.full_name.clone()));
                lines.push(row("Email", p.email.clone()));
                lines.push(row(
                    "Ship image",
                    p.ship_image
                        .as_ref()
                        .map(|s| s.display().to_string())
                        .unwrap_or_else(|| "(generated)".into()),
                ));
                lines.push(row("Tracks", format!("{}", p.favourite_tracks.len())));
                for t in &p.favourite_tracks {
                    lines.push(Line::from(Span::styled(format!("    \u{266b} {}", t.display()), label)));
                }
            }
            None => lines.push(Line::from(Span::styled("  No player logged in", label))),
        }
        lines.push(Line::from(""));
        lines.push(widgets::hint_line(&[("E", "edit"), ("Esc", "back")]));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

pub struct EditProfile {
    crew: Crew,
    form: Form,
}

impl EditProfile {
    pub fn new(crew: Crew) -> Self {
        let (alias, name, email, ship, tracks) = match &crew.player {
            Some(p) => (
                p.alias.clone(),
                p.full_name.clone(),
                p.email.clone(),
                p.ship_image.as_ref().map(|s| s.display().to_string()).unwrap_or_default(),
                p.favourite_tracks
                    .iter()
                    .map(|t| t.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            None => Default::default(),
        };
        let form = Form::new(vec![
            TextField::new("Alias").with_value(alias),
            TextField::new("Full name").with_value(name),
            TextField::new("Email").with_value(email),
            TextField::new("Ship image (optional path)").max_len(256).with_value(ship),
            TextField::new("Favourite tracks (comma separated)").max_len(1024).with_value(tracks),
        ]);
        Self { crew, form }
    }

    fn submit(&mut self, svc: &mut Services) -> Transition {
        let Some(player) = &self.crew.player else {
            return Transition::Back;
        };
        let f = &self.form;
        let result = parse_profile(f.value(0), f.value(1), f.value(2), f.value(3), f.value(4))
            .and_then(|profile| svc.directory.update_profile(player.id, profile));
        match result {
            Ok(updated) => {
                svc.banner.success("Profile updated.");
                Transition::ProfileSaved(updated)
            }
            Err(e) => {
                svc.banner.error(&e.0);
                Transition::Stay
            }
        }
    }
}

impl Screen for EditProfile {
    fn kind(&self) -> ScreenKind {
        ScreenKind::EditProfile
    }

    fn handle_input(&mut self, ev: &InputEvent, svc: &mut Services) -> Transition {
        let InputEvent::Key(key) = ev else {
            return Transition::Stay;
        };
        match self.form.handle_key(key) {
            FormAction::Submit => self.submit(svc),
            FormAction::Cancel => Transition::Back,
            FormAction::None => Transition::Stay,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) {
        widgets::render_form(
            frame,
            area,
            "Edit Profile",
            &self.form,
            &[("Tab", "next"), ("Enter", "save"), ("Esc", "cancel")],
        );
    }
}
