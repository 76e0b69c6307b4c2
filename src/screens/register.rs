use std::path::PathBuf;

use ratatui::prelude::*;

use super::form::{Form, FormAction, TextField};
use super::{RenderContext, Screen, ScreenKind, Services, Transition};
use crate::account::ProfileData;
use crate::assets::is_supported_audio;
use crate::error::ValidationError;
use crate::game::input::InputEvent;
use crate::ui::widgets;

/// Build profile data from raw field text. Optional paths must point at
/// existing files; tracks are comma separated.
pub fn parse_profile(
    alias: &str,
    full_name: &str,
    email: &str,
    ship_image: &str,
    tracks: &str,
) -> Result<ProfileData, ValidationError> {
    let ship_image = match ship_image.trim() {
        "" => None,
        p => {
            let path = PathBuf::from(p);
            if !path.is_file() {
                return Err(ValidationError::new(format!("Ship image not found: {}", p)));
            }
            Some(path)
        }
    };
    let mut favourite_tracks = Vec::new();
    for t in tracks.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let path = PathBuf::from(t);
        if !path.is_file() || !is_supported_audio(&path) {
            return Err(ValidationError::new(format!("Invalid music file: {}", t)));
        }
        favourite_tracks.push(path);
    }
    Ok(ProfileData {
        alias: alias.trim().to_string(),
        full_name: full_name.trim().to_string(),
        email: email.trim().to_string(),
        ship_image,
        favourite_tracks,
    })
}

pub struct Register {
    form: Form,
}

impl Default for Register {
    fn default() -> Self {
        Self::new()
    }
}

impl Register {
    pub fn new() -> Self {
        Self {
            form: Form::new(vec![
                TextField::new("Alias"),
                TextField::new("Full name"),
                TextField::new("Email"),
                TextField::new("Password").masked(),
                TextField::new("Ship image (optional path)").max_len(256),
                TextField::new("Favourite tracks (comma separated)").max_len(1024),
            ]),
        }
    }

    fn submit(&mut self, svc: &mut Services) -> Transition {
        let f = &self.form;
        let profile = match parse_profile(f.value(0), f.value(1), f.value(2), f.value(4), f.value(5)) {
            Ok(p) => p,
            Err(e) => {
                svc.banner.error(&e.0);
                return Transition::Stay;
            }
        };
        match svc.directory.register(profile, f.value(3)) {
            Ok(player) => {
                svc.banner.success(&format!("Pilot {} registered. Log in to play.", player.alias));
                Transition::Registered
            }
            Err(e) => {
                svc.banner.error(&e.0);
                Transition::Stay
            }
        }
    }
}

impl Screen for Register {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Register
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
            "Register",
            &self.form,
            &[("Tab", "next"), ("Enter", "register"), ("Esc", "cancel")],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_optional_fields_are_none() {
        let p = parse_profile(" nova ", "Nova", "nova@galaxy.io", "  ", " , ").unwrap();
        assert_eq!(p.alias, "nova");
        assert!(p.ship_image.is_none());
        assert!(p.favourite_tracks.is_empty());
    }

    #[test]
    fn missing_files_are_rejected() {
        let err = parse_profile("nova", "Nova", "n@g.io", "/nope/ship.png", "").unwrap_err();
        assert!(err.0.starts_with("Ship image not found"));
        let err = parse_profile("nova", "Nova", "n@g.io", "", "/nope/a.mp3").unwrap_err();
        assert!(err.0.starts_with("Invalid music file"));
    }
}
