use ratatui::prelude::*;

use super::form::{CharFilter, Form, FormAction, TextField};
use super::{Crew, RenderContext, Screen, ScreenKind, Services, Transition};
use crate::error::ValidationError;
use crate::game::input::InputEvent;
use crate::ui::widgets;

pub const MAX_ALIAS_LEN: usize = 10;

pub fn validate_player_two(alias: &str, player_one: &str) -> Result<String, ValidationError> {
    let alias = alias.trim();
    if alias.is_empty() {
        return Err(ValidationError::new("Player 2 needs an alias."));
    }
    if alias.chars().count() > MAX_ALIAS_LEN {
        return Err(ValidationError::new(format!(
            "Player 2 alias has at most {} characters.",
            MAX_ALIAS_LEN
        )));
    }
    if alias.eq_ignore_ascii_case(player_one) {
        return Err(ValidationError::new("Player 2 must differ from player 1."));
    }
    Ok(alias.to_string())
}

pub struct Player2Setup {
    crew: Crew,
    form: Form,
}

impl Player2Setup {
    pub fn new(crew: Crew) -> Self {
        let current = crew.player_two.clone().unwrap_or_default();
        let form = Form::new(vec![TextField::new("Player 2 alias")
            .filter(CharFilter::Alnum)
            .max_len(MAX_ALIAS_LEN)
            .with_value(current)]);
        Self { crew, form }
    }
}

impl Screen for Player2Setup {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Player2Setup
    }

    fn handle_input(&mut self, ev: &InputEvent, svc: &mut Services) -> Transition {
        let InputEvent::Key(key) = ev else {
            return Transition::Stay;
        };
        match self.form.handle_key(key) {
            FormAction::Submit => match validate_player_two(self.form.value(0), self.crew.player_name()) {
                Ok(alias) => {
                    svc.banner.success(&format!("{} joins as player 2.", alias));
                    Transition::PlayerTwoSet(alias)
                }
                Err(e) => {
                    svc.banner.error(&e.0);
                    Transition::Stay
                }
            },
            FormAction::Cancel => Transition::Back,
            FormAction::None => Transition::Stay,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) {
        widgets::render_form(
            frame,
            area,
            "Player 2",
            &self.form,
            &[("Enter", "confirm"), ("Esc", "back")],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_rules() {
        assert!(validate_player_two("", "nova").is_err());
        assert!(validate_player_two("abcdefghijk", "nova").is_err());
        assert!(validate_player_two("NOVA", "nova").is_err());
        assert_eq!(validate_player_two(" orion ", "nova").unwrap(), "orion");
    }
}
