use crossterm::event::KeyCode;
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::form::{Form, FormAction, TextField};
use super::recovery::{RecoveryModal, RecoveryOutcome, RecoveryStep};
use super::{RenderContext, Screen, ScreenKind, Services, Transition};
use crate::game::input::InputEvent;
use crate::ui::widgets;

pub struct Login {
    form: Form,
    recovery: Option<RecoveryModal>,
}

impl Default for Login {
    fn default() -> Self {
        Self::new()
    }
}

impl Login {
    pub fn new() -> Self {
        Self {
            form: Form::new(vec![
                TextField::new("Alias or email"),
                TextField::new("Password").masked(),
            ]),
            recovery: None,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn recovery(&self) -> Option<&RecoveryModal> {
        self.recovery.as_ref()
    }

    fn submit(&mut self, svc: &mut Services) -> Transition {
        let login = self.form.value(0).trim();
        let password = self.form.value(1);
        if login.is_empty() || password.is_empty() {
            svc.banner.error("Enter your alias or email and password.");
            return Transition::Stay;
        }
        match svc.directory.authenticate(login, password) {
            Ok(player) => {
                log::info!("Player {} logged in", player.alias);
                svc.banner.success(&format!("Welcome back, {}!", player.alias));
                Transition::LoggedIn(player)
            }
            Err(e) => {
                svc.banner.error(&e.0);
                Transition::Stay
            }
        }
    }
}

impl Screen for Login {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Login
    }

    fn handle_input(&mut self, ev: &InputEvent, svc: &mut Services) -> Transition {
        if let Some(modal) = &mut self.recovery {
            match modal.handle_input(ev, svc) {
                RecoveryOutcome::Open => {}
                RecoveryOutcome::Closed | RecoveryOutcome::Completed => {
                    self.recovery = None;
                    self.form.clear();
                }
            }
            return Transition::Stay;
        }
        if ev.is_key(KeyCode::F(2)) {
            self.recovery = Some(RecoveryModal::new());
            return Transition::Stay;
        }
        let InputEvent::Key(key) = ev else {
            return Transition::Stay;
        };
        match self.form.handle_key(key) {
            FormAction::Submit => self.submit(svc),
            FormAction::Cancel => Transition::Back,
            FormAction::None => Transition::Stay,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &RenderContext) {
        widgets::render_form(
            frame,
            area,
            "Log In",
            &self.form,
            &[("Tab", "next"), ("Enter", "log in"), ("F2", "recover password"), ("Esc", "back")],
        );
        if let Some(modal) = &self.recovery {
            render_recovery(frame, area, modal, ctx);
        }
    }
}

fn render_recovery(frame: &mut Frame, area: Rect, modal: &RecoveryModal, ctx: &RenderContext) {
    let popup = widgets::centered_rect(area, 52, 12);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(widgets::ACCENT))
        .title(" Recover password ")
        .title_style(Style::default().fg(widgets::ACCENT).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(widgets::PANEL_BG));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let prompt = match modal.step() {
        RecoveryStep::Email => "Enter the email of your account.".to_string(),
        RecoveryStep::Code => {
            let left = modal.issued().map(|c| c.remaining(ctx.now).as_secs()).unwrap_or(0);
            format!("Enter the 6-digit code ({}:{:02} left).", left / 60, left % 60)
        }
        RecoveryStep::Password => "Choose a new password.".to_string(),
    };
    let mut lines = vec![Line::from(Span::styled(prompt, Style::default().fg(Color::Rgb(180, 180, 200))))];
    lines.extend(widgets::form_lines(modal.form()));
    lines.push(Line::from(""));
    lines.push(widgets::hint_line(&[("Enter", "continue"), ("Esc", "cancel")]));
    frame.render_widget(Paragraph::new(lines), inner);
}
