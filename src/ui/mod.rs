pub mod header;
pub mod home;
pub mod widgets;

use std::time::Instant;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::game::canvas::DotCanvas;
use crate::game::entity;
use crate::notify::Severity;

pub fn render(frame: &mut Frame, app: &App, now: Instant) {
    let fullscreen = app.shell().display.config().fullscreen;
    let constraints = if fullscreen {
        vec![Constraint::Length(0), Constraint::Min(0), Constraint::Length(1)]
    } else {
        vec![
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Banner
        ]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let kind = app.screen().kind();
    if !fullscreen {
        let pilot = app.crew().player.as_ref().map(|p| p.display_name());
        header::render_header(frame, chunks[0], kind, pilot);
    }

    if !app.screen().is_gameplay() {
        render_backdrop(frame, chunks[1], app);
    }
    app.screen().screen().render(frame, chunks[1], &app.render_context(now));

    render_banner(frame, chunks[2], app);
}

fn render_backdrop(frame: &mut Frame, area: Rect, app: &App) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let settings = &app.shell().settings;
    let mut canvas = DotCanvas::new(
        area.width as usize,
        area.height as usize,
        entity::Rect::new(0.0, 0.0, settings.world_width, settings.world_height),
        Color::Rgb(5, 7, 22),
    );
    app.backdrop().draw(&mut canvas);
    frame.render_widget(Paragraph::new(canvas.into_lines()), area);
}

fn render_banner(frame: &mut Frame, area: Rect, app: &App) {
    let Some(banner) = app.shell().banner.current() else {
        return;
    };
    let (icon, color) = match banner.severity {
        Severity::Info => ("\u{2139}", Color::Rgb(80, 200, 255)),
        Severity::Success => ("\u{2714}", Color::Rgb(80, 220, 80)),
        Severity::Error => ("\u{2718}", Color::Rgb(255, 90, 90)),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {} ", icon), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(banner.message.clone(), Style::default().fg(color)),
    ]);
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .style(Style::default().bg(Color::Rgb(15, 15, 25))),
        area,
    );
}
