//! Score, lives and power-up read-outs plus the pause and game-over
//! overlays. Reads session state, never changes it.

use ratatui::prelude::*;
use ratatui::widgets::*;

use super::engine::PauseEntry;
use super::session::{GameSession, LogicalPlayer, HULL_PER_LIFE, MAX_LIVES};

const SEP: Color = Color::DarkGray;
const PANEL_BG: Color = Color::Rgb(15, 15, 25);

fn player_spans(p: &LogicalPlayer) -> Vec<Span<'static>> {
    let name_style = if p.active {
        Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Rgb(120, 120, 140))
    };
    let lives = format!(
        "{}{}",
        "\u{2666}".repeat(p.lives() as usize),
        "\u{00b7}".repeat((MAX_LIVES - p.lives()) as usize)
    );
    let mut spans = vec![
        Span::styled(format!(" {} ", p.name), name_style),
        Span::styled(format!("{:>6} ", p.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(lives, Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
    ];
    for pu in &p.power_ups {
        spans.push(Span::styled(
            format!(" [{}]", pu.label()),
            Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD),
        ));
    }
    spans
}

/// One-line status bar: both players, hull of the active one, difficulty.
pub fn status_line(session: &GameSession) -> Line<'static> {
    let mut spans = player_spans(&session.players[0]);
    spans.push(Span::styled(" | ", Style::default().fg(SEP)));
    spans.extend(player_spans(&session.players[1]));
    spans.push(Span::styled(" | ", Style::default().fg(SEP)));

    let hull = (session.active().hull / HULL_PER_LIFE).clamp(0.0, 1.0);
    let filled = (hull * 10.0).round() as usize;
    let hull_color = if hull > 0.5 { Color::Green } else if hull > 0.25 { Color::Yellow } else { Color::Red };
    spans.push(Span::styled("Hull ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        format!("{}{}", "\u{2588}".repeat(filled), "\u{2591}".repeat(10 - filled)),
        Style::default().fg(hull_color),
    ));
    spans.push(Span::styled(" | ", Style::default().fg(SEP)));
    spans.push(Span::styled(
        session.difficulty.title().to_string(),
        Style::default().fg(session.difficulty.color()),
    ));
    Line::from(spans)
}

pub fn help_line() -> Line<'static> {
    let key = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(Color::DarkGray);
    let bar = Style::default().fg(Color::Rgb(60, 60, 60));
    Line::from(vec![
        Span::styled(" \u{2190}\u{2191}\u{2192}\u{2193} Move ", dim),
        Span::styled("| ", bar),
        Span::styled("Space Shoot ", key),
        Span::styled("| ", bar),
        Span::styled("+/- Volume ", dim),
        Span::styled("| ", bar),
        Span::styled("Esc Menu", dim),
    ])
}

fn centered(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width.saturating_sub(2));
    let h = h.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
        w,
        h,
    )
}

pub fn render_pause_overlay(frame: &mut Frame, area: Rect, selected: usize, volume: f32) {
    let popup = centered(area, 30, 10);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .title(" PAUSED ")
        .title_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(PANEL_BG));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::from("")];
    for (i, entry) in PauseEntry::all().iter().enumerate() {
        let (marker, style) = if i == selected {
            ("\u{25b6} ", Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        } else {
            ("  ", Style::default().fg(Color::Rgb(150, 150, 170)))
        };
        lines.push(Line::from(Span::styled(format!("{}{}", marker, entry.label()), style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Music {:>3}%", (volume * 100.0).round() as u32),
        Style::default().fg(Color::Rgb(80, 200, 255)),
    )));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn render_game_over(frame: &mut Frame, area: Rect, session: &GameSession) {
    let popup = centered(area, 36, 9);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Red))
        .title(" GAME OVER ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(PANEL_BG));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::from("")];
    for p in &session.players {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", p.name), Style::default().fg(Color::Rgb(180, 180, 200))),
            Span::styled(format!("{:>7}", p.score), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Enter to leave", Style::default().fg(Color::Gray))));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::difficulty::Difficulty;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn status_shows_names_scores_and_power_ups() {
        let mut s = GameSession::new("NOVA", "ORION", Difficulty::Hard);
        s.players[0].score = 1200;
        s.players[0].power_ups.insert(crate::game::session::PowerUp::Shield);
        let t = text(&status_line(&s));
        assert!(t.contains("NOVA"));
        assert!(t.contains("ORION"));
        assert!(t.contains("1200"));
        assert!(t.contains("[SHIELD]"));
        assert!(t.contains("COMMANDER"));
    }

    #[test]
    fn overlay_fits_small_areas() {
        let r = centered(Rect::new(0, 0, 20, 6), 30, 10);
        assert!(r.width <= 18 && r.height <= 4);
    }
}
