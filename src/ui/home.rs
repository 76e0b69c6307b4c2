use ratatui::prelude::*;
use ratatui::widgets::*;

use super::widgets;
use crate::screens::MenuList;

const GLYPH_ROWS: usize = 6;

fn glyph(c: char) -> [&'static str; GLYPH_ROWS] {
    match c {
        'G' => [" ██████╗ ", "██╔════╝ ", "██║  ███╗", "██║   ██║", "╚██████╔╝", " ╚═════╝ "],
        'A' => [" █████╗ ", "██╔══██╗", "███████║", "██╔══██║", "██║  ██║", "╚═╝  ╚═╝"],
        'L' => ["██╗     ", "██║     ", "██║     ", "██║     ", "███████╗", "╚══════╝"],
        'C' => [" ██████╗", "██╔════╝", "██║     ", "██║     ", "╚██████╗", " ╚═════╝"],
        'T' => ["████████╗", "╚══██╔══╝", "   ██║   ", "   ██║   ", "   ██║   ", "   ╚═╝   "],
        'E' => ["███████╗", "██╔════╝", "█████╗  ", "██╔══╝  ", "███████╗", "╚══════╝"],
        _ => ["  "; GLYPH_ROWS],
    }
}

/// Block-letter rendering of `word`, one string per row.
pub fn title_art(word: &str) -> Vec<String> {
    let mut rows = vec![String::new(); GLYPH_ROWS];
    for c in word.chars() {
        for (row, part) in rows.iter_mut().zip(glyph(c.to_ascii_uppercase())) {
            row.push_str(part);
        }
    }
    rows
}

const TITLE_COLORS: [Color; GLYPH_ROWS] = [
    Color::Rgb(120, 200, 255),
    Color::Rgb(100, 180, 255),
    Color::Rgb(130, 150, 255),
    Color::Rgb(170, 120, 255),
    Color::Rgb(200, 120, 255),
    Color::Rgb(120, 80, 180),
];

fn render_title(frame: &mut Frame, area: Rect) {
    let art = title_art("GALACTATEC");
    let width = art.first().map(|r| r.chars().count()).unwrap_or(0) as u16;
    let lines: Vec<Line> = if width <= area.width {
        art.into_iter()
            .zip(TITLE_COLORS)
            .map(|(row, color)| Line::from(Span::styled(row, Style::default().fg(color).add_modifier(Modifier::BOLD))))
            .collect()
    } else {
        // Too narrow for the block letters
        vec![Line::from(Span::styled(
            "G A L A C T A T E C",
            Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD),
        ))]
    };
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn controls() -> Vec<Line<'static>> {
    let row = |key: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<16}", key), Style::default().fg(widgets::KEY)),
            Span::styled(action, Style::default().fg(Color::Rgb(140, 140, 140))),
        ])
    };
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "  In battle",
            Style::default().fg(widgets::ACCENT).add_modifier(Modifier::BOLD),
        )),
        row("\u{2190} \u{2191} \u{2193} \u{2192}", "Move ship"),
        row("Space / btn 0", "Fire"),
        row("Esc / btn 7", "Pause menu"),
        row("+  -", "Music volume"),
        Line::from(""),
        Line::from(Span::styled(
            "  Destroy invaders for 100 points each.",
            Style::default().fg(widgets::DIM),
        )),
        Line::from(Span::styled(
            "  Every 10 kills earns a power-up.",
            Style::default().fg(widgets::DIM),
        )),
        Line::from(Span::styled(
            "  Two pilots share the run, one turn each.",
            Style::default().fg(widgets::DIM),
        )),
    ]
}

pub fn render_home(frame: &mut Frame, area: Rect, menu: &MenuList) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(GLYPH_ROWS as u16),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(area);

    render_title(frame, chunks[1]);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Defend the sector. One ship, three lives.",
            Style::default().fg(widgets::DIM).add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center),
        chunks[2],
    );

    let body = widgets::centered_rect(chunks[3], 78, chunks[3].height);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body);

    let menu_block = widgets::panel("Menu", widgets::ACCENT);
    let inner = menu_block.inner(cols[0]);
    frame.render_widget(Clear, cols[0]);
    frame.render_widget(menu_block, cols[0]);
    let mut lines = vec![Line::from("")];
    lines.extend(widgets::menu_lines(menu));
    frame.render_widget(Paragraph::new(lines), inner);

    let help = widgets::panel("Controls", widgets::FRAME);
    frame.render_widget(Clear, cols[1]);
    frame.render_widget(Paragraph::new(controls()).block(help), cols[1]);

    frame.render_widget(
        Paragraph::new(widgets::hint_line(&[
            ("\u{2191}\u{2193}", "choose"),
            ("Enter", "select"),
            ("Ctrl+C", "quit"),
        ]))
        .alignment(Alignment::Center),
        chunks[4],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_rows_line_up() {
        let art = title_art("GALACTATEC");
        assert_eq!(art.len(), GLYPH_ROWS);
        let width = art[0].chars().count();
        assert!(art.iter().all(|r| r.chars().count() == width));
    }
}
