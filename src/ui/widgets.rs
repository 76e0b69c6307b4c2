//! Building blocks shared by the shell screens.

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::screens::form::Form;
use crate::screens::MenuList;

pub const PANEL_BG: Color = Color::Rgb(15, 15, 25);
pub const ACCENT: Color = Color::Rgb(255, 220, 80);
pub const FRAME: Color = Color::Rgb(60, 150, 200);
pub const DIM: Color = Color::Rgb(100, 100, 130);
pub const KEY: Color = Color::Rgb(80, 200, 255);

pub fn centered_rect(area: Rect, w: u16, h: u16) -> Rect {
    let w = w.min(area.width.saturating_sub(2));
    let h = h.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + area.width.saturating_sub(w) / 2,
        area.y + area.height.saturating_sub(h) / 2,
        w,
        h,
    )
}

pub fn panel(title: &str, border: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(PANEL_BG))
}

/// "Key action" pairs rendered as one hint line.
pub fn hint_line(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  \u{2502}  ", Style::default().fg(Color::Rgb(40, 40, 60))));
        }
        spans.push(Span::styled(key.to_string(), Style::default().fg(KEY).add_modifier(Modifier::BOLD)));
        spans.push(Span::styled(format!(" {}", action), Style::default().fg(DIM)));
    }
    Line::from(spans)
}

pub fn menu_lines(menu: &MenuList) -> Vec<Line<'static>> {
    menu.items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i == menu.selected() {
                Line::from(vec![
                    Span::styled("\u{25b6} ", Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)),
                    Span::styled(item.to_string(), Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                ])
            } else {
                Line::from(Span::styled(format!("  {}", item), Style::default().fg(Color::Rgb(150, 150, 170))))
            }
        })
        .collect()
}

/// Boxed menu centred in `area`, with optional lines above the entries.
pub fn render_menu(frame: &mut Frame, area: Rect, title: &str, header: Vec<Line<'static>>, menu: &MenuList) {
    let h = (header.len() + menu.items().len() * 2 + 4) as u16;
    let popup = centered_rect(area, 44, h);
    frame.render_widget(Clear, popup);
    let block = panel(title, FRAME);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = header;
    lines.push(Line::from(""));
    for l in menu_lines(menu) {
        lines.push(l);
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

pub fn form_lines(form: &Form) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (i, field) in form.fields().iter().enumerate() {
        let focused = i == form.focus();
        let label_style = if focused {
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(180, 180, 200))
        };
        let cursor = if focused { "\u{2581}" } else { "" };
        lines.push(Line::from(Span::styled(format!("  {}", field.label), label_style)));
        lines.push(Line::from(vec![
            Span::styled("  [ ", Style::default().fg(DIM)),
            Span::styled(
                format!("{}{}", field.display(), cursor),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" ]", Style::default().fg(DIM)),
        ]));
    }
    lines
}

pub fn render_form(frame: &mut Frame, area: Rect, title: &str, form: &Form, hints: &[(&str, &str)]) {
    let h = (form.fields().len() * 2 + 5) as u16;
    let popup = centered_rect(area, 60, h);
    frame.render_widget(Clear, popup);
    let block = panel(title, FRAME);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = vec![Line::from("")];
    lines.extend(form_lines(form));
    lines.push(Line::from(""));
    lines.push(hint_line(hints));
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside() {
        let area = Rect::new(10, 5, 80, 24);
        let r = centered_rect(area, 40, 10);
        assert_eq!(r, Rect::new(30, 12, 40, 10));
        let tiny = centered_rect(Rect::new(0, 0, 10, 4), 40, 10);
        assert!(tiny.width <= 8 && tiny.height <= 2);
    }

    #[test]
    fn menu_marks_selection() {
        let mut m = MenuList::new(vec!["Log in", "Exit"]);
        m.select(1);
        let lines = menu_lines(&m);
        let text: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with('\u{25b6}'));
    }
}
