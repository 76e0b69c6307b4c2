use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::screens::{next_screen, ScreenKind, Transition};

/// Screens leading to `kind`, outermost first, found by walking back.
pub fn trail(kind: ScreenKind) -> Vec<ScreenKind> {
    let mut path = vec![kind];
    let mut at = kind;
    while let Some(up) = next_screen(at, &Transition::Back)
        .or_else(|| next_screen(at, &Transition::ExitGameplay))
    {
        if path.contains(&up) {
            break;
        }
        path.push(up);
        at = up;
    }
    path.reverse();
    path
}

pub fn render_header(frame: &mut Frame, area: Rect, kind: ScreenKind, pilot: Option<&str>) {
    let path = trail(kind);
    let titles: Vec<Line> = path
        .iter()
        .map(|k| {
            let style = if *k == kind {
                Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Rgb(120, 120, 140))
            };
            Line::from(Span::styled(format!(" {} ", k.title()), style))
        })
        .collect();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .border_type(BorderType::Rounded)
        .title(" \u{2726} Galactatec ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    if let Some(name) = pilot {
        block = block.title(
            Line::from(Span::styled(format!(" pilot: {} ", name), Style::default().fg(Color::Rgb(80, 220, 80))))
                .right_aligned(),
        );
    }

    let tabs = Tabs::new(titles)
        .block(block)
        .select(path.len().saturating_sub(1))
        .style(Style::default().fg(Color::White))
        .highlight_style(Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD))
        .divider(Span::styled(" \u{203a} ", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_walks_back_to_main_menu() {
        assert_eq!(
            trail(ScreenKind::DifficultySelect),
            vec![
                ScreenKind::MainMenu,
                ScreenKind::PlayerHub,
                ScreenKind::GameMenu,
                ScreenKind::DifficultySelect
            ]
        );
        assert_eq!(trail(ScreenKind::MainMenu), vec![ScreenKind::MainMenu]);
        assert_eq!(trail(ScreenKind::Gameplay).first(), Some(&ScreenKind::MainMenu));
    }
}
