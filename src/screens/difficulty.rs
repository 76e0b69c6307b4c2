use ratatui::prelude::*;
use ratatui::widgets::*;

use super::{Crew, MenuList, RenderContext, Screen, ScreenKind, Services, Transition};
use crate::game::input::InputEvent;
use crate::game::Difficulty;
use crate::ui::widgets;

pub struct DifficultySelect {
    menu: MenuList,
}

impl DifficultySelect {
    pub fn new(crew: &Crew) -> Self {
        let mut menu = MenuList::new(Difficulty::all().iter().map(|d| d.title()).collect());
        menu.select(crew.difficulty.index() as usize);
        Self { menu }
    }

    pub fn selected(&self) -> Difficulty {
        Difficulty::all()[self.menu.selected()]
    }
}

impl Screen for DifficultySelect {
    fn kind(&self) -> ScreenKind {
        ScreenKind::DifficultySelect
    }

    fn handle_input(&mut self, ev: &InputEvent, _svc: &mut Services) -> Transition {
        if ev.is_menu_toggle() {
            return Transition::Back;
        }
        match self.menu.handle(ev) {
            Some(i) => Transition::DifficultyChosen(Difficulty::all()[i]),
            None => Transition::Stay,
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect, _ctx: &RenderContext) {
        let popup = widgets::centered_rect(area, 56, 17);
        frame.render_widget(Clear, popup);
        let block = widgets::panel("Select difficulty", widgets::FRAME);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut lines = vec![Line::from("")];
        for (i, d) in Difficulty::all().iter().enumerate() {
            let selected = i == self.menu.selected();
            let marker = if selected { "\u{25b6} " } else { "  " };
            let mut title = Style::default().fg(d.color());
            if selected {
                title = title.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(widgets::ACCENT)),
                Span::styled(format!(" {} ", d.title()), title),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", d.description()),
                Style::default().fg(widgets::DIM),
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "    speed x{:.2}  damage x{:.1}  spawn every {} ticks",
                    d.speed_multiplier(),
                    d.damage_multiplier(),
                    d.spawn_interval()
                ),
                Style::default().fg(Color::Rgb(80, 80, 100)),
            )));
            lines.push(Line::from(""));
        }
        lines.push(widgets::hint_line(&[("\u{2191}\u{2193}", "choose"), ("Enter", "launch"), ("Esc", "back")]));
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
