//! Braille-dot canvas. World coordinates (logical pixels) are scaled onto a
//! grid of terminal cells, each cell holding a 2×4 block of dots.

use ratatui::prelude::*;

use super::entity::Rect;
use super::sprite::Mask;

#[derive(Clone, Copy)]
struct Cell {
    bits: u8,
    color: Color,
    bold: bool,
}

pub struct DotCanvas {
    cols: usize,
    rows: usize,
    /// Dots per world pixel on each axis.
    sx: f32,
    sy: f32,
    bg: Color,
    cells: Vec<Cell>,
}

impl DotCanvas {
    pub fn new(cols: usize, rows: usize, world: Rect, bg: Color) -> Self {
        let bw = (cols * 2) as f32;
        let bh = (rows * 4) as f32;
        Self {
            cols,
            rows,
            sx: if world.w > 0.0 { bw / world.w } else { 0.0 },
            sy: if world.h > 0.0 { bh / world.h } else { 0.0 },
            bg,
            cells: vec![Cell { bits: 0, color: Color::White, bold: false }; cols * rows],
        }
    }

    fn braille_bit(sub_x: usize, sub_y: usize) -> u8 {
        match (sub_x, sub_y) {
            (0, 0) => 0x01,
            (0, 1) => 0x02,
            (0, 2) => 0x04,
            (0, 3) => 0x40,
            (1, 0) => 0x08,
            (1, 1) => 0x10,
            (1, 2) => 0x20,
            (1, 3) => 0x80,
            _ => 0,
        }
    }

    /// Light a single dot in dot coordinates.
    fn set_dot(&mut self, bx: i32, by: i32, color: Color, bold: bool) {
        if bx < 0 || by < 0 {
            return;
        }
        let (bx, by) = (bx as usize, by as usize);
        let (cx, cy) = (bx / 2, by / 4);
        if cx >= self.cols || cy >= self.rows {
            return;
        }
        let cell = &mut self.cells[cy * self.cols + cx];
        cell.bits |= Self::braille_bit(bx % 2, by % 4);
        cell.color = color;
        cell.bold = bold;
    }

    /// Light the dot under a world point.
    pub fn point(&mut self, x: f32, y: f32, color: Color) {
        self.set_dot((x * self.sx) as i32, (y * self.sy) as i32, color, false);
    }

    /// Dot-space span covered by a world rectangle, at least one dot wide.
    fn dot_span(&self, r: Rect) -> (i32, i32, i32, i32) {
        let x0 = (r.left() * self.sx).floor() as i32;
        let y0 = (r.top() * self.sy).floor() as i32;
        let x1 = ((r.right() * self.sx).ceil() as i32).max(x0 + 1);
        let y1 = ((r.bottom() * self.sy).ceil() as i32).max(y0 + 1);
        (x0, y0, x1, y1)
    }

    pub fn fill_rect(&mut self, r: Rect, color: Color, bold: bool) {
        let (x0, y0, x1, y1) = self.dot_span(r);
        for by in y0..y1 {
            for bx in x0..x1 {
                self.set_dot(bx, by, color, bold);
            }
        }
    }

    /// Draw a mask stretched over `r`, sampling the mask at each dot centre.
    pub fn blit_mask(&mut self, r: Rect, mask: &Mask, color: Color) {
        if mask.width() == 0 || mask.height() == 0 {
            return;
        }
        let (x0, y0, x1, y1) = self.dot_span(r);
        let (dw, dh) = ((x1 - x0) as f32, (y1 - y0) as f32);
        for by in y0..y1 {
            for bx in x0..x1 {
                let u = ((bx - x0) as f32 + 0.5) / dw;
                let v = ((by - y0) as f32 + 0.5) / dh;
                let mx = ((u * mask.width() as f32) as usize).min(mask.width() - 1);
                let my = ((v * mask.height() as f32) as usize).min(mask.height() - 1);
                if mask.get(mx, my) {
                    self.set_dot(bx, by, color, true);
                }
            }
        }
    }

    pub fn is_lit(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.cells[row * self.cols + col].bits != 0
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        let bg = self.bg;
        self.cells
            .chunks(self.cols.max(1))
            .take(self.rows)
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .iter()
                    .map(|cell| {
                        if cell.bits == 0 {
                            return Span::styled(" ", Style::default().bg(bg));
                        }
                        let ch = char::from_u32(0x2800 + cell.bits as u32).unwrap_or(' ');
                        let mut style = Style::default().fg(cell.color).bg(bg);
                        if cell.bold {
                            style = style.add_modifier(Modifier::BOLD);
                        }
                        Span::styled(String::from(ch), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}
