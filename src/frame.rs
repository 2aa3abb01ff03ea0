// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;
use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use crate::charset::GlyphMetrics;
use crate::render::{Brush, Canvas, DrawCommand};

/// Off-screen cell buffer for one pane.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    blank: Cell,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let blank = Cell::blank_with_bg(bg);
        Self {
            width,
            height,
            cells: vec![blank; width as usize * height as usize],
            blank,
        }
    }

    pub fn clear_with_bg(&mut self, bg: Option<Color>) {
        self.blank = Cell::blank_with_bg(bg);
        self.cells.fill(self.blank);
    }

    pub fn bg(&self) -> Option<Color> {
        self.blank.bg
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        let w = self.width as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }

    /// Plain-text dump, one line per row, trailing blanks trimmed.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for y in 0..self.height {
            let mut line = String::new();
            let mut x = 0usize;
            let row = self.row(y);
            while x < row.len() {
                let ch = row[x].ch;
                line.push(ch);
                x += ch.width().unwrap_or(1).max(1);
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Draws grid-space commands into a `Frame`, one glyph box per grid slot.
pub struct GlyphCanvas<'a> {
    frame: &'a mut Frame,
    metrics: GlyphMetrics,
}

impl<'a> GlyphCanvas<'a> {
    pub fn new(frame: &'a mut Frame, metrics: GlyphMetrics) -> Self {
        Self { frame, metrics }
    }
}

impl Canvas for GlyphCanvas<'_> {
    fn clear(&mut self, bg: Option<Color>) {
        self.frame.clear_with_bg(bg);
    }

    fn draw(&mut self, cmd: DrawCommand) {
        let x = cmd.col * self.metrics.width as usize;
        let y = cmd.row * self.metrics.height as usize;
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        // without colors only the head stands out
        let bold = cmd.color.is_some() || cmd.brush == Brush::Head;
        let bg = self.frame.bg();
        self.frame.set(x, y, Cell::glyph(cmd.glyph, cmd.color, bg, bold));
    }
}
