// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::palette::FadePalette;
use crate::rain::{Column, GlyphGrid};

/// Palette slot a glyph is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Brush {
    Head,
    Fade(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub glyph: char,
    pub col: usize,
    pub row: usize,
    pub brush: Brush,
    pub color: Option<Color>,
}

/// Something a frame of glyphs can be drawn into.
pub trait Canvas {
    fn clear(&mut self, bg: Option<Color>);
    fn draw(&mut self, cmd: DrawCommand);
}

impl Canvas for Vec<DrawCommand> {
    fn clear(&mut self, _bg: Option<Color>) {
        Vec::clear(self);
    }

    fn draw(&mut self, cmd: DrawCommand) {
        self.push(cmd);
    }
}

pub struct FrameRenderer {
    palette: FadePalette,
}

impl FrameRenderer {
    pub fn new(palette: FadePalette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &FadePalette {
        &self.palette
    }

    /// Palette index for the glyph `offset` rows above the head.
    /// Offsets past the end of the palette reuse the darkest shade.
    pub fn fade_index(&self, offset: usize) -> usize {
        offset
            .saturating_sub(1)
            .min(self.palette.fade.len().saturating_sub(1))
    }

    fn color(&self, brush: Brush) -> Option<Color> {
        match brush {
            Brush::Head => self.palette.head,
            Brush::Fade(i) => self.palette.fade.get(i).copied().flatten(),
        }
    }

    fn emit<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        glyph: char,
        col: usize,
        row: usize,
        brush: Brush,
    ) {
        canvas.draw(DrawCommand {
            glyph,
            col,
            row,
            brush,
            color: self.color(brush),
        });
    }

    /// Clears `canvas` and draws every active drop. Never touches simulator state.
    pub fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        grid: &GlyphGrid,
        columns: &[Column],
    ) {
        canvas.clear(self.palette.bg);

        for (col, drop) in columns.iter().enumerate() {
            let Some(head_row) = drop.head_row() else {
                continue;
            };

            if let Some(glyph) = grid.get(head_row, col) {
                self.emit(canvas, glyph, col, head_row, Brush::Head);
            }

            for i in 1..drop.length {
                let Some(row) = head_row.checked_sub(i) else {
                    break;
                };
                if let Some(glyph) = grid.get(row, col) {
                    self.emit(canvas, glyph, col, row, Brush::Fade(self.fade_index(i)));
                }
            }
        }
    }
}
