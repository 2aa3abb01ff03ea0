// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind, MouseEventKind},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, ExecutableCommand, QueueableCommand,
};
use unicode_width::UnicodeWidthChar;

use crate::cell::Cell;
use crate::frame::Frame;
use crate::lifecycle::InputEvent;

/// What was last put on screen for one pane.
struct LastFrame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl LastFrame {
    fn matches(&self, frame: &Frame) -> bool {
        self.width == frame.width && self.height == frame.height
    }

    fn row(&self, y: u16) -> &[Cell] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.cells[start..start + w]
    }
}

pub struct Terminal {
    stdout: Stdout,
    last: Vec<Option<LastFrame>>,
}

impl Terminal {
    pub fn new() -> Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        let init_res: Result<()> = (|| {
            out.execute(terminal::EnterAlternateScreen)?;
            out.execute(cursor::Hide)?;
            out.execute(event::EnableMouseCapture)?;
            let _ = out.execute(terminal::DisableLineWrap);
            out.execute(SetAttribute(Attribute::Reset))?;
            out.execute(ResetColor)?;
            out.execute(terminal::Clear(terminal::ClearType::All))?;
            out.flush()?;
            Ok(())
        })();
        if let Err(e) = init_res {
            restore(&mut out);
            return Err(e);
        }
        Ok(Self {
            stdout: out,
            last: Vec::new(),
        })
    }

    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    pub fn poll_event(timeout: Duration) -> Result<bool> {
        event::poll(timeout)
    }

    pub fn read_event() -> Result<Event> {
        event::read()
    }

    /// Forgets what is on screen so the next present redraws everything.
    pub fn invalidate(&mut self) -> Result<()> {
        self.last.clear();
        self.stdout
            .queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    /// Queues the rows of `frame` that changed since this slot was last presented.
    pub fn present(&mut self, slot: usize, origin_x: u16, frame: &Frame) -> Result<()> {
        if self.last.len() <= slot {
            self.last.resize_with(slot + 1, || None);
        }

        let full = !self.last[slot].as_ref().is_some_and(|l| l.matches(frame));
        if full {
            self.last[slot] = Some(LastFrame {
                width: frame.width,
                height: frame.height,
                cells: vec![
                    Cell::blank_with_bg(None);
                    frame.width as usize * frame.height as usize
                ],
            });
        }
        let Some(last) = self.last[slot].as_mut() else {
            return Ok(());
        };

        let mut cur_fg: Option<Color> = None;
        let mut cur_bg: Option<Color> = None;
        let mut cur_bold = false;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;

        for y in 0..frame.height {
            let row = frame.row(y);
            if !full && last.row(y) == row {
                continue;
            }

            self.stdout.queue(cursor::MoveTo(origin_x, y))?;
            let mut x = 0usize;
            while x < row.len() {
                let cell = row[x];

                if cell.fg != cur_fg {
                    self.stdout
                        .queue(SetForegroundColor(cell.fg.unwrap_or(Color::Reset)))?;
                    cur_fg = cell.fg;
                }
                if cell.bg != cur_bg {
                    self.stdout
                        .queue(SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)))?;
                    cur_bg = cell.bg;
                }
                if cell.bold != cur_bold {
                    self.stdout.queue(SetAttribute(if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                    cur_bold = cell.bold;
                }

                self.stdout.queue(Print(cell.ch))?;
                x += cell.ch.width().unwrap_or(1).max(1);
            }

            let w = frame.width as usize;
            let start = y as usize * w;
            last.cells[start..start + w].copy_from_slice(row);
        }

        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(ResetColor)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        restore(&mut self.stdout);
    }
}

fn restore(out: &mut Stdout) {
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(event::DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::EnableLineWrap);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

pub fn restore_terminal_best_effort() {
    restore(&mut stdout());
}

/// Maps a crossterm event to the input the saver reacts to.
pub fn input_event(ev: &Event) -> Option<InputEvent> {
    match ev {
        Event::Key(k) if k.kind == KeyEventKind::Press => Some(InputEvent::KeyPressed),
        Event::Mouse(m) => match m.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(InputEvent::PointerMoved {
                x: m.column,
                y: m.row,
            }),
            MouseEventKind::Down(_) => Some(InputEvent::Clicked),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn key_press_maps_to_exit_request() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert_eq!(input_event(&ev), Some(InputEvent::KeyPressed));
    }

    #[test]
    fn mouse_events_map_to_pointer_and_click() {
        assert_eq!(
            input_event(&mouse(MouseEventKind::Moved, 3, 4)),
            Some(InputEvent::PointerMoved { x: 3, y: 4 })
        );
        assert_eq!(
            input_event(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0)),
            Some(InputEvent::Clicked)
        );
        assert_eq!(input_event(&mouse(MouseEventKind::ScrollUp, 0, 0)), None);
    }

    #[test]
    fn focus_and_resize_are_not_input() {
        assert_eq!(input_event(&Event::FocusGained), None);
        assert_eq!(input_event(&Event::Resize(10, 10)), None);
    }
}
