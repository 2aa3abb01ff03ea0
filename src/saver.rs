// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::charset::{build_alphabet, GlyphMetrics};
use crate::config::{Settings, DEFAULT_PREVIEW_SIZE};
use crate::error::Result;
use crate::frame::{Frame, GlyphCanvas};
use crate::lifecycle::{InputEvent, Lifecycle};
use crate::palette::build_palette;
use crate::rain::RainSimulator;
use crate::render::FrameRenderer;
use crate::terminal::{input_event, Terminal};

/// One surface with its own simulator and renderer.
pub struct Pane {
    origin_x: u16,
    metrics: GlyphMetrics,
    sim: RainSimulator,
    renderer: FrameRenderer,
    frame: Frame,
}

impl Pane {
    pub fn new(
        origin_x: u16,
        width: u16,
        height: u16,
        metrics: GlyphMetrics,
        renderer: FrameRenderer,
    ) -> Self {
        let (cols, rows) = metrics.grid_size(width, height);
        if cols == 0 || rows == 0 {
            log::warn!(
                "pane at x={} ({}x{}) too small for {}x{} glyphs",
                origin_x,
                width,
                height,
                metrics.width,
                metrics.height
            );
        } else {
            log::debug!("pane at x={}: {} columns x {} rows", origin_x, cols, rows);
        }

        let frame = Frame::new(width, height, renderer.palette().bg);
        Self {
            origin_x,
            metrics,
            sim: RainSimulator::new(rows, cols, build_alphabet()),
            renderer,
            frame,
        }
    }

    pub fn origin_x(&self) -> u16 {
        self.origin_x
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    #[allow(dead_code)]
    pub fn simulator(&self) -> &RainSimulator {
        &self.sim
    }

    pub fn tick(&mut self) {
        self.sim.advance();
        let mut canvas = GlyphCanvas::new(&mut self.frame, self.metrics);
        self.renderer
            .render(&mut canvas, self.sim.grid(), self.sim.columns());
    }
}

/// Splits `width` into `count` side-by-side `(x, width)` regions.
/// The last region takes the remainder.
pub fn layout_panes(width: u16, count: u16) -> Vec<(u16, u16)> {
    let count = count.max(1);
    let each = width / count;
    (0..count)
        .map(|i| {
            let x = i * each;
            let w = if i + 1 == count { width - x } else { each };
            (x, w)
        })
        .collect()
}

pub struct Screensaver {
    settings: Settings,
    metrics: GlyphMetrics,
    panes: Vec<Pane>,
    lifecycle: Lifecycle,
    ticks: u64,
}

impl Screensaver {
    pub fn new(settings: Settings, width: u16, height: u16) -> Result<Self> {
        let metrics = GlyphMetrics::measure(&build_alphabet())?;
        let mut saver = Self {
            lifecycle: Lifecycle::new(settings.pointer),
            settings,
            metrics,
            panes: Vec::new(),
            ticks: 0,
        };
        saver.resize(width, height);
        Ok(saver)
    }

    /// Rebuilds every pane for a new surface size.
    pub fn resize(&mut self, width: u16, height: u16) {
        log::debug!("surface {}x{}, {} pane(s)", width, height, self.settings.panes);
        self.panes = layout_panes(width, self.settings.panes)
            .into_iter()
            .map(|(x, w)| {
                Pane::new(
                    x,
                    w,
                    height,
                    self.metrics,
                    FrameRenderer::new(build_palette(self.settings.color_mode)),
                )
            })
            .collect();
    }

    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn handle(&mut self, ev: InputEvent) {
        self.lifecycle.observe(ev);
    }

    /// Advances and renders every pane. Returns false, doing nothing, once exiting.
    pub fn tick(&mut self) -> bool {
        if !self.lifecycle.is_running() {
            return false;
        }
        for pane in &mut self.panes {
            pane.tick();
        }
        self.ticks += 1;
        true
    }
}

/// Full-screen run until an input event ends it.
pub fn run(settings: Settings) -> Result<()> {
    let period = settings.interval;
    let mut term = Terminal::new()?;
    let (w, h) = term.size()?;
    let mut saver = Screensaver::new(settings, w, h)?;

    let mut next_tick = Instant::now();

    loop {
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                let ev = Terminal::read_event()?;
                if let Event::Resize(nw, nh) = ev {
                    pending_resize = Some((nw, nh));
                } else if let Some(input) = input_event(&ev) {
                    saver.handle(input);
                }
            }

            if !saver.is_running() || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            if now >= next_tick {
                break;
            }
            let _ = Terminal::poll_event(next_tick - now)?;
        }

        if let Some((nw, nh)) = pending_resize {
            saver.resize(nw, nh);
            term.invalidate()?;
        }

        if !saver.tick() {
            break;
        }

        for (slot, pane) in saver.panes().iter().enumerate() {
            term.present(slot, pane.origin_x(), pane.frame())?;
        }
        term.flush()?;

        next_tick += period;
        let now = Instant::now();
        if now > next_tick {
            next_tick = now;
        }
    }

    log::debug!("stopped after {} ticks", saver.ticks());
    Ok(())
}

/// Simulates a few seconds of rain off-screen and returns the last frame as text.
pub fn preview(settings: &Settings, size: Option<(u16, u16)>) -> Result<String> {
    let (w, h) = size.unwrap_or(DEFAULT_PREVIEW_SIZE);
    let metrics = GlyphMetrics::measure(&build_alphabet())?;
    let mut pane = Pane::new(
        0,
        w,
        h,
        metrics,
        FrameRenderer::new(build_palette(settings.color_mode)),
    );
    for _ in 0..settings.preview_ticks {
        pane.tick();
    }
    Ok(pane.frame().to_text())
}

/// Human-readable report of the effective settings.
pub fn describe(settings: &Settings, size: Option<(u16, u16)>) -> Result<String> {
    let (w, h) = size.unwrap_or(DEFAULT_PREVIEW_SIZE);
    let metrics = GlyphMetrics::measure(&build_alphabet())?;
    let mut out = String::from("SETTINGS:\n");
    out.push_str(&format!(
        "  interval_ms: {}\n",
        settings.interval.as_millis()
    ));
    out.push_str(&format!("  pointer: {:?}\n", settings.pointer));
    out.push_str(&format!("  panes: {}\n", settings.panes));
    out.push_str(&format!("  color_mode: {}\n", settings.color_mode.label()));
    out.push_str(&format!(
        "  glyph_box: {}x{}\n",
        metrics.width, metrics.height
    ));
    for (i, (x, pw)) in layout_panes(w, settings.panes).into_iter().enumerate() {
        let (cols, rows) = metrics.grid_size(pw, h);
        out.push_str(&format!(
            "  pane {}: x={} {}x{} cells, {} columns x {} rows\n",
            i, x, pw, h, cols, rows
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::PointerPolicy;
    use crate::runtime::{ColorMode, Mode};

    fn settings(panes: u16) -> Settings {
        Settings {
            mode: Mode::Run,
            interval: Duration::from_millis(50),
            pointer: PointerPolicy::DeadZone(5),
            panes,
            color_mode: ColorMode::TrueColor,
            preview_ticks: 40,
        }
    }

    #[test]
    fn layout_splits_width_and_gives_remainder_to_last() {
        assert_eq!(layout_panes(80, 1), vec![(0, 80)]);
        assert_eq!(layout_panes(81, 2), vec![(0, 40), (40, 41)]);
        assert_eq!(layout_panes(10, 3), vec![(0, 3), (3, 3), (6, 4)]);
    }

    #[test]
    fn panes_get_independent_grids_sized_from_glyph_box() {
        let s = Screensaver::new(settings(2), 81, 24).unwrap();
        assert_eq!(s.panes().len(), 2);
        assert_eq!(s.panes()[0].simulator().cols(), 20);
        assert_eq!(s.panes()[1].simulator().cols(), 20);
        assert_eq!(s.panes()[1].origin_x(), 40);
        assert_eq!(s.panes()[1].frame().width, 41);
        assert!(s.panes().iter().all(|p| p.simulator().rows() == 24));
    }

    #[test]
    fn key_press_stops_ticks_for_good() {
        let mut s = Screensaver::new(settings(1), 40, 20).unwrap();
        assert!(s.tick());
        assert!(s.tick());
        assert_eq!(s.ticks(), 2);

        s.handle(InputEvent::KeyPressed);
        assert!(!s.is_running());
        assert!(!s.tick());
        assert!(!s.tick());
        assert_eq!(s.ticks(), 2);
    }

    #[test]
    fn small_pointer_jitter_keeps_running() {
        let mut s = Screensaver::new(settings(1), 40, 20).unwrap();
        s.handle(InputEvent::PointerMoved { x: 10, y: 10 });
        s.handle(InputEvent::PointerMoved { x: 12, y: 8 });
        assert!(s.tick());
        s.handle(InputEvent::PointerMoved { x: 20, y: 10 });
        assert!(!s.tick());
    }

    #[test]
    fn resize_rebuilds_panes() {
        let mut s = Screensaver::new(settings(1), 40, 20).unwrap();
        s.resize(100, 30);
        assert_eq!(s.panes()[0].simulator().cols(), 50);
        assert_eq!(s.panes()[0].simulator().rows(), 30);
    }

    #[test]
    fn degenerate_surface_ticks_without_drawing() {
        let mut s = Screensaver::new(settings(1), 1, 0).unwrap();
        for _ in 0..100 {
            assert!(s.tick());
        }
        assert_eq!(s.panes()[0].simulator().cols(), 0);
    }

    #[test]
    fn preview_prints_one_line_per_row() {
        let text = preview(&settings(1), Some((30, 12))).unwrap();
        assert_eq!(text.lines().count(), 12);
    }

    #[test]
    fn describe_reports_grid_per_pane() {
        let text = describe(&settings(2), Some((81, 24))).unwrap();
        assert!(text.contains("interval_ms: 50"));
        assert!(text.contains("glyph_box: 2x1"));
        assert!(text.contains("pane 1: x=40 41x24 cells, 20 columns x 24 rows"));
    }
}
