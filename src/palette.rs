// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

pub const FADE_STEPS: usize = 20;
const FADE_TOP: i32 = 255;
const FADE_DECREMENT: i32 = 12;

const HEAD_RGB: (u8, u8, u8) = (255, 255, 255);
const BG_RGB: (u8, u8, u8) = (0, 0, 0);

/// Tail shades (brightest first), head color and background.
///
/// `None` means "terminal default", which is what mono mode uses throughout.
#[derive(Clone, Debug, PartialEq)]
pub struct FadePalette {
    pub fade: Vec<Option<Color>>,
    pub head: Option<Color>,
    pub bg: Option<Color>,
}

/// Green levels of the tail, index 0 brightest.
pub fn fade_levels() -> [u8; FADE_STEPS] {
    let mut out = [0u8; FADE_STEPS];
    for (i, v) in out.iter_mut().enumerate() {
        *v = (FADE_TOP - (i as i32) * FADE_DECREMENT).max(0) as u8;
    }
    out
}

fn dist2(a: (u8, u8, u8), b: (u8, u8, u8)) -> i32 {
    let dr = (a.0 as i32) - (b.0 as i32);
    let dg = (a.1 as i32) - (b.1 as i32);
    let db = (a.2 as i32) - (b.2 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cube = (
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let (gray_idx, gray) = if avg < 8 {
        (16, (0, 0, 0))
    } else if avg > 238 {
        (231, (255, 255, 255))
    } else {
        let idx = 232 + ((avg - 8) / 10);
        let v = 8 + 10 * (idx - 232);
        (idx, (v, v, v))
    };

    if dist2((r, g, b), gray) < dist2((r, g, b), cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 6] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::White, (255, 255, 255)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::Green, (0, 255, 0)),
    ];

    let mut best = Color::White;
    let mut best_d = i32::MAX;
    for (c, rgb) in TABLE {
        let d = dist2((r, g, b), rgb);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}

fn color_for(mode: ColorMode, (r, g, b): (u8, u8, u8)) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::TrueColor => Some(Color::Rgb { r, g, b }),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
        ColorMode::Color16 => Some(rgb_to_color16(r, g, b)),
    }
}

pub fn build_palette(mode: ColorMode) -> FadePalette {
    FadePalette {
        fade: fade_levels()
            .iter()
            .map(|&g| color_for(mode, (0, g, 0)))
            .collect(),
        head: color_for(mode, HEAD_RGB),
        bg: color_for(mode, BG_RGB),
    }
}
