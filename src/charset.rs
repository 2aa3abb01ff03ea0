// Copyright (c) 2026 rezky_nightky

use unicode_width::UnicodeWidthChar;

use crate::error::{Result, SaverError};

pub const KATAKANA_START: u32 = 0x30A0;
pub const KATAKANA_LEN: u32 = 96;

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    for v in start..=end {
        if let Some(ch) = char::from_u32(v) {
            out.push(ch);
        }
    }
}

/// Katakana block, then uppercase latin, then digits.
pub fn build_alphabet() -> Vec<char> {
    let mut out = Vec::with_capacity((KATAKANA_LEN + 26 + 10) as usize);
    push_range(&mut out, KATAKANA_START, KATAKANA_START + KATAKANA_LEN - 1);
    push_range(&mut out, 'A' as u32, 'Z' as u32);
    push_range(&mut out, '0' as u32, '9' as u32);
    out
}

/// Cell box every glyph of an alphabet fits into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub width: u16,
    pub height: u16,
}

impl GlyphMetrics {
    pub fn measure(chars: &[char]) -> Result<Self> {
        let width = chars
            .iter()
            .filter_map(|c| c.width())
            .max()
            .unwrap_or(0);
        if width == 0 {
            return Err(SaverError::GlyphMetrics(format!(
                "no printable glyph among {} chars",
                chars.len()
            )));
        }
        Ok(Self {
            width: width as u16,
            height: 1,
        })
    }

    /// `(columns, rows)` of glyph slots on a surface of the given cell size.
    pub fn grid_size(&self, surface_width: u16, surface_height: u16) -> (usize, usize) {
        let cols = surface_width / self.width.max(1);
        let rows = surface_height / self.height.max(1);
        (cols as usize, rows as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_katakana_latin_and_digits() {
        let a = build_alphabet();
        assert_eq!(a.len(), 132);
        assert_eq!(a[0], '\u{30A0}');
        assert_eq!(a[95], '\u{30FF}');
        assert_eq!(a[96], 'A');
        assert_eq!(a[121], 'Z');
        assert_eq!(a[122], '0');
        assert_eq!(a[131], '9');
    }

    #[test]
    fn katakana_alphabet_measures_two_cells_wide() {
        let m = GlyphMetrics::measure(&build_alphabet()).unwrap();
        assert_eq!(m, GlyphMetrics { width: 2, height: 1 });
        assert_eq!(m.grid_size(81, 24), (40, 24));
    }

    #[test]
    fn ascii_alphabet_measures_one_cell() {
        let m = GlyphMetrics::measure(&['0', '1']).unwrap();
        assert_eq!(m.width, 1);
    }

    #[test]
    fn measuring_nothing_printable_fails() {
        assert!(GlyphMetrics::measure(&[]).is_err());
        assert!(GlyphMetrics::measure(&['\u{200B}']).is_err());
    }

    #[test]
    fn tiny_surface_gives_empty_grid() {
        let m = GlyphMetrics {
            width: 2,
            height: 1,
        };
        assert_eq!(m.grid_size(1, 0), (0, 0));
    }
}
