// Copyright (c) 2026 rezky_nightky

use rand::{
    distr::{Distribution, Uniform},
    rngs::StdRng,
    SeedableRng,
};

/// Chance per frame that an idle column starts a drop.
pub const SPAWN_CHANCE: f64 = 0.02;
pub const MIN_DROP_LEN: usize = 5;

/// Drop state of one column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Column {
    /// 1-based head position; 0 while idle.
    pub head: usize,
    /// Rows spanned by the tail. Only meaningful while active.
    pub length: usize,
}

impl Column {
    pub fn is_active(&self) -> bool {
        self.head > 0
    }

    /// Row the most recent `advance` wrote the head glyph to.
    pub fn head_row(&self) -> Option<usize> {
        self.head.checked_sub(2)
    }
}

/// Row-major history of glyphs written by drop heads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<char>>,
}

impl GlyphGrid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    #[allow(dead_code)]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[allow(dead_code)]
    pub fn cols(&self) -> usize {
        self.cols
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        self.index(row, col).and_then(|i| self.cells[i])
    }

    fn put(&mut self, row: usize, col: usize, v: Option<char>) {
        if let Some(i) = self.index(row, col) {
            self.cells[i] = v;
        }
    }
}

pub struct RainSimulator {
    columns: Vec<Column>,
    grid: GlyphGrid,
    alphabet: Vec<char>,

    rng: StdRng,
    rand_chance: Uniform<f64>,
    rand_len: Uniform<usize>,
    rand_glyph: Uniform<usize>,
}

impl RainSimulator {
    pub fn new(rows: usize, cols: usize, alphabet: Vec<char>) -> Self {
        Self::with_rng(rows, cols, alphabet, StdRng::from_os_rng())
    }

    #[cfg(test)]
    pub fn with_seed(rows: usize, cols: usize, alphabet: Vec<char>, seed: u64) -> Self {
        Self::with_rng(rows, cols, alphabet, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rows: usize, cols: usize, mut alphabet: Vec<char>, rng: StdRng) -> Self {
        if alphabet.is_empty() {
            alphabet.push('0');
            alphabet.push('1');
        }

        let (lo, hi) = drop_len_range(rows);

        Self {
            columns: vec![Column::default(); cols],
            grid: GlyphGrid::new(rows, cols),
            rand_glyph: Uniform::new(0, alphabet.len()).expect("valid range"),
            alphabet,
            rng,
            rand_chance: Uniform::new(0.0, 1.0).expect("valid range"),
            rand_len: Uniform::new(lo, hi).expect("valid range"),
        }
    }

    #[allow(dead_code)]
    pub fn rows(&self) -> usize {
        self.grid.rows
    }

    #[allow(dead_code)]
    pub fn cols(&self) -> usize {
        self.grid.cols
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn grid(&self) -> &GlyphGrid {
        &self.grid
    }

    /// Moves every column forward by one frame.
    pub fn advance(&mut self) {
        for col in 0..self.columns.len() {
            if !self.columns[col].is_active()
                && self.rand_chance.sample(&mut self.rng) < SPAWN_CHANCE
            {
                let length = self.rand_len.sample(&mut self.rng);
                self.start_drop(col, length);
            }

            if self.columns[col].is_active() {
                self.step_column(col);
            }
        }
    }

    pub(crate) fn start_drop(&mut self, col: usize, length: usize) {
        if let Some(c) = self.columns.get_mut(col) {
            c.head = 1;
            c.length = length.max(1);
        }
    }

    fn step_column(&mut self, col: usize) {
        let rows = self.grid.rows;
        let Column { head, length } = self.columns[col];

        let head_row = head - 1;
        if head_row < rows {
            let glyph = self.alphabet[self.rand_glyph.sample(&mut self.rng)];
            self.grid.put(head_row, col, Some(glyph));
        }

        if let Some(tail_row) = head_row.checked_sub(length) {
            self.grid.put(tail_row, col, None);
        }

        let c = &mut self.columns[col];
        c.head += 1;
        if c.head > rows + c.length {
            *c = Column::default();
        }
    }
}

/// Half-open range drop lengths are sampled from.
fn drop_len_range(rows: usize) -> (usize, usize) {
    let hi = (rows / 2).max(MIN_DROP_LEN);
    if hi <= MIN_DROP_LEN {
        (MIN_DROP_LEN, MIN_DROP_LEN + 1)
    } else {
        (MIN_DROP_LEN, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::build_alphabet;

    fn sim(rows: usize, cols: usize, seed: u64) -> RainSimulator {
        RainSimulator::with_seed(rows, cols, build_alphabet(), seed)
    }

    fn filled(grid: &GlyphGrid) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for r in 0..grid.rows() {
            for c in 0..grid.cols() {
                if grid.get(r, c).is_some() {
                    out.push((r, c));
                }
            }
        }
        out
    }

    #[test]
    fn columns_start_idle_with_empty_grid() {
        let s = sim(40, 10, 1);
        assert!(s.columns().iter().all(|c| !c.is_active()));
        assert!(filled(s.grid()).is_empty());
    }

    #[test]
    fn forced_drop_fills_rows_then_deactivates_past_bottom() {
        let mut s = sim(40, 10, 7);
        s.start_drop(3, 8);

        for _ in 0..8 {
            s.advance();
        }
        assert_eq!(s.columns()[3].head, 9);
        for r in 0..8 {
            assert!(s.grid().get(r, 3).is_some(), "row {} empty", r);
        }

        for _ in 8..47 {
            s.advance();
        }
        assert_eq!(s.columns()[3].head, 48);
        assert!(s.columns()[3].is_active());

        s.advance();
        assert!(!s.columns()[3].is_active());
        assert_eq!(s.columns()[3], Column::default());
    }

    #[test]
    fn tail_window_trails_the_head() {
        let mut s = sim(40, 10, 11);
        s.start_drop(3, 8);
        for _ in 0..20 {
            s.advance();
        }
        // head written at row 19, window keeps rows 12..=19
        assert_eq!(s.columns()[3].head_row(), Some(19));
        for r in 0..40 {
            let expect = (12..=19).contains(&r);
            assert_eq!(s.grid().get(r, 3).is_some(), expect, "row {}", r);
        }
    }

    #[test]
    fn finished_drop_has_swept_its_whole_column() {
        let mut s = sim(10, 1, 3);
        s.start_drop(0, 5);
        let mut calls = 0;
        while s.columns()[0].is_active() {
            s.advance();
            calls += 1;
        }
        assert_eq!(calls, 15);
        for r in 0..10 {
            assert!(s.grid().get(r, 0).is_none(), "row {}", r);
        }
    }

    #[test]
    fn head_position_stays_within_bounds() {
        let rows = 30;
        let mut s = sim(rows, 50, 42);
        for _ in 0..2000 {
            s.advance();
            for c in s.columns() {
                if c.is_active() {
                    assert!(c.head >= 1 && c.head <= rows + c.length);
                } else {
                    assert_eq!(c.head, 0);
                }
            }
        }
    }

    #[test]
    fn drop_length_is_fixed_per_activation_and_in_range() {
        let rows = 40;
        let mut s = sim(rows, 60, 5);
        let mut seen: Vec<Option<usize>> = vec![None; 60];
        let mut activations = 0;
        for _ in 0..3000 {
            s.advance();
            for (i, c) in s.columns().iter().enumerate() {
                if c.is_active() {
                    assert!(c.length >= MIN_DROP_LEN && c.length < rows / 2);
                    match seen[i] {
                        Some(len) => assert_eq!(len, c.length),
                        None => {
                            seen[i] = Some(c.length);
                            activations += 1;
                        }
                    }
                } else {
                    seen[i] = None;
                }
            }
        }
        assert!(activations > 0);
    }

    #[test]
    fn each_advance_adds_one_head_and_clears_at_most_one_cell_per_column() {
        let rows = 24;
        let mut s = sim(rows, 30, 9);
        for _ in 0..500 {
            let before = s.grid().clone();
            s.advance();
            let after = s.grid();
            for (col, c) in s.columns().iter().enumerate() {
                let mut gained = 0;
                let mut cleared = 0;
                for r in 0..rows {
                    match (before.get(r, col), after.get(r, col)) {
                        (None, Some(_)) => gained += 1,
                        (Some(_), None) => cleared += 1,
                        _ => {}
                    }
                }
                assert!(cleared <= 1, "col {} cleared {}", col, cleared);
                assert!(gained <= 1, "col {} gained {}", col, gained);
                if let Some(hr) = c.head_row() {
                    if hr < rows {
                        assert!(after.get(hr, col).is_some());
                    }
                }
            }
        }
    }

    #[test]
    fn small_grids_clamp_drop_length_to_minimum() {
        assert_eq!(drop_len_range(0), (5, 6));
        assert_eq!(drop_len_range(10), (5, 6));
        assert_eq!(drop_len_range(12), (5, 6));
        assert_eq!(drop_len_range(13), (5, 6));
        assert_eq!(drop_len_range(14), (5, 7));
        assert_eq!(drop_len_range(40), (5, 20));
    }

    #[test]
    fn degenerate_grid_advances_without_touching_cells() {
        let mut s = sim(0, 4, 2);
        for _ in 0..200 {
            s.advance();
        }
        assert_eq!(s.rows(), 0);
        assert_eq!(s.cols(), 4);

        let mut s = sim(10, 0, 2);
        s.advance();
        assert!(s.columns().is_empty());
    }
}
