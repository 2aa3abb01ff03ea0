// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SaverError>;

#[derive(Error, Debug)]
pub enum SaverError {
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// No glyph of the alphabet occupies a visible cell.
    #[error("failed to measure glyphs: {0}")]
    GlyphMetrics(String),

    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("invalid mode: {0} (allowed: /c, /p, /s)")]
    InvalidMode(String),

    #[error("invalid --colormode: {0} (allowed: 0,16,8,256,24,32)")]
    InvalidColorMode(u16),
}
