// Copyright (c) 2026 rezky_nightky

use std::env;
use std::time::Duration;

use clap::Parser;

use crate::error::{Result, SaverError};
use crate::lifecycle::PointerPolicy;
use crate::runtime::{ColorMode, Mode};

pub const DEFAULT_PREVIEW_SIZE: (u16, u16) = (80, 24);

#[derive(Parser, Debug, Clone)]
#[command(name = "katarain", version, about = "Katakana rain screensaver for the terminal")]
pub struct Args {
    #[arg(
        value_name = "MODE",
        help = "/c prints settings, /p prints a preview frame, /s (or nothing) runs"
    )]
    pub mode: Option<String>,

    #[arg(
        short = 'i',
        long = "interval-ms",
        default_value_t = 50,
        help_heading = "GENERAL",
        help = "Tick interval in ms (min 10 max 1000)"
    )]
    pub interval_ms: u64,

    #[arg(
        long = "dead-zone",
        default_value_t = 5,
        help_heading = "GENERAL",
        help = "Pointer movement in cells tolerated before exiting; 0 exits on any movement (max 1000)"
    )]
    pub dead_zone: u16,

    #[arg(
        long = "panes",
        default_value_t = 1,
        help_heading = "GENERAL",
        help = "Independent rain panes side by side (min 1 max 8)"
    )]
    pub panes: u16,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "preview-ticks",
        default_value_t = 60,
        help_heading = "PREVIEW",
        help = "Ticks simulated before printing the preview frame (min 1 max 10000)"
    )]
    pub preview_ticks: u32,
}

/// Validated settings the host runs with.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    pub interval: Duration,
    pub pointer: PointerPolicy,
    pub panes: u16,
    pub color_mode: ColorMode,
    pub preview_ticks: u32,
}

fn require_range(name: &'static str, v: u64, min: u64, max: u64) -> Result<u64> {
    if v < min || v > max {
        return Err(SaverError::OutOfRange {
            name,
            value: v,
            min,
            max,
        });
    }
    Ok(v)
}

pub fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }

    ColorMode::Color256
}

pub fn color_mode_from_flag(m: u16) -> Result<ColorMode> {
    match m {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        _ => Err(SaverError::InvalidColorMode(m)),
    }
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self> {
        let mode = match &args.mode {
            Some(m) => m.parse()?,
            None => Mode::Run,
        };
        let interval_ms = require_range("--interval-ms", args.interval_ms, 10, 1000)?;
        let dead_zone = require_range("--dead-zone", args.dead_zone as u64, 0, 1000)?;
        let panes = require_range("--panes", args.panes as u64, 1, 8)?;
        let preview_ticks = require_range("--preview-ticks", args.preview_ticks as u64, 1, 10_000)?;
        let color_mode = match args.colormode {
            Some(m) => color_mode_from_flag(m)?,
            None => detect_color_mode_auto(),
        };

        Ok(Self {
            mode,
            interval: Duration::from_millis(interval_ms),
            pointer: PointerPolicy::from_dead_zone(dead_zone as u16),
            panes: panes as u16,
            color_mode,
            preview_ticks: preview_ticks as u32,
        })
    }
}
