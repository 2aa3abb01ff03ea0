// Copyright (c) 2026 rezky_nightky

use std::str::FromStr;

use crate::error::SaverError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Color16,
    Color256,
    TrueColor,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::TrueColor => "24-bit truecolor",
            ColorMode::Color256 => "8-bit (256-color)",
            ColorMode::Color16 => "16-color",
            ColorMode::Mono => "mono",
        }
    }
}

/// What the process was asked to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Config,
    Preview,
    Run,
}

impl FromStr for Mode {
    type Err = SaverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arg = s.trim().to_ascii_lowercase();
        match arg.as_str() {
            "/c" | "c" | "config" => Ok(Mode::Config),
            "/p" | "p" | "preview" => Ok(Mode::Preview),
            "run" | "s" => Ok(Mode::Run),
            // Hosts append window handles after the flag, e.g. "/s:1234".
            _ if arg.starts_with("/s") => Ok(Mode::Run),
            _ => Err(SaverError::InvalidMode(s.to_string())),
        }
    }
}
