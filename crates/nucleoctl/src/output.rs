//! Terminal output helpers.

use nucleo_common::config::ColorMode;
use owo_colors::OwoColorize;
use serde::Serialize;

pub const HR: &str = "──────────────────────────────────────────────────";

/// Key column width for key/value lines
const KW: usize = 16;

#[derive(Debug, Clone, Copy)]
pub struct Painter {
    color: bool,
}

impl Painter {
    pub fn new(mode: ColorMode) -> Self {
        let color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => console::Term::stdout().features().colors_supported(),
        };
        Self { color }
    }

    pub fn header(&self, text: &str) -> String {
        if self.color {
            text.bold().magenta().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn ok(&self, text: &str) -> String {
        if self.color {
            text.bright_green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warn(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn rule(&self) {
        println!("{}", self.dim(HR));
    }

    pub fn kv(&self, key: &str, value: &str) {
        println!("{:width$} {}", key, value, width = KW);
    }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
