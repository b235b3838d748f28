//! Terminal styling. A `Palette` is a plain value passed to the renderers;
//! nothing here touches process-wide state.

use crossterm::style::Stylize;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// No escape codes.
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Colors on unless disabled by flag, `NO_COLOR`, or a non-terminal stdout.
    pub fn detect(no_color: bool) -> Self {
        let env_disabled = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self::new(!no_color && !env_disabled && std::io::stdout().is_terminal())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, |t| t.green().to_string())
    }

    pub fn failure(&self, text: &str) -> String {
        self.paint(text, |t| t.red().to_string())
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    pub fn accent(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan().to_string())
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold().to_string())
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> String) -> String {
        if self.enabled {
            style(text)
        } else {
            text.to_string()
        }
    }
}
