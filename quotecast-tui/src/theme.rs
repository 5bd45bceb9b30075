//! Parrot/neon theme tokens for the quotecast charts.
//!
//! # Color Palette
//! - **Background**: deep charcoal
//! - **Accent**: electric cyan (borders, titles)
//! - **Positive**: neon green (series that ended higher)
//! - **Negative**: hot pink (series that ended lower)
//! - **Muted**: steel blue (axes, hints)

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Line color for a series going from `first` to `last`.
    pub fn line_color(&self, first: f64, last: f64) -> Color {
        if last >= first {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn axis(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn axis_title(&self) -> Style {
        Style::default().fg(self.text_secondary)
    }

    pub fn text(&self) -> Style {
        Style::default().fg(self.text_primary)
    }

    pub fn hint(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::ITALIC)
    }
}
