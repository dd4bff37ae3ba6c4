//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use super::halfblock::Rgb;

/// Central theme; change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── backdrop ───────────────────────────────────────────────
    /// What shows through where no backdrop is opaque.
    pub const CANVAS: Rgb = [255.0, 255.0, 255.0];
    /// Colour the backdrop gradient fades into at the bottom edge.
    pub const GRADIENT_END: Rgb = [255.0, 255.0, 255.0];

    // ── posters ────────────────────────────────────────────────
    pub fn placeholder_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn failed_style() -> Style {
        Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD)
    }

    // ── indicator ──────────────────────────────────────────────
    pub fn dot_style() -> Style {
        Style::default().fg(Color::Rgb(192, 192, 192))
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn loading_style() -> Style {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }
}
